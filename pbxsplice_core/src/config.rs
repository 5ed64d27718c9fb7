use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::XcError;
use crate::XcResult;
use crate::kind::CustomFileType;
use crate::kind::FileTypes;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = [
	"pbxsplice.toml",
	".pbxsplice.toml",
	".config/pbxsplice.toml",
];

/// Configuration loaded from a `pbxsplice.toml` file at the project root.
///
/// ```toml
/// project = "MyApp"
/// anchor_group = "MyApp"
///
/// [import]
/// exclude = ["*.orig", "Generated/"]
/// sort = true
/// include_hidden = false
///
/// [types.strings]
/// file_type = "text.plist.strings"
/// role = "resource"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct XcConfig {
	/// Name of the `*.xcodeproj` bundle to edit when the project root holds
	/// more than one.
	#[serde(default)]
	pub project: Option<String>,
	/// Name of the existing group whose children receive the imported
	/// folder. Defaults to the name of the import directory's parent.
	#[serde(default)]
	pub anchor_group: Option<String>,
	/// Controls how the import directory is mirrored.
	#[serde(default)]
	pub import: ImportConfig,
	/// Extra file extensions, keyed by extension without the leading dot.
	#[serde(default)]
	pub types: BTreeMap<String, CustomFileType>,
}

/// The `[import]` table.
#[derive(Debug, Default, Deserialize)]
pub struct ImportConfig {
	/// Gitignore-style patterns, relative to the import directory, for files
	/// and folders that should not be registered.
	#[serde(default)]
	pub exclude: Vec<String>,
	/// Visit directory entries in name order instead of listing order.
	#[serde(default)]
	pub sort: bool,
	/// Register dot-files and dot-folders as well.
	#[serde(default)]
	pub include_hidden: bool,
}

impl XcConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> XcResult<Option<XcConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::parse(&content)?;

		Ok(Some(config))
	}

	pub fn parse(content: &str) -> XcResult<XcConfig> {
		toml::from_str(content).map_err(|e| XcError::ConfigParse(e.to_string()))
	}

	/// The classification table, built-in kinds plus `[types]`.
	pub fn file_types(&self) -> FileTypes {
		FileTypes::with_custom(&self.types)
	}
}
