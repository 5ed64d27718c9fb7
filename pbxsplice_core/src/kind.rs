use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

/// The build phase a file takes part in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileRole {
	/// Compiled in the `PBXSourcesBuildPhase`.
	Source,
	/// Referenced and grouped, but never added to a build phase.
	Header,
	/// Copied in the `PBXResourcesBuildPhase` (storyboards, xibs).
	Resource,
}

impl FileRole {
	/// The destination named in `/* <file> in <destination> */` comments.
	pub fn destination(self) -> &'static str {
		match self {
			Self::Resource => "Resources",
			Self::Source | Self::Header => "Sources",
		}
	}

	pub fn is_buildable(self) -> bool {
		!matches!(self, Self::Header)
	}
}

/// The classification of one imported file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileKind {
	/// Value written to `lastKnownFileType`.
	pub file_type: Cow<'static, str>,
	pub role: FileRole,
}

impl FileKind {
	const fn builtin(file_type: &'static str, role: FileRole) -> Self {
		Self {
			file_type: Cow::Borrowed(file_type),
			role,
		}
	}

	/// Xcode writes `fileEncoding` for text sources but not for interface
	/// builder documents.
	pub fn has_file_encoding(&self) -> bool {
		self.role != FileRole::Resource
	}
}

const BUILTIN_KINDS: [(&str, FileKind); 8] = [
	("swift", FileKind::builtin("sourcecode.swift", FileRole::Source)),
	("h", FileKind::builtin("sourcecode.c.h", FileRole::Header)),
	("m", FileKind::builtin("sourcecode.c.objc", FileRole::Source)),
	("mm", FileKind::builtin("sourcecode.cpp.objcpp", FileRole::Source)),
	("c", FileKind::builtin("sourcecode.c.c", FileRole::Source)),
	("cpp", FileKind::builtin("sourcecode.cpp.cpp", FileRole::Source)),
	("storyboard", FileKind::builtin("file.storyboard", FileRole::Resource)),
	("xib", FileKind::builtin("file.xib", FileRole::Resource)),
];

/// A user supplied mapping for an extension, loaded from `[types]`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CustomFileType {
	pub file_type: String,
	pub role: FileRole,
}

/// Extension to [`FileKind`] lookup table.
///
/// Custom entries take precedence over the built-in ones.
#[derive(Debug, Clone, Default)]
pub struct FileTypes {
	custom: BTreeMap<String, FileKind>,
}

impl FileTypes {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_custom<'a>(types: impl IntoIterator<Item = (&'a String, &'a CustomFileType)>) -> Self {
		let custom = types
			.into_iter()
			.map(|(extension, custom)| {
				let kind = FileKind {
					file_type: Cow::Owned(custom.file_type.clone()),
					role: custom.role,
				};
				(extension.trim_start_matches('.').to_string(), kind)
			})
			.collect();

		Self { custom }
	}

	/// Classify a file by the extension of its name. Returns `None` for an
	/// unknown or missing extension.
	pub fn classify(&self, name: &str) -> Option<FileKind> {
		let extension = Path::new(name).extension()?.to_str()?;

		if let Some(kind) = self.custom.get(extension) {
			return Some(kind.clone());
		}

		BUILTIN_KINDS
			.iter()
			.find(|(known, _)| *known == extension)
			.map(|(_, kind)| kind.clone())
	}
}
