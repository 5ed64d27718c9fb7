use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum XcError {
	#[error(transparent)]
	#[diagnostic(code(pbxsplice::io_error))]
	Io(#[from] std::io::Error),

	#[error("no Xcode project found in `{0}`")]
	#[diagnostic(
		code(pbxsplice::no_project),
		help("pass the directory that contains the `*.xcodeproj` bundle with `--path`")
	)]
	NoProjectDescriptor(PathBuf),

	#[error("found {} Xcode projects in `{root}`: {}", .candidates.len(), .candidates.join(", "))]
	#[diagnostic(
		code(pbxsplice::ambiguous_project),
		help("set `project = \"<Name>\"` in pbxsplice.toml to choose one")
	)]
	AmbiguousProjectDescriptor {
		root: PathBuf,
		candidates: Vec<String>,
	},

	#[error("configured project `{name}` was not found in `{root}`")]
	#[diagnostic(code(pbxsplice::unknown_project))]
	UnknownProject { root: PathBuf, name: String },

	#[error("project manifest not found: `{0}`")]
	#[diagnostic(
		code(pbxsplice::manifest_not_found),
		help("the project bundle must contain a `project.pbxproj` file")
	)]
	ManifestNotFound(PathBuf),

	#[error("import directory not found: `{0}`")]
	#[diagnostic(code(pbxsplice::import_dir_not_found))]
	ImportDirNotFound(PathBuf),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(pbxsplice::config_parse),
		help("check that pbxsplice.toml is valid TOML")
	)]
	ConfigParse(String),

	#[error("invalid exclude pattern `{pattern}`: {reason}")]
	#[diagnostic(code(pbxsplice::invalid_exclude_pattern))]
	InvalidExcludePattern { pattern: String, reason: String },

	#[error("unknown file type `{extension}` for `{}`", .path.display())]
	#[diagnostic(
		code(pbxsplice::unknown_file_type),
		help("register the extension under `[types]` in pbxsplice.toml or remove the file")
	)]
	UnknownFileType { path: PathBuf, extension: String },

	#[error("failed to back up `{}`", .path.display())]
	#[diagnostic(code(pbxsplice::backup))]
	Backup {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to replace `{}` with the rewritten manifest", .path.display())]
	#[diagnostic(
		code(pbxsplice::replace),
		help("the original manifest was left untouched")
	)]
	Replace {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

pub type XcResult<T> = Result<T, XcError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
