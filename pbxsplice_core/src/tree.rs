use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;
use serde::Serialize;

use crate::XcError;
use crate::XcResult;
use crate::config::XcConfig;
use crate::id::IdGenerator;
use crate::id::ObjectId;
use crate::kind::FileKind;
use crate::kind::FileTypes;

/// Something that can be listed in a group's `children`.
pub trait TreeNode {
	fn name(&self) -> &str;
	/// Identifier keyed in the `PBXBuildFile` table.
	fn id(&self) -> &ObjectId;
	/// Identifier keyed in the `PBXFileReference` / `PBXGroup` tables.
	fn id2(&self) -> &ObjectId;
}

/// A file of the import tree.
#[derive(Debug, Clone, Serialize)]
pub struct Entry {
	pub name: String,
	pub path: PathBuf,
	pub id: ObjectId,
	pub id2: ObjectId,
	pub kind: FileKind,
}

impl Entry {
	pub fn new(path: PathBuf, kind: FileKind, ids: &mut impl IdGenerator) -> Self {
		let name = file_name(&path);
		let id = ids.next_id();
		let id2 = ids.next_id();

		Self {
			name,
			path,
			id,
			id2,
			kind,
		}
	}
}

impl TreeNode for Entry {
	fn name(&self) -> &str {
		&self.name
	}

	fn id(&self) -> &ObjectId {
		&self.id
	}

	fn id2(&self) -> &ObjectId {
		&self.id2
	}
}

/// A directory of the import tree. Owns its files and subfolders; never
/// mutated after [`FolderEntry::scan`] returns.
#[derive(Debug, Clone, Serialize)]
pub struct FolderEntry {
	pub name: String,
	pub path: PathBuf,
	pub id: ObjectId,
	pub id2: ObjectId,
	pub files: Vec<Entry>,
	pub folders: Vec<FolderEntry>,
}

impl TreeNode for FolderEntry {
	fn name(&self) -> &str {
		&self.name
	}

	fn id(&self) -> &ObjectId {
		&self.id
	}

	fn id2(&self) -> &ObjectId {
		&self.id2
	}
}

/// A file whose extension has no known manifest mapping. It is left out of
/// the tree and therefore out of every fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationError {
	pub path: PathBuf,
	pub extension: String,
}

impl From<&ClassificationError> for XcError {
	fn from(value: &ClassificationError) -> Self {
		XcError::UnknownFileType {
			path: value.path.clone(),
			extension: value.extension.clone(),
		}
	}
}

/// The result of mirroring an import directory.
#[derive(Debug, Clone, Serialize)]
pub struct ScannedTree {
	pub root: FolderEntry,
	pub unclassified: Vec<ClassificationError>,
}

/// Options controlling how an import directory is mirrored.
#[derive(Debug, Clone)]
pub struct ScanOptions {
	pub file_types: FileTypes,
	/// Visit entries in name order rather than directory listing order.
	pub sort: bool,
	pub include_hidden: bool,
	exclude: Option<Gitignore>,
}

impl Default for ScanOptions {
	fn default() -> Self {
		Self {
			file_types: FileTypes::new(),
			sort: false,
			include_hidden: false,
			exclude: None,
		}
	}
}

impl ScanOptions {
	/// Construct [`ScanOptions`] for `import_dir` from an optional config.
	pub fn from_config(import_dir: &Path, config: Option<&XcConfig>) -> XcResult<Self> {
		let Some(config) = config else {
			return Ok(Self::default());
		};

		let exclude = build_exclude_matcher(import_dir, &config.import.exclude)?;

		Ok(Self {
			file_types: config.file_types(),
			sort: config.import.sort,
			include_hidden: config.import.include_hidden,
			exclude,
		})
	}

	#[must_use]
	pub fn sorted(mut self) -> Self {
		self.sort = true;
		self
	}

	/// Add gitignore-style exclude patterns relative to `import_dir`.
	pub fn with_exclude(mut self, import_dir: &Path, patterns: &[String]) -> XcResult<Self> {
		self.exclude = build_exclude_matcher(import_dir, patterns)?;
		Ok(self)
	}

	fn is_excluded(&self, path: &Path, is_dir: bool) -> bool {
		self.exclude
			.as_ref()
			.is_some_and(|matcher| matcher.matched(path, is_dir).is_ignore())
	}
}

fn build_exclude_matcher(root: &Path, patterns: &[String]) -> XcResult<Option<Gitignore>> {
	if patterns.is_empty() {
		return Ok(None);
	}

	let mut builder = GitignoreBuilder::new(root);
	for pattern in patterns {
		builder
			.add_line(None, pattern)
			.map_err(|e| XcError::InvalidExcludePattern {
				pattern: pattern.clone(),
				reason: e.to_string(),
			})?;
	}

	let matcher = builder.build().map_err(|e| XcError::InvalidExcludePattern {
		pattern: patterns.join(", "),
		reason: e.to_string(),
	})?;

	Ok(Some(matcher))
}

impl FolderEntry {
	/// Mirror `dir` and everything below it.
	pub fn scan(
		dir: &Path,
		options: &ScanOptions,
		ids: &mut impl IdGenerator,
	) -> XcResult<ScannedTree> {
		if !dir.is_dir() {
			return Err(XcError::ImportDirNotFound(dir.to_path_buf()));
		}

		let mut unclassified = Vec::new();
		let mut ancestors = HashSet::new();
		let root = Self::scan_dir(dir, options, ids, &mut unclassified, &mut ancestors)?;

		Ok(ScannedTree { root, unclassified })
	}

	fn scan_dir(
		dir: &Path,
		options: &ScanOptions,
		ids: &mut impl IdGenerator,
		unclassified: &mut Vec<ClassificationError>,
		ancestors: &mut HashSet<PathBuf>,
	) -> XcResult<Self> {
		// Holds the canonical paths of `dir` and its parents only, so a
		// directory reached twice through sibling links is mirrored twice.
		let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
		ancestors.insert(canonical.clone());
		let folder = Self::scan_entries(dir, options, ids, unclassified, ancestors);
		ancestors.remove(&canonical);
		folder
	}

	fn scan_entries(
		dir: &Path,
		options: &ScanOptions,
		ids: &mut impl IdGenerator,
		unclassified: &mut Vec<ClassificationError>,
		ancestors: &mut HashSet<PathBuf>,
	) -> XcResult<Self> {
		let mut paths = Vec::new();
		for entry in std::fs::read_dir(dir)? {
			paths.push(entry?.path());
		}
		if options.sort {
			paths.sort();
		}

		let mut files = Vec::new();
		let mut folders = Vec::new();

		for path in paths {
			let name = file_name(&path);
			if !options.include_hidden && name.starts_with('.') {
				continue;
			}

			let is_dir = path.is_dir();
			if options.is_excluded(&path, is_dir) {
				tracing::debug!(path = %path.display(), "excluded from import");
				continue;
			}

			if is_dir {
				let canonical = path.canonicalize().unwrap_or_else(|_| path.clone());
				if ancestors.contains(&canonical) {
					tracing::warn!(path = %path.display(), "skipping symlink cycle");
					continue;
				}
				folders.push(Self::scan_dir(&path, options, ids, unclassified, ancestors)?);
				continue;
			}

			match options.file_types.classify(&name) {
				Some(kind) => files.push(Entry::new(path, kind, ids)),
				None => {
					let extension = path
						.extension()
						.map(|ext| ext.to_string_lossy().into_owned())
						.unwrap_or_default();
					tracing::warn!(path = %path.display(), %extension, "unknown file type, not registered");
					unclassified.push(ClassificationError { path, extension });
				}
			}
		}

		let id = ids.next_id();
		let id2 = ids.next_id();

		Ok(Self {
			name: file_name(dir),
			path: dir.to_path_buf(),
			id,
			id2,
			files,
			folders,
		})
	}

	/// Every file below this folder: its own files first, then each
	/// subfolder's files, depth first.
	pub fn all_files(&self) -> Box<dyn Iterator<Item = &Entry> + '_> {
		Box::new(
			self.files
				.iter()
				.chain(self.folders.iter().flat_map(FolderEntry::all_files)),
		)
	}

	/// This folder followed by all of its descendants, pre-order.
	pub fn all_folders(&self) -> Box<dyn Iterator<Item = &FolderEntry> + '_> {
		Box::new(
			std::iter::once(self).chain(self.folders.iter().flat_map(FolderEntry::all_folders)),
		)
	}

	/// Every identifier owned by this folder and its descendants.
	pub fn all_ids(&self) -> Vec<&ObjectId> {
		let mut ids = Vec::new();
		for folder in self.all_folders() {
			ids.push(&folder.id);
			ids.push(&folder.id2);
		}
		for file in self.all_files() {
			ids.push(&file.id);
			ids.push(&file.id2);
		}
		ids
	}
}

fn file_name(path: &Path) -> String {
	path.file_name()
		.map(|name| name.to_string_lossy().into_owned())
		.unwrap_or_else(|| path.display().to_string())
}
