use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;

use crate::XcError;
use crate::XcResult;
use crate::config::XcConfig;
use crate::fragments::FragmentSection;
use crate::id::IdGenerator;
use crate::id::RandomIds;
use crate::rewrite::InjectionPlan;
use crate::rewrite::PendingManifest;
use crate::tree::ClassificationError;
use crate::tree::FolderEntry;
use crate::tree::ScanOptions;

/// Extension of an Xcode project bundle.
pub const PROJECT_EXTENSION: &str = "xcodeproj";
/// File name of the manifest inside the project bundle.
pub const MANIFEST_FILE_NAME: &str = "project.pbxproj";
/// Dependency manager projects that are never the edit target.
const IGNORED_PROJECTS: [&str; 1] = ["Pods"];

/// Where the manifest of a project lives.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectLayout {
	pub root: PathBuf,
	/// Project name, the bundle name without `.xcodeproj`.
	pub name: String,
	/// The `<name>.xcodeproj` directory.
	pub bundle: PathBuf,
	/// `<name>.xcodeproj/project.pbxproj`.
	pub manifest: PathBuf,
	/// The config file that was used, if any.
	pub config: Option<PathBuf>,
}

/// Find the single project bundle below `root`.
///
/// `config.project` picks a bundle by name when there are several.
pub fn locate_project(root: &Path, config: Option<&XcConfig>) -> XcResult<ProjectLayout> {
	let mut candidates = Vec::new();

	for entry in std::fs::read_dir(root)? {
		let path = entry?.path();
		if !path.is_dir() {
			continue;
		}
		if path.extension().and_then(|e| e.to_str()) != Some(PROJECT_EXTENSION) {
			continue;
		}
		let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
			continue;
		};
		if name.starts_with('.') || IGNORED_PROJECTS.contains(&name) {
			continue;
		}
		candidates.push((name.to_string(), path));
	}
	candidates.sort();

	let (name, bundle) = match config.and_then(|c| c.project.as_deref()) {
		Some(wanted) => {
			candidates
				.into_iter()
				.find(|(name, _)| name == wanted)
				.ok_or_else(|| {
					XcError::UnknownProject {
						root: root.to_path_buf(),
						name: wanted.to_string(),
					}
				})?
		}
		None => {
			match candidates.len() {
				0 => return Err(XcError::NoProjectDescriptor(root.to_path_buf())),
				1 => candidates.remove(0),
				_ => {
					return Err(XcError::AmbiguousProjectDescriptor {
						root: root.to_path_buf(),
						candidates: candidates
							.into_iter()
							.map(|(name, _)| format!("{name}.{PROJECT_EXTENSION}"))
							.collect(),
					});
				}
			}
		}
	};

	let manifest = bundle.join(MANIFEST_FILE_NAME);
	if !manifest.is_file() {
		return Err(XcError::ManifestNotFound(manifest));
	}

	Ok(ProjectLayout {
		root: root.to_path_buf(),
		name,
		bundle,
		manifest,
		config: XcConfig::resolve_path(root),
	})
}

/// Options for [`import_files_into_project_with`].
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
	/// Render the new manifest without replacing the original.
	pub dry_run: bool,
	/// Overrides `anchor_group` from the config and the default, which is the
	/// name of the import directory's parent.
	pub anchor_group: Option<String>,
}

/// The outcome of an import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
	pub project: ProjectLayout,
	/// The group the imported folder was attached to.
	pub anchor_group: String,
	/// The mirrored import directory.
	pub tree: FolderEntry,
	/// Fragments written per section.
	pub injected: BTreeMap<FragmentSection, usize>,
	/// Sections whose marker never appeared in the manifest.
	pub skipped: Vec<FragmentSection>,
	/// Files left unregistered because their type is unknown.
	pub unclassified: Vec<ClassificationError>,
	/// Copy of the original manifest. `None` on a dry run.
	pub backup: Option<PathBuf>,
	/// The rendered manifest bytes. Only set on a dry run.
	#[serde(skip)]
	pub rendered: Option<Vec<u8>>,
}

impl ImportReport {
	/// True when every file was registered in every section that applies.
	pub fn is_complete(&self) -> bool {
		self.skipped.is_empty() && self.unclassified.is_empty()
	}

	/// The rendered manifest as text. Bytes that are not valid UTF-8 are
	/// replaced.
	pub fn rendered_text(&self) -> Option<Cow<'_, str>> {
		self.rendered.as_deref().map(String::from_utf8_lossy)
	}
}

/// Register every file below `import_dir` in the project at `project_root`,
/// using the project's config file and random identifiers.
pub fn import_files_into_project(project_root: &Path, import_dir: &Path) -> XcResult<ImportReport> {
	import_files_into_project_with(
		project_root,
		import_dir,
		&ImportOptions::default(),
		&mut RandomIds,
	)
}

/// Register every file below `import_dir` in the project at `project_root`.
///
/// Setup and I/O errors abort before the manifest is touched. Unknown file
/// types and missing section markers are reported in the returned
/// [`ImportReport`] instead.
pub fn import_files_into_project_with(
	project_root: &Path,
	import_dir: &Path,
	options: &ImportOptions,
	ids: &mut impl IdGenerator,
) -> XcResult<ImportReport> {
	let config = XcConfig::load(project_root)?;
	let project = locate_project(project_root, config.as_ref())?;

	let import_dir = import_dir
		.canonicalize()
		.map_err(|_| XcError::ImportDirNotFound(import_dir.to_path_buf()))?;
	let scan_options = ScanOptions::from_config(&import_dir, config.as_ref())?;
	let scanned = FolderEntry::scan(&import_dir, &scan_options, ids)?;

	let anchor_group = options
		.anchor_group
		.clone()
		.or_else(|| config.as_ref().and_then(|c| c.anchor_group.clone()))
		.unwrap_or_else(|| default_anchor(&import_dir));

	tracing::info!(
		manifest = %project.manifest.display(),
		import = %import_dir.display(),
		anchor = %anchor_group,
		"importing files"
	);

	let imports = std::slice::from_ref(&scanned.root);
	let plan = InjectionPlan {
		imports,
		anchor: anchor_group.clone(),
	};
	let pending = PendingManifest::render(&project.manifest, &plan)?;
	let rewrite = pending.report.clone();

	let (backup, rendered) = if options.dry_run {
		(None, Some(pending.contents()?))
	} else {
		(Some(pending.commit()?), None)
	};

	Ok(ImportReport {
		project,
		anchor_group,
		skipped: rewrite.skipped(),
		injected: rewrite.injected,
		tree: scanned.root,
		unclassified: scanned.unclassified,
		backup,
		rendered,
	})
}

fn default_anchor(import_dir: &Path) -> String {
	import_dir
		.parent()
		.and_then(Path::file_name)
		.map(|name| name.to_string_lossy().into_owned())
		.unwrap_or_default()
}
