use std::path::Path;
use std::path::PathBuf;

use crate::AnyEmptyResult;
use crate::Entry;
use crate::FileTypes;
use crate::FolderEntry;
use crate::IdGenerator;

/// A trimmed down manifest of a one-target app called `MyApp`.
pub const SAMPLE_MANIFEST: &str = include_str!("../fixtures/sample.pbxproj");

/// The opening lines of the `MyApp` group, up to and including its
/// `children = (` line.
pub const MY_APP_GROUP_OPEN: &str =
	"\t\tAA0000000000000000000011 /* MyApp */ = {\n\t\t\tisa = PBXGroup;\n\t\t\tchildren = (\n";

/// The resources phase up to and including its `files = (` line.
pub const RESOURCES_FILES_OPEN: &str = "\t\t\tisa = PBXResourcesBuildPhase;\n\t\t\tbuildActionMask = \
                                        2147483647;\n\t\t\tfiles = (\n";

/// The sources phase up to and including its `files = (` line.
pub const SOURCES_FILES_OPEN: &str =
	"\t\t\tisa = PBXSourcesBuildPhase;\n\t\t\tbuildActionMask = 2147483647;\n\t\t\tfiles = (\n";

/// A classified entry named after the last component of `path`.
pub fn entry(path: &str, ids: &mut impl IdGenerator) -> Entry {
	let kind = FileTypes::new()
		.classify(path)
		.unwrap_or_else(|| panic!("fixture file `{path}` has no known type"));
	Entry::new(PathBuf::from(path), kind, ids)
}

/// A folder built in memory, ids assigned files first and then the folder,
/// in the same order as a sorted scan.
pub fn folder(name: &str, files: &[&str], folders: Vec<FolderEntry>, ids: &mut impl IdGenerator) -> FolderEntry {
	let files = files
		.iter()
		.map(|file| entry(&format!("{name}/{file}"), ids))
		.collect();
	let id = ids.next_id();
	let id2 = ids.next_id();

	FolderEntry {
		name: name.to_string(),
		path: PathBuf::from(name),
		id,
		id2,
		files,
		folders,
	}
}

/// `Util/` holding `Helper.h` and `Helper.swift`.
pub fn util_folder(ids: &mut impl IdGenerator) -> FolderEntry {
	folder("Util", &["Helper.h", "Helper.swift"], Vec::new(), ids)
}

/// Lay out `<root>/MyApp.xcodeproj/project.pbxproj` with `manifest` and
/// return the manifest path.
pub fn write_project(root: &Path, manifest: &str) -> std::io::Result<PathBuf> {
	let bundle = root.join("MyApp.xcodeproj");
	std::fs::create_dir_all(&bundle)?;
	let path = bundle.join("project.pbxproj");
	std::fs::write(&path, manifest)?;
	Ok(path)
}

/// Create empty files at each relative path below `dir`.
pub fn write_files(dir: &Path, files: &[&str]) -> AnyEmptyResult {
	for file in files {
		let path = dir.join(file);
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		std::fs::write(path, "")?;
	}
	Ok(())
}
