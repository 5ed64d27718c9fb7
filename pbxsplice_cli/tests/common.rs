#![allow(dead_code)]

use std::path::Path;
use std::path::PathBuf;

use assert_cmd::Command;

pub fn pbxsplice_cmd() -> Command {
	let mut cmd = Command::cargo_bin("pbxsplice").unwrap();
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("RUST_LOG");
	cmd
}

/// A trimmed down manifest of a one-target app called `MyApp`.
pub const SAMPLE_MANIFEST: &str = include_str!("../../pbxsplice_core/fixtures/sample.pbxproj");

/// Lay out `<root>/MyApp.xcodeproj/project.pbxproj` and return the manifest
/// path.
pub fn write_project(root: &Path, manifest: &str) -> std::io::Result<PathBuf> {
	let bundle = root.join("MyApp.xcodeproj");
	std::fs::create_dir_all(&bundle)?;
	let path = bundle.join("project.pbxproj");
	std::fs::write(&path, manifest)?;
	Ok(path)
}

/// Create empty files at each relative path below `dir`.
pub fn write_files(dir: &Path, files: &[&str]) -> std::io::Result<()> {
	for file in files {
		let path = dir.join(file);
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		std::fs::write(path, "")?;
	}
	Ok(())
}

/// Files in the bundle whose name starts with `project.pbxproj.` and ends
/// with `.bak`.
pub fn backups(root: &Path) -> std::io::Result<Vec<PathBuf>> {
	let mut found = Vec::new();
	for entry in std::fs::read_dir(root.join("MyApp.xcodeproj"))? {
		let path = entry?.path();
		let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
		if name.starts_with("project.pbxproj.") && name.ends_with(".bak") {
			found.push(path);
		}
	}
	Ok(found)
}
