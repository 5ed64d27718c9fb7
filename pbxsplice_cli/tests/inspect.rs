mod common;

use pbxsplice_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;
use serde_json::Value;

#[test]
fn inspect_lists_files_with_their_types() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let manifest = common::write_project(tmp.path(), common::SAMPLE_MANIFEST)?;
	let source = tmp.path().join("MyApp/Source");
	common::write_files(&source, &["Router.swift", "Views/Main.storyboard", "notes.txt"])?;

	common::pbxsplice_cmd()
		.arg("inspect")
		.arg(&source)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Source/"))
		.stdout(predicates::str::contains("Views/"))
		.stdout(predicates::str::contains("sourcecode.swift (source)"))
		.stdout(predicates::str::contains("file.storyboard (resource)"))
		.stdout(predicates::str::contains("Not registered"))
		.stdout(predicates::str::contains("unknown type `txt`"));

	similar_asserts::assert_eq!(std::fs::read_to_string(&manifest)?, common::SAMPLE_MANIFEST);

	Ok(())
}

#[test]
fn inspect_json_uses_configured_types() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("pbxsplice.toml"),
		"[import]\nsort = true\n\n[types.metal]\nfile_type = \"sourcecode.metal\"\nrole = \
		 \"source\"\n",
	)?;
	let source = tmp.path().join("MyApp/Source");
	common::write_files(&source, &["Shader.metal", "Router.swift"])?;

	let output = common::pbxsplice_cmd()
		.arg("inspect")
		.arg(&source)
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;
	assert!(output.status.success());

	let json: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(json["folders"][0], "Source");
	assert_eq!(json["files"][0]["path"], "Source/Router.swift");
	assert_eq!(json["files"][1]["path"], "Source/Shader.metal");
	assert_eq!(json["files"][1]["file_type"], "sourcecode.metal");
	assert_eq!(json["files"][1]["role"], "source");
	assert_eq!(json["unclassified"], Value::Array(Vec::new()));

	Ok(())
}

#[test]
fn inspect_honors_exclude_patterns() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("pbxsplice.toml"),
		"[import]\nexclude = [\"Legacy/\"]\n",
	)?;
	let source = tmp.path().join("MyApp/Source");
	common::write_files(&source, &["Router.swift", "Legacy/Old.swift"])?;

	common::pbxsplice_cmd()
		.arg("inspect")
		.arg(&source)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Router.swift"))
		.stdout(predicates::str::contains("Old.swift").not());

	Ok(())
}

#[test]
fn inspect_fails_for_missing_directory() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::pbxsplice_cmd()
		.arg("inspect")
		.arg(tmp.path().join("Nope"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("import directory not found"));

	Ok(())
}
