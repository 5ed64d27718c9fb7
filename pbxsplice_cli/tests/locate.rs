mod common;

use pbxsplice_core::AnyEmptyResult;
use serde_json::Value;

#[test]
fn locate_prints_manifest_and_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path(), common::SAMPLE_MANIFEST)?;
	std::fs::write(tmp.path().join("pbxsplice.toml"), "anchor_group = \"MyApp\"\n")?;

	common::pbxsplice_cmd()
		.arg("locate")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("MyApp.xcodeproj/project.pbxproj"))
		.stdout(predicates::str::contains("pbxsplice.toml"));

	Ok(())
}

#[test]
fn locate_without_config_says_none() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path(), common::SAMPLE_MANIFEST)?;

	common::pbxsplice_cmd()
		.arg("locate")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("none"));

	Ok(())
}

#[test]
fn locate_json_names_the_project() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path(), common::SAMPLE_MANIFEST)?;

	let output = common::pbxsplice_cmd()
		.arg("locate")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;
	assert!(output.status.success());

	let json: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(json["name"], "MyApp");
	assert_eq!(json["config"], Value::Null);

	Ok(())
}

#[test]
fn locate_picks_the_configured_project() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path(), common::SAMPLE_MANIFEST)?;
	let other = tmp.path().join("Other.xcodeproj");
	std::fs::create_dir_all(&other)?;
	std::fs::write(other.join("project.pbxproj"), common::SAMPLE_MANIFEST)?;
	std::fs::write(tmp.path().join(".pbxsplice.toml"), "project = \"Other\"\n")?;

	common::pbxsplice_cmd()
		.arg("locate")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Other.xcodeproj"));

	Ok(())
}

#[test]
fn locate_reports_invalid_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path(), common::SAMPLE_MANIFEST)?;
	std::fs::write(tmp.path().join("pbxsplice.toml"), "project = [\n")?;

	common::pbxsplice_cmd()
		.arg("locate")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("failed to parse config file"));

	Ok(())
}
