mod common;

use pbxsplice_core::AnyEmptyResult;
use pbxsplice_core::config::XcConfig;

#[test]
fn init_writes_a_loadable_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::pbxsplice_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Created"))
		.stdout(predicates::str::contains("Next steps"));

	let config = XcConfig::load(tmp.path())?.ok_or("config was not written")?;
	assert!(config.project.is_none());
	assert!(config.import.exclude.is_empty());
	assert!(!config.import.sort);

	Ok(())
}

#[test]
fn init_keeps_an_existing_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let existing = tmp.path().join(".pbxsplice.toml");
	std::fs::write(&existing, "anchor_group = \"App\"\n")?;

	common::pbxsplice_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("already exists"));

	assert_eq!(std::fs::read_to_string(&existing)?, "anchor_group = \"App\"\n");
	assert!(!tmp.path().join("pbxsplice.toml").exists());

	Ok(())
}
