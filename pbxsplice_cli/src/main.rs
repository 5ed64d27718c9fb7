use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use pbxsplice_core::AnyEmptyResult;
use pbxsplice_core::AnyResult;
use pbxsplice_core::ClassificationError;
use pbxsplice_core::FolderEntry;
use pbxsplice_core::ImportOptions;
use pbxsplice_core::ImportReport;
use pbxsplice_core::ProjectLayout;
use pbxsplice_core::RandomIds;
use pbxsplice_core::ScanOptions;
use pbxsplice_core::ScannedTree;
use pbxsplice_core::SequentialIds;
use pbxsplice_core::XcError;
use pbxsplice_core::config::CONFIG_FILE_CANDIDATES;
use pbxsplice_core::config::XcConfig;
use pbxsplice_core::fragments::FragmentSection;
use pbxsplice_core::import_files_into_project_with;
use pbxsplice_core::locate_project;
use pbxsplice_cli::Commands;
use pbxsplice_cli::OutputFormat;
use pbxsplice_cli::XcCli;
use serde::Serialize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,dimmed) => {
		if color_enabled() {
			format!("{}", $text.dimmed())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

const SAMPLE_CONFIG: &str = "# pbxsplice configuration\n\n# Name of the *.xcodeproj bundle to \
                             edit when the directory holds more than one.\n# project = \
                             \"MyApp\"\n\n# Existing group that receives the imported folder. \
                             Defaults to the\n# name of the import directory's parent.\n# \
                             anchor_group = \"MyApp\"\n\n[import]\n# Gitignore-style patterns, \
                             relative to the import directory.\nexclude = []\n# Register entries \
                             in name order instead of directory listing order.\nsort = \
                             false\n# Register dot-files and dot-folders too.\ninclude_hidden = \
                             false\n\n# Extra file types, keyed by extension. `role` is one of \
                             source, header\n# or resource.\n# [types.metal]\n# file_type = \
                             \"sourcecode.metal\"\n# role = \"source\"\n";

fn main() {
	let args = XcCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Init) => run_init(&args).map(|()| true),
		Some(Commands::Import {
			dir,
			dry_run,
			diff,
			anchor,
			strict,
			format,
		}) => {
			let options = ImportOptions {
				dry_run: *dry_run,
				anchor_group: anchor.clone(),
			};
			run_import(&args, dir, &options, *diff, *format).map(|complete| complete || !strict)
		}
		Some(Commands::Inspect { dir, format }) => run_inspect(&args, dir, *format).map(|()| true),
		Some(Commands::Locate { format }) => run_locate(&args, *format).map(|()| true),
		None => {
			eprintln!("No subcommand specified. Run `pbxsplice --help` for usage.");
			process::exit(1);
		}
	};

	match result {
		Ok(true) => {}
		Ok(false) => process::exit(1),
		Err(e) => {
			// Render through miette for error codes and help text.
			match e.downcast::<XcError>() {
				Ok(xc_err) => {
					let report: miette::Report = (*xc_err).into();
					eprintln!("{report:?}");
				}
				Err(e) => {
					eprintln!("{} {e}", colored!("error:", red));
				}
			}
			process::exit(2);
		}
	}
}

/// Log to stderr at `warn`, or `info` with `--verbose`. `RUST_LOG` wins over
/// both.
fn init_tracing(verbose: bool, use_color: bool) {
	let level = if verbose { "info" } else { "warn" };
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.without_time()
		.init();
}

fn resolve_root(args: &XcCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn print_section(title: &str) {
	println!();
	println!("{}", colored!(title, bold));
}

fn print_field(label: &str, value: impl std::fmt::Display) {
	println!("{label:<24} {value}");
}

fn run_init(args: &XcCli) -> AnyEmptyResult {
	let root = resolve_root(args);

	if let Some(existing) = XcConfig::resolve_path(&root) {
		println!("Config file already exists: {}", existing.display());
		return Ok(());
	}

	let config_path = root.join(CONFIG_FILE_CANDIDATES[0]);
	std::fs::write(&config_path, SAMPLE_CONFIG)?;
	println!("Created {}", config_path.display());

	println!();
	println!("Next steps:");
	println!("  1. Run `pbxsplice locate` to check which project will be edited");
	println!("  2. Run `pbxsplice import <DIR> --dry-run --diff` to preview an import");

	Ok(())
}

/// Returns `false` when the import left something unregistered.
fn run_import(
	args: &XcCli,
	dir: &Path,
	options: &ImportOptions,
	diff: bool,
	format: OutputFormat,
) -> AnyResult<bool> {
	let root = resolve_root(args);
	let report = import_files_into_project_with(&root, dir, options, &mut RandomIds)?;

	if diff {
		let (before, after) = manifest_versions(&report)?;
		print_diff(&before, &after);
	}

	match format {
		OutputFormat::Json => {
			println!("{}", serde_json::to_string_pretty(&report)?);
		}
		OutputFormat::Text => print_import_summary(&report, &root, options.dry_run),
	}

	for error in &report.unclassified {
		let report = miette::Report::new(XcError::from(error));
		eprintln!("{}: {report:?}", colored!("warning", yellow));
	}
	for section in &report.skipped {
		eprintln!(
			"{} marker for {} not found in {}, nothing was injected there",
			colored!("warning:", yellow),
			section.label(),
			make_relative(&report.project.manifest, &root),
		);
	}

	Ok(report.is_complete())
}

/// The manifest before and after the import, for `--diff`, as lossy text.
fn manifest_versions(report: &ImportReport) -> AnyResult<(String, String)> {
	if let Some(rendered) = report.rendered_text() {
		let before = read_lossy(&report.project.manifest)?;
		return Ok((before, rendered.into_owned()));
	}

	let after = read_lossy(&report.project.manifest)?;
	let before = match &report.backup {
		Some(backup) => read_lossy(backup)?,
		None => after.clone(),
	};
	Ok((before, after))
}

fn read_lossy(path: &Path) -> std::io::Result<String> {
	let bytes = std::fs::read(path)?;
	Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn print_import_summary(report: &ImportReport, root: &Path, dry_run: bool) {
	let files = report.tree.all_files().count();
	let folders = report.tree.all_folders().count();
	let manifest = make_relative(&report.project.manifest, root);

	if dry_run {
		println!(
			"Dry run: would register {files} file(s) in {folders} folder(s) in {manifest} under \
			 group `{}`",
			report.anchor_group
		);
	} else {
		println!(
			"{} {files} file(s) in {folders} folder(s) in {manifest} under group `{}`",
			colored!("Registered", green),
			report.anchor_group
		);
	}

	print_section("Injected");
	for section in FragmentSection::ALL {
		let value = match report.injected.get(&section) {
			Some(count) => count.to_string(),
			None => colored!("marker not found", yellow),
		};
		print_field(section.label(), value);
	}

	if let Some(backup) = &report.backup {
		println!();
		println!("Backup written to {}", make_relative(backup, root));
	}
}

fn run_inspect(args: &XcCli, dir: &Path, format: OutputFormat) -> AnyEmptyResult {
	let root = resolve_root(args);
	let config = XcConfig::load(&root)?;
	let dir = dir
		.canonicalize()
		.map_err(|_| XcError::ImportDirNotFound(dir.to_path_buf()))?;
	let options = ScanOptions::from_config(&dir, config.as_ref())?;

	// Identifiers are not shown, so any generator will do.
	let scanned = FolderEntry::scan(&dir, &options, &mut SequentialIds::new())?;

	match format {
		OutputFormat::Json => {
			let output = InspectOutput::from_scan(&scanned, &dir);
			println!("{}", serde_json::to_string_pretty(&output)?);
		}
		OutputFormat::Text => {
			print_folder(&scanned.root, 0);
			if !scanned.unclassified.is_empty() {
				print_section("Not registered");
				for error in &scanned.unclassified {
					println!(
						"  {}  {}",
						make_relative(&error.path, &dir),
						colored!(format!("unknown type `{}`", error.extension), yellow)
					);
				}
			}
		}
	}

	Ok(())
}

fn print_folder(folder: &FolderEntry, depth: usize) {
	let indent = "  ".repeat(depth);
	println!("{indent}{}/", colored!(folder.name, bold));

	for file in &folder.files {
		let role = format!("{:?}", file.kind.role).to_lowercase();
		println!(
			"{indent}  {:<32} {}",
			file.name,
			colored!(format!("{} ({role})", file.kind.file_type), dimmed)
		);
	}
	for child in &folder.folders {
		print_folder(child, depth + 1);
	}
}

#[derive(Serialize)]
struct InspectOutput {
	folders: Vec<String>,
	files: Vec<InspectFile>,
	unclassified: Vec<InspectUnclassified>,
}

#[derive(Serialize)]
struct InspectFile {
	path: String,
	file_type: String,
	role: pbxsplice_core::FileRole,
}

#[derive(Serialize)]
struct InspectUnclassified {
	path: String,
	extension: String,
}

impl InspectOutput {
	fn from_scan(scanned: &ScannedTree, dir: &Path) -> Self {
		let relative = |path: &Path| {
			dir.parent()
				.map_or_else(|| path.display().to_string(), |parent| make_relative(path, parent))
		};

		Self {
			folders: scanned
				.root
				.all_folders()
				.map(|folder| relative(&folder.path))
				.collect(),
			files: scanned
				.root
				.all_files()
				.map(|file| {
					InspectFile {
						path: relative(&file.path),
						file_type: file.kind.file_type.to_string(),
						role: file.kind.role,
					}
				})
				.collect(),
			unclassified: scanned
				.unclassified
				.iter()
				.map(|error: &ClassificationError| {
					InspectUnclassified {
						path: relative(&error.path),
						extension: error.extension.clone(),
					}
				})
				.collect(),
		}
	}
}

fn run_locate(args: &XcCli, format: OutputFormat) -> AnyEmptyResult {
	let root = resolve_root(args);
	let config = XcConfig::load(&root)?;
	let layout: ProjectLayout = locate_project(&root, config.as_ref())?;

	match format {
		OutputFormat::Json => {
			println!("{}", serde_json::to_string_pretty(&layout)?);
		}
		OutputFormat::Text => {
			print_field("Project", &layout.name);
			print_field("Bundle", make_relative(&layout.bundle, &root));
			print_field("Manifest", make_relative(&layout.manifest, &root));
			let config = layout.config.as_deref().map_or_else(
				|| colored!("none", dimmed),
				|path| make_relative(path, &root),
			);
			print_field("Config", config);
		}
	}

	tracing::debug!(manifest = %layout.manifest.display(), "located project");

	Ok(())
}

/// Print a unified diff between two strings, colorized.
fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {}
		}
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
