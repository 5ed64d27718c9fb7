use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Register a folder of generated sources in an Xcode project.",
	long_about = "pbxsplice edits an Xcode `project.pbxproj` in place so that every file below an \
	              import directory becomes part of the project: file references, a group per \
	              folder, and membership in the first sources and resources build phases.\n\nThe \
	              original manifest is backed up next to it and only replaced once the rewritten \
	              one is complete.\n\nQuick start:\n  pbxsplice locate            Show which \
	              manifest would be edited\n  pbxsplice inspect MyApp/Gen  Preview the files that \
	              would be registered\n  pbxsplice import MyApp/Gen   Register them"
)]
pub struct XcCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the directory containing the `*.xcodeproj` bundle.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Create a commented sample `pbxsplice.toml` in the project root.
	///
	/// If a config file already exists this command does nothing and exits
	/// successfully.
	Init,
	/// Register every file below a directory in the project.
	///
	/// Mirrors the directory into `PBXFileReference` and `PBXGroup` entries,
	/// attaches the top-level folder to the anchor group (by default the
	/// group named after the directory's parent), and adds sources and
	/// layout resources to the first matching build phase. Files with an
	/// unknown extension are reported and left out.
	Import {
		/// Directory whose contents should be registered.
		dir: PathBuf,

		/// Show what would change without writing the manifest.
		#[arg(long, default_value_t = false)]
		dry_run: bool,

		/// Print a line diff of the manifest.
		#[arg(long, default_value_t = false)]
		diff: bool,

		/// Name of the existing group that receives the imported folder.
		#[arg(long)]
		anchor: Option<String>,

		/// Exit with status 1 when a file was left unregistered or a
		/// manifest section could not be found.
		#[arg(long, default_value_t = false)]
		strict: bool,

		/// Output format for the import summary.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Show how a directory would be mirrored, without touching the project.
	Inspect {
		/// Directory to inspect.
		dir: PathBuf,

		/// Output format for the tree.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Print the project bundle, manifest and config file that would be used.
	Locate {
		/// Output format for the resolved paths.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
