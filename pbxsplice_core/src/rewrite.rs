use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::XcError;
use crate::XcResult;
use crate::fragments::FragmentSection;
use crate::fragments::flush;
use crate::scanner::ScanState;
use crate::scanner::Scanner;
use crate::tree::FolderEntry;

/// Everything the rewriter needs to know about what to inject.
#[derive(Debug, Clone)]
pub struct InjectionPlan<'a> {
	/// Top-level folders to register, in order.
	pub imports: &'a [FolderEntry],
	/// Name of the existing group that receives the top-level folders.
	pub anchor: String,
}

/// What a rewrite pass injected.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RewriteReport {
	/// Number of fragments written per section. A section whose marker was
	/// never reached is absent.
	pub injected: BTreeMap<FragmentSection, usize>,
	/// Lines read from the original manifest.
	pub lines: usize,
}

impl RewriteReport {
	/// Sections whose marker never appeared, so nothing was injected there.
	pub fn skipped(&self) -> Vec<FragmentSection> {
		FragmentSection::ALL
			.into_iter()
			.filter(|section| !self.injected.contains_key(section))
			.collect()
	}

	pub fn count(&self, section: FragmentSection) -> usize {
		self.injected.get(&section).copied().unwrap_or_default()
	}

	fn record(&mut self, section: FragmentSection, count: usize) {
		*self.injected.entry(section).or_default() += count;
	}
}

/// Copy `input` to `output`, splicing in the fragments of `plan`.
///
/// Lines are handled as raw bytes so that everything outside the injection
/// points, terminators included, is copied unchanged.
pub fn rewrite_manifest(
	mut input: impl BufRead,
	mut output: impl Write,
	plan: &InjectionPlan<'_>,
) -> std::io::Result<RewriteReport> {
	let scanner = Scanner::new(&plan.anchor);
	let mut state = ScanState::default();
	let mut report = RewriteReport::default();
	let mut line = Vec::new();

	loop {
		line.clear();
		if input.read_until(b'\n', &mut line)? == 0 {
			break;
		}
		report.lines += 1;

		let text = String::from_utf8_lossy(&line);
		let (next, step) = scanner.step(state, text.trim_end_matches(['\n', '\r']));
		state = next;

		if let Some(section) = step.before {
			write_section(&mut output, section, plan, &mut report)?;
		}

		output.write_all(&line)?;

		if let Some(section) = step.after {
			if !line.ends_with(b"\n") {
				output.write_all(b"\n")?;
			}
			write_section(&mut output, section, plan, &mut report)?;
		}
	}

	output.flush()?;

	for section in report.skipped() {
		tracing::warn!(section = section.label(), "marker not found, nothing injected");
	}

	Ok(report)
}

fn write_section(
	output: &mut impl Write,
	section: FragmentSection,
	plan: &InjectionPlan<'_>,
	report: &mut RewriteReport,
) -> std::io::Result<()> {
	let flushed = flush(section, plan.imports);
	tracing::debug!(
		section = section.label(),
		count = flushed.count,
		"injecting fragments"
	);
	output.write_all(flushed.text.as_bytes())?;
	report.record(section, flushed.count);
	Ok(())
}

/// A rewritten manifest waiting in a temporary file next to the original.
///
/// Dropping it without calling [`PendingManifest::commit`] deletes the
/// temporary file and leaves the original untouched.
#[derive(Debug)]
pub struct PendingManifest {
	manifest: PathBuf,
	temp: NamedTempFile,
	pub report: RewriteReport,
}

impl PendingManifest {
	/// Stream `manifest` through the rewriter into a temporary file created
	/// in the same directory.
	pub fn render(manifest: &Path, plan: &InjectionPlan<'_>) -> XcResult<Self> {
		let input = File::open(manifest).map_err(|e| {
			if e.kind() == std::io::ErrorKind::NotFound {
				XcError::ManifestNotFound(manifest.to_path_buf())
			} else {
				XcError::Io(e)
			}
		})?;
		let dir = manifest.parent().unwrap_or_else(|| Path::new("."));
		let mut temp = tempfile::Builder::new()
			.prefix("_project.")
			.suffix(".pbxproj")
			.tempfile_in(dir)?;

		let report = {
			let mut writer = BufWriter::new(temp.as_file_mut());
			let report = rewrite_manifest(BufReader::new(input), &mut writer, plan)?;
			writer.flush()?;
			report
		};
		temp.as_file().sync_all()?;

		Ok(Self {
			manifest: manifest.to_path_buf(),
			temp,
			report,
		})
	}

	/// The rewritten manifest, byte for byte.
	pub fn contents(&self) -> XcResult<Vec<u8>> {
		Ok(std::fs::read(self.temp.path())?)
	}

	/// Back up the original manifest and atomically move the rewritten one
	/// into its place. Returns the backup path.
	pub fn commit(self) -> XcResult<PathBuf> {
		let backup = backup_path(&self.manifest);
		std::fs::copy(&self.manifest, &backup).map_err(|source| XcError::Backup {
			path: self.manifest.clone(),
			source,
		})?;

		let permissions = std::fs::metadata(&self.manifest)?.permissions();
		std::fs::set_permissions(self.temp.path(), permissions)?;

		self.temp
			.persist(&self.manifest)
			.map_err(|e| XcError::Replace {
				path: self.manifest.clone(),
				source: e.error,
			})?;

		tracing::info!(
			manifest = %self.manifest.display(),
			backup = %backup.display(),
			"manifest replaced"
		);

		Ok(backup)
	}
}

/// `project.pbxproj` → `project.pbxproj.20260101120000.bak` in the same
/// directory. A numeric suffix is added if that name is already taken.
pub fn backup_path(manifest: &Path) -> PathBuf {
	let stamp = chrono::Local::now().format("%Y%m%d%H%M%S");
	let name = manifest
		.file_name()
		.map_or_else(|| "project.pbxproj".into(), |n| n.to_string_lossy());

	let mut candidate = manifest.with_file_name(format!("{name}.{stamp}.bak"));
	let mut counter = 1;
	while candidate.exists() {
		candidate = manifest.with_file_name(format!("{name}.{stamp}-{counter}.bak"));
		counter += 1;
	}
	candidate
}
