//! Line classifier for the touched subset of the manifest format.
//!
//! The manifest is never parsed. Delimiter comments such as
//! `/* Begin PBXGroup section */` are recognised by exact match and the few
//! injection points inside a section by line suffix. The scan state is a
//! plain value that the caller threads from one line to the next.

use crate::fragments::FragmentSection;

pub const BEGIN_GROUP: &str = "/* Begin PBXGroup section */";
pub const END_GROUP: &str = "/* End PBXGroup section */";
pub const END_BUILD_FILE: &str = "/* End PBXBuildFile section */";
pub const END_FILE_REFERENCE: &str = "/* End PBXFileReference section */";
pub const BEGIN_SOURCES_PHASE: &str = "/* Begin PBXSourcesBuildPhase section */";
pub const BEGIN_RESOURCES_PHASE: &str = "/* Begin PBXResourcesBuildPhase section */";
pub const END_SOURCES_PHASE: &str = "/* End PBXSourcesBuildPhase section */";
pub const END_RESOURCES_PHASE: &str = "/* End PBXResourcesBuildPhase section */";

/// Suffix of the line opening a group's child list.
pub const CHILDREN_OPEN: &str = "children = (";
/// Suffix of the line opening a build phase's file list.
pub const FILES_OPEN: &str = "files = (";

/// The manifest region the scan is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
	#[default]
	None,
	Group,
	SourcesPhase,
	ResourcesPhase,
}

/// Local scan state carried between lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanState {
	pub section: Section,
	/// Progress through the two-line anchor group pattern: `1` once the
	/// anchor group's opening line was seen.
	pub matched: u8,
}

/// What to write around the current line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Step {
	/// Section to flush before the line is copied.
	pub before: Option<FragmentSection>,
	/// Section to flush after the line is copied.
	pub after: Option<FragmentSection>,
}

/// Classifies manifest lines against a fixed anchor group.
#[derive(Debug, Clone)]
pub struct Scanner {
	anchor_marker: String,
}

impl Scanner {
	/// `anchor` is the name of the existing group that receives the imported
	/// top-level folders.
	pub fn new(anchor: &str) -> Self {
		Self {
			anchor_marker: format!("/* {anchor} */ = {{"),
		}
	}

	pub fn anchor_marker(&self) -> &str {
		&self.anchor_marker
	}

	/// Classify one line, without its terminator, and return the next state
	/// together with the flushes it triggers.
	pub fn step(&self, state: ScanState, line: &str) -> (ScanState, Step) {
		let mut state = state;
		let mut step = Step::default();

		match line {
			END_BUILD_FILE => step.before = Some(FragmentSection::BuildFiles),
			END_FILE_REFERENCE => step.before = Some(FragmentSection::FileReferences),
			BEGIN_GROUP => state.section = Section::Group,
			END_GROUP => {
				// Only flushed when the matching begin marker was seen.
				if state.section == Section::Group {
					step.before = Some(FragmentSection::Groups);
				}
				state = ScanState::default();
			}
			BEGIN_SOURCES_PHASE => state.section = Section::SourcesPhase,
			BEGIN_RESOURCES_PHASE => state.section = Section::ResourcesPhase,
			// A phase section without a file list injects nothing.
			END_SOURCES_PHASE | END_RESOURCES_PHASE
				if matches!(state.section, Section::SourcesPhase | Section::ResourcesPhase) =>
			{
				state.section = Section::None;
			}
			_ => {}
		}

		match state.section {
			Section::Group => {
				if line.ends_with(&self.anchor_marker) {
					state.matched = 1;
				} else if state.matched > 0 && line.ends_with(CHILDREN_OPEN) {
					state.matched = 0;
					step.after = Some(FragmentSection::GroupChildren);
				}
			}
			Section::SourcesPhase | Section::ResourcesPhase => {
				if line.ends_with(FILES_OPEN) {
					step.after = Some(if state.section == Section::SourcesPhase {
						FragmentSection::SourcesPhase
					} else {
						FragmentSection::ResourcesPhase
					});
					state.section = Section::None;
				}
			}
			Section::None => {}
		}

		(state, step)
	}
}
