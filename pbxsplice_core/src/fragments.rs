//! Manifest text for one node and one section.
//!
//! Every function here is pure: the same tree always renders to the same
//! text. Each rendered line ends with `\n` and is indented with tabs, the way
//! Xcode writes its own project files.

use std::fmt::Write;

use serde::Serialize;

use crate::kind::FileRole;
use crate::tree::Entry;
use crate::tree::FolderEntry;
use crate::tree::TreeNode;

/// The manifest tables fragments are written into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentSection {
	/// `PBXBuildFile` rows, keyed by `id`.
	BuildFiles,
	/// `PBXFileReference` rows, keyed by `id2`.
	FileReferences,
	/// One `PBXGroup` block per imported folder.
	Groups,
	/// The imported top-level folders, appended to the anchor group.
	GroupChildren,
	/// `files` of the first `PBXSourcesBuildPhase`.
	SourcesPhase,
	/// `files` of the first `PBXResourcesBuildPhase`.
	ResourcesPhase,
}

impl FragmentSection {
	pub const ALL: [FragmentSection; 6] = [
		Self::BuildFiles,
		Self::FileReferences,
		Self::Groups,
		Self::GroupChildren,
		Self::SourcesPhase,
		Self::ResourcesPhase,
	];

	pub fn label(self) -> &'static str {
		match self {
			Self::BuildFiles => "PBXBuildFile",
			Self::FileReferences => "PBXFileReference",
			Self::Groups => "PBXGroup",
			Self::GroupChildren => "group children",
			Self::SourcesPhase => "PBXSourcesBuildPhase",
			Self::ResourcesPhase => "PBXResourcesBuildPhase",
		}
	}
}

/// Rendered text for one section together with the number of fragments in it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flushed {
	pub text: String,
	pub count: usize,
}

impl Flushed {
	fn push(&mut self, fragment: Option<String>) {
		if let Some(fragment) = fragment {
			self.text.push_str(&fragment);
			self.count += 1;
		}
	}
}

/// Render every fragment `section` needs for the whole import set.
pub fn flush(section: FragmentSection, imports: &[FolderEntry]) -> Flushed {
	let mut flushed = Flushed::default();
	let files = || imports.iter().flat_map(FolderEntry::all_files);

	match section {
		FragmentSection::BuildFiles => files().for_each(|entry| flushed.push(build_file(entry))),
		FragmentSection::FileReferences => {
			files().for_each(|entry| flushed.push(Some(file_reference(entry))));
		}
		FragmentSection::Groups => {
			imports
				.iter()
				.flat_map(FolderEntry::all_folders)
				.for_each(|folder| flushed.push(Some(group_block(folder))));
		}
		FragmentSection::GroupChildren => {
			imports
				.iter()
				.for_each(|folder| flushed.push(Some(group_child(folder))));
		}
		FragmentSection::SourcesPhase => {
			files().for_each(|entry| flushed.push(sources_phase(entry)));
		}
		FragmentSection::ResourcesPhase => {
			files().for_each(|entry| flushed.push(resources_phase(entry)));
		}
	}

	flushed
}

/// `PBXBuildFile` row. Headers are never built.
pub fn build_file(entry: &Entry) -> Option<String> {
	if !entry.kind.role.is_buildable() {
		return None;
	}

	Some(format!(
		"\t\t{id} /* {name} in {destination} */ = {{isa = PBXBuildFile; fileRef = {id2} /* {name} \
		 */; }};\n",
		id = entry.id,
		id2 = entry.id2,
		name = entry.name,
		destination = entry.kind.role.destination(),
	))
}

/// `PBXFileReference` row. Written for every classified file.
pub fn file_reference(entry: &Entry) -> String {
	let encoding = if entry.kind.has_file_encoding() {
		"fileEncoding = 4; "
	} else {
		""
	};

	format!(
		"\t\t{id2} /* {name} */ = {{isa = PBXFileReference; {encoding}lastKnownFileType = \
		 {file_type}; path = {path}; sourceTree = \"<group>\"; }};\n",
		id2 = entry.id2,
		name = entry.name,
		file_type = entry.kind.file_type,
		path = quote(&entry.name),
	)
}

/// One line of a group's `children` list.
pub fn group_child(node: &impl TreeNode) -> String {
	format!("\t\t\t\t{} /* {} */,\n", node.id2(), node.name())
}

/// A complete `PBXGroup` block for `folder`: subfolders first, then files.
pub fn group_block(folder: &FolderEntry) -> String {
	let mut block = String::new();
	let _ = writeln!(block, "\t\t{} /* {} */ = {{", folder.id2, folder.name);
	block.push_str("\t\t\tisa = PBXGroup;\n");
	block.push_str("\t\t\tchildren = (\n");
	for child in &folder.folders {
		block.push_str(&group_child(child));
	}
	for child in &folder.files {
		block.push_str(&group_child(child));
	}
	block.push_str("\t\t\t);\n");
	let _ = writeln!(block, "\t\t\tpath = {};", quote(&folder.name));
	block.push_str("\t\t\tsourceTree = \"<group>\";\n");
	block.push_str("\t\t};\n");
	block
}

/// Row in the sources phase `files` list, for compiled sources only.
pub fn sources_phase(entry: &Entry) -> Option<String> {
	phase_row(entry, FileRole::Source)
}

/// Row in the resources phase `files` list, for layout resources only.
pub fn resources_phase(entry: &Entry) -> Option<String> {
	phase_row(entry, FileRole::Resource)
}

fn phase_row(entry: &Entry, role: FileRole) -> Option<String> {
	if entry.kind.role != role {
		return None;
	}

	Some(format!(
		"\t\t\t\t{} /* {} in {} */,\n",
		entry.id,
		entry.name,
		role.destination()
	))
}

/// Quote a value the way Xcode does when it holds characters outside the
/// unquoted set.
pub fn quote(value: &str) -> String {
	let is_bare = !value.is_empty()
		&& value
			.chars()
			.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.' | '/'));

	if is_bare {
		return value.to_string();
	}

	let mut quoted = String::with_capacity(value.len() + 2);
	quoted.push('"');
	for c in value.chars() {
		match c {
			'"' => quoted.push_str("\\\""),
			'\\' => quoted.push_str("\\\\"),
			'\n' => quoted.push_str("\\n"),
			_ => quoted.push(c),
		}
	}
	quoted.push('"');
	quoted
}
