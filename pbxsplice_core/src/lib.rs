//! `pbxsplice_core` registers a directory of freshly generated source files in
//! an existing Xcode project by editing its `project.pbxproj` manifest in
//! place. It does not parse the manifest. A line scanner recognises the
//! section delimiters Xcode writes, splices generated fragments at a handful
//! of injection points, and copies every other byte unchanged.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Import directory
//!   → Tree mirror (files + folders, two object ids each, classified by extension)
//!   → Fragment emitters (node → PBXBuildFile / PBXFileReference / PBXGroup / build phase text)
//! project.pbxproj
//!   → Section scanner (delimiter + suffix matching, small local state)
//!   → Rewriter (streams into a temp file, backs up the original, renames over it)
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading from `pbxsplice.toml`.
//! - [`fragments`]: Pure functions rendering manifest text for one node.
//! - [`scanner`]: The section state machine.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pbxsplice_core::import_files_into_project;
//! use std::path::Path;
//!
//! let report = import_files_into_project(Path::new("."), Path::new("MyApp/Source")).unwrap();
//! for error in &report.unclassified {
//! 	eprintln!("not registered: {}", error.path.display());
//! }
//! ```

pub use error::*;
pub use id::*;
pub use kind::*;
pub use project::*;
pub use rewrite::*;
pub use tree::*;

pub mod config;
#[allow(unused_assignments)]
mod error;
pub mod fragments;
mod id;
mod kind;
mod project;
mod rewrite;
pub mod scanner;
mod tree;

#[cfg(test)]
mod __fixtures;
