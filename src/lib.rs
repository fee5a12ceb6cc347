//! gotags - Generate a sorted tags list for a tree of Go sources.
//!
//! gotags walks a directory, parses every `*.go` file with tree-sitter and
//! records each declaration worth jumping to: the package name, functions
//! and methods, types, struct fields, interface methods and package-level
//! variables and constants. Nothing declared inside a function body is
//! recorded.
//!
//! # Quick Start
//!
//! ```no_run
//! use gotags::builder::GoTags;
//! use gotags::output::{write_tags, OutputFormat};
//!
//! let run = GoTags::new(".").run().unwrap();
//! write_tags(&mut std::io::stdout(), &run.tags, OutputFormat::Tags).unwrap();
//! ```
//!
//! # Modules
//!
//! - [`walker`] - Discovery of `*.go` files
//! - [`syntax`] - Parsing and the lowered syntax tree
//! - [`position`] - Byte offset to line resolution
//! - [`classify`] - Which identifiers are declarations worth tagging
//! - [`extract`] - Tree walk that emits tags
//! - [`collector`] - Tag records and the per-run collector
//! - [`output`] - Tags-file and JSON output
//! - [`builder`] - Run driver

pub mod errors;
pub mod position;
pub mod syntax;
pub mod classify;
pub mod extract;
pub mod collector;
pub mod walker;
pub mod output;
pub mod builder;

// Re-export key types at crate root for convenience
pub use builder::{GoTags, RunSummary, TagRun};
pub use collector::{Tag, TagCollector};
pub use errors::GoTagsError;
pub use output::{OutputError, OutputFormat};
pub use syntax::{Binding, ParseError};
pub use walker::{WalkError, WalkOptions};
