// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. editor::XmlBuffer)
    clippy::module_name_repetitions
)]

//! # Tagedit
//!
//! Edit an XML document held as raw text, without building a tree.
//!
//! Tagedit locates `<...>` spans by plain character search and edits the
//! text around them:
//! - Step forward and backward between spans
//! - Find the first span whose text contains `<name`
//! - Insert text before a span, or erase a span
//!
//! It is not an XML parser: nesting, comments, CDATA and `>` inside
//! attribute values all get the same treatment as any other character.
//!
//! ## Modules
//!
//! - [`editor`]: Text buffer, tag cursor and span edits
//! - [`app`]: The load, list, edit, save pass behind the binary
//! - [`config`]: Saved command-line defaults
//! - [`perf`]: Timing scopes and edit event log

pub mod app;
pub mod config;
pub mod editor;
pub mod perf;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::editor::{Anchor, BufferError, TagCursor, XmlBuffer};
}
