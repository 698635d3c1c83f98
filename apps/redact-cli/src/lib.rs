//! Command-line glue over the interchange JSON contract
//!
//! Each command takes already-read file contents and returns the text to
//! print, so the binary only handles arguments and I/O.

pub mod commands;

pub use commands::{dedupe_document, locate_span, project_document};
