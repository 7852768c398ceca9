//! Find and Replace for Marknote
//!
//! This module contains the text-search core behind the find panel:
//! pattern compilation with case/whole-word/regex semantics and the
//! stateful engine that navigates and replaces matches in a document.

mod engine;
mod pattern;

pub use engine::FindEngine;
pub use pattern::{SearchOptions, SearchOptionsUpdate};
