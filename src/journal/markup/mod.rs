//! # Passage Markup
//!
//! Saved entries keep their display form as an HTML fragment. This module owns that
//! fragment in both directions:
//!
//! - [`escape`]: escaping plain text before it enters markup, and decoding it back
//! - [`render`]: building markup for a verse, a chapter, or a legacy entry
//! - [`document`]: the segment model the highlight engine edits
//! - `parse`: turning stored markup back into a [`Document`]
//!
//! Serialization lives on [`Document::to_markup`], so rendering and highlight edits
//! always produce the same canonical form.

pub mod document;
pub mod escape;
mod parse;
pub mod render;

pub use document::{Block, BlockKind, Document, RegionSpan, Segment};
pub use escape::escape_html;
pub use render::{fallback_markup, render_chapter, render_verse, VerseText};
