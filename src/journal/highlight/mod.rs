//! # Highlight Engine
//!
//! Toggles colored highlight regions over a user's selection in a passage.
//!
//! All operations take a [`Document`] and return a new one; the input is never touched,
//! so a failed precondition leaves nothing half-applied. The caller serializes the
//! result and writes it back to the entry.
//!
//! ## Rules
//!
//! - Selection inside one region of the same color: the whole region is unwrapped.
//! - Selection inside one region of another color: the selected part takes the new
//!   color; the rest of the old region stays, split into separate regions around it.
//! - Selection over plain text only: a new region wraps exactly the selection.
//! - Selection that crosses a region boundary, covers an existing region, or spans two
//!   verse blocks: rejected with [`JournalError::UnwrappableSelection`].
//!
//! Unwrapping only ever drops region tags. Text and verse labels keep their order and
//! adjacent text runs merge back together, so regions never overlap and the visible
//! text never changes.

mod color;
mod selection;

pub use color::{Color, Palette, Swatch};
pub use selection::{Position, ScopedSelection, Selection};

use crate::error::{JournalError, Result};
use crate::markup::document::{Leaf, Piece, RegionTag};
use crate::markup::Document;
use selection::TextRange;
use std::collections::BTreeSet;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// A new region now covers the selection.
    Added,
    /// The region under the selection was unwrapped.
    Removed,
    /// Part of a region of another color was recolored.
    Recolored,
}

pub fn toggle_highlight(
    doc: &Document,
    selection: &Selection,
    color: &Color,
) -> Result<(Document, ToggleOutcome)> {
    let range = selection.resolve(doc)?;
    let mut pieces = split_pieces(doc, range);
    let selected = selected_span(&pieces, range);
    if selected.is_empty() {
        return Err(JournalError::NoSelection);
    }

    let block = pieces[selected.start].block;
    if pieces[selected.clone()].iter().any(|p| p.block != block) {
        return Err(JournalError::UnwrappableSelection);
    }

    let mut next_id = pieces
        .iter()
        .filter_map(|p| p.region.as_ref().map(|r| r.id + 1))
        .max()
        .unwrap_or(0);
    let mut fresh = || {
        let id = next_id;
        next_id += 1;
        id
    };

    let enclosing = common_region(&pieces[selected.clone()]);
    let outcome = match enclosing {
        Some(region) if &region.color == color => {
            strip_regions(&mut pieces, &BTreeSet::from([region.id]));
            ToggleOutcome::Removed
        }
        Some(region) => {
            let recolored = RegionTag {
                id: fresh(),
                color: color.clone(),
            };
            let remainder = fresh();
            for piece in &mut pieces[selected.clone()] {
                piece.region = Some(recolored.clone());
            }
            for piece in &mut pieces[selected.end..] {
                if let Some(tag) = piece.region.as_mut().filter(|t| t.id == region.id) {
                    tag.id = remainder;
                }
            }
            ToggleOutcome::Recolored
        }
        None => {
            let touched = region_ids(&pieces[selected.clone()]);
            let crosses_boundary = pieces
                .iter()
                .enumerate()
                .filter(|(i, _)| !selected.contains(i))
                .any(|(_, p)| p.region.as_ref().is_some_and(|r| touched.contains(&r.id)));
            // Covering a region would hide its color; untoggling could not bring it back.
            if crosses_boundary || !touched.is_empty() {
                return Err(JournalError::UnwrappableSelection);
            }

            let tag = RegionTag {
                id: fresh(),
                color: color.clone(),
            };
            for piece in &mut pieces[selected] {
                piece.region = Some(tag.clone());
            }
            ToggleOutcome::Added
        }
    };

    tracing::debug!(?outcome, color = %color, "toggled highlight");
    Ok((Document::from_pieces(&doc.block_kinds(), pieces), outcome))
}

/// Unwraps every region that shares at least one character with the selection.
///
/// Returns the new document and the number of regions removed.
pub fn clear_selection_highlights(
    doc: &Document,
    selection: &Selection,
) -> Result<(Document, usize)> {
    let range = selection.resolve(doc)?;
    let mut pieces = split_pieces(doc, range);
    let selected = selected_span(&pieces, range);

    let touched = region_ids(&pieces[selected]);
    if touched.is_empty() {
        return Ok((doc.clone(), 0));
    }
    strip_regions(&mut pieces, &touched);
    Ok((Document::from_pieces(&doc.block_kinds(), pieces), touched.len()))
}

/// Unwraps every region in the document.
pub fn clear_all_highlights(doc: &Document) -> (Document, usize) {
    let mut pieces = doc.to_pieces();
    let all = region_ids(&pieces);
    strip_regions(&mut pieces, &all);
    (Document::from_pieces(&doc.block_kinds(), pieces), all.len())
}

/// Flattens `doc` and splits text pieces so both ends of `range` fall on piece
/// boundaries.
fn split_pieces(doc: &Document, range: TextRange) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut offset = 0;
    for piece in doc.to_pieces() {
        let len = piece.leaf.char_len();
        let cuts: Vec<usize> = [range.start, range.end]
            .into_iter()
            .filter(|&cut| cut > offset && cut < offset + len)
            .map(|cut| cut - offset)
            .collect();
        offset += len;

        match piece.leaf {
            Leaf::Text(ref text) if !cuts.is_empty() => {
                let mut last = 0;
                for cut in cuts.into_iter().chain(std::iter::once(len)) {
                    pieces.push(Piece {
                        block: piece.block,
                        leaf: Leaf::Text(char_slice(text, last..cut)),
                        region: piece.region.clone(),
                    });
                    last = cut;
                }
            }
            _ => pieces.push(piece),
        }
    }
    pieces
}

/// Indices of the non-empty pieces lying inside `range`, as a contiguous span.
fn selected_span(pieces: &[Piece], range: TextRange) -> Range<usize> {
    let mut offset = 0;
    let mut first = None;
    let mut last = 0;
    for (index, piece) in pieces.iter().enumerate() {
        let len = piece.leaf.char_len();
        if len > 0 && offset >= range.start && offset + len <= range.end {
            first.get_or_insert(index);
            last = index + 1;
        }
        offset += len;
    }
    match first {
        Some(first) => first..last,
        None => 0..0,
    }
}

/// The region every selected piece belongs to, if they all share one.
fn common_region(selected: &[Piece]) -> Option<RegionTag> {
    let first = selected.first()?.region.clone()?;
    selected
        .iter()
        .all(|p| p.region.as_ref().map(|r| r.id) == Some(first.id))
        .then_some(first)
}

fn region_ids(pieces: &[Piece]) -> BTreeSet<usize> {
    pieces
        .iter()
        .filter_map(|p| p.region.as_ref().map(|r| r.id))
        .collect()
}

fn strip_regions(pieces: &mut [Piece], ids: &BTreeSet<usize>) {
    for piece in pieces {
        if piece.region.as_ref().is_some_and(|r| ids.contains(&r.id)) {
            piece.region = None;
        }
    }
}

fn char_slice(text: &str, range: Range<usize>) -> String {
    text.chars()
        .skip(range.start)
        .take(range.end - range.start)
        .collect()
}
