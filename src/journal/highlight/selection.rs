use crate::error::{JournalError, Result};
use crate::markup::Document;
use crate::model::EntryKey;
use std::ops::Range;

/// A point in a document: a leaf (text run or verse label, in document order) and a
/// char offset inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub leaf: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(leaf: usize, offset: usize) -> Self {
        Self { leaf, offset }
    }
}

/// A user selection. The anchor may come after the focus when the user dragged
/// backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selection {
    pub anchor: Position,
    pub focus: Position,
}

/// A selection together with the entry it was made in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedSelection {
    pub entry: EntryKey,
    pub selection: Selection,
}

impl ScopedSelection {
    pub fn new(entry: EntryKey, selection: Selection) -> Self {
        Self { entry, selection }
    }

    /// Returns the selection if it was made inside `entry`.
    pub fn within(&self, entry: &EntryKey) -> Result<&Selection> {
        if &self.entry == entry {
            Ok(&self.selection)
        } else {
            Err(JournalError::SelectionOutsideScope)
        }
    }
}

/// A validated selection as char offsets into the document's visible text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(anchor: Position, focus: Position) -> Self {
        Self { anchor, focus }
    }

    /// Builds a selection from char offsets into [`Document::text_content`].
    ///
    /// Offsets past the end map to a position outside the document, which
    /// validation later reports as [`JournalError::SelectionOutsideScope`].
    pub fn from_text_range(doc: &Document, range: Range<usize>) -> Self {
        let lengths: Vec<usize> = doc.to_pieces().iter().map(|p| p.leaf.char_len()).collect();
        let locate = |offset: usize| {
            let mut start = 0;
            for (leaf, &len) in lengths.iter().enumerate() {
                if offset <= start + len {
                    return Position::new(leaf, offset - start);
                }
                start += len;
            }
            Position::new(lengths.len(), offset.saturating_sub(start))
        };
        Self::new(locate(range.start), locate(range.end))
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Validates the selection against `doc` and flattens it.
    ///
    /// Endpoints inside a verse label are pushed outward to the label's edges.
    pub(crate) fn resolve(&self, doc: &Document) -> Result<TextRange> {
        let pieces = doc.to_pieces();
        let mut starts = Vec::with_capacity(pieces.len());
        let mut total = 0;
        for piece in &pieces {
            starts.push(total);
            total += piece.leaf.char_len();
        }

        let locate = |pos: Position| -> Result<(usize, usize, usize, bool)> {
            let piece = pieces
                .get(pos.leaf)
                .ok_or(JournalError::SelectionOutsideScope)?;
            let len = piece.leaf.char_len();
            if pos.offset > len {
                return Err(JournalError::SelectionOutsideScope);
            }
            let leaf_start = starts[pos.leaf];
            Ok((leaf_start + pos.offset, leaf_start, len, piece.leaf.is_label()))
        };

        let a = locate(self.anchor)?;
        let b = locate(self.focus)?;
        let (first, last) = if a.0 <= b.0 { (a, b) } else { (b, a) };

        let (mut start, leaf_start, len, is_label) = first;
        if is_label && start > leaf_start && start < leaf_start + len {
            start = leaf_start;
        }
        let (mut end, leaf_start, len, is_label) = last;
        if is_label && end > leaf_start && end < leaf_start + len {
            end = leaf_start + len;
        }

        if start >= end {
            return Err(JournalError::NoSelection);
        }
        Ok(TextRange { start, end })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{Block, Segment};

    fn verse_doc() -> Document {
        Document::new(vec![Block::paragraph(vec![
            Segment::VerseNumber("12".into()),
            Segment::Text(" And God said".into()),
        ])])
    }

    #[test]
    fn text_range_maps_to_leaf_positions() {
        let doc = verse_doc();
        let sel = Selection::from_text_range(&doc, 7..10);
        assert_eq!(sel.anchor, Position::new(1, 5));
        assert_eq!(sel.focus, Position::new(1, 8));
        assert_eq!(sel.resolve(&doc).unwrap(), TextRange { start: 7, end: 10 });
    }

    #[test]
    fn backwards_selection_is_ordered() {
        let doc = verse_doc();
        let sel = Selection::new(Position::new(1, 8), Position::new(1, 5));
        assert_eq!(sel.resolve(&doc).unwrap(), TextRange { start: 7, end: 10 });
    }

    #[test]
    fn collapsed_selection_is_no_selection() {
        let doc = verse_doc();
        let sel = Selection::new(Position::new(1, 3), Position::new(1, 3));
        assert!(sel.is_collapsed());
        assert!(matches!(sel.resolve(&doc), Err(JournalError::NoSelection)));
    }

    #[test]
    fn positions_outside_the_document_are_out_of_scope() {
        let doc = verse_doc();
        let past_leaf = Selection::new(Position::new(0, 0), Position::new(5, 0));
        let past_offset = Selection::new(Position::new(1, 0), Position::new(1, 99));
        assert!(matches!(
            past_leaf.resolve(&doc),
            Err(JournalError::SelectionOutsideScope)
        ));
        assert!(matches!(
            past_offset.resolve(&doc),
            Err(JournalError::SelectionOutsideScope)
        ));
        assert!(matches!(
            Selection::from_text_range(&doc, 3..200).resolve(&doc),
            Err(JournalError::SelectionOutsideScope)
        ));
    }

    #[test]
    fn endpoints_inside_a_label_snap_outward() {
        let doc = verse_doc();
        let sel = Selection::new(Position::new(0, 1), Position::new(1, 4));
        assert_eq!(sel.resolve(&doc).unwrap(), TextRange { start: 0, end: 6 });

        let ending_in_label = Selection::new(Position::new(0, 0), Position::new(0, 1));
        assert_eq!(
            ending_in_label.resolve(&doc).unwrap(),
            TextRange { start: 0, end: 2 }
        );
    }

    #[test]
    fn scoped_selection_rejects_other_entries() {
        let sel = Selection::new(Position::new(0, 0), Position::new(0, 1));
        let scoped = ScopedSelection::new(EntryKey::from("A|1"), sel);
        assert!(scoped.within(&EntryKey::from("A|1")).is_ok());
        assert!(matches!(
            scoped.within(&EntryKey::from("B|1")),
            Err(JournalError::SelectionOutsideScope)
        ));
    }
}
