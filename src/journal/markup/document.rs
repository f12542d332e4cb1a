//! The segment model of a rendered passage.
//!
//! A passage is an ordered list of blocks (verse paragraphs, or bare inline text for
//! legacy chapters). Each block holds segments: text runs, verse-number labels, and
//! highlight regions wrapping runs of those two. Regions never nest and never overlap.
//!
//! The engine never edits a rendered tree in place. It flattens a document into
//! [`Piece`]s (one leaf each, tagged with the region it belongs to), rewrites the tags
//! and rebuilds. Rebuilding is also how parsed markup gets normalized: adjacent text
//! runs merge, empty regions vanish, nested regions are split apart.

use super::escape::escape_html;
use crate::error::Result;
use crate::highlight::Color;
use std::fmt;

pub const VERSE_NUM_CLASS: &str = "verse-num";
pub const HIGHLIGHT_CLASS: &str = "highlight";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    VerseNumber(String),
    Highlight { color: Color, children: Vec<Segment> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// A `<p>` verse paragraph.
    Paragraph,
    /// Content sitting directly in the passage container.
    Inline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub segments: Vec<Segment>,
}

impl Block {
    pub fn paragraph(segments: Vec<Segment>) -> Self {
        Self {
            kind: BlockKind::Paragraph,
            segments,
        }
    }

    pub fn inline(segments: Vec<Segment>) -> Self {
        Self {
            kind: BlockKind::Inline,
            segments,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub blocks: Vec<Block>,
}

/// A highlight region recovered by scanning a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSpan {
    pub block: usize,
    pub color: Color,
    /// Char offsets into [`Document::text_content`].
    pub start: usize,
    pub end: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Leaf {
    Text(String),
    VerseNumber(String),
}

impl Leaf {
    pub(crate) fn as_str(&self) -> &str {
        match self {
            Leaf::Text(text) | Leaf::VerseNumber(text) => text,
        }
    }

    pub(crate) fn char_len(&self) -> usize {
        self.as_str().chars().count()
    }

    pub(crate) fn is_label(&self) -> bool {
        matches!(self, Leaf::VerseNumber(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RegionTag {
    pub id: usize,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Piece {
    pub block: usize,
    pub leaf: Leaf,
    pub region: Option<RegionTag>,
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Parses stored markup. The result is normalized.
    pub fn parse(markup: &str) -> Result<Self> {
        super::parse::parse_document(markup)
    }

    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            match block.kind {
                BlockKind::Paragraph => {
                    out.push_str("<p>");
                    write_segments(&mut out, &block.segments);
                    out.push_str("</p>");
                }
                BlockKind::Inline => write_segments(&mut out, &block.segments),
            }
        }
        out
    }

    /// All visible text, verse labels included, in document order.
    pub fn text_content(&self) -> String {
        self.to_pieces()
            .iter()
            .map(|piece| piece.leaf.as_str())
            .collect()
    }

    pub fn leaf_count(&self) -> usize {
        self.to_pieces().len()
    }

    pub fn regions(&self) -> Vec<RegionSpan> {
        let mut spans: Vec<RegionSpan> = Vec::new();
        let mut current_id = None;
        let mut offset = 0;

        for piece in self.to_pieces() {
            let len = piece.leaf.char_len();
            if let Some(tag) = &piece.region {
                if current_id == Some(tag.id) {
                    if let Some(span) = spans.last_mut() {
                        span.end += len;
                        span.text.push_str(piece.leaf.as_str());
                    }
                } else {
                    spans.push(RegionSpan {
                        block: piece.block,
                        color: tag.color.clone(),
                        start: offset,
                        end: offset + len,
                        text: piece.leaf.as_str().to_string(),
                    });
                }
                current_id = Some(tag.id);
            } else {
                current_id = None;
            }
            offset += len;
        }

        spans
    }

    /// Returns an equivalent document with adjacent text merged and regions flattened.
    pub fn normalized(&self) -> Document {
        Document::from_pieces(&self.block_kinds(), self.to_pieces())
    }

    pub(crate) fn block_kinds(&self) -> Vec<BlockKind> {
        self.blocks.iter().map(|b| b.kind).collect()
    }

    pub(crate) fn to_pieces(&self) -> Vec<Piece> {
        let mut pieces = Vec::new();
        let mut next_id = 0;
        for (index, block) in self.blocks.iter().enumerate() {
            collect_pieces(&block.segments, index, None, &mut next_id, &mut pieces);
        }
        pieces
    }

    pub(crate) fn from_pieces(kinds: &[BlockKind], pieces: Vec<Piece>) -> Document {
        let mut blocks: Vec<Block> = kinds
            .iter()
            .map(|&kind| Block {
                kind,
                segments: Vec::new(),
            })
            .collect();

        let mut group: Vec<Leaf> = Vec::new();
        let mut group_key: Option<(usize, Option<RegionTag>)> = None;

        for piece in pieces {
            let key = (piece.block, piece.region.clone());
            let same_group = match &group_key {
                Some((block, region)) => {
                    *block == key.0 && region.as_ref().map(|r| r.id) == key.1.as_ref().map(|r| r.id)
                }
                None => false,
            };
            if !same_group {
                if let Some((block, region)) = group_key.take() {
                    flush_group(&mut blocks, block, region, std::mem::take(&mut group));
                }
                group_key = Some(key);
            }
            group.push(piece.leaf);
        }
        if let Some((block, region)) = group_key {
            flush_group(&mut blocks, block, region, group);
        }

        Document { blocks }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_markup())
    }
}

fn collect_pieces(
    segments: &[Segment],
    block: usize,
    enclosing: Option<RegionTag>,
    next_id: &mut usize,
    out: &mut Vec<Piece>,
) {
    let mut current = enclosing;
    for segment in segments {
        match segment {
            Segment::Text(text) => out.push(Piece {
                block,
                leaf: Leaf::Text(text.clone()),
                region: current.clone(),
            }),
            Segment::VerseNumber(label) => out.push(Piece {
                block,
                leaf: Leaf::VerseNumber(label.clone()),
                region: current.clone(),
            }),
            Segment::Highlight { color, children } => {
                let tag = RegionTag {
                    id: fresh_id(next_id),
                    color: color.clone(),
                };
                collect_pieces(children, block, Some(tag), next_id, out);
                // A region interrupted by a nested one resumes as a separate region.
                if let Some(outer) = current.as_mut() {
                    outer.id = fresh_id(next_id);
                }
            }
        }
    }
}

fn fresh_id(next_id: &mut usize) -> usize {
    let id = *next_id;
    *next_id += 1;
    id
}

fn flush_group(blocks: &mut [Block], block: usize, region: Option<RegionTag>, leaves: Vec<Leaf>) {
    let segments = merge_leaves(leaves);
    if segments.is_empty() {
        return;
    }
    let Some(target) = blocks.get_mut(block) else {
        return;
    };
    match region {
        Some(tag) => target.segments.push(Segment::Highlight {
            color: tag.color,
            children: segments,
        }),
        None => target.segments.extend(segments),
    }
}

fn merge_leaves(leaves: Vec<Leaf>) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    for leaf in leaves {
        match leaf {
            Leaf::Text(text) if text.is_empty() => {}
            Leaf::Text(text) => {
                if let Some(Segment::Text(previous)) = segments.last_mut() {
                    previous.push_str(&text);
                } else {
                    segments.push(Segment::Text(text));
                }
            }
            Leaf::VerseNumber(label) => segments.push(Segment::VerseNumber(label)),
        }
    }
    segments
}

fn write_segments(out: &mut String, segments: &[Segment]) {
    for segment in segments {
        match segment {
            Segment::Text(text) => out.push_str(&escape_html(text)),
            Segment::VerseNumber(label) => {
                out.push_str("<span class=\"");
                out.push_str(VERSE_NUM_CLASS);
                out.push_str("\">");
                out.push_str(&escape_html(label));
                out.push_str("</span>");
            }
            Segment::Highlight { color, children } => {
                out.push_str(&format!(
                    "<mark class=\"{}\" data-color=\"{}\" style=\"background-color: {}\">",
                    HIGHLIGHT_CLASS, color, color
                ));
                write_segments(out, children);
                out.push_str("</mark>");
            }
        }
    }
}
