//! Reads stored passage markup back into a [`Document`].
//!
//! The accepted dialect is small: `<p>` blocks, `<span class="verse-num">` labels and
//! highlight wrappers (`<mark>` or a `<span>` carrying a highlight class or a
//! `data-color`). Attribute order and quoting do not matter. Anything else is rejected so
//! that a save never silently drops content.

use super::document::{Block, Document, Segment, HIGHLIGHT_CLASS, VERSE_NUM_CLASS};
use super::escape::decode_entities;
use crate::error::{JournalError, Result};
use crate::highlight::Color;

#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    Text(&'a str),
    Open { name: String, attrs: Vec<(String, String)> },
    Close(String),
}

#[derive(Debug)]
enum FrameKind {
    Paragraph,
    Label,
    Highlight { tag: String, color: Color },
    Transparent,
}

impl FrameKind {
    fn tag_name(&self) -> &str {
        match self {
            FrameKind::Paragraph => "p",
            FrameKind::Label | FrameKind::Transparent => "span",
            FrameKind::Highlight { tag, .. } => tag,
        }
    }
}

#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    segments: Vec<Segment>,
}

pub(crate) fn parse_document(markup: &str) -> Result<Document> {
    let mut blocks: Vec<Block> = Vec::new();
    let mut loose: Vec<Segment> = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();

    for token in tokenize(markup)? {
        match token {
            Token::Text(raw) => {
                let text = decode_entities(raw);
                match stack.last_mut() {
                    Some(frame) => frame.segments.push(Segment::Text(text)),
                    None => loose.push(Segment::Text(text)),
                }
            }
            Token::Open { name, attrs } => {
                if matches!(stack.last(), Some(Frame { kind: FrameKind::Label, .. })) {
                    return Err(markup_error(format!("<{}> inside a verse label", name)));
                }
                let kind = open_frame(&name, &attrs)?;
                if matches!(kind, FrameKind::Paragraph) {
                    if !stack.is_empty() {
                        return Err(markup_error("<p> must not be nested"));
                    }
                    if !loose.is_empty() {
                        blocks.push(Block::inline(std::mem::take(&mut loose)));
                    }
                }
                stack.push(Frame {
                    kind,
                    segments: Vec::new(),
                });
            }
            Token::Close(name) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| markup_error(format!("unexpected </{}>", name)))?;
                if frame.kind.tag_name() != name {
                    return Err(markup_error(format!("mismatched </{}>", name)));
                }
                match frame.kind {
                    FrameKind::Paragraph => blocks.push(Block::paragraph(frame.segments)),
                    kind => {
                        let finished = finish_inline(kind, frame.segments);
                        match stack.last_mut() {
                            Some(parent) => parent.segments.extend(finished),
                            None => loose.extend(finished),
                        }
                    }
                }
            }
        }
    }

    if let Some(frame) = stack.last() {
        return Err(markup_error(format!("unclosed <{}>", frame.kind.tag_name())));
    }
    if !loose.is_empty() {
        blocks.push(Block::inline(loose));
    }

    Ok(Document::new(blocks).normalized())
}

fn open_frame(name: &str, attrs: &[(String, String)]) -> Result<FrameKind> {
    let class = attr(attrs, "class").unwrap_or_default();
    let has_class = |wanted: &str| class.split_whitespace().any(|c| c == wanted);

    match name {
        "p" => Ok(FrameKind::Paragraph),
        "mark" => Ok(FrameKind::Highlight {
            tag: name.to_string(),
            color: region_color(attrs)?,
        }),
        "span" if has_class(VERSE_NUM_CLASS) => Ok(FrameKind::Label),
        "span" if has_class(HIGHLIGHT_CLASS) || attr(attrs, "data-color").is_some() => {
            Ok(FrameKind::Highlight {
                tag: name.to_string(),
                color: region_color(attrs)?,
            })
        }
        "span" => Ok(FrameKind::Transparent),
        other => Err(markup_error(format!("unsupported element <{}>", other))),
    }
}

fn finish_inline(kind: FrameKind, segments: Vec<Segment>) -> Vec<Segment> {
    match kind {
        FrameKind::Label => {
            let label: String = segments
                .iter()
                .filter_map(|s| match s {
                    Segment::Text(text) => Some(text.as_str()),
                    _ => None,
                })
                .collect();
            vec![Segment::VerseNumber(label)]
        }
        FrameKind::Highlight { color, .. } => vec![Segment::Highlight {
            color,
            children: segments,
        }],
        FrameKind::Transparent | FrameKind::Paragraph => segments,
    }
}

fn region_color(attrs: &[(String, String)]) -> Result<Color> {
    if let Some(value) = attr(attrs, "data-color") {
        return value.parse();
    }
    let style = attr(attrs, "style").unwrap_or_default();
    style
        .split(';')
        .filter_map(|decl| decl.split_once(':'))
        .find(|(prop, _)| {
            let prop = prop.trim();
            prop.eq_ignore_ascii_case("background-color") || prop.eq_ignore_ascii_case("background")
        })
        .map(|(_, value)| value.trim().parse::<Color>())
        .unwrap_or_else(|| Err(markup_error("highlight without a color")))
}

fn attr(attrs: &[(String, String)], name: &str) -> Option<String> {
    attrs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.clone())
}

fn markup_error(message: impl Into<String>) -> JournalError {
    JournalError::Markup(message.into())
}

fn tokenize(input: &str) -> Result<Vec<Token<'_>>> {
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut pos = 0;

    while pos < input.len() {
        let rest = &input[pos..];
        if !rest.starts_with('<') || !looks_like_tag(rest) {
            pos += rest.chars().next().map_or(1, char::len_utf8);
            continue;
        }

        if text_start < pos {
            tokens.push(Token::Text(&input[text_start..pos]));
        }

        if rest.starts_with("<!--") {
            let end = rest
                .find("-->")
                .ok_or_else(|| markup_error("unterminated comment"))?;
            pos += end + 3;
        } else {
            let (token, consumed) = read_tag(rest)?;
            tokens.push(token);
            pos += consumed;
        }
        text_start = pos;
    }

    if text_start < input.len() {
        tokens.push(Token::Text(&input[text_start..]));
    }
    Ok(tokens)
}

fn looks_like_tag(rest: &str) -> bool {
    let mut chars = rest.chars().skip(1);
    match chars.next() {
        Some('/') => chars.next().is_some_and(|c| c.is_ascii_alphabetic()),
        Some('!') => rest.starts_with("<!--"),
        Some(c) => c.is_ascii_alphabetic(),
        None => false,
    }
}

/// Reads one tag starting at `<`. Returns the token and the number of bytes consumed.
fn read_tag(rest: &str) -> Result<(Token<'_>, usize)> {
    let mut quote: Option<char> = None;
    let mut end = None;
    for (i, c) in rest.char_indices().skip(1) {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '>' => {
                end = Some(i);
                break;
            }
            None => {}
        }
    }
    let end = end.ok_or_else(|| markup_error("unterminated tag"))?;
    let inner = rest[1..end].trim();

    if let Some(name) = inner.strip_prefix('/') {
        return Ok((Token::Close(name.trim().to_ascii_lowercase()), end + 1));
    }

    let inner = inner.strip_suffix('/').unwrap_or(inner).trim_end();
    let name_end = inner
        .find(|c: char| c.is_whitespace())
        .unwrap_or(inner.len());
    let name = inner[..name_end].to_ascii_lowercase();
    let attrs = parse_attrs(&inner[name_end..]);

    Ok((Token::Open { name, attrs }, end + 1))
}

fn parse_attrs(raw: &str) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    let mut rest = raw.trim_start();

    while !rest.is_empty() {
        let name_end = rest
            .find(|c: char| c.is_whitespace() || c == '=')
            .unwrap_or(rest.len());
        let name = rest[..name_end].to_ascii_lowercase();
        rest = rest[name_end..].trim_start();

        let value = if let Some(after_eq) = rest.strip_prefix('=') {
            let after_eq = after_eq.trim_start();
            match after_eq.chars().next() {
                Some(q @ ('"' | '\'')) => {
                    let body = &after_eq[1..];
                    let close = body.find(q).unwrap_or(body.len());
                    rest = body.get(close + 1..).unwrap_or("");
                    body[..close].to_string()
                }
                _ => {
                    let close = after_eq
                        .find(char::is_whitespace)
                        .unwrap_or(after_eq.len());
                    rest = &after_eq[close..];
                    after_eq[..close].to_string()
                }
            }
        } else {
            String::new()
        };

        if !name.is_empty() {
            attrs.push((name, decode_entities(&value)));
        }
        rest = rest.trim_start();
    }

    attrs
}
