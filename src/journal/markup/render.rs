use super::document::{Block, Document, Segment};
use crate::model::Mode;

/// One verse of a chapter, as handed to [`render_chapter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseText {
    pub number: u32,
    pub text: String,
}

/// Renders a single verse. With a number, the verse becomes a paragraph led by a
/// verse label; without one it is bare escaped text.
pub fn render_verse(text: &str, verse: Option<u32>) -> String {
    verse_document(text, verse).to_markup()
}

/// Renders a chapter as one paragraph per verse, in ascending verse order.
pub fn render_chapter(verses: &[VerseText]) -> String {
    let mut ordered: Vec<&VerseText> = verses.iter().collect();
    ordered.sort_by_key(|v| v.number);

    let blocks = ordered
        .into_iter()
        .map(|v| verse_block(&v.text, v.number))
        .collect();
    Document::new(blocks).to_markup()
}

/// Markup for an entry that carries none: a verse entry with a number gets its
/// verse paragraph, everything else shows as plain text.
pub fn fallback_markup(mode: Mode, verse: Option<u32>, text: &str) -> String {
    match (mode, verse) {
        (Mode::Verse, Some(number)) => render_verse(text, Some(number)),
        _ => render_verse(text, None),
    }
}

fn verse_document(text: &str, verse: Option<u32>) -> Document {
    match verse {
        Some(number) => Document::new(vec![verse_block(text, number)]),
        None if text.is_empty() => Document::default(),
        None => Document::new(vec![Block::inline(vec![Segment::Text(text.to_string())])]),
    }
}

fn verse_block(text: &str, number: u32) -> Block {
    Block::paragraph(vec![
        Segment::VerseNumber(number.to_string()),
        Segment::Text(format!(" {}", text)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verse_with_number_gets_a_label() {
        assert_eq!(
            render_verse("In the beginning...", Some(5)),
            "<p><span class=\"verse-num\">5</span> In the beginning...</p>"
        );
    }

    #[test]
    fn verse_without_number_is_escaped_text() {
        assert_eq!(render_verse("<b>bold</b>", None), "&lt;b&gt;bold&lt;/b&gt;");
    }

    #[test]
    fn chapter_verses_are_sorted() {
        let verses = vec![
            VerseText {
                number: 2,
                text: "second".into(),
            },
            VerseText {
                number: 1,
                text: "first".into(),
            },
        ];
        assert_eq!(
            render_chapter(&verses),
            "<p><span class=\"verse-num\">1</span> first</p><p><span class=\"verse-num\">2</span> second</p>"
        );
    }

    #[test]
    fn chapter_fallback_is_plain() {
        assert_eq!(
            fallback_markup(Mode::Chapter, None, "Whole chapter & more"),
            "Whole chapter &amp; more"
        );
        assert_eq!(
            fallback_markup(Mode::Chapter, Some(3), "Whole chapter"),
            "Whole chapter"
        );
    }

    #[test]
    fn rendered_markup_parses_back_to_the_same_text() {
        let markup = render_verse("Be still & know", Some(10));
        let doc = Document::parse(&markup).unwrap();
        assert_eq!(doc.text_content(), "10 Be still & know");
        assert_eq!(doc.to_markup(), markup);
    }
}
