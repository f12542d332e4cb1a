//! # Scripture Corpus
//!
//! Loads the four volume files and flattens them into verse and chapter records, the
//! shape the generation flow draws passages from.
//!
//! Two layouts are read:
//!
//! - `{"books": [{"book", "chapters": [{"chapter", "reference", "verses": [...]}]}]}`
//!   (Book of Mormon, Old and New Testament)
//! - `{"sections": [{"section", "reference", "verses": [...]}]}` (Doctrine and Covenants)
//!
//! Each verse is `{"verse", "reference", "text"}`. Numbers may be given as strings.

use crate::error::{JournalError, Result};
use crate::markup::{render_chapter, render_verse, VerseText};
use crate::model::{Mode, Passage, ScriptureRef};
use crate::store::record::lenient_number;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use uuid::Uuid;

pub const BOOK_OF_MORMON: &str = "Book of Mormon";
pub const DOCTRINE_AND_COVENANTS: &str = "Doctrine and Covenants";
pub const OLD_TESTAMENT: &str = "Old Testament";
pub const NEW_TESTAMENT: &str = "New Testament";

/// Volume name and file name, in load order.
pub const VOLUME_FILES: [(&str, &str); 4] = [
    (BOOK_OF_MORMON, "book-of-mormon.json"),
    (DOCTRINE_AND_COVENANTS, "doctrine-and-covenants.json"),
    (OLD_TESTAMENT, "old-testament.json"),
    (NEW_TESTAMENT, "new-testament.json"),
];

/// What a user can draw from. The Bible spans two volumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    BookOfMormon,
    Bible,
    DoctrineAndCovenants,
}

impl Collection {
    pub const ALL: [Collection; 3] = [
        Collection::BookOfMormon,
        Collection::Bible,
        Collection::DoctrineAndCovenants,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Collection::BookOfMormon => BOOK_OF_MORMON,
            Collection::Bible => "Bible",
            Collection::DoctrineAndCovenants => DOCTRINE_AND_COVENANTS,
        }
    }

    pub fn volumes(&self) -> &'static [&'static str] {
        match self {
            Collection::BookOfMormon => &[BOOK_OF_MORMON],
            Collection::Bible => &[OLD_TESTAMENT, NEW_TESTAMENT],
            Collection::DoctrineAndCovenants => &[DOCTRINE_AND_COVENANTS],
        }
    }

    pub fn contains(&self, volume: &str) -> bool {
        self.volumes().contains(&volume)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Collection {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "bookofmormon" | "bom" => Ok(Collection::BookOfMormon),
            "bible" => Ok(Collection::Bible),
            "doctrineandcovenants" | "dc" | "dandc" => Ok(Collection::DoctrineAndCovenants),
            _ => Err(JournalError::Corpus(format!("Unknown collection: {}", s))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseRecord {
    pub volume: String,
    pub book: String,
    pub chapter: Option<u32>,
    pub verse: Option<u32>,
    pub reference: String,
    pub text: String,
}

impl VerseRecord {
    pub fn to_passage(&self) -> Passage {
        Passage {
            source: ScriptureRef {
                collection: self.volume.clone(),
                book: self.book.clone(),
                chapter: self.chapter,
                verse: self.verse,
                reference: self.reference.clone(),
            },
            mode: Mode::Verse,
            plain_text: self.text.clone(),
            rendered_markup: Some(render_verse(&self.text, self.verse)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterRecord {
    pub volume: String,
    pub book: String,
    pub chapter: Option<u32>,
    pub reference: String,
    /// All verse texts joined by spaces.
    pub text: String,
    pub verses: Vec<VerseText>,
}

impl ChapterRecord {
    pub fn to_passage(&self) -> Passage {
        let markup = if self.verses.is_empty() {
            render_verse(&self.text, None)
        } else {
            render_chapter(&self.verses)
        };
        Passage {
            source: ScriptureRef {
                collection: self.volume.clone(),
                book: self.book.clone(),
                chapter: self.chapter,
                verse: None,
                reference: self.reference.clone(),
            },
            mode: Mode::Chapter,
            plain_text: self.text.clone(),
            rendered_markup: Some(markup),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct Corpus {
    pub verses: Vec<VerseRecord>,
    pub chapters: Vec<ChapterRecord>,
}

impl Corpus {
    /// Loads every volume file from `dir`. A missing or malformed file fails the load.
    pub fn load(dir: &Path) -> Result<Self> {
        let mut corpus = Corpus::default();
        for (volume, file) in VOLUME_FILES {
            let path = dir.join(file);
            let json = fs::read_to_string(&path).map_err(|e| {
                JournalError::Corpus(format!("Failed to load {}: {}", path.display(), e))
            })?;
            corpus.add_volume(volume, &json)?;
        }
        tracing::debug!(
            verses = corpus.verses.len(),
            chapters = corpus.chapters.len(),
            "loaded corpus"
        );
        Ok(corpus)
    }

    /// Flattens one volume's JSON into the corpus.
    pub fn add_volume(&mut self, volume: &str, json: &str) -> Result<()> {
        let parsed: VolumeJson = serde_json::from_str(json)
            .map_err(|e| JournalError::Corpus(format!("Malformed {} data: {}", volume, e)))?;

        for book in parsed.books.unwrap_or_default() {
            let book_name = book
                .book
                .or(book.name)
                .unwrap_or_else(|| volume.to_string());
            for chapter in book.chapters {
                let reference = chapter
                    .reference
                    .unwrap_or_else(|| numbered(&book_name, chapter.chapter));
                self.add_chapter(volume, &book_name, chapter.chapter, reference, chapter.verses);
            }
        }

        for section in parsed.sections.unwrap_or_default() {
            let number = section.section.or(section.chapter);
            let reference = section
                .reference
                .unwrap_or_else(|| numbered("D&C", number));
            self.add_chapter(volume, DOCTRINE_AND_COVENANTS, number, reference, section.verses);
        }
        Ok(())
    }

    fn add_chapter(
        &mut self,
        volume: &str,
        book: &str,
        chapter: Option<u32>,
        reference: String,
        verses: Vec<VerseJson>,
    ) {
        let text = verses
            .iter()
            .map(|v| v.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let numbered_verses = verses
            .iter()
            .filter_map(|v| {
                v.verse.map(|number| VerseText {
                    number,
                    text: v.text.clone(),
                })
            })
            .collect();

        for verse in verses {
            let verse_reference = verse.reference.unwrap_or_else(|| match verse.verse {
                Some(n) => format!("{}:{}", reference, n),
                None => reference.clone(),
            });
            self.verses.push(VerseRecord {
                volume: volume.to_string(),
                book: book.to_string(),
                chapter,
                verse: verse.verse,
                reference: verse_reference,
                text: verse.text,
            });
        }

        self.chapters.push(ChapterRecord {
            volume: volume.to_string(),
            book: book.to_string(),
            chapter,
            reference,
            text,
            verses: numbered_verses,
        });
    }

    pub fn verses_in(&self, collection: Collection) -> Vec<&VerseRecord> {
        self.verses
            .iter()
            .filter(|v| collection.contains(&v.volume))
            .collect()
    }

    pub fn chapters_in(&self, collection: Collection) -> Vec<&ChapterRecord> {
        self.chapters
            .iter()
            .filter(|c| collection.contains(&c.volume))
            .collect()
    }

    /// Looks a passage up by its reference, verses first. `volume` narrows the search
    /// when the same reference exists in more than one volume.
    pub fn find_passage(&self, reference: &str, volume: Option<&str>) -> Option<Passage> {
        let wanted = reference.trim();
        let in_volume = |v: &str| volume.map_or(true, |want| want.eq_ignore_ascii_case(v));

        self.verses
            .iter()
            .find(|v| v.reference.eq_ignore_ascii_case(wanted) && in_volume(&v.volume))
            .map(VerseRecord::to_passage)
            .or_else(|| {
                self.chapters
                    .iter()
                    .find(|c| c.reference.eq_ignore_ascii_case(wanted) && in_volume(&c.volume))
                    .map(ChapterRecord::to_passage)
            })
    }

    /// Draws the passage at `choose(n)` among the `n` candidates. Only the drawn record
    /// is turned into a passage.
    pub fn pick_with<F>(&self, collection: Collection, mode: Mode, choose: F) -> Result<Passage>
    where
        F: FnOnce(usize) -> usize,
    {
        let picked = match mode {
            Mode::Verse => {
                let verses = self.verses_in(collection);
                pick_one(&verses, choose).map(|v| v.to_passage())
            }
            Mode::Chapter => {
                let chapters = self.chapters_in(collection);
                pick_one(&chapters, choose).map(|c| c.to_passage())
            }
        };
        picked.ok_or_else(|| {
            JournalError::Corpus("No scriptures found for that combination.".to_string())
        })
    }

    /// Draws a random verse or chapter from the collection.
    pub fn random_pick(&self, collection: Collection, mode: Mode) -> Result<Passage> {
        self.pick_with(collection, mode, random_index)
    }
}

fn pick_one<'a, T, F>(records: &[&'a T], choose: F) -> Option<&'a T>
where
    F: FnOnce(usize) -> usize,
{
    if records.is_empty() {
        return None;
    }
    Some(records[choose(records.len()) % records.len()])
}

/// Index below `len` taken from a v4 uuid, the crate's only source of random bits.
fn random_index(len: usize) -> usize {
    (Uuid::new_v4().as_u128() % len as u128) as usize
}

fn numbered(name: &str, number: Option<u32>) -> String {
    match number {
        Some(n) => format!("{} {}", name, n),
        None => name.to_string(),
    }
}

#[derive(Deserialize)]
struct VolumeJson {
    #[serde(default)]
    books: Option<Vec<BookJson>>,
    #[serde(default)]
    sections: Option<Vec<SectionJson>>,
}

#[derive(Deserialize)]
struct BookJson {
    #[serde(default)]
    book: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    chapters: Vec<ChapterJson>,
}

#[derive(Deserialize)]
struct ChapterJson {
    #[serde(default, deserialize_with = "lenient_number")]
    chapter: Option<u32>,
    #[serde(default)]
    reference: Option<String>,
    #[serde(default)]
    verses: Vec<VerseJson>,
}

#[derive(Deserialize)]
struct SectionJson {
    #[serde(default, deserialize_with = "lenient_number")]
    section: Option<u32>,
    #[serde(default, deserialize_with = "lenient_number")]
    chapter: Option<u32>,
    #[serde(default)]
    reference: Option<String>,
    #[serde(default)]
    verses: Vec<VerseJson>,
}

#[derive(Deserialize)]
struct VerseJson {
    #[serde(default, deserialize_with = "lenient_number")]
    verse: Option<u32>,
    #[serde(default)]
    reference: Option<String>,
    #[serde(default)]
    text: String,
}
