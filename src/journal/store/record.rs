//! The persisted shape of a saved entry, and the one-time decode into [`SavedEntry`].
//!
//! Older journals were written before markup and mode were stored, so every field
//! beyond `reference` and `text` is optional on the way in. Decoding fills the gaps
//! once, here, so nothing downstream has to check for them.

use crate::markup::render;
use crate::model::{Mode, SavedEntry, ScriptureRef};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEntry {
    #[serde(default)]
    pub volume: String,
    #[serde(default)]
    pub book: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub chapter: Option<u32>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub verse: Option<u32>,
    pub reference: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, deserialize_with = "lenient_mode")]
    pub mode: Option<Mode>,
    #[serde(default)]
    pub html: Option<String>,
    #[serde(rename = "savedAt", default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl StoredEntry {
    pub fn decode(self) -> SavedEntry {
        let mode = self.mode.unwrap_or(match self.verse {
            Some(_) => Mode::Verse,
            None => Mode::Chapter,
        });
        let rendered_markup = match self.html {
            Some(html) if !html.trim().is_empty() => html,
            _ => render::fallback_markup(mode, self.verse, &self.text),
        };

        SavedEntry {
            source: ScriptureRef {
                collection: self.volume,
                book: self.book,
                chapter: self.chapter,
                verse: self.verse,
                reference: self.reference,
            },
            mode,
            plain_text: self.text,
            rendered_markup,
            saved_at: self.saved_at,
        }
    }

    pub fn encode(entry: &SavedEntry) -> Self {
        Self {
            volume: entry.source.collection.clone(),
            book: entry.source.book.clone(),
            chapter: entry.source.chapter,
            verse: entry.source.verse,
            reference: entry.source.reference.clone(),
            text: entry.plain_text.clone(),
            mode: Some(entry.mode),
            html: Some(entry.rendered_markup.clone()),
            saved_at: entry.saved_at,
        }
    }
}

/// Accepts a number, a numeric string, or null.
pub(crate) fn lenient_number<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Unknown modes, of any JSON type, are treated as missing so they get inferred.
fn lenient_mode<'de, D>(deserializer: D) -> Result<Option<Mode>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> SavedEntry {
        serde_json::from_str::<StoredEntry>(json).unwrap().decode()
    }

    #[test]
    fn legacy_verse_without_html_gets_a_verse_paragraph() {
        let entry = parse(
            r#"{"volume":"Old Testament","book":"Genesis","chapter":1,"verse":5,
                "reference":"Genesis 1:5","text":"In the beginning...","mode":"verse"}"#,
        );
        assert_eq!(
            entry.rendered_markup,
            "<p><span class=\"verse-num\">5</span> In the beginning...</p>"
        );
    }

    #[test]
    fn legacy_chapter_without_html_is_plain_text() {
        let entry = parse(
            r#"{"volume":"Old Testament","book":"Genesis","chapter":1,"verse":null,
                "reference":"Genesis 1","text":"1 In the beginning & 2 And the earth","mode":"chapter"}"#,
        );
        assert_eq!(entry.mode, Mode::Chapter);
        assert_eq!(entry.rendered_markup, "1 In the beginning &amp; 2 And the earth");
    }

    #[test]
    fn missing_mode_is_inferred_from_verse() {
        let verse = parse(r#"{"reference":"Alma 32:21","text":"faith","verse":21}"#);
        let chapter = parse(r#"{"reference":"Alma 32","text":"faith"}"#);
        assert_eq!(verse.mode, Mode::Verse);
        assert_eq!(chapter.mode, Mode::Chapter);
    }

    #[test]
    fn numbers_may_be_strings() {
        let entry = parse(r#"{"reference":"Moroni 10:4","text":"ask","chapter":"10","verse":"4"}"#);
        assert_eq!(entry.source.chapter, Some(10));
        assert_eq!(entry.source.verse, Some(4));
    }

    #[test]
    fn malformed_mode_falls_back_to_inference() {
        let json = r#"[
            {"reference":"Alma 32:21","text":"faith","verse":21,"mode":3},
            {"reference":"Alma 32","text":"faith","mode":{"kind":"chapter"}},
            {"reference":"Alma 32:22","text":"mercy","verse":22,"mode":"Chapter"}
        ]"#;
        let entries: Vec<SavedEntry> = serde_json::from_str::<Vec<StoredEntry>>(json)
            .unwrap()
            .into_iter()
            .map(StoredEntry::decode)
            .collect();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].mode, Mode::Verse);
        assert_eq!(entries[1].mode, Mode::Chapter);
        assert_eq!(entries[2].mode, Mode::Chapter);
    }

    #[test]
    fn stored_html_wins_over_text() {
        let entry = parse(
            r#"{"reference":"Ether 12:27","text":"weakness","verse":27,"mode":"verse","html":"<p>custom</p>"}"#,
        );
        assert_eq!(entry.rendered_markup, "<p>custom</p>");
    }

    #[test]
    fn encoding_writes_html_and_mode() {
        let entry = parse(r#"{"volume":"Book of Mormon","reference":"Alma 32:21","text":"faith","verse":21}"#);
        let json = serde_json::to_value(StoredEntry::encode(&entry)).unwrap();
        assert_eq!(json["mode"], "verse");
        assert_eq!(json["volume"], "Book of Mormon");
        assert!(json["html"].as_str().unwrap().contains("verse-num"));
        assert!(json.get("savedAt").is_none());
    }
}
