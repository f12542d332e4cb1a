use crate::commands::{CmdResult, DisplayEntry};
use crate::error::Result;
use crate::highlight::{Palette, Swatch};
use crate::markup::{escape_html, Document};
use crate::store::{JournalStore, StorageBackend};
use minijinja::Environment;
use once_cell::sync::Lazy;
use serde::Serialize;

use super::helpers::indexed_entries;

pub const EMPTY_MESSAGE: &str = "You don't have any saved scriptures yet. Generate a scripture, \
                                 and click Add to Journal.";

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>My Journal</title>
</head>
<body>
<main class="journal-list">
{%- if cards %}
{%- for card in cards %}
<article class="journal-card" data-key="{{ card.key | esc }}">
  <p class="journal-reference"><span class="journal-index">#{{ card.index }}</span> {{ card.reference | esc }} ({{ card.collection | esc }})</p>
  <div class="journal-scripture">{{ card.markup }}</div>
  <div class="journal-controls">
    <button type="button" class="note-toggle" aria-expanded="{{ card.note_visible }}">{% if card.note_visible %}Hide Journal ▲{% else %}Add Journal ▸{% endif %}</button>
    <button type="button" class="remove-entry" data-key="{{ card.key | esc }}">Remove</button>
  </div>
  <div class="highlight-toolbar">
    {%- for swatch in swatches %}
    <button type="button" class="highlight-swatch" data-color="{{ swatch.color | esc }}" title="{{ swatch.name | esc }}" style="background-color: {{ swatch.color | esc }}"></button>
    {%- endfor %}
    <button type="button" class="clear-selection">Clear Selection</button>
    <button type="button" class="clear-all">Clear All</button>
  </div>
  {%- if card.note_visible %}
  <div class="journal-notes-wrapper">
    <p class="journal-notes">{{ card.note | esc }}</p>
    {%- if card.status %}
    <p class="journal-status">{{ card.status | esc }}</p>
    {%- endif %}
  </div>
  {%- endif %}
</article>
{%- endfor %}
{%- else %}
<p class="empty-message">{{ empty_message | esc }}</p>
{%- endif %}
</main>
</body>
</html>
"#;

static PAGE_ENV: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    env.add_filter("esc", |value: String| -> String { escape_html(&value) });
    env
});

/// One entry as laid out on the journal page.
#[derive(Debug, Clone, Serialize)]
pub struct PageCard {
    pub index: usize,
    pub key: String,
    pub reference: String,
    pub collection: String,
    /// Canonical passage markup, inserted as is.
    pub markup: String,
    pub note: String,
    pub note_visible: bool,
    pub status: Option<String>,
}

impl PageCard {
    pub fn from_display(entry: &DisplayEntry, note_visible: bool) -> Self {
        Self {
            index: entry.index,
            key: entry.key().to_string(),
            reference: entry.entry.source.reference.clone(),
            collection: entry.entry.source.collection.clone(),
            markup: safe_markup(&entry.entry.rendered_markup, &entry.entry.plain_text),
            note: entry.note.clone().unwrap_or_default(),
            note_visible,
            status: None,
        }
    }
}

#[derive(Serialize)]
struct PageContext<'a> {
    cards: &'a [PageCard],
    swatches: &'a [Swatch],
    empty_message: &'a str,
}

/// Renders the whole journal page. Every card gets a highlight toolbar with one
/// button per palette swatch.
pub fn render_page(cards: &[PageCard], palette: &Palette) -> Result<String> {
    let tmpl = PAGE_ENV.template_from_str(PAGE_TEMPLATE)?;
    Ok(tmpl.render(PageContext {
        cards,
        swatches: palette.swatches(),
        empty_message: EMPTY_MESSAGE,
    })?)
}

/// The journal page with every note shown.
pub fn run<B: StorageBackend>(store: &JournalStore<B>, palette: &Palette) -> Result<CmdResult> {
    let entries = indexed_entries(store)?;
    let cards: Vec<PageCard> = entries
        .iter()
        .map(|e| PageCard::from_display(e, e.note.as_deref().is_some_and(|n| !n.is_empty())))
        .collect();
    let html = render_page(&cards, palette)?;
    Ok(CmdResult::default().with_html(html))
}

/// Stored markup goes through the parser before it reaches a page, so only the
/// known dialect is ever emitted. Markup that does not parse shows as plain text.
pub(crate) fn safe_markup(markup: &str, plain_text: &str) -> String {
    match Document::parse(markup) {
        Ok(doc) => doc.to_markup(),
        Err(err) => {
            tracing::warn!(error = %err, "unreadable passage markup, showing plain text");
            escape_html(plain_text)
        }
    }
}
