use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};
use scripture_journal::api::{CmdMessage, DisplayEntry, MessageLevel};
use scripture_journal::config::JournalConfig;
use scripture_journal::markup::{Document, Segment};
use scripture_journal::view::EntryCard;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const HIGHLIGHT_MARKER: &str = "✎";

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

/// One line per entry: index, reference, collection, text preview, age.
pub(super) fn print_entry_list(entries: &[DisplayEntry], empty_message: &str) {
    if entries.is_empty() {
        println!("{}", empty_message.dimmed());
        return;
    }

    for de in entries {
        let idx_str = format!("{:>3}. ", de.index);
        let marker = match Document::parse(&de.entry.rendered_markup) {
            Ok(doc) if !doc.regions().is_empty() => format!("{} ", HIGHLIGHT_MARKER),
            _ => "  ".to_string(),
        };
        let time_ago = de
            .entry
            .saved_at
            .map(format_time_ago)
            .unwrap_or_else(|| " ".repeat(TIME_WIDTH));

        let headline = format!(
            "{} ({}) {}",
            de.entry.source.reference, de.entry.source.collection, de.entry.plain_text
        );
        let fixed_width = idx_str.width() + marker.width() + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed_width);
        let shown = truncate_to_width(&headline, available);
        let padding = available.saturating_sub(shown.width());

        println!(
            "{}{}{}{}{}",
            idx_str.yellow(),
            shown,
            " ".repeat(padding),
            marker,
            time_ago.dimmed()
        );
    }
}

/// Full entries: reference line, highlighted passage text and note.
pub(super) fn print_full_entries(entries: &[DisplayEntry]) {
    for (i, de) in entries.iter().enumerate() {
        if i > 0 {
            println!("\n================================\n");
        }
        println!(
            "{} {} ({})",
            format!("#{}", de.index).yellow(),
            de.entry.source.reference.bold(),
            de.entry.source.collection
        );
        println!("--------------------------------");
        println!(
            "{}",
            terminal_passage(&de.entry.rendered_markup, &de.entry.plain_text)
        );
        if let Some(note) = de.note.as_deref().filter(|n| !n.is_empty()) {
            println!();
            println!("{}", "Journal:".dimmed());
            println!("{}", note);
        }
    }
}

pub(super) fn print_card(card: &EntryCard) {
    println!("{}", card.reference_line().bold());
    println!("{}", terminal_passage(&card.markup, &card.plain_text));
    if let Some(status) = &card.status {
        println!("{}", status.green());
    }
}

pub(super) fn print_config(config: &JournalConfig) {
    for key in JournalConfig::KEYS {
        if let Some(value) = config.get(key) {
            println!("{} = {}", key, value);
        }
    }
}

/// Passage text with highlight regions painted in their colors. Each block goes on its
/// own line. Markup that does not parse prints as plain text.
pub(super) fn terminal_passage(markup: &str, plain_text: &str) -> String {
    let doc = match Document::parse(markup) {
        Ok(doc) => doc,
        Err(_) => return plain_text.to_string(),
    };

    doc.blocks
        .iter()
        .map(|block| {
            block
                .segments
                .iter()
                .map(|segment| paint_segment(segment, None))
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn paint_segment(segment: &Segment, background: Option<(u8, u8, u8)>) -> String {
    let painted: ColoredString = match segment {
        Segment::Text(text) => text.normal(),
        Segment::VerseNumber(label) => label.dimmed().bold(),
        Segment::Highlight { color, children } => {
            let rgb = color.rgb();
            return children
                .iter()
                .map(|child| paint_segment(child, Some(rgb)))
                .collect();
        }
    };
    match background {
        Some((r, g, b)) => painted.on_truecolor(r, g, b).black().to_string(),
        None => painted.to_string(),
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let c = if c == '\n' { ' ' } else { c };
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let time_str = Formatter::new().convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_respects_display_width() {
        assert_eq!(truncate_to_width("short", 20), "short");
        let cut = truncate_to_width("And it came to pass that I, Nephi", 10);
        assert!(cut.ends_with('…'));
        assert!(cut.width() <= 10);
    }

    #[test]
    fn terminal_passage_keeps_text_and_splits_blocks() {
        colored::control::set_override(false);
        let markup = "<p><span class=\"verse-num\">1</span> I, Nephi</p>\
                      <p><span class=\"verse-num\">2</span> <mark class=\"highlight\" data-color=\"#fff3a3\">Yea</mark></p>";
        let shown = terminal_passage(markup, "");
        assert_eq!(shown, "1 I, Nephi\n2 Yea");
    }

    #[test]
    fn unreadable_markup_prints_plain_text() {
        colored::control::set_override(false);
        assert_eq!(terminal_passage("<div>", "plain"), "plain");
    }

    #[test]
    fn time_is_right_aligned() {
        assert_eq!(format_time_ago(Utc::now()).width(), TIME_WIDTH);
    }
}
