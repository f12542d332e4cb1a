use crate::commands::{CmdMessage, CmdResult, DisplayEntry};
use crate::error::Result;
use crate::highlight::Palette;
use crate::store::{JournalStore, StorageBackend};
use chrono::{DateTime, Utc};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::helpers::indexed_entries;
use super::render::{render_page, PageCard};

const ARCHIVE_DIR: &str = "scripture-journal";

/// Writes every entry and its note into a `.tar.gz` in `out_dir`.
///
/// The archive holds `journal.html` plus one text file per entry.
pub fn run<B: StorageBackend>(
    store: &JournalStore<B>,
    palette: &Palette,
    out_dir: &Path,
    now: DateTime<Utc>,
) -> Result<CmdResult> {
    let entries = indexed_entries(store)?;

    if entries.is_empty() {
        let mut res = CmdResult::default();
        res.add_message(CmdMessage::info("No entries to export."));
        return Ok(res);
    }

    let filename = format!("scripture-journal-{}.tar.gz", now.format("%Y-%m-%d_%H-%M-%S"));
    let path = out_dir.join(filename);
    let file = File::create(&path)?;
    write_archive(file, &entries, palette)?;

    tracing::debug!(path = %path.display(), entries = entries.len(), "exported journal");
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Exported {} entries to {}",
        entries.len(),
        path.display()
    )));
    Ok(result.with_output_path(path))
}

fn write_archive<W: Write>(
    writer: W,
    entries: &[DisplayEntry],
    palette: &Palette,
) -> Result<()> {
    let enc = GzEncoder::new(writer, Compression::default());
    let mut tar = tar::Builder::new(enc);

    let cards: Vec<PageCard> = entries
        .iter()
        .map(|e| PageCard::from_display(e, true))
        .collect();
    let page = render_page(&cards, palette)?;
    append_file(&mut tar, &format!("{}/journal.html", ARCHIVE_DIR), &page)?;

    for de in entries {
        let name = format!(
            "{}/{:03}-{}.txt",
            ARCHIVE_DIR,
            de.index,
            sanitize_filename(&de.entry.source.reference)
        );
        append_file(&mut tar, &name, &entry_text(de))?;
    }

    tar.into_inner()?.finish()?;
    Ok(())
}

fn append_file<W: Write>(tar: &mut tar::Builder<W>, name: &str, content: &str) -> Result<()> {
    let mut header = tar::Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    tar.append_data(&mut header, name, content.as_bytes())?;
    Ok(())
}

fn entry_text(de: &DisplayEntry) -> String {
    let mut text = format!(
        "{} ({})\n\n{}\n",
        de.entry.source.reference, de.entry.source.collection, de.entry.plain_text
    );
    if let Some(note) = de.note.as_deref().filter(|n| !n.is_empty()) {
        text.push_str("\nNotes:\n");
        text.push_str(note);
        text.push('\n');
    }
    text
}

fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == ' ' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;
    use flate2::read::GzDecoder;
    use std::io::Read;
    use tempfile::tempdir;

    fn archive_files(bytes: &[u8]) -> Vec<(String, String)> {
        let mut archive = tar::Archive::new(GzDecoder::new(bytes));
        archive
            .entries()
            .unwrap()
            .map(|entry| {
                let mut entry = entry.unwrap();
                let name = entry.path().unwrap().display().to_string();
                let mut content = String::new();
                entry.read_to_string(&mut content).unwrap();
                (name, content)
            })
            .collect()
    }

    #[test]
    fn archive_holds_page_and_entry_files() {
        let fixture = StoreFixture::new()
            .with_verses(2)
            .with_note("Book of Mormon|1 Nephi 3:2", "remember");
        let entries = indexed_entries(&fixture.store).unwrap();

        let mut buf = Vec::new();
        write_archive(&mut buf, &entries, &Palette::default()).unwrap();
        assert_eq!(&buf[..2], &[0x1f, 0x8b]);

        let files = archive_files(&buf);
        let names: Vec<&str> = files.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "scripture-journal/journal.html",
                "scripture-journal/001-1 Nephi 3_1.txt",
                "scripture-journal/002-1 Nephi 3_2.txt",
            ]
        );
        assert!(files[2].1.contains("Notes:\nremember"));
        assert!(!files[1].1.contains("Notes:"));
        assert!(files[0].1.contains("journal-card"));
    }

    #[test]
    fn empty_journal_exports_nothing() {
        let dir = tempdir().unwrap();
        let fixture = StoreFixture::new();
        let result = run(&fixture.store, &Palette::default(), dir.path(), Utc::now()).unwrap();
        assert!(result.output_path.is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn export_writes_a_dated_file() {
        let dir = tempdir().unwrap();
        let fixture = StoreFixture::new().with_verses(1);
        let now = DateTime::parse_from_rfc3339("2024-03-05T10:20:30Z")
            .unwrap()
            .with_timezone(&Utc);

        let result = run(&fixture.store, &Palette::default(), dir.path(), now).unwrap();
        let path = result.output_path.unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "scripture-journal-2024-03-05_10-20-30.tar.gz"
        );
        assert!(path.exists());
    }

    #[test]
    fn sanitize() {
        assert_eq!(sanitize_filename("D&C 4:2"), "D_C 4_2");
        assert_eq!(sanitize_filename("Alma 32:21"), "Alma 32_21");
    }
}
