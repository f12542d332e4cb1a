use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const NEPHI_TEXT: &str = "I will go and do the things which the Lord hath commanded";

fn home() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let corpus = dir.path().join("corpus");
    fs::create_dir_all(&corpus).unwrap();

    let book_of_mormon = format!(
        r#"{{"books":[{{"book":"1 Nephi","chapters":[{{"chapter":3,"verses":[
            {{"verse":7,"reference":"1 Nephi 3:7","text":"{}"}}]}}]}}]}}"#,
        NEPHI_TEXT
    );
    fs::write(corpus.join("book-of-mormon.json"), book_of_mormon).unwrap();
    fs::write(
        corpus.join("doctrine-and-covenants.json"),
        r#"{"sections":[{"section":4,"verses":[{"verse":2,"text":"serve him with all your heart"}]}]}"#,
    )
    .unwrap();
    fs::write(
        corpus.join("old-testament.json"),
        r#"{"books":[{"book":"Genesis","chapters":[{"chapter":1,"verses":[
            {"verse":1,"text":"In the beginning God created the heaven and the earth."},
            {"verse":2,"text":"And the earth was without form, and void."}]}]}]}"#,
    )
    .unwrap();
    fs::write(corpus.join("new-testament.json"), r#"{"books":[]}"#).unwrap();
    dir
}

fn journal(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("scripture-journal").unwrap();
    cmd.env("SCRIPTURE_JOURNAL_HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

fn add_nephi(home: &Path) {
    journal(home)
        .args(["add", "1", "Nephi", "3:7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added to Journal: 1 Nephi 3:7"));
}

fn stored_entries(home: &Path) -> String {
    fs::read_to_string(home.join("savedEntries.json")).unwrap()
}

#[test]
fn empty_journal_lists_the_empty_message() {
    let home = home();
    journal(home.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "You don't have any saved scriptures yet.",
        ));
}

#[test]
fn add_then_list_and_duplicate() {
    let home = home();
    add_nephi(home.path());

    journal(home.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 Nephi 3:7 (Book of Mormon)"));

    journal(home.path())
        .args(["add", "1 Nephi 3:7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Already saved: 1 Nephi 3:7"));

    let stored: serde_json::Value = serde_json::from_str(&stored_entries(home.path())).unwrap();
    assert_eq!(stored.as_array().unwrap().len(), 1);
}

#[test]
fn unknown_reference_fails() {
    let home = home();
    journal(home.path())
        .args(["add", "Moroni 10:4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn note_is_saved_and_viewed() {
    let home = home();
    add_nephi(home.path());

    journal(home.path())
        .args(["note", "1", "  go", "and", "do  "])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved!"));

    journal(home.path())
        .args(["view", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("go and do"))
        .stdout(predicate::str::contains(NEPHI_TEXT));

    let notes = fs::read_to_string(home.path().join("savedNotes.json")).unwrap();
    let notes: serde_json::Value = serde_json::from_str(&notes).unwrap();
    assert_eq!(notes["Book of Mormon|1 Nephi 3:7"], "go and do");
}

#[test]
fn highlight_toggles_on_and_off() {
    let home = home();
    add_nephi(home.path());
    let before = stored_entries(home.path());

    journal(home.path())
        .args(["highlight", "1", "--text", "go and do"])
        .assert()
        .success();
    let highlighted = stored_entries(home.path());
    assert!(highlighted.contains("<mark"));
    assert!(highlighted.contains("#fff3a3"));

    journal(home.path())
        .args(["highlight", "1", "--text", "go and do"])
        .assert()
        .success();
    assert_eq!(stored_entries(home.path()), before);
}

#[test]
fn clear_removes_every_highlight() {
    let home = home();
    add_nephi(home.path());

    journal(home.path())
        .args(["hl", "1", "--range", "2..8", "--color", "green"])
        .assert()
        .success();
    assert!(stored_entries(home.path()).contains("#c8f7c5"));

    journal(home.path())
        .args(["clear", "1"])
        .assert()
        .success();
    assert!(!stored_entries(home.path()).contains("<mark"));
}

#[test]
fn selection_problems_are_notices() {
    let home = home();
    add_nephi(home.path());
    let before = stored_entries(home.path());

    journal(home.path())
        .args(["highlight", "1", "--text", "not in this verse"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Select some text"));

    journal(home.path())
        .args(["highlight", "1", "--text", "go", "--color", "ultraviolet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown highlight color"));

    assert_eq!(stored_entries(home.path()), before);
}

#[test]
fn remove_asks_for_confirmation() {
    let home = home();
    add_nephi(home.path());
    journal(home.path())
        .args(["note", "1", "keep"])
        .assert()
        .success();

    journal(home.path())
        .args(["remove", "1"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Remove this scripture from your journal?",
        ))
        .stdout(predicate::str::contains("Removal cancelled."));
    assert!(stored_entries(home.path()).contains("1 Nephi 3:7"));

    journal(home.path())
        .args(["remove", "1"])
        .write_stdin("Y\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed #1 1 Nephi 3:7"));

    assert!(!stored_entries(home.path()).contains("1 Nephi 3:7"));
    let notes = fs::read_to_string(home.path().join("savedNotes.json")).unwrap();
    assert!(!notes.contains("1 Nephi 3:7"));
}

#[test]
fn remove_with_yes_skips_the_prompt() {
    let home = home();
    add_nephi(home.path());

    journal(home.path())
        .args(["rm", "--yes", "Book of Mormon|1 Nephi 3:7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Remove this scripture").not());
    assert!(!stored_entries(home.path()).contains("1 Nephi 3:7"));
}

#[test]
fn render_writes_the_journal_page() {
    let home = home();
    add_nephi(home.path());

    journal(home.path())
        .arg("render")
        .assert()
        .success()
        .stdout(predicate::str::contains("<!DOCTYPE html>"))
        .stdout(predicate::str::contains(
            "<span class=\"verse-num\">7</span>",
        ));

    let out = home.path().join("page.html");
    journal(home.path())
        .args(["render", "--output", out.to_str().unwrap()])
        .assert()
        .success();
    assert!(fs::read_to_string(out).unwrap().contains("1 Nephi 3:7"));
}

#[test]
fn export_creates_an_archive() {
    let home = home();
    let out = tempfile::tempdir().unwrap();

    journal(home.path())
        .args(["export", "--dir", out.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("No entries to export."));

    add_nephi(home.path());
    journal(home.path())
        .args(["export", "--dir", out.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 entries"));

    let archives: Vec<_> = fs::read_dir(out.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tar.gz"))
        .collect();
    assert_eq!(archives.len(), 1);
}

#[test]
fn generate_can_save_the_drawn_passage() {
    let home = home();

    journal(home.path())
        .args(["generate", "--collection", "Book of Mormon", "--save"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 Nephi 3:7"))
        .stdout(predicate::str::contains("Added to Journal"));

    journal(home.path())
        .args(["generate", "--collection", "bible", "--mode", "chapter"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Genesis 1"));

    let stored: serde_json::Value = serde_json::from_str(&stored_entries(home.path())).unwrap();
    assert_eq!(stored.as_array().unwrap().len(), 1);
}

#[test]
fn config_sets_the_corpus_dir() {
    let home = home();
    let elsewhere = tempfile::tempdir().unwrap();

    journal(home.path())
        .args(["config", "corpus-dir", elsewhere.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("corpus-dir set to"));

    journal(home.path())
        .args(["config", "entries-key"])
        .assert()
        .success()
        .stdout(predicate::str::contains("savedEntries"));

    journal(home.path())
        .args(["add", "1 Nephi 3:7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Corpus error"));
}

#[test]
fn help_groups_commands() {
    let home = home();
    journal(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Per-Entry Commands:"))
        .stdout(predicate::str::contains("highlight"));
}
