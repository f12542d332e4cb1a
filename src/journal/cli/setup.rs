use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use scripture_journal::error::{JournalError, Result};
use std::ops::Range;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "scripture-journal",
    bin_name = "scripture-journal",
    version,
    disable_help_flag = true,
    disable_help_subcommand = true
)]
#[command(about = "Save scriptures, keep notes and highlight them", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Print help
    #[arg(short, long, global = true)]
    pub help: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Scripture,
    Entry,
    Data,
    Misc,
}

impl CommandGroup {
    pub fn heading(&self) -> &'static str {
        match self {
            CommandGroup::Scripture => "Scripture Commands:",
            CommandGroup::Entry => "Per-Entry Commands:",
            CommandGroup::Data => "Data Commands:",
            CommandGroup::Misc => "Miscellaneous:",
        }
    }

    pub fn for_command(name: &str) -> Option<Self> {
        match name {
            "generate" | "add" | "list" => Some(CommandGroup::Scripture),
            "view" | "note" | "highlight" | "clear" | "remove" | "copy" => {
                Some(CommandGroup::Entry)
            }
            "render" | "export" => Some(CommandGroup::Data),
            "config" | "help" => Some(CommandGroup::Misc),
            _ => None,
        }
    }

    pub fn all() -> &'static [CommandGroup] {
        &[
            CommandGroup::Scripture,
            CommandGroup::Entry,
            CommandGroup::Data,
            CommandGroup::Misc,
        ]
    }
}

pub fn get_grouped_help() -> String {
    let cmd = Cli::command();
    let version = cmd.get_version().unwrap_or("unknown");

    let mut output = String::new();
    output.push_str(&format!("scripture-journal {version}\n"));
    output.push_str("Save scriptures, keep notes and highlight them\n");
    output.push('\n');
    output.push_str("Usage: scripture-journal [OPTIONS] [COMMAND]\n");

    let subcommands: Vec<_> = cmd.get_subcommands().collect();
    for group in CommandGroup::all() {
        let group_cmds: Vec<_> = subcommands
            .iter()
            .filter(|sc| {
                !sc.is_hide_set() && CommandGroup::for_command(sc.get_name()) == Some(*group)
            })
            .collect();

        if !group_cmds.is_empty() {
            output.push('\n');
            output.push_str(&format!("{}\n", group.heading()));
            for sc in group_cmds {
                let about = sc.get_about().map(|s| s.to_string()).unwrap_or_default();
                output.push_str(&format!("  {:<12} {}\n", sc.get_name(), about));
            }
        }
    }

    output.push('\n');
    output.push_str("Options:\n");
    output.push_str("  -v, --verbose    Verbose output\n");
    output.push_str("  -h, --help       Print help\n");
    output.push_str("  -V, --version    Print version\n");
    output
}

pub fn print_grouped_help() {
    print!("{}", get_grouped_help());
}

pub fn print_help_for_command(name: &str) {
    let mut cmd = Cli::command();
    for subcmd in cmd.get_subcommands_mut() {
        if subcmd.get_name() == name {
            print!("{}", subcmd.render_help());
            return;
        }
    }

    eprintln!("Unknown command: {}", name);
    eprintln!();
    print_grouped_help();
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Generate { .. } => "generate",
            Commands::Add { .. } => "add",
            Commands::List => "list",
            Commands::View { .. } => "view",
            Commands::Note { .. } => "note",
            Commands::Highlight { .. } => "highlight",
            Commands::Clear { .. } => "clear",
            Commands::Remove { .. } => "remove",
            Commands::Copy { .. } => "copy",
            Commands::Render { .. } => "render",
            Commands::Export { .. } => "export",
            Commands::Config { .. } => "config",
            Commands::Help { .. } => "help",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Verse,
    Chapter,
}

impl ModeArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModeArg::Verse => "verse",
            ModeArg::Chapter => "chapter",
        }
    }
}

/// Which text of an entry to act on.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Select the first (or --occurrence-th) match of this text
    #[arg(short, long, conflicts_with = "range")]
    pub text: Option<String>,

    /// Which match of --text to select (1-based)
    #[arg(long, default_value_t = 1, requires = "text")]
    pub occurrence: usize,

    /// Select character offsets START..END of the passage text
    #[arg(short, long, value_parser = parse_range)]
    pub range: Option<Range<usize>>,
}

impl SelectionArgs {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.range.is_none()
    }
}

fn parse_range(raw: &str) -> std::result::Result<Range<usize>, String> {
    let (start, end) = raw
        .split_once("..")
        .ok_or_else(|| format!("expected START..END, got {}", raw))?;
    let start: usize = start
        .trim()
        .parse()
        .map_err(|_| format!("invalid range start: {}", start))?;
    let end: usize = end
        .trim()
        .parse()
        .map_err(|_| format!("invalid range end: {}", end))?;
    if end < start {
        return Err(format!("range end {} is before start {}", end, start));
    }
    Ok(start..end)
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Draw a random verse or chapter
    #[command(alias = "g", display_order = 1)]
    Generate {
        /// Book of Mormon, Bible, or Doctrine and Covenants
        #[arg(short, long, default_value = "Book of Mormon")]
        collection: String,

        /// Draw a single verse or a whole chapter
        #[arg(short, long, value_enum, default_value_t = ModeArg::Verse)]
        mode: ModeArg,

        /// Add the drawn passage to the journal
        #[arg(long)]
        save: bool,

        /// Copy the drawn passage to the clipboard
        #[arg(long)]
        copy: bool,
    },

    /// Add a passage to the journal by reference
    #[command(alias = "a", display_order = 2)]
    Add {
        /// Reference words, e.g. 1 Nephi 3:7
        #[arg(required = true, trailing_var_arg = true)]
        reference: Vec<String>,

        /// Volume to look in when a reference exists in several
        #[arg(long)]
        volume: Option<String>,
    },

    /// List journal entries
    #[command(alias = "ls", display_order = 3)]
    List,

    /// Show one or more entries with their notes
    #[command(alias = "v", display_order = 10)]
    View {
        /// Entry numbers or keys (e.g. 1 3 "Book of Mormon|Alma 32:21")
        #[arg(required = true, num_args = 1..)]
        entries: Vec<String>,
    },

    /// Write the note of an entry (an empty note clears it)
    #[command(display_order = 11)]
    Note {
        /// Entry number or key
        entry: String,

        /// Note words
        #[arg(trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// Toggle a highlight over part of an entry
    #[command(alias = "hl", display_order = 12)]
    Highlight {
        /// Entry number or key
        entry: String,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Palette color name or hex value
        #[arg(short, long, default_value = "yellow")]
        color: String,
    },

    /// Clear highlights in a selection, or every highlight of an entry
    #[command(display_order = 13)]
    Clear {
        /// Entry number or key
        entry: String,

        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Remove entries and their notes
    #[command(alias = "rm", display_order = 14)]
    Remove {
        /// Entry numbers or keys
        #[arg(required = true, num_args = 1..)]
        entries: Vec<String>,

        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Copy an entry as "text — reference"
    #[command(display_order = 15)]
    Copy {
        /// Entry number or key
        entry: String,
    },

    /// Render the journal page as HTML
    #[command(display_order = 20)]
    Render {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export the journal to a tar.gz archive
    #[command(display_order = 21)]
    Export {
        /// Directory to write the archive into (defaults to the current directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Get or set configuration
    #[command(display_order = 30)]
    Config {
        /// Configuration key (e.g., corpus-dir)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Print help for the journal or a subcommand
    #[command(display_order = 31)]
    Help {
        /// Subcommand to get help for
        command: Option<String>,
    },
}

/// Joins trailing words, rejecting an empty result.
pub fn join_words(words: &[String], what: &str) -> Result<String> {
    let joined = words.join(" ").trim().to_string();
    if joined.is_empty() {
        return Err(JournalError::Api(format!("{} cannot be empty", what)));
    }
    Ok(joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("scripture-journal").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn no_command_means_list() {
        assert!(parse(&[]).command.is_none());
    }

    #[test]
    fn add_joins_reference_words() {
        match parse(&["add", "1", "Nephi", "3:7"]).command {
            Some(Commands::Add { reference, volume }) => {
                assert_eq!(join_words(&reference, "Reference").unwrap(), "1 Nephi 3:7");
                assert_eq!(volume, None);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn highlight_takes_text_or_range() {
        match parse(&["hl", "2", "--text", "faith", "--occurrence", "2", "-c", "green"]).command {
            Some(Commands::Highlight {
                entry,
                selection,
                color,
            }) => {
                assert_eq!(entry, "2");
                assert_eq!(selection.text.as_deref(), Some("faith"));
                assert_eq!(selection.occurrence, 2);
                assert_eq!(color, "green");
            }
            other => panic!("unexpected {:?}", other),
        }

        match parse(&["highlight", "1", "--range", "3..9"]).command {
            Some(Commands::Highlight { selection, .. }) => {
                assert_eq!(selection.range, Some(3..9));
            }
            other => panic!("unexpected {:?}", other),
        }

        let both = Cli::try_parse_from([
            "scripture-journal",
            "highlight",
            "1",
            "--text",
            "a",
            "--range",
            "1..2",
        ]);
        assert!(both.is_err());
    }

    #[test]
    fn clear_without_selection_is_empty() {
        match parse(&["clear", "1"]).command {
            Some(Commands::Clear { selection, .. }) => assert!(selection.is_empty()),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn range_parser_rejects_backwards_ranges() {
        assert_eq!(parse_range("0..4"), Ok(0..4));
        assert!(parse_range("5..2").is_err());
        assert!(parse_range("5").is_err());
    }

    #[test]
    fn grouped_help_lists_every_visible_command() {
        let help = get_grouped_help();
        for name in ["generate", "highlight", "remove", "export", "config"] {
            assert!(help.contains(name), "missing {}", name);
        }
    }
}
