use super::prompt::TerminalPrompt;
use super::render::{
    print_card, print_config, print_entry_list, print_full_entries, print_messages,
    terminal_passage,
};
use super::setup::{
    join_words, print_grouped_help, print_help_for_command, Cli, Commands, ModeArg,
    SelectionArgs,
};
use clap::Parser;
use colored::Colorize;
use scripture_journal::api::{ConfigAction, JournalApi};
use scripture_journal::clipboard::copy_to_clipboard;
use scripture_journal::commands::render::EMPTY_MESSAGE;
use scripture_journal::config::{self, JournalConfig};
use scripture_journal::error::{JournalError, Result};
use scripture_journal::highlight::ScopedSelection;
use scripture_journal::logging;
use scripture_journal::model::{EntryKey, Passage};
use scripture_journal::store::fs::FsBackend;
use scripture_journal::view::{JournalView, Prompt, ViewUpdate};
use std::path::PathBuf;

type Api = JournalApi<FsBackend>;

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.help {
        match &cli.command {
            None => print_grouped_help(),
            Some(cmd) => print_help_for_command(cmd.name()),
        }
        return Ok(());
    }

    logging::init(cli.verbose)?;
    let api = init_api()?;

    match cli.command {
        Some(Commands::Generate {
            collection,
            mode,
            save,
            copy,
        }) => handle_generate(&api, &collection, mode, save, copy),
        Some(Commands::Add { reference, volume }) => {
            let reference = join_words(&reference, "Reference")?;
            handle_add(&api, &reference, volume.as_deref())
        }
        Some(Commands::List) | None => handle_list(&api),
        Some(Commands::View { entries }) => handle_view(&api, &entries),
        Some(Commands::Note { entry, text }) => handle_note(api, &entry, &text.join(" ")),
        Some(Commands::Highlight {
            entry,
            selection,
            color,
        }) => handle_highlight(api, &entry, &selection, &color),
        Some(Commands::Clear { entry, selection }) => handle_clear(api, &entry, &selection),
        Some(Commands::Remove { entries, yes }) => handle_remove(api, &entries, yes),
        Some(Commands::Copy { entry }) => handle_copy(&api, &entry),
        Some(Commands::Render { output }) => handle_render(&api, output),
        Some(Commands::Export { dir }) => handle_export(&api, dir),
        Some(Commands::Config { key, value }) => handle_config(&api, key, value),
        Some(Commands::Help { command }) => {
            match command {
                Some(name) => print_help_for_command(&name),
                None => print_grouped_help(),
            }
            Ok(())
        }
    }
}

fn init_api() -> Result<Api> {
    let data_dir = config::data_dir()?;
    let config = match JournalConfig::load(&data_dir) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(error = %err, "unreadable config, using defaults");
            JournalConfig::default()
        }
    };
    tracing::debug!(data_dir = %data_dir.display(), "opening journal");
    Ok(JournalApi::new(
        FsBackend::new(data_dir.clone()),
        config,
        data_dir,
    ))
}

fn print_passage(passage: &Passage) {
    println!(
        "{} ({})",
        passage.source.reference.bold(),
        passage.source.collection
    );
    let shown = match &passage.rendered_markup {
        Some(markup) => terminal_passage(markup, &passage.plain_text),
        None => passage.plain_text.clone(),
    };
    println!("{}", shown);
}

fn copy_passage(passage: &Passage) {
    match copy_to_clipboard(&passage.clipboard_text()) {
        Ok(()) => println!("{}", "Copied!".green()),
        Err(e) => eprintln!("Warning: {}", e),
    }
}

fn handle_generate(
    api: &Api,
    collection: &str,
    mode: ModeArg,
    save: bool,
    copy: bool,
) -> Result<()> {
    let result = api.generate(collection, mode.as_str())?;
    let Some(passage) = result.passage else {
        print_messages(&result.messages);
        return Ok(());
    };

    print_passage(&passage);
    if copy {
        copy_passage(&passage);
    }
    if save {
        let saved = api.add_passage(passage)?;
        print_messages(&saved.messages);
    }
    Ok(())
}

fn handle_add(api: &Api, reference: &str, volume: Option<&str>) -> Result<()> {
    let passage = api.lookup(reference, volume)?;
    let result = api.add_passage(passage)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(api: &Api) -> Result<()> {
    let result = api.list_entries()?;
    print_entry_list(&result.listed_entries, EMPTY_MESSAGE);
    print_messages(&result.messages);
    Ok(())
}

fn handle_view(api: &Api, entries: &[String]) -> Result<()> {
    let result = api.view_entries(entries)?;
    print_full_entries(&result.listed_entries);
    print_messages(&result.messages);
    Ok(())
}

fn handle_note(api: Api, entry: &str, text: &str) -> Result<()> {
    let key = api.resolve_key(entry)?;
    let mut view = JournalView::new(api, TerminalPrompt::new(false))?;
    view.save_note(&key, text)?;

    if let Some(card) = view.card(&key) {
        println!("{}", card.reference_line().bold());
        if !card.note.is_empty() {
            println!("{}", card.note);
        }
        if let Some(status) = &card.status {
            println!("{}", status.green());
        }
    }
    Ok(())
}

/// Resolves the entry and the selection inside it. Selection problems are shown as
/// notices; `None` means there is nothing to act on.
fn select(
    api: &Api,
    prompt: &mut TerminalPrompt,
    entry: &str,
    args: &SelectionArgs,
) -> Result<Option<(EntryKey, ScopedSelection)>> {
    let key = api.resolve_key(entry)?;
    let selection = match (&args.text, &args.range) {
        (Some(needle), _) => api.select_text(entry, needle, args.occurrence),
        (None, Some(range)) => api.select_range(entry, range.clone()),
        (None, None) => Err(JournalError::NoSelection),
    };

    match selection {
        Ok(selection) => Ok(Some((key, selection))),
        Err(err) if err.is_notice() => {
            prompt.notify(&err.to_string());
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

fn show_update(view: &JournalView<FsBackend, TerminalPrompt>, update: ViewUpdate) {
    if let ViewUpdate::Entry(key) = update {
        if let Some(card) = view.card(&key) {
            print_card(card);
        }
    }
}

fn handle_highlight(api: Api, entry: &str, args: &SelectionArgs, color: &str) -> Result<()> {
    let mut prompt = TerminalPrompt::new(false);
    let Some((key, selection)) = select(&api, &mut prompt, entry, args)? else {
        return Ok(());
    };

    let mut view = JournalView::new(api, prompt)?;
    let update = view.toggle_highlight(&key, &selection, color)?;
    show_update(&view, update);
    Ok(())
}

fn handle_clear(api: Api, entry: &str, args: &SelectionArgs) -> Result<()> {
    if args.is_empty() {
        let key = api.resolve_key(entry)?;
        let mut view = JournalView::new(api, TerminalPrompt::new(false))?;
        let update = view.clear_all_highlights(&key)?;
        show_update(&view, update);
        return Ok(());
    }

    let mut prompt = TerminalPrompt::new(false);
    let Some((key, selection)) = select(&api, &mut prompt, entry, args)? else {
        return Ok(());
    };

    let mut view = JournalView::new(api, prompt)?;
    match view.clear_selection_highlights(&key, &selection)? {
        ViewUpdate::Unchanged => println!("{}", "No highlights in the selection.".dimmed()),
        update => show_update(&view, update),
    }
    Ok(())
}

fn handle_remove(api: Api, entries: &[String], yes: bool) -> Result<()> {
    let keys = entries
        .iter()
        .map(|e| api.resolve_key(e))
        .collect::<Result<Vec<_>>>()?;

    let mut view = JournalView::new(api, TerminalPrompt::new(yes))?;
    for key in keys {
        let Some(line) = view.card(&key).map(|c| c.reference_line()) else {
            continue;
        };
        if !yes {
            println!("{}", line.bold());
        }
        match view.remove(&key) {
            Ok(_) => println!("{}", format!("Removed {}", line).green()),
            Err(JournalError::ConfirmationDeclined) => {
                println!("{}", "Removal cancelled.".dimmed())
            }
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

fn handle_copy(api: &Api, entry: &str) -> Result<()> {
    let result = api.view_entries(&[entry])?;
    for de in &result.listed_entries {
        copy_to_clipboard(&de.entry.clipboard_text())?;
        println!(
            "{}",
            format!("Copied {}", de.entry.source.reference).green()
        );
    }
    Ok(())
}

fn handle_render(api: &Api, output: Option<PathBuf>) -> Result<()> {
    let result = api.render_page()?;
    let html = result.html.unwrap_or_default();
    match output {
        Some(path) => {
            std::fs::write(&path, html)?;
            println!("{}", format!("Wrote {}", path.display()).green());
        }
        None => print!("{}", html),
    }
    Ok(())
}

fn handle_export(api: &Api, dir: Option<PathBuf>) -> Result<()> {
    let dir = match dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let result = api.export(&dir)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(api: &Api, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };

    let result = api.config_action(action)?;
    if let Some(config) = &result.config {
        if result.messages.is_empty() {
            print_config(config);
        }
    }
    print_messages(&result.messages);
    Ok(())
}
