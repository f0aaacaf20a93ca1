//! Command-line frontend over `notemark_core`.
//!
//! # Responsibility
//! - Map subcommands onto the presentation shell and note store.
//! - Own process concerns: data directory, logging bootstrap, prompts.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use notemark_core::store::kv::KvStore;
use notemark_core::store::notes::NoteStore;
use notemark_core::{
    default_log_level, init_logging, preview_html, wrap_matches, NoteId, NotePatch, Workspace,
};
use std::io::Write;
use std::path::PathBuf;
use std::rc::Rc;

/// Markers wrapped around search matches in terminal output.
const MATCH_OPEN: &str = "[";
const MATCH_CLOSE: &str = "]";

#[derive(Parser)]
#[command(name = "notemark", about = "Markdown note workspace", version)]
struct Cli {
    /// Data directory holding the database and logs
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Level for the rolling file log (trace|debug|info|warn|error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new note
    New {
        /// Title (defaults to the untitled placeholder)
        title: Option<String>,
        /// Initial content (use "-" to read from stdin)
        #[arg(long)]
        content: Option<String>,
    },

    /// List notes, most recently created first
    List,

    /// Search notes by title or content substring
    Search {
        /// Search query (matched case-insensitively)
        query: String,
    },

    /// Show one note
    Show {
        /// Note id (unique prefix accepted)
        id: String,
        /// Print the rendered Markdown preview instead of the source
        #[arg(long)]
        html: bool,
    },

    /// Update a note's title and/or content
    Edit {
        /// Note id (unique prefix accepted)
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New content (use "-" to read from stdin)
        #[arg(long)]
        content: Option<String>,
    },

    /// Delete a note
    Delete {
        /// Note id (unique prefix accepted)
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Show or toggle the color theme
    Theme {
        /// Flip between light and dark
        #[arg(long)]
        toggle: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut shell = bootstrap(cli.data_dir.clone(), cli.log_level.as_deref())?;

    match cli.command {
        Command::New { title, content } => run_new(&mut shell, title, content),
        Command::List => run_list(&mut shell),
        Command::Search { query } => run_search(&mut shell, &query),
        Command::Show { id, html } => run_show(&shell, &id, html),
        Command::Edit { id, title, content } => run_edit(&shell, &id, title, content),
        Command::Delete { id, yes } => run_delete(&mut shell, &id, yes),
        Command::Theme { toggle } => run_theme(&mut shell, toggle),
    }
}

fn bootstrap(data_dir: Option<PathBuf>, log_level: Option<&str>) -> Result<Workspace> {
    let data_dir = resolve_data_dir(data_dir)?;
    std::fs::create_dir_all(&data_dir).with_context(|| {
        format!("failed to create data directory `{}`", data_dir.display())
    })?;

    let log_dir = data_dir.join("logs");
    let level = log_level.unwrap_or_else(|| default_log_level());
    if let Some(log_dir) = log_dir.to_str() {
        // A broken log setup should not take the CLI down with it.
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    let db_path = data_dir.join("notemark.sqlite3");
    let kv = KvStore::open(&db_path)
        .map_err(|err| anyhow!("failed to open note database `{}`: {err}", db_path.display()))?;
    log::info!(
        "event=cli_start module=cli status=ok data_dir={}",
        data_dir.display()
    );
    Ok(Workspace::new(Rc::new(kv)))
}

fn resolve_data_dir(data_dir: Option<PathBuf>) -> Result<PathBuf> {
    let dir = match data_dir {
        Some(dir) => dir,
        None => dirs::data_dir()
            .context("no platform data directory; pass --data-dir")?
            .join("notemark"),
    };
    if dir.is_absolute() {
        Ok(dir)
    } else {
        Ok(std::env::current_dir()
            .context("cannot resolve relative --data-dir")?
            .join(dir))
    }
}

fn run_new(shell: &mut Workspace, title: Option<String>, content: Option<String>) -> Result<()> {
    let id = shell.notes().create();
    let patch = NotePatch {
        title,
        content: read_content_arg(content)?,
    };
    if !patch.is_empty() {
        shell.notes().update(id, patch);
    }

    let note = shell
        .notes()
        .get(id)
        .context("created note missing from collection")?;
    println!("created {} \"{}\"", short_id(id), note.title);
    Ok(())
}

fn run_list(shell: &mut Workspace) -> Result<()> {
    shell.set_search_term("");
    print_rows(shell);
    Ok(())
}

fn run_search(shell: &mut Workspace, query: &str) -> Result<()> {
    shell.set_search_term(query);
    print_rows(shell);
    Ok(())
}

fn print_rows(shell: &Workspace) {
    let rows = shell.list_rows();
    if rows.is_empty() {
        if shell.search_term().trim().is_empty() {
            println!("No notes yet");
        } else {
            println!("No notes found");
        }
        return;
    }

    let term = shell.search_term().to_string();
    for row in rows {
        println!(
            "{}  {}  {}",
            short_id(row.id),
            format_timestamp(row.updated_at),
            wrap_matches(&row.title, &term, MATCH_OPEN, MATCH_CLOSE)
        );
        if !row.snippet.is_empty() {
            println!("    {}", wrap_matches(&row.snippet, &term, MATCH_OPEN, MATCH_CLOSE));
        }
    }
}

fn run_show(shell: &Workspace, id: &str, html: bool) -> Result<()> {
    let id = resolve_note_id(shell.notes(), id)?;
    let note = shell.notes().get(id).context("note disappeared")?;

    println!("id:      {}", note.id);
    println!("title:   {}", note.title);
    println!("created: {}", format_timestamp(note.created_at));
    println!("updated: {}", format_timestamp(note.updated_at));
    println!();
    if html {
        println!("{}", preview_html(&note.content));
    } else if note.content.is_empty() {
        println!("(empty)");
    } else {
        println!("{}", note.content);
    }
    Ok(())
}

fn run_edit(
    shell: &Workspace,
    id: &str,
    title: Option<String>,
    content: Option<String>,
) -> Result<()> {
    let id = resolve_note_id(shell.notes(), id)?;
    let patch = NotePatch {
        title,
        content: read_content_arg(content)?,
    };
    if patch.is_empty() {
        bail!("nothing to change; pass --title and/or --content");
    }

    shell.notes().update(id, patch);
    let note = shell.notes().get(id).context("note disappeared")?;
    println!("updated {} \"{}\"", short_id(id), note.title);
    Ok(())
}

fn run_delete(shell: &mut Workspace, id: &str, yes: bool) -> Result<()> {
    let id = resolve_note_id(shell.notes(), id)?;
    let note = shell.notes().get(id).context("note disappeared")?;

    if !shell.request_delete(id) {
        bail!("no note matches id `{id}`");
    }

    if !yes && !confirm_on_terminal(&note.title)? {
        shell.cancel_delete();
        println!("cancelled");
        return Ok(());
    }

    if shell.confirm_delete() {
        println!("deleted {} \"{}\"", short_id(id), note.title);
    }
    Ok(())
}

fn run_theme(shell: &mut Workspace, toggle: bool) -> Result<()> {
    let theme = if toggle {
        shell.toggle_theme()
    } else {
        shell.theme()
    };
    println!("{theme}");
    Ok(())
}

/// Asks for delete confirmation on the terminal; default is "no".
fn confirm_on_terminal(title: &str) -> Result<bool> {
    print!("Delete \"{title}\"? This action cannot be undone. [y/N] ");
    std::io::stdout().flush().context("cannot flush stdout")?;

    let mut answer = String::new();
    std::io::stdin()
        .read_line(&mut answer)
        .context("cannot read confirmation")?;
    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Resolves a full id or unique id prefix against the collection.
fn resolve_note_id(store: &NoteStore, needle: &str) -> Result<NoteId> {
    let needle = needle.trim().to_ascii_lowercase();
    if needle.is_empty() {
        bail!("note id cannot be empty");
    }

    let matches: Vec<NoteId> = store
        .notes()
        .iter()
        .filter(|note| note.id.to_string().starts_with(&needle))
        .map(|note| note.id)
        .collect();

    match matches.as_slice() {
        [] => bail!("no note matches id `{needle}`"),
        [only] => Ok(*only),
        found => bail!("id `{needle}` is ambiguous ({} matches)", found.len()),
    }
}

/// Reads `--content`, resolving `-` to stdin.
fn read_content_arg(content: Option<String>) -> Result<Option<String>> {
    match content.as_deref() {
        Some("-") => {
            let mut buffer = String::new();
            std::io::Read::read_to_string(&mut std::io::stdin(), &mut buffer)
                .context("cannot read content from stdin")?;
            Ok(Some(buffer))
        }
        _ => Ok(content),
    }
}

fn short_id(id: NoteId) -> String {
    id.to_string().chars().take(8).collect()
}

fn format_timestamp(ms: i64) -> String {
    use chrono::{Local, TimeZone};
    Local
        .timestamp_millis_opt(ms)
        .single()
        .map(|stamp| stamp.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ms.to_string())
}
