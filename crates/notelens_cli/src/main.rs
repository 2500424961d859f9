//! Command-line front end for the local note store.
//!
//! # Responsibility
//! - Turn one command into one session event and print the published result.
//! - Render highlight markers and entities for a terminal.

use clap::{Args, Parser, Subcommand};
use log::error;
use notelens_core::db::open_db;
use notelens_core::{
    default_log_level, init_logging, CoreConfig, NoteId, NoteService, QueryOutcome, QuerySession,
    SessionEvent, SortMode, SqliteNoteStore, SystemClock, MARK_CLOSE, MARK_OPEN,
};
use rusqlite::Connection;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

const HIGHLIGHT_START: &str = "\x1b[1;33m";
const HIGHLIGHT_END: &str = "\x1b[0m";

#[derive(Debug, Parser)]
#[command(name = "notelens", version, about = "Search and sort local notes")]
struct Cli {
    /// SQLite database file holding the notes.
    #[arg(long, global = true, default_value = "notelens.db")]
    db: PathBuf,

    /// Optional JSON config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Absolute directory for rolling log files; logging is off when omitted.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a note.
    Add(NoteFields),
    /// Replace title and content of a note.
    Edit {
        id: NoteId,
        #[command(flatten)]
        fields: NoteFields,
    },
    /// Delete a note.
    Delete { id: NoteId },
    /// List notes matching a query.
    List {
        /// Case-insensitive text to find in title or content.
        #[arg(short, long, default_value = "")]
        query: String,

        /// newest-first | oldest-first | title-asc | title-desc
        #[arg(short, long, default_value_t = SortMode::NewestFirst)]
        sort: SortMode,

        /// Print escaped HTML instead of terminal highlighting.
        #[arg(long)]
        html: bool,
    },
}

#[derive(Debug, Args)]
struct NoteFields {
    #[arg(short, long)]
    title: String,
    #[arg(short, long)]
    content: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_exit module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Some(log_dir) = cli.log_dir.as_ref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
    }

    let config = match cli.config.as_ref() {
        Some(path) => CoreConfig::load(path)?,
        None => CoreConfig::default(),
    };

    let conn = open_db(&cli.db)?;
    let mut session = open_session(&conn, &config)?;

    match cli.command {
        Command::Add(fields) => {
            let outcome = session.apply(SessionEvent::CreateNote {
                title: fields.title,
                content: fields.content,
            })?;
            println!("created; {} notes stored", outcome.total);
        }
        Command::Edit { id, fields } => {
            session.apply(SessionEvent::UpdateNote {
                id,
                title: fields.title,
                content: fields.content,
            })?;
            println!("updated {id}");
        }
        Command::Delete { id } => {
            let outcome = session.apply(SessionEvent::DeleteNote(id))?;
            println!("deleted {id}; {} notes remain", outcome.total);
        }
        Command::List { query, sort, html } => {
            session.apply(SessionEvent::SetSortMode(sort))?;
            let outcome = session.apply(SessionEvent::SetQuery(query))?;
            print_outcome(&outcome, html);
        }
    }
    Ok(())
}

fn open_session<'conn>(
    conn: &'conn Connection,
    config: &CoreConfig,
) -> Result<QuerySession<SqliteNoteStore<'conn>, SystemClock>, Box<dyn Error>> {
    let store = SqliteNoteStore::with_quota(conn, config.storage_quota_bytes);
    let service =
        NoteService::open_with_clock(store, SystemClock)?.with_limits(config.note_limits());
    Ok(QuerySession::new(service)
        .with_options(config.query_options())
        .with_debouncer(config.debouncer()))
}

fn print_outcome(outcome: &QueryOutcome, html: bool) {
    let render = |markup: &str| {
        if html {
            markup.to_string()
        } else {
            render_terminal(markup)
        }
    };

    for view in &outcome.items {
        let edited = if view.is_edited { " (edited)" } else { "" };
        println!("{}  {}{}", view.note.id, render(&view.title_html), edited);
        println!("    {}", render(&view.preview_html));
    }

    if outcome.is_empty_search() {
        println!("no notes match the current search");
    } else if outcome.total == 0 {
        println!("no notes yet");
    } else {
        println!(
            "showing {} of {} notes ({})",
            outcome.matched(),
            outcome.total,
            outcome.sort_mode
        );
    }
}

/// Swaps highlight markers for ANSI bold and decodes the escape entities.
fn render_terminal(markup: &str) -> String {
    markup
        .replace(MARK_OPEN, HIGHLIGHT_START)
        .replace(MARK_CLOSE, HIGHLIGHT_END)
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::{open_session, render_terminal, Cli, Command, HIGHLIGHT_END, HIGHLIGHT_START};
    use clap::Parser;
    use notelens_core::db::open_db_in_memory;
    use notelens_core::{highlight, CoreConfig, SessionEvent, SortMode};
    use std::time::{Duration, Instant};

    #[test]
    fn render_terminal_restores_text_around_highlights() {
        let markup = highlight("Tom & <Jerry>", "jerry");
        assert_eq!(
            render_terminal(&markup),
            format!("Tom & <{HIGHLIGHT_START}Jerry{HIGHLIGHT_END}>")
        );
    }

    #[test]
    fn render_terminal_decodes_ampersand_last() {
        assert_eq!(render_terminal(&highlight("&lt;", "")), "&lt;");
    }

    #[test]
    fn list_parses_sort_mode() {
        let cli = Cli::try_parse_from(["notelens", "list", "--sort", "title-asc", "-q", "milk"])
            .unwrap();
        match cli.command {
            Command::List { query, sort, html } => {
                assert_eq!(query, "milk");
                assert_eq!(sort, SortMode::TitleAsc);
                assert!(!html);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unknown_sort_mode_is_rejected() {
        assert!(Cli::try_parse_from(["notelens", "list", "--sort", "random"]).is_err());
    }

    #[test]
    fn session_waits_for_configured_debounce() {
        let conn = open_db_in_memory().unwrap();
        let config = CoreConfig::from_json(r#"{"debounce_ms": 50, "preview_chars": 3}"#).unwrap();
        let mut session = open_session(&conn, &config).unwrap();
        session
            .apply(SessionEvent::CreateNote {
                title: "Milk".to_string(),
                content: "whole milk".to_string(),
            })
            .unwrap();

        let start = Instant::now();
        session.type_query("milk", start);
        assert!(session
            .tick(start + Duration::from_millis(49))
            .unwrap()
            .is_none());

        let outcome = session
            .tick(start + Duration::from_millis(50))
            .unwrap()
            .unwrap();
        assert_eq!(outcome.matched(), 1);
        assert_eq!(outcome.items[0].preview_html, "who...");
    }
}
