use anyhow::Context;
use clap::{Parser, Subcommand};
use recall_core::host::DeckId;
use recall_core::{MENU_LABEL, PLACEHOLDER_TEMPLATE};
use recall_cli::commands;
use recall_cli::{AppState, Config, ConfigArgs};
use std::path::PathBuf;
use std::process::ExitCode;

/// Author multiple-choice recall questions from structured text.
#[derive(Parser, Debug)]
#[command(name = "recall", author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(about = MENU_LABEL, long_about = "Reads the question from FILE, or stdin when omitted")]
    Create {
        /// Deck to add the note to; defaults to the last deck used
        #[arg(long)]
        deck: Option<i64>,
        file: Option<PathBuf>,
    },
    /// Print the formatted fields as JSON without storing anything
    Render { file: Option<PathBuf> },
    /// List decks
    Decks,
    /// Create a deck; use `::` for nesting
    DeckAdd { name: String },
    /// Print a question template to start from
    Template,
    /// List note types with their fields
    NoteTypes,
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_args(cli.config);

    match cli.command {
        Command::Template => {
            print!("{PLACEHOLDER_TEMPLATE}");
        }
        Command::Render { file } => {
            let input = commands::read_input(file.as_deref()).context("failed to read question")?;
            let rendered = commands::render_question(&input)?;
            println!("{}", serde_json::to_string_pretty(&rendered)?);
        }
        Command::Create { deck, file } => {
            let input = commands::read_input(file.as_deref()).context("failed to read question")?;
            let mut state = AppState::open(config)?;
            let outcome = commands::create_question(&mut state, &input, deck.map(DeckId))
                .context("failed to create recall question")?;
            println!("{}", commands::summary(&outcome));
        }
        Command::Decks => {
            let state = AppState::open(config)?;
            for entry in commands::list_decks(&state)? {
                let marker = if entry.selected { '*' } else { ' ' };
                println!("{marker} {:>4}  {}", entry.id, entry.label);
            }
        }
        Command::DeckAdd { name } => {
            let state = AppState::open(config)?;
            let deck = commands::add_deck(&state, &name)?;
            println!("Created deck {} ({})", deck.name, deck.id);
        }
        Command::NoteTypes => {
            let state = AppState::open(config)?;
            for info in commands::list_note_types(&state)? {
                println!("{}", commands::describe(&info));
            }
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    // Errors are reported with a backtrace unless the user opted out.
    if std::env::var_os("RUST_LIB_BACKTRACE").is_none() {
        std::env::set_var("RUST_LIB_BACKTRACE", "1");
    }
    recall_cli::init_tracing();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}
