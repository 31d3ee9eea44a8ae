use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use config::{OutputFormat, Settings};

#[derive(Parser, Debug)]
#[command(name = "goalnote", version, about = "Compile goal templates and merge them into category notes")]
struct Cli {
    /// Settings file (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Print results as JSON regardless of the configured output.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validates a JSON array of drafts and prints the compiled directives.
    Compile { drafts: PathBuf },
    /// Prints the line index of every directive in a note.
    Locate { note: PathBuf },
    /// Loads editable drafts from `{ note, entries }`.
    Drafts { request: PathBuf },
    /// Applies drafts to a note using already-rendered directive text.
    Apply { request: PathBuf },
    /// Runs the note reconciler on explicit replacements.
    Merge { request: PathBuf },
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: &Commands) -> Result<commands::Outcome> {
    match command {
        Commands::Compile { drafts } => commands::compile_drafts(&commands::read_input(drafts)?),
        Commands::Locate { note } => commands::locate_directives(&commands::read_input(note)?),
        Commands::Drafts { request } => commands::load_drafts(&commands::read_input(request)?),
        Commands::Apply { request } => commands::apply_drafts(&commands::read_input(request)?),
        Commands::Merge { request } => commands::merge_note(&commands::read_input(request)?),
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref())?;
    if cli.json {
        settings.output = OutputFormat::Json;
    }
    init_tracing(&settings);

    tracing::debug!(?cli.command, "Running command");
    let outcome = run(&cli.command)?;

    match settings.output {
        OutputFormat::Text if outcome.ok => println!("{}", outcome.text),
        OutputFormat::Text => eprintln!("{}", outcome.text),
        OutputFormat::Json => {
            let body = json!({ "ok": outcome.ok, "result": outcome.value });
            println!(
                "{}",
                serde_json::to_string_pretty(&body).context("Failed to encode output")?
            );
        }
    }

    Ok(if outcome.ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
