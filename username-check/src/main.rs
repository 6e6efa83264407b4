//! Username Check CLI Application
//!
//! Interactive shell for checking username availability. Settings are read
//! from a TOML file that is created with defaults on first run.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use console::{style, Term};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use username_check_lib::{
    read_usernames, BatchEvent, BatchRunner, ConfigStore, Settings, UsernameCheckError,
    UsernameChecker, DEFAULT_CONFIG_FILE,
};

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for username-check
#[derive(Parser, Debug)]
#[command(name = "username-check")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Check username availability from an interactive menu")]
#[command(
    long_about = "Check username availability from an interactive menu.\n\nResults go to a CSV ledger, failures to an error log, and available usernames can be announced to a webhook."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// Settings file, created with defaults if missing
    #[arg(short = 'c', long = "config", value_name = "PATH", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Show info-level diagnostics on stderr (RUST_LOG overrides)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Main menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    CheckFile,
    CheckSingle,
    Exit,
}

impl MenuChoice {
    fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::CheckFile),
            "2" => Some(Self::CheckSingle),
            "3" => Some(Self::Exit),
            _ => None,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run_shell(args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Install the stderr tracing subscriber.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Menu loop. Returns when the user picks "Exit" or stdin is closed.
async fn run_shell(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let settings = ConfigStore::new(&args.config).load()?;
    let checker = UsernameChecker::new(&settings)?;
    let term = Term::stdout();

    tracing::info!(config = %args.config.display(), "session started");

    loop {
        ui::print_menu(&term, &settings);

        let Some(input) = prompt("Select an option (1-3): ")? else {
            ui::print_goodbye();
            return Ok(());
        };

        match MenuChoice::parse(&input) {
            Some(MenuChoice::CheckFile) => {
                check_from_file(&checker, &settings).await;
                if !pause()? {
                    ui::print_goodbye();
                    return Ok(());
                }
            }
            Some(MenuChoice::CheckSingle) => {
                let Some(username) = prompt("Enter a username to check: ")? else {
                    ui::print_goodbye();
                    return Ok(());
                };
                match checker.check_username(username.trim()).await {
                    Ok(result) => ui::print_result(&result),
                    Err(e) => ui::print_error(&format!("Error: {}", e)),
                }
                if !pause()? {
                    ui::print_goodbye();
                    return Ok(());
                }
            }
            Some(MenuChoice::Exit) => {
                ui::print_goodbye();
                return Ok(());
            }
            None => {
                ui::print_invalid_option();
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        }
    }
}

/// Run the configured username list through the batch driver.
///
/// A missing list is reported and the shell carries on.
async fn check_from_file(checker: &UsernameChecker, settings: &Settings) {
    let path = &settings.input_file;

    let usernames = match read_usernames(path) {
        Ok(usernames) => usernames,
        Err(UsernameCheckError::FileError { .. }) if !path.exists() => {
            ui::print_error(&format!("Error: File '{}' not found.", path.display()));
            return;
        }
        Err(e) => {
            ui::print_error(&format!("Error: {}", e));
            return;
        }
    };

    ui::print_run_header(path);
    let result = BatchRunner::new(checker)
        .run(&usernames, |event| match event {
            BatchEvent::BatchStarted { .. } => {}
            BatchEvent::Checked(result) => ui::print_result(&result),
            BatchEvent::BatchFinished(summary) => ui::print_batch_summary(&summary),
        })
        .await;

    match result {
        Ok(run) => ui::print_run_totals(&run),
        Err(e) => ui::print_error(&format!("Error: {}", e)),
    }
}

/// Print a prompt and read one line. `None` means stdin was closed.
fn prompt(message: &str) -> io::Result<Option<String>> {
    print!("{}", style(message).white());
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        println!();
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Wait for Enter. Returns `false` if stdin was closed.
fn pause() -> io::Result<bool> {
    println!();
    Ok(prompt("Press Enter to return to the main menu...")?.is_some())
}
