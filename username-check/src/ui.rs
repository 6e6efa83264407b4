//! Display logic for the interactive shell.
//!
//! Status lines are built from the `Availability` enum as plain text first and
//! colored afterwards, so the wording can be tested without a terminal.

use console::{style, Term};
use std::path::Path;
use username_check_lib::{
    Availability, BatchSummary, CheckResult, NotifyOutcome, RunSummary, Settings,
};

const BANNER: &str = r"
  _   _                                            ____ _               _
 | | | |___  ___ _ __ _ __   __ _ _ __ ___   ___  / ___| |__   ___  ___| | __
 | | | / __|/ _ \ '__| '_ \ / _` | '_ ` _ \ / _ \| |   | '_ \ / _ \/ __| |/ /
 | |_| \__ \  __/ |  | | | | (_| | | | | | |  __/| |___| | | |  __/ (__|   <
  \___/|___/\___|_|  |_| |_|\__,_|_| |_| |_|\___| \____|_| |_|\___|\___|_|\_\
";

// ── Menu ─────────────────────────────────────────────────────────────────────

/// Clear the screen (no-op when stdout is not a terminal) and draw the menu.
pub fn print_menu(term: &Term, settings: &Settings) {
    let _ = term.clear_screen();
    println!("{}", style(BANNER).white().bold());
    println!(
        "1. Check usernames from file (current: {})",
        settings.input_file.display()
    );
    println!("2. Enter a single username to check");
    println!("3. Exit");
    println!();
}

pub fn print_invalid_option() {
    println!(
        "{}",
        style("Invalid option. Please select a valid option (1-3).").red()
    );
}

pub fn print_goodbye() {
    println!(
        "{}",
        style("Exiting... Thank you for using the Username Checker Tool!").green()
    );
}

// ── Single result line ───────────────────────────────────────────────────────

/// Plain-text status line for a check result.
pub fn status_line(result: &CheckResult) -> String {
    match result.status {
        Availability::Available => format!("The username '{}' is available.", result.username),
        Availability::Unavailable => {
            format!("The username '{}' is already in use.", result.username)
        }
        Availability::Error => format!(
            "Error: Could not check username '{}' after {} attempts.",
            result.username, result.attempts
        ),
    }
}

/// Print a check result, plus the webhook confirmation when one was sent.
pub fn print_result(result: &CheckResult) {
    let line = status_line(result);
    match result.status {
        Availability::Available => println!("{}", style(line).green()),
        Availability::Unavailable | Availability::Error => println!("{}", style(line).red()),
    }

    if let Some(NotifyOutcome::Sent) = &result.notification {
        println!(
            "{}",
            style(format!("Webhook sent for username '{}'.", result.username)).green()
        );
    }
}

// ── Batches ──────────────────────────────────────────────────────────────────

pub fn print_run_header(path: &Path) {
    println!(
        "{}",
        style(format!("Checking usernames from {}...", path.display())).white()
    );
}

pub fn print_batch_summary(summary: &BatchSummary) {
    println!();
    println!(
        "{}",
        style(format!("Batch {} Summary:", summary.batch)).white().bold()
    );
    println!("{}", style(format!("Available: {}", summary.available)).green());
    println!(
        "{}",
        style(format!("Unavailable: {}", summary.unavailable)).red()
    );
    println!("{}", style(format!("Errors: {}", summary.errors)).yellow());
}

/// One-line total after the last batch; skipped for single-batch runs.
pub fn run_totals_line(run: &RunSummary) -> Option<String> {
    if run.batches.len() < 2 {
        return None;
    }
    Some(format!(
        "Total: {} checked, {} available, {} unavailable, {} errors",
        run.total(),
        run.available(),
        run.unavailable(),
        run.errors()
    ))
}

pub fn print_run_totals(run: &RunSummary) {
    if let Some(line) = run_totals_line(run) {
        println!();
        println!("{}", style(line).bold());
    }
}

pub fn print_error(message: &str) {
    println!("{}", style(message).red());
}

// ── Tests ────────────────────────────────────────────────────────────────────
