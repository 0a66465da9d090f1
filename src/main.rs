//! OKR Board entry point
//!
//! Loads the config (first argument, default `okr-board.json`), signs in the
//! configured user and prints the board.

use std::path::PathBuf;

use okr_board::config::AppConfig;
use okr_board::dashboard::{DDay, Summary};
use okr_board::tree::{visible_rows, RowStatus};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("okr-board.json"));

    let config = match AppConfig::load(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let mut session = match okr_board::bootstrap(&config).await {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Startup failed: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = session.sign_in().await {
        eprintln!("Sign-in failed: {}", e);
        std::process::exit(1);
    }

    let summary = Summary::of(session.store().objectives());
    println!(
        "{} objectives, {}% average, {} completed",
        summary.total_objectives, summary.average_progress, summary.completed_objectives
    );
    for row in visible_rows(session.store().objectives()) {
        let status = match row.status {
            RowStatus::Progress(p) => format!("{:>3}%", p),
            RowStatus::Done(true) => "[x]".to_string(),
            RowStatus::Done(false) => "[ ]".to_string(),
        };
        let due = row
            .due_date
            .map(|d| format!(" ({})", DDay::from_today(d)))
            .unwrap_or_default();
        println!("{}{} {}{}", "  ".repeat(row.depth), status, row.title, due);
    }

    if let Err(e) = session.sign_out().await {
        log::error!("sign-out failed: {}", e);
    }
}
