use std::io::{self, IsTerminal};
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use klondike_rs::cli::{Cli, ColorChoice};
use klondike_rs::game::{Controller, GameSummary};
use klondike_rs::history::{GameRecord, History};
use klondike_rs::klondike::Klondike;
use klondike_rs::model::KlondikeModel;
use klondike_rs::renderer::TextView;

fn main() -> ExitCode {
    // Logs go to stderr so the board on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let variant = cli.variant.variant();
    let (piles, draw) = (cli.variant.piles(), cli.variant.draw());

    println!(
        r#"
┌─────────────────────────────────────────┐
│   Klondike Solitaire (CLI Edition)      │
│   mpp src n dest | md dest | mpf src f  │
│   mdf f | dd | q                        │
└─────────────────────────────────────────┘
"#
    );

    let mut game = match cli.seed {
        Some(seed) => Klondike::with_seed(variant, seed),
        None => Klondike::new(variant),
    };
    let color = match cli.color {
        ColorChoice::Auto => io::stdout().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let view = TextView::new(io::stdout().lock()).with_color(color);
    let mut controller = Controller::new(io::stdin().lock(), view);
    let start_time = unix_now();
    let deck = game.deck();

    match controller.play_game(&mut game, deck, !cli.no_shuffle, piles, draw) {
        Ok(summary) => {
            if !cli.no_history {
                record(&cli, &game, start_time, summary);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn record(cli: &Cli, game: &Klondike, start_time: i64, summary: GameSummary) {
    let mut history = History::load();
    let mut entry = GameRecord::new(
        game.variant(),
        cli.seed,
        cli.variant.piles(),
        cli.variant.draw(),
        start_time,
        unix_now(),
        summary,
    );
    entry.final_board = game.board().cloned();
    history.push(entry);

    if let Err(e) = history.save() {
        warn!(error = %e, "Could not save game history");
        return;
    }

    let totals = history.summary();
    info!(played = totals.played, won = totals.won, "History updated");
    println!(
        "Games played: {}, won: {}, best score: {}",
        totals.played, totals.won, totals.best_score
    );
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
