// ===============================
// src/main.rs
// ===============================
/*
 # contoh pemakaian (testnet)
 futures_bot --symbol BTCUSDT --side BUY --type MARKET --quantity 0.002 --yes
 futures_bot --symbol BTCUSDT --side SELL --type LIMIT --quantity 0.01 --price 100.37 --dry-run
 futures_bot                       # mode interaktif

 tail -f logs/trading.log          # audit request/response
 cat logs/trades.csv               # riwayat order
*/
/*
=============================================================================
Project : futures_bot_rust — Binance Futures testnet order client in Rust
Module  : main.rs
Version : 0.1.0
Author  : Kukuh Tripamungkas Wicaksono (Kukuh TW)
License : MIT (see LICENSE)

Summary : Signs REST requests, reads symbol filters and ticker prices,
          normalizes quantity/price onto the exchange grid, places MARKET
          or LIMIT orders, writes an audit log and a CSV trade history.
=============================================================================
*/
use std::process::ExitCode;

use clap::Parser;
use console::style;
use tracing::{error, info, warn};

use futures_bot_rust::cli::{self, Cli};
use futures_bot_rust::recorder::TradeHistory;
use futures_bot_rust::{config, logging, workflow, AppConfig, ExchangeClient, Outcome, Result};

// Satu proses = satu order, sekuensial
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Cli::parse();

    // ---- Config ----
    let app = match config::load() {
        Ok(app) => app,
        Err(e) => {
            cli::print_error(&e);
            return ExitCode::FAILURE;
        }
    };

    // ---- Logging (console + logs/trading.log) ----
    let _log_guard = match logging::init(&app.log_dir, &args.log_level) {
        Ok(g) => g,
        Err(e) => {
            cli::print_error(&e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        rest = %app.client.base_url,
        timeout = ?app.client.timeout,
        recv_window = app.client.recv_window_ms,
        log_dir = %app.log_dir.display(),
        dry_run = args.dry_run,
        "startup config"
    );

    match run(&args, &app).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "order placement failed");
            cli::print_error(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Cli, app: &AppConfig) -> Result<()> {
    let client = ExchangeClient::new(app.client.clone())?;

    // Flag lengkap -> langsung; selain itu prompt interaktif.
    // Validasi request terjadi sebelum request jaringan apa pun (mode flag).
    let (request, rules_shown) = match args.to_request() {
        Some(req) => (req?, false),
        None => {
            let symbol = cli::prompt_symbol()?;
            let filters = client.fetch_symbol_filters(&symbol).await?;
            cli::print_rules(&filters);
            (cli::prompt_request(&symbol)?, true)
        }
    };

    let outcome = workflow::execute(&client, &request, |prepared| {
        if !rules_shown {
            cli::print_rules(&prepared.filters);
        }
        args.decide(prepared)
    })
    .await?;

    match outcome {
        Outcome::Placed { result, .. } => {
            cli::print_result(&result);
            // Order sudah diterima exchange; gagal tulis CSV hanya warning
            let history = TradeHistory::new(&app.trade_history);
            if let Err(e) = history.append(&result).await {
                warn!(error = %e, "failed to write trade CSV");
                eprintln!("{} {}", style("Warning:").yellow().bold(), e);
            }
        }
        Outcome::DryRun(_) | Outcome::Aborted(_) => {}
    }
    Ok(())
}
