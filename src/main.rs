#![windows_subsystem = "windows"]
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use recipe_core::config::Config;
use recipe_core::protocol;
use recipe_core::services::cache::{FileStorage, KeyValueCache};
use recipe_core::services::source::SpoonacularClient;
use recipe_core::session::{Session, SessionOptions};
use recipe_core::view::RecordingView;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    // stdout carries the protocol; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    init_logging();

    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    cfg.log_summary();

    let source = match SpoonacularClient::new(&cfg.api_base, &cfg.api_key, cfg.http_timeout) {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "failed to build http client");
            return ExitCode::FAILURE;
        }
    };

    let mut session = Session::new(
        KeyValueCache::new(FileStorage::new(&cfg.data_dir)),
        source,
        RecordingView::new(),
        SessionOptions {
            seed_demo: cfg.seed_demo,
            random_fetch: cfg.random_fetch,
        },
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => continue,
        };

        if line.trim().is_empty() {
            continue;
        }

        let response = protocol::handle_guarded(&mut session, &line);

        if writeln!(stdout, "{response}").is_err() {
            break;
        }

        let _ = stdout.flush();
    }

    ExitCode::SUCCESS
}
