//! `yup-checkin` -- terminal check-in desk.
//!
//! Reads reservation codes from standard input, one per line, and checks
//! each one in against the YUP server for the configured event.
//! Configuration comes from the environment (see
//! [`CheckInConfig::from_env`]); a `.env` file is honoured.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yup_checkin::api::CheckInApi;
use yup_checkin::config::CheckInConfig;
use yup_checkin::feedback::{AlertBoard, CheckInView};
use yup_checkin::submitter::{CheckInSubmitter, SubmitDecision};
use yup_core::checkin::CheckInCode;

/// Prints confirmations to standard output.
struct TerminalView;

impl CheckInView for TerminalView {
    fn show_confirmation(&self, code: &CheckInCode) {
        println!("\u{2714} {code} checked in");
    }

    fn clear_text_input(&self) {}
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yup_checkin=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = CheckInConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });

    let api = CheckInApi::new(&config).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to build HTTP client");
        std::process::exit(1);
    });

    tracing::info!(
        base_url = %config.base_url,
        event_id = %config.event_id,
        "Starting yup-checkin",
    );

    let alerts = Arc::new(AlertBoard::new());
    let submitter = CheckInSubmitter::new(
        Arc::new(api),
        config.event_id,
        Arc::clone(&alerts),
        Arc::new(TerminalView),
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => line,
        };

        let text = match line {
            Ok(Some(text)) => text,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read standard input");
                std::process::exit(1);
            }
        };

        if text.trim().is_empty() {
            continue;
        }

        alerts.dismiss();
        if submitter.submit(&text).await != SubmitDecision::CheckedIn {
            if let Some(message) = alerts.current() {
                println!("\u{2718} {message}");
            }
        }
    }

    tracing::info!("Shutting down");
}
