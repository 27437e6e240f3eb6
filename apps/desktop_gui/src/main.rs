use std::{path::PathBuf, sync::Arc};

mod backend_bridge;
mod config;
mod controller;
mod media;
#[cfg(test)]
mod testing;
mod ui;

use anyhow::Context;
use clap::Parser;
use client_core::{AccountClient, ProfileSource, SessionManager};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::{
    commands::BackendCommand,
    runtime::{launch, BackendWorker},
};
use crate::config::{load_settings, CliOverrides};
use crate::controller::events::UiEvent;
use crate::ui::AccountApp;

#[derive(Parser, Debug)]
#[command(about = "Desktop client for signing in, registering and viewing your account")]
struct Args {
    /// Base URL of the account API, e.g. https://accounts.example.com/api/
    #[arg(long)]
    api_url: Option<String>,
    /// Settings file; defaults to ./account_gui.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let settings = load_settings(&CliOverrides {
        api_url: args.api_url,
        config_path: args.config,
    })?;
    tracing::info!(api_url = %settings.api_url, "starting account desktop client");

    let client = Arc::new(
        AccountClient::with_timeout(&settings.api_url, settings.request_timeout())
            .context("failed to build account API client")?,
    );
    let session_status = client.status();
    let profile_state = ProfileSource::state(client.as_ref());

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    launch(BackendWorker::new(client.clone(), client), cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Account")
            .with_inner_size([560.0, 720.0])
            .with_min_inner_size([420.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Account",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(AccountApp::new(
                cmd_tx,
                ui_rx,
                session_status,
                profile_state,
            )))
        }),
    )
    .map_err(|err| anyhow::anyhow!("desktop ui exited with error: {err}"))
}
