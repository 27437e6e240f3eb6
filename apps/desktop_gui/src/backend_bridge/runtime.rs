//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{ProfileSource, SessionManager};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{ServiceFailure, UiError, UiErrorContext, UiEvent};
use crate::media::decode_preview_image;

/// Executes queued commands against the injected collaborators.
#[derive(Clone)]
pub struct BackendWorker {
    session: Arc<dyn SessionManager>,
    profiles: Arc<dyn ProfileSource>,
}

impl BackendWorker {
    pub fn new(session: Arc<dyn SessionManager>, profiles: Arc<dyn ProfileSource>) -> Self {
        Self { session, profiles }
    }

    pub async fn execute(&self, cmd: BackendCommand) -> UiEvent {
        match cmd {
            BackendCommand::Login(credentials) => {
                let result = self.session.login(&credentials).await;
                if let Err(err) = &result {
                    tracing::warn!("login failed: {err}");
                }
                UiEvent::LoginFinished(result.map_err(|err| ServiceFailure::from(&err)))
            }
            BackendCommand::Register(data) => {
                let result = self.session.register(&data).await;
                if let Err(err) = &result {
                    tracing::warn!("registration failed: {err}");
                }
                UiEvent::RegisterFinished {
                    email: data.email,
                    result: result.map_err(|err| ServiceFailure::from(&err)),
                }
            }
            BackendCommand::Logout => {
                let result = self.session.logout().await;
                self.profiles.clear();
                UiEvent::LogoutFinished(result.map_err(|err| ServiceFailure::from(&err)))
            }
            BackendCommand::LoadProfile => {
                let result = self.profiles.refresh().await;
                if let Err(err) = &result {
                    tracing::warn!("profile load failed: {err}");
                }
                UiEvent::ProfileFinished(result.map_err(|err| ServiceFailure::from(&err)))
            }
            BackendCommand::FetchAvatar { url } => {
                let decoded = match self.profiles.fetch_image(&url).await {
                    Ok(bytes) => decode_preview_image(&bytes),
                    Err(err) => Err(err.to_string()),
                };
                match decoded {
                    Ok(image) => UiEvent::AvatarLoaded { url, image },
                    Err(reason) => UiEvent::AvatarFailed { url, reason },
                }
            }
        }
    }
}

/// Starts the backend worker thread. Each command runs as its own task so a
/// slow request never holds up the queue.
pub fn launch(worker: BackendWorker, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

        while let Ok(cmd) = cmd_rx.recv() {
            tracing::debug!(command = cmd.name(), "backend received command");
            let worker = worker.clone();
            let ui_tx = ui_tx.clone();
            runtime.spawn(async move {
                let event = worker.execute(cmd).await;
                // Blocks while the ui queue is full so no result is lost.
                if ui_tx.send(event).is_err() {
                    tracing::debug!("ui event receiver dropped; discarding backend result");
                }
            });
        }
        tracing::info!("ui command queue closed; backend worker stopping");
    });
}
