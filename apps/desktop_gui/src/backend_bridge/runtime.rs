//! Runtime bridge between the UI command queue and the directory worker.
//!
//! The worker owns all network I/O: one thread, one tokio runtime, commands
//! processed strictly in order off the queue.

use std::thread;

use crossbeam_channel::{Receiver, Sender};
use directory_client::DirectoryClient;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::ui::app::{decode_avatar_image, StartupConfig};

pub fn launch(config: StartupConfig, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Directory worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::WorkerStartup,
                    format!("directory worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build directory worker runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let client = match DirectoryClient::new(&config.endpoint, config.result_count) {
                Ok(client) => client,
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_fetch(
                        UiErrorContext::WorkerStartup,
                        &err,
                    )));
                    tracing::error!("failed to build directory client: {err}");
                    return;
                }
            };
            let _ = ui_tx.try_send(UiEvent::Info("Directory worker ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::FetchUsers => match client.fetch_users().await {
                        Ok(records) => {
                            let _ = ui_tx.try_send(UiEvent::UsersLoaded { records });
                        }
                        Err(err) => {
                            tracing::error!("user directory fetch failed: {err}");
                            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_fetch(
                                UiErrorContext::DirectoryFetch,
                                &err,
                            )));
                        }
                    },
                    BackendCommand::FetchAvatar { email, url } => {
                        let outcome = match client.fetch_thumbnail(&url).await {
                            Ok(bytes) => decode_avatar_image(&bytes),
                            Err(err) => Err(err.to_string()),
                        };
                        match outcome {
                            Ok(image) => {
                                let _ = ui_tx.try_send(UiEvent::AvatarLoaded { email, image });
                            }
                            Err(reason) => {
                                tracing::debug!(email, url, "avatar fetch failed: {reason}");
                                let _ = ui_tx.try_send(UiEvent::AvatarFailed { email, reason });
                            }
                        }
                    }
                }
            }
        });
    });
}
