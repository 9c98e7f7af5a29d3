//! Runtime bridge between UI command queue and backend event intake.

use std::thread;

use client_core::{AssistantClient, ClientSettings};
use crossbeam_channel::{Receiver, Sender};
use tokio::task::JoinHandle;

use crate::backend_bridge::commands::{BackendCommand, CommandKind};
use crate::controller::events::{classify_backend_failure, UiEvent};

/// Start the backend worker thread. Each command runs as its own task so the
/// add-text and query flows never wait on each other.
pub fn launch(settings: ClientSettings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                deliver(
                    &ui_tx,
                    UiEvent::BackendUnreachable(format!(
                        "Backend worker startup failure: failed to build runtime: {err}"
                    )),
                );
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        let client = match AssistantClient::from_settings(&settings) {
            Ok(client) => client,
            Err(err) => {
                deliver(
                    &ui_tx,
                    UiEvent::BackendUnreachable(classify_backend_failure(
                        &settings.server_url,
                        &err,
                    )),
                );
                tracing::error!(error = %err, "failed to build http client");
                return;
            }
        };
        deliver(&ui_tx, UiEvent::Info("Backend worker ready".to_string()));

        while let Ok(cmd) = cmd_rx.recv() {
            let kind = cmd.kind();
            let task = runtime.spawn(execute(client.clone(), cmd));
            let ui_tx = ui_tx.clone();
            runtime.spawn(async move {
                let event = settle(kind, task).await;
                deliver(&ui_tx, event);
            });
        }
        tracing::info!("ui command queue closed; backend worker exiting");
    });
}

async fn execute(client: AssistantClient, cmd: BackendCommand) -> UiEvent {
    match cmd {
        BackendCommand::CheckBackend => match client.welcome().await {
            Ok(welcome) => UiEvent::BackendReachable {
                message: welcome.message,
            },
            Err(err) => {
                tracing::warn!(error = %err, "backend reachability check failed");
                UiEvent::BackendUnreachable(classify_backend_failure(client.server_url(), &err))
            }
        },
        BackendCommand::AddText(request) => {
            UiEvent::AddTextSettled(client.add_text(&request).await)
        }
        BackendCommand::QueryAi(request) => {
            UiEvent::QuerySettled(client.query_ai(&request).await)
        }
    }
}

/// Wait for a command task. A task that panicked or was cancelled still
/// settles its flow, so the UI never keeps a form in flight forever.
async fn settle(kind: CommandKind, task: JoinHandle<UiEvent>) -> UiEvent {
    match task.await {
        Ok(event) => event,
        Err(err) => {
            tracing::error!(command = kind.name(), error = %err, "backend task ended early");
            kind.abandoned(format!("{} did not complete: {err}", kind.name()))
        }
    }
}

/// Hand an event to the UI, waiting for room when the queue is full. Only a
/// closed UI loses events.
fn deliver(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    if tokio::task::block_in_place(|| ui_tx.send(event)).is_err() {
        tracing::warn!("ui event queue closed; dropping backend event");
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use client_core::ClientError;
    use crossbeam_channel::bounded;
    use shared::protocol::QueryResponse;

    use super::*;

    fn multi_thread_runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .expect("runtime")
    }

    async fn exploding_command() -> UiEvent {
        panic!("backend task blew up")
    }

    #[test]
    fn deliver_waits_for_room_instead_of_dropping_settlements() {
        let (ui_tx, ui_rx) = bounded::<UiEvent>(1);
        ui_tx
            .send(UiEvent::Info("backlog".to_string()))
            .expect("fill queue");
        let drain = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            ui_rx.iter().collect::<Vec<_>>()
        });

        deliver(
            &ui_tx,
            UiEvent::QuerySettled(Ok(QueryResponse {
                answer: Some("Your name is Sam.".to_string()),
                error: None,
            })),
        );
        drop(ui_tx);

        let events = drain.join().expect("drain thread");
        assert_eq!(events.len(), 2);
        match &events[1] {
            UiEvent::QuerySettled(Ok(response)) => {
                assert_eq!(response.usable_answer(), Some("Your name is Sam."));
            }
            _ => panic!("query settlement was dropped"),
        }
    }

    #[test]
    fn deliver_from_runtime_task_reaches_a_full_queue() {
        let runtime = multi_thread_runtime();
        let (ui_tx, ui_rx) = bounded::<UiEvent>(1);
        ui_tx
            .send(UiEvent::Info("backlog".to_string()))
            .expect("fill queue");

        let sender = runtime.spawn(async move {
            deliver(
                &ui_tx,
                UiEvent::AddTextSettled(Err(ClientError::Unavailable("offline".to_string()))),
            );
        });
        thread::sleep(Duration::from_millis(50));
        assert!(matches!(ui_rx.recv(), Ok(UiEvent::Info(_))));
        assert!(matches!(
            ui_rx.recv_timeout(Duration::from_secs(5)),
            Ok(UiEvent::AddTextSettled(Err(ClientError::Unavailable(_))))
        ));
        runtime.block_on(sender).expect("sender task");
    }

    #[test]
    fn panicking_query_task_still_settles_the_query() {
        let runtime = multi_thread_runtime();

        let event = runtime.block_on(async {
            let task = tokio::spawn(exploding_command());
            settle(CommandKind::QueryAi, task).await
        });

        match event {
            UiEvent::QuerySettled(Err(ClientError::Unavailable(reason))) => {
                assert!(reason.contains("query_ai"), "unexpected reason: {reason}");
            }
            _ => panic!("query flow was not settled"),
        }
    }

    #[test]
    fn cancelled_add_text_task_still_settles_the_add_text() {
        let runtime = multi_thread_runtime();

        let event = runtime.block_on(async {
            let task = tokio::spawn(async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                UiEvent::Info("never".to_string())
            });
            task.abort();
            settle(CommandKind::AddText, task).await
        });

        assert!(matches!(
            event,
            UiEvent::AddTextSettled(Err(ClientError::Unavailable(_)))
        ));
    }

    #[test]
    fn failed_reachability_task_reports_backend_unreachable() {
        let event = CommandKind::CheckBackend.abandoned("gone".to_string());
        assert!(matches!(event, UiEvent::BackendUnreachable(reason) if reason == "gone"));
    }
}
