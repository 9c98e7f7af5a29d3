mod backend_bridge;
mod controller;
mod ui;

use std::time::Duration;

use clap::Parser;
use client_core::{config::normalize_server_url, load_settings, AnswerFallback, ClientSettings};
use crossbeam_channel::bounded;
use eframe::egui;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;
use ui::CloneAiApp;

#[derive(Parser, Debug)]
struct Args {
    /// Backend base url; overrides clone_ai.toml and the environment.
    #[arg(long)]
    server_url: Option<String>,
    /// Per-request timeout in seconds (0 disables it).
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Text shown when the backend has no answer: no-data or no-response.
    #[arg(long)]
    fallback: Option<AnswerFallback>,
}

fn apply_args(args: Args, settings: &mut ClientSettings) -> anyhow::Result<()> {
    if let Some(server_url) = args.server_url {
        settings.server_url = normalize_server_url(&server_url)?;
    }
    if let Some(secs) = args.timeout_secs {
        settings.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
    }
    if let Some(fallback) = args.fallback {
        settings.answer_fallback = fallback;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let mut settings = load_settings();
    apply_args(args, &mut settings)?;
    tracing::info!(server_url = %settings.server_url, "starting desktop gui");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    let server_url = settings.server_url.clone();
    let fallback = settings.answer_fallback;
    backend_bridge::runtime::launch(settings, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Clone.AI")
            .with_inner_size([520.0, 640.0])
            .with_min_inner_size([380.0, 420.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Clone.AI",
        options,
        Box::new(move |_cc| Ok(Box::new(CloneAiApp::new(server_url, fallback, cmd_tx, ui_rx)))),
    )
    .map_err(|err| anyhow::anyhow!("desktop gui exited with error: {err}"))
}
