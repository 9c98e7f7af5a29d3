use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{load_settings, AnswerFallback, AssistantClient, FormController};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Terminal client for the Clone.AI personal assistant backend")]
struct Cli {
    /// Backend base url; overrides clone_ai.toml and the environment.
    #[arg(long, global = true)]
    server_url: Option<String>,
    /// Per-request timeout in seconds (0 disables it).
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    /// Text shown when the backend has no answer: no-data or no-response.
    #[arg(long, global = true)]
    fallback: Option<AnswerFallback>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Store a titled piece of personal text.
    Add {
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        content: String,
    },
    /// Ask the assistant a question.
    Ask { query: Vec<String> },
    /// Check that the backend is reachable.
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(server_url) = cli.server_url {
        settings.server_url = client_core::config::normalize_server_url(&server_url)?;
    }
    if let Some(secs) = cli.timeout_secs {
        settings.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
    }
    if let Some(fallback) = cli.fallback {
        settings.answer_fallback = fallback;
    }
    tracing::debug!(server_url = %settings.server_url, "using backend");

    let client = AssistantClient::from_settings(&settings)?;
    let mut controller = FormController::new(settings.answer_fallback);

    match cli.command {
        Command::Add { title, content } => {
            controller.set_title(title);
            controller.set_content(content);
            let status = controller.submit_add_text(&client).await;
            println!("{status}");
        }
        Command::Ask { query } => {
            controller.set_query(query.join(" "));
            let answer = controller.submit_query(&client).await;
            println!("{answer}");
        }
        Command::Status => match client.welcome().await {
            Ok(welcome) => println!(
                "{} is up: {}",
                client.server_url(),
                welcome.message.as_deref().unwrap_or("(no message)")
            ),
            Err(err) => {
                tracing::warn!(error = %err, "backend check failed");
                println!("{} is unreachable: {err}", client.server_url());
            }
        },
    }

    Ok(())
}
