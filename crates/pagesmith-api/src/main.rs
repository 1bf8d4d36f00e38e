//! Pagesmith entry point.
//!
//! Binary name: `pagesmith`
//!
//! Parses CLI arguments, installs tracing, wires the adapters and then either
//! long-polls the Bot API, serves the webhook, or runs diagnostics.

mod cli;
mod http;
mod poller;
mod state;

use clap::Parser;
use secrecy::ExposeSecret;
use tokio_util::sync::CancellationToken;

use cli::{Cli, Commands};
use pagesmith_observe::{init_tracing, shutdown_tracing, verbosity_filter, TracingOptions};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&TracingOptions {
        default_filter: verbosity_filter(cli.verbose, cli.quiet).to_string(),
        json: cli.json_logs,
        otel: cli.otel,
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Doctor { json } => cli::doctor::doctor(&cli.config, json).await,

        Commands::Run => {
            let state = AppState::init(&cli.config).await?;

            println!(
                "  {} Pagesmith polling for updates",
                console::style("⚡").bold()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let cancel = CancellationToken::new();
            let trigger = cancel.clone();
            tokio::spawn(async move {
                shutdown_signal().await;
                trigger.cancel();
            });

            poller::run(state, cancel).await?;
            println!("\n  Bot stopped.");
            Ok(())
        }

        Commands::Serve {
            host,
            port,
            public_url,
        } => {
            let state = AppState::init(&cli.config).await?;

            if let Some(public_url) = public_url {
                let url = format!(
                    "{}{}",
                    public_url.trim_end_matches('/'),
                    http::router::WEBHOOK_PATH
                );
                let secret = state.webhook_secret.as_ref().map(|s| s.expose_secret());
                state.telegram.set_webhook(&url, secret).await?;
                tracing::info!(%url, "webhook registered");
            }

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} Pagesmith webhook listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            println!("\n  Server stopped.");
            Ok(())
        }
    }
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
