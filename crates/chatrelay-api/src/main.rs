//! chatrelay CLI and HTTP relay entry point.
//!
//! Binary name: `chatrelay`
//!
//! Parses CLI arguments, loads configuration, initializes the store and hub
//! publisher, then dispatches to the command handler or starts the server.

mod cli;

use clap::Parser;
use clap_complete::generate;

use chatrelay_api::http;
use chatrelay_api::state::AppState;
use chatrelay_infra::config::{load_config, load_dotenv};
use chatrelay_observe::tracing_setup::{
    filter_for_verbosity, init_tracing, shutdown_tracing, LogFormat, TracingOptions,
};
use chatrelay_types::config::RelayConfig;
use chatrelay_types::message::SubmitMessageRequest;

use cli::{Cli, Commands, LogFormatArg};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions need neither logging nor config.
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "chatrelay", &mut std::io::stdout());
        return Ok(());
    }

    load_dotenv();

    init_tracing(&TracingOptions {
        default_filter: filter_for_verbosity(cli.verbose, cli.quiet).to_string(),
        format: match cli.log_format {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        },
        enable_otel: cli.otel,
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Minting a token needs no store or hub connection.
    if let Commands::Token {
        topics,
        secret,
        ttl_secs,
    } = &cli.command
    {
        return cli::token::print_token(secret.clone(), topics, *ttl_secs, cli.json);
    }

    let config = resolve_config(&cli).await?;
    let state = AppState::init(config).await?;

    match cli.command {
        Commands::Serve { .. } => {
            serve(state.clone()).await?;
        }

        Commands::Send {
            channel,
            user_id,
            message,
            read,
        } => {
            let request = SubmitMessageRequest {
                channel,
                user_id,
                body: message,
                is_read: read,
            };
            cli::send::send_message(&state, request, cli.json).await?;
        }

        Commands::History { channel, before } => {
            cli::history::show_history(&state, &channel, before, cli.json).await?;
        }

        // Both return before the store is opened.
        Commands::Token { .. } | Commands::Completions { .. } => {}
    }

    state.db_pool.close().await;
    Ok(())
}

/// File and environment first, then command-line overrides.
async fn resolve_config(cli: &Cli) -> anyhow::Result<RelayConfig> {
    let mut config = load_config(cli.config.as_deref()).await?;
    if let Some(url) = &cli.database_url {
        config.database_url = url.clone();
    }
    if let Some(url) = &cli.hub_url {
        config.hub.url = url.clone();
    }
    if let Commands::Serve { port, host } = &cli.command {
        if let Some(port) = port {
            config.server.port = *port;
        }
        if let Some(host) = host {
            config.server.host = host.clone();
        }
    }
    Ok(config)
}

async fn serve(state: AppState) -> anyhow::Result<()> {
    let addr = state.config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!(
        "  {} chatrelay listening on {}",
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

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
