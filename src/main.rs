use anyhow::Context;
use clap::Parser;
use grpc_example_client::utils::{logger, validation::Validate};
use grpc_example_client::{app, AppConfig, AppState, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logger::init_logger(cli.verbose, cli.json_logs);

    tracing::info!("Starting grpc-example-client");
    if cli.verbose {
        tracing::debug!("CLI args: {:?}", cli);
    }

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    if let Some(listen) = cli.listen {
        config.server.listen = listen;
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let listen_addr = config.listen_addr()?;
    let state = AppState::from_config(&config)?;

    tracing::info!(
        "gRPC target {} | REST target {}",
        state.greeter.uri(),
        state.rest.url()
    );

    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("failed to bind HTTP listener on {}", listen_addr))?;
    tracing::info!("🚀 HTTP server listening on {}", listen_addr);

    app::serve(listener, state).await?;

    tracing::info!("✅ Server stopped");
    Ok(())
}
