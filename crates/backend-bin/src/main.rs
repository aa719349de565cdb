use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use backend_lib::{config::Settings, router, AppState};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Session and access-control server for the ballot polling app
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// TOML config file; environment variables prefixed `BALLOT_` override it
    #[arg(short, long, default_value = backend_lib::config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Override the bind address from the config
    #[arg(short, long)]
    bind: Option<SocketAddr>,
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if settings.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Misconfiguration (e.g. a zero hash cost) stops the process here.
    let mut settings = Settings::load_from(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(bind) = cli.bind {
        settings.bind_addr = bind;
    }

    init_tracing(&settings);

    let addr = settings.bind_addr;
    let state = Arc::new(AppState::new(settings)?);
    let app = router::create_router(state);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
