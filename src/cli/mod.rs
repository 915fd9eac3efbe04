use anyhow::Context;
use clap::{Parser, Subcommand};
use std::{path::PathBuf, sync::Arc};

use crate::{
    art::{fetcher::ArtFetcher, source::HttpImageSource},
    config::Config,
    http::server::HttpServer,
    mock,
    storage::track_store::TrackStore,
};

#[derive(Parser)]
#[command(name = "nowplaying")]
#[command(version = "0.1")]
#[command(about = "Now playing page fed by a webhook")]
pub struct Cli {
    /// Path to the config TOML file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the http server
    Serve,
    /// Push random tracks to a running server
    Mock,
}

/// Entrypoint for CLI
pub fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)
        .with_context(|| format!("Failed to load config {}", cli.config.display()))?;

    match &cli.command {
        Commands::Serve => {
            let store = Arc::new(TrackStore::new());
            let source = Arc::new(HttpImageSource::new(&cfg.art));
            let fetcher = ArtFetcher::new(Arc::clone(&store), source, &cfg.art);

            let http_server = HttpServer::new(store, fetcher, cfg.http);

            log::info!(
                "HTTP server running at http://{}:{}",
                http_server.config.bind_addr,
                http_server.config.port
            );
            http_server.run();
        }

        Commands::Mock => {
            log::info!("Sending random tracks to {}", cfg.mock.webhook_url);
            mock::run(&cfg.mock);
        }
    }

    Ok(())
}
