mod cli;

use subscout::{
    config::{self, Config, SubtitleDestination},
    downloader::SubtitleDownloader,
    plex::PlexClient,
    processor::{self, EventProcessor},
    providers,
    server::{self, AppContext},
    startup,
};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::sync::Arc;

async fn start_server(mut config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    // Override host/port from CLI if specified
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config::validate_config(&config)?;

    tracing::info!("Starting subscout");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    let config = Arc::new(config);
    let plex = Arc::new(PlexClient::new(&config.plex));

    if config.subtitle_destination == SubtitleDestination::WithMedia
        && !startup::check_library_permissions(plex.as_ref())
            .await
            .context("Failed to list Plex library locations")?
    {
        anyhow::bail!("One or more Plex libraries are not readable/writable by the current user");
    }

    if config.server.register_webhook {
        let url = server::webhook_url(&config.server);
        if let Err(e) = startup::ensure_webhook_registered(plex.as_ref(), &url).await {
            tracing::warn!("Could not check webhook registration: {}", e);
        }
    }

    let registry = Arc::new(providers::build_registry(&config));
    let downloader = Arc::new(SubtitleDownloader::new(&config, plex, registry));

    // Event queue between the webhook route and the processor
    let (events_tx, events_rx) = processor::event_queue(config.server.queue_capacity);
    let (shutdown_tx, shutdown_rx) = tokio::sync::mpsc::channel::<()>(1);

    let processor = EventProcessor::new(downloader, events_rx, shutdown_rx);
    let processor_handle = tokio::spawn(processor.run());

    let server_result = server::start_server(AppContext {
        config,
        events: events_tx,
    })
    .await;

    // Cleanup
    tracing::info!("Shutting down...");
    let _ = shutdown_tx.send(()).await;
    let _ = processor_handle.await;

    server_result
}

async fn check_video(config: Config, key: &str) -> Result<()> {
    config::validate_config(&config)?;

    let plex = Arc::new(PlexClient::new(&config.plex));
    let registry = Arc::new(providers::build_registry(&config));
    let downloader = SubtitleDownloader::new(&config, plex, registry);

    let summary = downloader
        .check_video(key)
        .await
        .with_context(|| format!("Failed to check {}", key))?;

    println!("Checked: {}", summary.checked);
    println!("Missing subtitles: {}", summary.missing);
    println!("Saved: {}", summary.saved);
    if summary.failed > 0 {
        println!("Failed: {}", summary.failed);
    }
    Ok(())
}

fn init_logging(verbose: bool, config_level: Option<&str>) {
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if verbose {
            "subscout=trace,subscout_common=debug,tower_http=debug".to_string()
        } else if let Some(level) = config_level {
            level.to_string()
        } else {
            "subscout=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Start { host, port } => {
            // Load config before logging so its log level applies
            let config = config::load_config_or_default(cli.config.as_deref())?;
            init_logging(cli.verbose, config.log_level.as_deref());
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(config, host, port))
        }
        Commands::CheckVideo { key } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            init_logging(cli.verbose, config.log_level.as_deref());
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(check_video(config, &key))
        }
        Commands::Validate {
            config: config_path,
        } => {
            init_logging(cli.verbose, None);
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("subscout {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Plex: {}", config.plex.base_url);
            println!(
                "  Languages: {}",
                config
                    .languages
                    .iter()
                    .map(|l| l.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            match &config.format_priority {
                Some(formats) if !formats.is_empty() => {
                    println!("  Format priority: {}", formats.join(" > "))
                }
                _ => println!("  Format priority: any"),
            }
            println!("  Destination: {:?}", config.subtitle_destination);
            println!(
                "  Propagate to next episode: {}",
                config.propagate_to_next_episode
            );
            println!("  Providers: {}", config.providers.enabled.join(", "));
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
        }
    }

    Ok(())
}
