mod cli;

use hlsclip::{config, server, service::ClipService};
use hlsclip_common::TimeRange;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "hlsclip=trace,hlsclip_media=trace,hlsclip_common=debug,tower_http=debug".to_string()
        } else {
            "hlsclip=info,hlsclip_media=info,tower_http=info".to_string()
        }
    });

    // Playlists and JSON go to stdout, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Serve { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Media { ranges } => {
            let service = load_service(cli.config.as_deref())?;
            let ranges = parse_ranges(&ranges)?;
            let rt = tokio::runtime::Runtime::new()?;
            let playlist = rt.block_on(service.media_playlist(&ranges))?;
            print!("{}", playlist.render());
            Ok(())
        }
        Commands::Master { ranges } => {
            let service = load_service(cli.config.as_deref())?;
            let ranges = parse_ranges(&ranges)?;
            let rt = tokio::runtime::Runtime::new()?;
            let playlist = rt.block_on(service.master_playlist(&ranges))?;
            print!("{}", playlist.render());
            Ok(())
        }
        Commands::Jobs { ranges, dispatch } => {
            let service = load_service(cli.config.as_deref())?;
            let ranges = parse_ranges(&ranges)?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(run_jobs(&service, &ranges, dispatch))
        }
        Commands::Thumbs { ranges, jobs } => {
            let service = load_service(cli.config.as_deref())?;
            let ranges = parse_ranges(&ranges)?;
            let output = if jobs {
                serde_json::to_string_pretty(&service.thumbnail_jobs(&ranges))?
            } else {
                serde_json::to_string_pretty(&service.thumbnail_uris(&ranges))?
            };
            println!("{}", output);
            Ok(())
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("hlsclip {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn start_server(host: Option<String>, port: Option<u16>, config_path: Option<&Path>) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;

    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting hlsclip server");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    server::start_server(config).await
}

fn load_service(config_path: Option<&Path>) -> Result<ClipService> {
    let config = config::load_config_or_default(config_path)?;
    Ok(ClipService::from_config(config))
}

fn parse_ranges(raw: &[String]) -> Result<Vec<TimeRange>> {
    raw.iter()
        .map(|value| {
            TimeRange::parse_fragment(value).with_context(|| format!("Invalid range: {}", value))
        })
        .collect()
}

async fn run_jobs(service: &ClipService, ranges: &[TimeRange], dispatch: bool) -> Result<()> {
    let jobs = service.jobs(ranges).await?;

    if !dispatch {
        println!("{}", serde_json::to_string_pretty(&jobs)?);
        return Ok(());
    }

    tracing::info!("Dispatching {} jobs", jobs.len());
    let report = service.dispatch(&jobs).await?;
    println!(
        "Dispatched {} jobs: {} invoked, {} skipped ({} unverified)",
        jobs.len(),
        report.invoked,
        report.skipped,
        report.unverified
    );
    Ok(())
}

fn validate_config(config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    println!("Configuration is valid.");
    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  Public prefix: {}", display_or_unset(&config.storage.public_prefix));
    println!("  Storage prefix: {}", display_or_unset(&config.storage.storage_prefix));
    println!(
        "  Master template: {}",
        if config.templates.master.is_some() { "configured" } else { "missing" }
    );
    println!(
        "  Media template: {} ({} override(s))",
        if config.templates.media.is_some() { "configured" } else { "missing" },
        config.templates.media_overrides.len()
    );
    println!("  Variants with encoder options: {}", config.variants.len());
    println!(
        "  Worker: {} (function {})",
        config.worker.endpoint, config.worker.function
    );
    println!("  Dispatch concurrency: {}", config.dispatch.concurrency);

    Ok(())
}

fn display_or_unset(value: &str) -> &str {
    if value.is_empty() {
        "(unset)"
    } else {
        value
    }
}
