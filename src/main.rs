//! Blurhash CLI - encode images and render placeholders from the terminal.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blurhash::{
    codec,
    config::{Cli, Command, DecodeConfig, EncodeConfig, EncodeOutputFormat, StyleConfig},
    ComponentCounts, Ingestor, MemoryCacheStore, MemoryPlaceholderStore, PlaceholderService,
    PngRenderer,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Encode(config) => run_encode(config).await,
        Command::Decode(config) => run_decode(config).await,
        Command::Style(config) => run_style(config).await,
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "blurhash=debug"
    } else {
        "blurhash=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// =============================================================================
// Encode Command
// =============================================================================

/// JSON shape printed by `encode --format json`.
#[derive(Debug, Serialize)]
struct EncodeOutput {
    hash: String,
    width: u32,
    height: u32,
    components: ComponentCounts,
    average_color: String,
}

async fn run_encode(config: EncodeConfig) -> ExitCode {
    init_logging(config.codec.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let bytes = match tokio::fs::read(&config.input).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Failed to read {}: {}", config.input.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let image_id = config.input.display().to_string();
    let ingestor = Ingestor::with_settings(
        MemoryPlaceholderStore::new(),
        config.codec.encoder_settings(),
    );

    let hash = match ingestor.ingest(&image_id, &bytes).await {
        Ok(hash) => hash,
        Err(e) => {
            error!("Failed to encode {}: {}", image_id, e);
            return ExitCode::FAILURE;
        }
    };

    match config.format {
        EncodeOutputFormat::Hash => {
            println!("{}", hash);
        }
        EncodeOutputFormat::Json => {
            let output = match describe(&config.input, hash) {
                Ok(output) => output,
                Err(e) => {
                    error!("{}", e);
                    return ExitCode::FAILURE;
                }
            };
            match serde_json::to_string_pretty(&output) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    error!("Failed to serialize output: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    ExitCode::SUCCESS
}

fn describe(input: &Path, hash: String) -> Result<EncodeOutput, String> {
    let (width, height) = image::image_dimensions(input).map_err(|e| e.to_string())?;
    let components = codec::components(&hash).map_err(|e| e.to_string())?;
    let [r, g, b] = codec::average_color(&hash).map_err(|e| e.to_string())?;

    Ok(EncodeOutput {
        hash,
        width,
        height,
        components,
        average_color: format!("#{:02x}{:02x}{:02x}", r, g, b),
    })
}

// =============================================================================
// Decode Command
// =============================================================================

async fn run_decode(config: DecodeConfig) -> ExitCode {
    init_logging(config.codec.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let (width, height) = if config.full_size {
        (config.width, config.height)
    } else {
        config
            .codec
            .encoder_settings()
            .bounded(config.width, config.height)
    };

    let grid = match codec::decode(&config.hash, width, height) {
        Ok(grid) => grid,
        Err(e) => {
            error!("Invalid hash: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let png = match PngRenderer::new().render(&grid) {
        Ok(png) => png,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = tokio::fs::write(&config.output, &png).await {
        error!("Failed to write {}: {}", config.output.display(), e);
        return ExitCode::FAILURE;
    }

    info!(
        "Wrote {}x{} placeholder to {} ({} bytes)",
        width,
        height,
        config.output.display(),
        png.len()
    );

    ExitCode::SUCCESS
}

// =============================================================================
// Style Command
// =============================================================================

async fn run_style(config: StyleConfig) -> ExitCode {
    init_logging(config.codec.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let service = PlaceholderService::with_settings(
        MemoryCacheStore::with_capacity(config.cache_bytes),
        config.codec.encoder_settings(),
    );

    debug!(
        cache_capacity = service.store().capacity(),
        max_resize_bound = service.settings().max_resize_bound,
        "Placeholder service ready"
    );

    match service.style(&config.hash, config.width, config.height).await {
        Ok(style) => {
            debug!(cache_hit = style.cache_hit, "Rendered style");
            println!("{}", style.css());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to render placeholder: {}", e);
            ExitCode::FAILURE
        }
    }
}
