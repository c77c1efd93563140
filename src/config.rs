//! Configuration for the `blurhash` command-line tool.
//!
//! Options come from command-line arguments via clap, with environment
//! variable fallbacks and defaults for everything optional.
//!
//! # Environment Variables
//!
//! - `BLURHASH_MAX_RESIZE_BOUND` - Longest grid edge for encode and render (default: 64)
//! - `BLURHASH_BASELINE_COMPONENTS` - Components on the shorter axis (default: 3)
//! - `BLURHASH_BOOSTED_COMPONENTS` - Components on the longer axis (default: 4)
//! - `BLURHASH_CACHE_BYTES` - Render cache capacity in bytes (default: 16MB)

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::codec::{
    EncoderSettings, DEFAULT_BASELINE_COMPONENTS, DEFAULT_BOOSTED_COMPONENTS,
    DEFAULT_MAX_RESIZE_BOUND, MAX_COMPONENTS, MIN_COMPONENTS,
};
use crate::render::DEFAULT_RENDER_CACHE_CAPACITY;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Blur hash placeholders for images.
///
/// Encodes images into short strings and renders those strings back into
/// blurry PNG data URIs for lazy-loading markup.
#[derive(Parser, Debug, Clone)]
#[command(name = "blurhash")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn into_command(self) -> Command {
        self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Compute the hash of an image file.
    Encode(EncodeConfig),

    /// Render a hash into a PNG file.
    Decode(DecodeConfig),

    /// Print the inline CSS placeholder for a hash.
    Style(StyleConfig),
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct CodecArgs {
    /// Longest grid edge used when encoding and rendering.
    #[arg(long, default_value_t = DEFAULT_MAX_RESIZE_BOUND, env = "BLURHASH_MAX_RESIZE_BOUND")]
    pub max_resize_bound: u32,

    /// Component count on the shorter axis.
    #[arg(long, default_value_t = DEFAULT_BASELINE_COMPONENTS, env = "BLURHASH_BASELINE_COMPONENTS")]
    pub baseline_components: u32,

    /// Component count on the longer axis of non-square images.
    #[arg(long, default_value_t = DEFAULT_BOOSTED_COMPONENTS, env = "BLURHASH_BOOSTED_COMPONENTS")]
    pub boosted_components: u32,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl CodecArgs {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_resize_bound == 0 {
            return Err("max_resize_bound must be greater than 0".to_string());
        }

        let range = MIN_COMPONENTS..=MAX_COMPONENTS;
        if !range.contains(&self.baseline_components) {
            return Err(format!(
                "baseline_components must be between {} and {}",
                MIN_COMPONENTS, MAX_COMPONENTS
            ));
        }
        if !range.contains(&self.boosted_components) {
            return Err(format!(
                "boosted_components must be between {} and {}",
                MIN_COMPONENTS, MAX_COMPONENTS
            ));
        }

        Ok(())
    }

    pub fn encoder_settings(&self) -> EncoderSettings {
        EncoderSettings {
            max_resize_bound: self.max_resize_bound,
            baseline_components: self.baseline_components,
            boosted_components: self.boosted_components,
        }
    }
}

// =============================================================================
// Encode
// =============================================================================

/// Output format for the encode command.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncodeOutputFormat {
    /// Just the hash
    #[default]
    Hash,
    /// Hash with dimensions, components and average color
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct EncodeConfig {
    /// Image file to encode (PNG or JPEG).
    pub input: PathBuf,

    #[arg(long, value_enum, default_value_t = EncodeOutputFormat::Hash)]
    pub format: EncodeOutputFormat,

    #[command(flatten)]
    pub codec: CodecArgs,
}

impl EncodeConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.codec.validate()
    }
}

// =============================================================================
// Decode
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct DecodeConfig {
    /// Hash to render.
    pub hash: String,

    /// Target width in pixels.
    #[arg(long)]
    pub width: u32,

    /// Target height in pixels.
    #[arg(long)]
    pub height: u32,

    /// Where to write the PNG.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Write the full target size instead of the bounded grid.
    #[arg(long, default_value_t = false)]
    pub full_size: bool,

    #[command(flatten)]
    pub codec: CodecArgs,
}

impl DecodeConfig {
    pub fn validate(&self) -> Result<(), String> {
        validate_target(self.width, self.height)?;
        self.codec.validate()
    }
}

// =============================================================================
// Style
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct StyleConfig {
    /// Hash to render.
    pub hash: String,

    /// Width of the element the placeholder fills.
    #[arg(long)]
    pub width: u32,

    /// Height of the element the placeholder fills.
    #[arg(long)]
    pub height: u32,

    /// Render cache capacity in bytes.
    #[arg(long, default_value_t = DEFAULT_RENDER_CACHE_CAPACITY, env = "BLURHASH_CACHE_BYTES")]
    pub cache_bytes: usize,

    #[command(flatten)]
    pub codec: CodecArgs,
}

impl StyleConfig {
    pub fn validate(&self) -> Result<(), String> {
        validate_target(self.width, self.height)?;
        if self.cache_bytes == 0 {
            return Err("cache_bytes must be greater than 0".to_string());
        }
        self.codec.validate()
    }
}

fn validate_target(width: u32, height: u32) -> Result<(), String> {
    if width == 0 || height == 0 {
        return Err(format!(
            "target size must be non-zero, got {}x{}",
            width, height
        ));
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
