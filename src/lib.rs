//! # Blurhash Placeholders
//!
//! Compact blurry placeholders for images that have not loaded yet.
//!
//! An image is reduced to a handful of DCT coefficients and packed into a
//! short printable string (20 to 30 characters for typical settings). At
//! page-render time that string is expanded back into a tiny PNG, embedded as
//! a data URI, and stretched over the image's box with CSS.
//!
//! ## Features
//!
//! - **Codec**: Deterministic encode and decode of the base-83 hash format
//! - **Rendering**: Bounded-size PNG data URIs and inline CSS backgrounds
//! - **Caching**: Get-or-render over a pluggable [`render::CacheStore`]
//! - **Ingestion**: Hash new images and persist them via [`ingest::PlaceholderStore`]
//!
//! ## Architecture
//!
//! - [`codec`] - Pixel grids, the DCT and the hash format
//! - [`render`] - PNG rendering, data URIs and the render cache
//! - [`ingest`] - Image file decoding and placeholder persistence
//! - [`config`] - CLI and configuration types
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```rust
//! use blurhash::{codec, PixelGrid, PlaceholderService};
//!
//! #[tokio::main]
//! async fn main() {
//!     let grid = PixelGrid::from_fn(48, 32, |x, y| [(x * 5) as u8, (y * 7) as u8, 128]).unwrap();
//!     let hash = codec::encode(&grid);
//!
//!     let service = PlaceholderService::in_memory();
//!     let style = service.style(&hash, 640, 427).await.unwrap();
//!     println!("<div style=\"{}\"></div>", style.css());
//! }
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod ingest;
pub mod render;

// Re-export commonly used types
pub use codec::{
    constrain_dimensions, CoefficientSet, ComponentCounts, EncoderSettings, PixelGrid,
};
pub use config::{
    Cli, CodecArgs, Command, DecodeConfig, EncodeConfig, EncodeOutputFormat, StyleConfig,
};
pub use error::{CacheError, CodecError, IngestError, PlaceholderError, RenderError};
pub use ingest::{Ingestor, MemoryPlaceholderStore, PlaceholderStore};
pub use render::{
    background_style, to_data_uri, CacheStore, MemoryCacheStore, PlaceholderService,
    PlaceholderStyle, PngRenderer, RenderCache, RenderCacheKey,
};
