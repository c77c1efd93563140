//! Placeholder Service for turning stored hashes into CSS backgrounds.
//!
//! The PlaceholderService is the entry point for markup generation. It orchestrates:
//! - Request validation
//! - Cache lookups
//! - Hash decoding at the bounded size
//! - PNG rendering
//! - Result caching
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      PlaceholderService                        │
//! │  ┌──────────────────────────────────────────────────────────┐  │
//! │  │                       style()                            │  │
//! │  │  1. Validate request   3. Decode hash at bounded size    │  │
//! │  │  2. Check cache        4. Render PNG, cache & return     │  │
//! │  └──────────────────────────────────────────────────────────┘  │
//! │           │                      │                    │        │
//! │           ▼                      ▼                    ▼        │
//! │    ┌─────────────┐       ┌──────────────┐    ┌──────────────┐  │
//! │    │ RenderCache │       │ codec::decode│    │ PngRenderer  │  │
//! │    └─────────────┘       └──────────────┘    └──────────────┘  │
//! └────────────────────────────────────────────────────────────────┘
//! ```

use tracing::debug;

use crate::codec::{self, EncoderSettings};
use crate::error::{CodecError, PlaceholderError};

use super::cache::{CacheStore, MemoryCacheStore, RenderCache};
use super::encoder::{background_style, PngRenderer};

// =============================================================================
// Placeholder Style
// =============================================================================

/// A rendered placeholder ready to be attached to markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderStyle {
    /// The PNG data URI
    pub data_uri: String,

    /// Whether this placeholder was served from cache
    pub cache_hit: bool,
}

impl PlaceholderStyle {
    /// CSS declarations for an inline `style` attribute.
    pub fn css(&self) -> String {
        background_style(&self.data_uri)
    }
}

// =============================================================================
// Placeholder Service
// =============================================================================

/// Service for rendering and caching placeholders.
///
/// # Type Parameters
///
/// * `C` - The cache store (e.g. [`MemoryCacheStore`] or a shared external store)
///
/// # Example
///
/// ```
/// use blurhash::render::PlaceholderService;
///
/// #[tokio::main]
/// async fn main() {
///     let service = PlaceholderService::in_memory();
///
///     let style = service.style("00Eyb[", 300, 200).await.unwrap();
///     assert!(!style.cache_hit);
///     assert!(style.css().starts_with("background-size: cover;"));
///
///     let again = service.style("00Eyb[", 300, 200).await.unwrap();
///     assert!(again.cache_hit);
/// }
/// ```
pub struct PlaceholderService<C: CacheStore> {
    /// Cache for rendered payloads
    cache: RenderCache<C>,

    /// PNG encoder
    renderer: PngRenderer,

    /// Resize bound applied before decoding
    settings: EncoderSettings,
}

impl PlaceholderService<MemoryCacheStore> {
    /// Create a service backed by a default in-memory store.
    pub fn in_memory() -> Self {
        Self::new(MemoryCacheStore::new())
    }
}

impl<C: CacheStore> PlaceholderService<C> {
    /// Create a service with default settings.
    pub fn new(store: C) -> Self {
        Self::with_settings(store, EncoderSettings::default())
    }

    /// Create a service with explicit settings.
    pub fn with_settings(store: C, settings: EncoderSettings) -> Self {
        Self {
            cache: RenderCache::new(store),
            renderer: PngRenderer::new(),
            settings,
        }
    }

    /// Settings used for decoding.
    pub fn settings(&self) -> &EncoderSettings {
        &self.settings
    }

    /// Access the underlying cache store.
    pub fn store(&self) -> &C {
        self.cache.store()
    }

    /// Render `hash` for a `width x height` box, using cache when available.
    ///
    /// The hash is decoded at the target size constrained to the resize
    /// bound; the browser scales the small PNG up with `background-size: cover`.
    ///
    /// # Errors
    ///
    /// - [`CodecError::DimensionMismatch`] if `width` or `height` is zero
    /// - [`CodecError::MalformedHash`] if the hash is invalid
    /// - [`crate::error::RenderError`] if PNG encoding fails
    pub async fn style(
        &self,
        hash: &str,
        width: u32,
        height: u32,
    ) -> Result<PlaceholderStyle, PlaceholderError> {
        if width == 0 || height == 0 {
            return Err(CodecError::DimensionMismatch { width, height }.into());
        }

        // Reject bad hashes before they reach the store
        codec::components(hash)?;

        let outcome = self
            .cache
            .get_or_render(hash, width, height, |hash, width, height| {
                self.render_png(hash, width, height)
            })
            .await?;

        Ok(PlaceholderStyle {
            data_uri: outcome.data_uri,
            cache_hit: outcome.cache_hit,
        })
    }

    /// Decode and render without touching the cache.
    pub fn render_png(
        &self,
        hash: &str,
        width: u32,
        height: u32,
    ) -> Result<bytes::Bytes, PlaceholderError> {
        let (grid_width, grid_height) = self.settings.bounded(width, height);
        let grid = codec::decode(hash, grid_width, grid_height)?;
        let png = self.renderer.render(&grid)?;

        debug!(
            hash,
            width,
            height,
            grid_width,
            grid_height,
            bytes = png.len(),
            "Rendered placeholder"
        );

        Ok(png)
    }
}

// =============================================================================
// Tests
// =============================================================================
