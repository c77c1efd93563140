//! PNG placeholder encoder.
//!
//! This module rasterizes decoded pixel grids into PNG bytes and wraps them
//! for use as CSS backgrounds.
//!
//! # Design Decisions
//!
//! - **One pixel per cell**: The grid is written as-is with no interpolation.
//!   Browsers stretch it with `background-size: cover`.
//!
//! - **Fixed encoder settings**: Compression and filter type are pinned so that
//!   identical grids always produce byte-identical PNGs. Cache keys rely on
//!   request identity, not on hashing the output.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};

use crate::codec::PixelGrid;
use crate::error::RenderError;

/// MIME type of every rendered placeholder.
pub const PNG_MIME_TYPE: &str = "image/png";

/// Prefix of every placeholder data URI.
pub const DATA_URI_PREFIX: &str = "data:image/png;base64,";

// =============================================================================
// PNG Renderer
// =============================================================================

/// Renders pixel grids as PNG images.
///
/// # Example
///
/// ```
/// use blurhash::codec::PixelGrid;
/// use blurhash::render::{to_data_uri, PngRenderer};
///
/// let renderer = PngRenderer::new();
/// let grid = PixelGrid::filled(4, 3, [200, 40, 40]).unwrap();
///
/// let png = renderer.render(&grid).unwrap();
/// assert!(to_data_uri(&png).starts_with("data:image/png;base64,"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PngRenderer {}

impl PngRenderer {
    /// Create a new PNG renderer.
    pub fn new() -> Self {
        Self {}
    }

    /// Rasterize `grid` into PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::EncodeFailed`] if the PNG encoder rejects the buffer.
    pub fn render(&self, grid: &PixelGrid) -> Result<Bytes, RenderError> {
        let raw: Vec<u8> = grid.pixels().iter().flat_map(|p| p.iter().copied()).collect();

        let mut output = Vec::new();
        let encoder = PngEncoder::new_with_quality(
            &mut output,
            CompressionType::Default,
            FilterType::Adaptive,
        );

        encoder
            .write_image(&raw, grid.width(), grid.height(), ExtendedColorType::Rgb8)
            .map_err(|e| RenderError::EncodeFailed {
                message: e.to_string(),
            })?;

        Ok(Bytes::from(output))
    }

    /// Rasterize `grid` and return it as a data URI.
    pub fn render_data_uri(&self, grid: &PixelGrid) -> Result<String, RenderError> {
        let png = self.render(grid)?;
        Ok(to_data_uri(&png))
    }
}

// =============================================================================
// Utility Functions
// =============================================================================

/// Base-64 encode PNG bytes (standard alphabet, padded).
#[inline]
pub fn to_base64(png: &[u8]) -> String {
    STANDARD.encode(png)
}

/// Wrap an already base-64 encoded PNG payload as a data URI.
#[inline]
pub fn data_uri_from_base64(payload: &str) -> String {
    format!("{}{}", DATA_URI_PREFIX, payload)
}

/// Wrap PNG bytes as `data:image/png;base64,<payload>`.
pub fn to_data_uri(png: &[u8]) -> String {
    data_uri_from_base64(&to_base64(png))
}

/// CSS declarations that paint `data_uri` as a covering background.
pub fn background_style(data_uri: &str) -> String {
    format!(
        "background-size: cover; background-image: url({});",
        data_uri
    )
}

// =============================================================================
// Tests
// =============================================================================
