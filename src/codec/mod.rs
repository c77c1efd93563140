//! Blur hash codec.
//!
//! This module turns pixel grids into short printable hashes and back.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   encode_dct    ┌────────────────┐   quantize + base83   ┌────────────┐
//! │  PixelGrid   │ ──────────────▶ │ CoefficientSet │ ────────────────────▶ │ hash (str) │
//! │  (sRGB u8)   │ ◀────────────── │ (linear f64)   │ ◀──────────────────── │            │
//! └──────────────┘   decode_dct    └────────────────┘   parse + dequantize  └────────────┘
//! ```
//!
//! # Components
//!
//! - [`PixelGrid`]: Non-empty RGB8 grid
//! - [`ComponentCounts`]: Frequency resolution per axis, `[1, 9]`
//! - [`CoefficientSet`]: Linear-light DCT coefficients
//! - [`EncoderSettings`]: Resize bound and component heuristic
//! - [`base83`]: The fixed 83-symbol digit encoding
//!
//! All functions here are pure and may be called from any thread.
//!
//! # Example
//!
//! ```
//! use blurhash::codec::{self, PixelGrid};
//!
//! let grid = PixelGrid::filled(40, 20, [30, 120, 200]).unwrap();
//! let hash = codec::encode(&grid);
//! assert_eq!(hash.len(), 28); // 4x3 components
//!
//! let preview = codec::decode(&hash, 8, 4).unwrap();
//! assert_eq!(preview.width(), 8);
//! ```

pub mod base83;
mod grid;
mod hash;
mod transform;

pub use grid::{
    constrain_dimensions, CoefficientSet, ComponentCounts, PixelGrid, DEFAULT_BASELINE_COMPONENTS,
    DEFAULT_BOOSTED_COMPONENTS, DEFAULT_MAX_RESIZE_BOUND, MAX_COMPONENTS, MIN_COMPONENTS,
};
pub use hash::{
    average_color, components, decode, decode_coefficients, encode_coefficients,
    encode_with_components, HEADER_LEN,
};
pub use transform::{
    decode_dct, encode_dct, gamma_decode, gamma_decode_signed, gamma_encode, gamma_encode_signed,
    GAMMA,
};

// =============================================================================
// Encoder Settings
// =============================================================================

/// Tunables shared by ingestion and rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderSettings {
    /// Largest grid dimension fed to the encoder and the renderer.
    pub max_resize_bound: u32,

    /// Component count for the shorter axis (both axes when square).
    pub baseline_components: u32,

    /// Component count for the longer axis.
    pub boosted_components: u32,
}

impl EncoderSettings {
    /// Component counts for a `width x height` grid.
    pub fn components_for(&self, width: u32, height: u32) -> ComponentCounts {
        ComponentCounts::for_dimensions(
            width,
            height,
            self.baseline_components,
            self.boosted_components,
        )
    }

    /// Fit `width x height` inside the square resize bound.
    pub fn bounded(&self, width: u32, height: u32) -> (u32, u32) {
        constrain_dimensions(width, height, self.max_resize_bound, self.max_resize_bound)
    }
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            max_resize_bound: DEFAULT_MAX_RESIZE_BOUND,
            baseline_components: DEFAULT_BASELINE_COMPONENTS,
            boosted_components: DEFAULT_BOOSTED_COMPONENTS,
        }
    }
}

/// Encode `grid` with component counts picked from its aspect ratio.
pub fn encode(grid: &PixelGrid) -> String {
    encode_with_settings(grid, &EncoderSettings::default())
}

/// Encode `grid` using the component heuristic of `settings`.
pub fn encode_with_settings(grid: &PixelGrid, settings: &EncoderSettings) -> String {
    let components = settings.components_for(grid.width(), grid.height());
    encode_with_components(grid, components)
}

// =============================================================================
// Tests
// =============================================================================
