//! Pixel grids, component counts, and coefficient sets.

use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// Smallest number of components on either axis.
pub const MIN_COMPONENTS: u32 = 1;

/// Largest number of components on either axis.
pub const MAX_COMPONENTS: u32 = 9;

/// Default component count for the non-dominant axis.
pub const DEFAULT_BASELINE_COMPONENTS: u32 = 3;

/// Default component count for the dominant axis of a non-square image.
pub const DEFAULT_BOOSTED_COMPONENTS: u32 = 4;

/// Default largest grid dimension fed to the encoder and renderer.
pub const DEFAULT_MAX_RESIZE_BOUND: u32 = 64;

// =============================================================================
// Pixel Grid
// =============================================================================

/// A non-empty rectangular grid of 8-bit RGB pixels, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 3]>,
}

impl PixelGrid {
    /// Build a grid from row-major RGB triples.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidGrid`] if either dimension is zero or the
    /// pixel count does not equal `width * height`.
    pub fn new(width: u32, height: u32, pixels: Vec<[u8; 3]>) -> Result<Self, CodecError> {
        if width == 0 || height == 0 || pixels.len() != width as usize * height as usize {
            return Err(CodecError::InvalidGrid { width, height });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a grid from a packed RGB8 buffer (3 bytes per pixel).
    pub fn from_rgb_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self, CodecError> {
        if bytes.len() % 3 != 0 {
            return Err(CodecError::InvalidGrid { width, height });
        }
        let pixels = bytes.chunks_exact(3).map(|p| [p[0], p[1], p[2]]).collect();
        Self::new(width, height, pixels)
    }

    /// Build a grid filled with a single color.
    pub fn filled(width: u32, height: u32, color: [u8; 3]) -> Result<Self, CodecError> {
        Self::new(width, height, vec![color; width as usize * height as usize])
    }

    /// Build a grid by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(
        width: u32,
        height: u32,
        mut f: impl FnMut(u32, u32) -> [u8; 3],
    ) -> Result<Self, CodecError> {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self::new(width, height, pixels)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at column `x`, row `y`.
    ///
    /// # Panics
    /// Panics if the coordinates are outside the grid.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// All pixels in row-major order.
    pub fn pixels(&self) -> &[[u8; 3]] {
        &self.pixels
    }

    /// One row of pixels.
    pub fn row(&self, y: u32) -> &[[u8; 3]] {
        let start = y as usize * self.width as usize;
        &self.pixels[start..start + self.width as usize]
    }
}

impl TryFrom<&RgbImage> for PixelGrid {
    type Error = CodecError;

    fn try_from(image: &RgbImage) -> Result<Self, Self::Error> {
        Self::from_rgb_bytes(image.width(), image.height(), image.as_raw())
    }
}

impl From<&PixelGrid> for RgbImage {
    fn from(grid: &PixelGrid) -> Self {
        let raw: Vec<u8> = grid.pixels.iter().flat_map(|p| p.iter().copied()).collect();
        // Buffer length is width * height * 3 by construction
        RgbImage::from_raw(grid.width, grid.height, raw)
            .unwrap_or_else(|| RgbImage::new(grid.width, grid.height))
    }
}

// =============================================================================
// Component Counts
// =============================================================================

/// Number of frequency components retained along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentCounts {
    pub x: u32,
    pub y: u32,
}

impl ComponentCounts {
    /// Create component counts, rejecting values outside `[1, 9]`.
    pub fn new(x: u32, y: u32) -> Result<Self, CodecError> {
        if !(MIN_COMPONENTS..=MAX_COMPONENTS).contains(&x)
            || !(MIN_COMPONENTS..=MAX_COMPONENTS).contains(&y)
        {
            return Err(CodecError::InvalidComponents { x, y });
        }
        Ok(Self { x, y })
    }

    /// Create component counts, clamping each axis into `[1, 9]`.
    pub fn clamped(x: u32, y: u32) -> Self {
        Self {
            x: x.clamp(MIN_COMPONENTS, MAX_COMPONENTS),
            y: y.clamp(MIN_COMPONENTS, MAX_COMPONENTS),
        }
    }

    /// Pick component counts from the aspect ratio of a `width x height` image.
    ///
    /// Both axes start at the baseline; the longer axis gets the boosted count.
    pub fn for_dimensions(width: u32, height: u32, baseline: u32, boosted: u32) -> Self {
        let (x, y) = if width > height {
            (boosted, baseline)
        } else if height > width {
            (baseline, boosted)
        } else {
            (baseline, baseline)
        };
        Self::clamped(x, y)
    }

    /// Total number of coefficients, DC included.
    #[inline]
    pub fn total(&self) -> usize {
        (self.x * self.y) as usize
    }

    /// Value of the size digit that leads every hash.
    #[inline]
    pub fn size_flag(&self) -> u32 {
        (self.x - 1) + (self.y - 1) * 9
    }

    /// Inverse of [`size_flag`](Self::size_flag).
    pub fn from_size_flag(flag: u32) -> Result<Self, CodecError> {
        Self::new(flag % 9 + 1, flag / 9 + 1)
    }

    /// Hash length produced for these counts.
    #[inline]
    pub fn hash_len(&self) -> usize {
        6 + 2 * (self.total() - 1)
    }
}

impl Default for ComponentCounts {
    fn default() -> Self {
        Self {
            x: DEFAULT_BASELINE_COMPONENTS,
            y: DEFAULT_BASELINE_COMPONENTS,
        }
    }
}

// =============================================================================
// Dimension Bounds
// =============================================================================

/// Scale `width x height` down to fit inside `max_width x max_height`,
/// preserving aspect ratio.
///
/// Dimensions already inside the box are returned unchanged; images are never
/// scaled up. A bound of zero leaves that axis unconstrained. Each output side
/// is at least 1, and a side that was limited by its bound lands exactly on it
/// rather than one pixel short from rounding.
pub fn constrain_dimensions(
    width: u32,
    height: u32,
    max_width: u32,
    max_height: u32,
) -> (u32, u32) {
    if max_width == 0 && max_height == 0 {
        return (width, height);
    }

    let mut width_ratio = 1.0f64;
    let mut height_ratio = 1.0f64;
    let mut did_width = false;
    let mut did_height = false;

    if max_width > 0 && width > max_width {
        width_ratio = max_width as f64 / width as f64;
        did_width = true;
    }
    if max_height > 0 && height > max_height {
        height_ratio = max_height as f64 / height as f64;
        did_height = true;
    }

    let smaller = width_ratio.min(height_ratio);
    let larger = width_ratio.max(height_ratio);

    let exceeds = |ratio: f64| {
        (max_width > 0 && (width as f64 * ratio).round() as u32 > max_width)
            || (max_height > 0 && (height as f64 * ratio).round() as u32 > max_height)
    };
    let ratio = if exceeds(larger) { smaller } else { larger };

    let mut w = ((width as f64 * ratio).round() as u32).max(1);
    let mut h = ((height as f64 * ratio).round() as u32).max(1);

    if did_width && w + 1 == max_width {
        w = max_width;
    }
    if did_height && h + 1 == max_height {
        h = max_height;
    }

    (w, h)
}

// =============================================================================
// Coefficient Set
// =============================================================================

/// Linear-light DCT coefficients, `components.y` rows of `components.x` triples.
///
/// Index `j * components.x + i` holds the coefficient for horizontal frequency
/// `i` and vertical frequency `j`; index 0 is the DC term.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientSet {
    components: ComponentCounts,
    values: Vec<[f64; 3]>,
}

impl CoefficientSet {
    pub(crate) fn from_values(components: ComponentCounts, values: Vec<[f64; 3]>) -> Self {
        debug_assert_eq!(values.len(), components.total());
        Self { components, values }
    }

    pub fn components(&self) -> ComponentCounts {
        self.components
    }

    /// Coefficient for frequency `(i, j)`.
    #[inline]
    pub fn get(&self, i: u32, j: u32) -> [f64; 3] {
        self.values[(j * self.components.x + i) as usize]
    }

    /// The DC term (average linear color).
    #[inline]
    pub fn dc(&self) -> [f64; 3] {
        self.values[0]
    }

    /// AC terms in row-major order, DC skipped.
    pub fn ac(&self) -> &[[f64; 3]] {
        &self.values[1..]
    }

    pub fn values(&self) -> &[[f64; 3]] {
        &self.values
    }
}

// =============================================================================
// Tests
// =============================================================================
