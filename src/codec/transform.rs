//! Low-frequency 2D cosine transform.
//!
//! The forward pass averages gamma-decoded pixels against cosine basis
//! functions for the requested components only (a direct DCT-II, no FFT).
//! The inverse pass sums the basis functions back at pixel centers and
//! gamma-encodes the result.
//!
//! Everything here is `f64`; single precision produces visible banding after
//! repeated encode/decode cycles.

use std::f64::consts::PI;

use super::grid::{CoefficientSet, ComponentCounts, PixelGrid};
use crate::error::CodecError;

/// Display gamma used for linearization.
pub const GAMMA: f64 = 2.2;

// =============================================================================
// Gamma
// =============================================================================

/// 8-bit channel value to linear light: `(c / 255)^2.2`.
#[inline]
pub fn gamma_decode(channel: u8) -> f64 {
    (channel as f64 / 255.0).powf(GAMMA)
}

/// Linear light to an 8-bit channel value, clamping negatives to black.
#[inline]
pub fn gamma_encode(value: f64) -> u8 {
    let v = value.max(0.0).powf(1.0 / GAMMA);
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Sign-preserving gamma decode: `sign(v) * |v|^2.2`.
#[inline]
pub fn gamma_decode_signed(value: f64) -> f64 {
    value.signum() * value.abs().powf(GAMMA)
}

/// Sign-preserving gamma encode: `sign(v) * |v|^(1/2.2)`.
#[inline]
pub fn gamma_encode_signed(value: f64) -> f64 {
    value.signum() * value.abs().powf(1.0 / GAMMA)
}

// =============================================================================
// Forward Transform
// =============================================================================

/// Cosine table for one axis: `table[k * len + p] = cos(PI * k * (p + offset) / len)`.
fn cosine_table(components: u32, len: u32, offset: f64) -> Vec<f64> {
    let len_f = len as f64;
    let mut table = Vec::with_capacity(components as usize * len as usize);
    for k in 0..components {
        for p in 0..len {
            table.push((PI * k as f64 * (p as f64 + offset) / len_f).cos());
        }
    }
    table
}

/// Compute the low-frequency coefficients of `grid`.
pub fn encode_dct(grid: &PixelGrid, components: ComponentCounts) -> CoefficientSet {
    let width = grid.width() as usize;
    let height = grid.height() as usize;
    let cos_x = cosine_table(components.x, grid.width(), 0.0);
    let cos_y = cosine_table(components.y, grid.height(), 0.0);

    // Linearize once instead of once per component
    let linear: Vec<[f64; 3]> = grid
        .pixels()
        .iter()
        .map(|p| [gamma_decode(p[0]), gamma_decode(p[1]), gamma_decode(p[2])])
        .collect();

    let scale = 1.0 / (width * height) as f64;
    let mut values = Vec::with_capacity(components.total());

    for j in 0..components.y as usize {
        for i in 0..components.x as usize {
            let norm = if i == 0 && j == 0 { 1.0 } else { 2.0 };
            let mut sum = [0.0f64; 3];

            for y in 0..height {
                let basis_y = cos_y[j * height + y];
                let row = &linear[y * width..(y + 1) * width];
                for (x, pixel) in row.iter().enumerate() {
                    let basis = cos_x[i * width + x] * basis_y;
                    sum[0] += basis * pixel[0];
                    sum[1] += basis * pixel[1];
                    sum[2] += basis * pixel[2];
                }
            }

            let factor = norm * scale;
            values.push([sum[0] * factor, sum[1] * factor, sum[2] * factor]);
        }
    }

    CoefficientSet::from_values(components, values)
}

// =============================================================================
// Inverse Transform
// =============================================================================

/// Rebuild a `width x height` grid from coefficients.
///
/// # Errors
///
/// Returns [`CodecError::DimensionMismatch`] if either dimension is zero.
pub fn decode_dct(
    coeffs: &CoefficientSet,
    width: u32,
    height: u32,
) -> Result<PixelGrid, CodecError> {
    if width == 0 || height == 0 {
        return Err(CodecError::DimensionMismatch { width, height });
    }

    let components = coeffs.components();
    let w = width as usize;
    let h = height as usize;
    let cos_x = cosine_table(components.x, width, 0.5);
    let cos_y = cosine_table(components.y, height, 0.5);

    let mut pixels = Vec::with_capacity(w * h);
    for y in 0..h {
        for x in 0..w {
            let mut color = [0.0f64; 3];
            for j in 0..components.y {
                let basis_y = cos_y[j as usize * h + y];
                for i in 0..components.x {
                    let basis = cos_x[i as usize * w + x] * basis_y;
                    let c = coeffs.get(i, j);
                    color[0] += c[0] * basis;
                    color[1] += c[1] * basis;
                    color[2] += c[2] * basis;
                }
            }
            pixels.push([
                gamma_encode(color[0]),
                gamma_encode(color[1]),
                gamma_encode(color[2]),
            ]);
        }
    }

    PixelGrid::new(width, height, pixels)
}

// =============================================================================
// Tests
// =============================================================================
