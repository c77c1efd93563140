//! Blur hash encoding and decoding.
//!
//! # Layout
//!
//! ```text
//! ┌──────┬───────┬──────────┬──────────────────────────────┐
//! │ size │ scale │ DC (4)   │ AC pairs (2 per coefficient) │
//! └──────┴───────┴──────────┴──────────────────────────────┘
//! ```
//!
//! - **size**: `(x - 1) + (y - 1) * 9` for the component counts
//! - **scale**: quantized maximum AC amplitude, `actual = (q + 1) / 166`
//! - **DC**: gamma-encoded average color packed as `0xRRGGBB`
//! - **AC**: three channels quantized to `[0, 18]`, packed base-19

use tracing::trace;

use super::base83;
use super::grid::{CoefficientSet, ComponentCounts, PixelGrid};
use super::transform::{
    decode_dct, encode_dct, gamma_decode, gamma_decode_signed, gamma_encode, gamma_encode_signed,
};
use crate::error::CodecError;

/// Characters before the AC section: size, scale, and four DC digits.
pub const HEADER_LEN: usize = 6;

/// Quantization levels per AC channel.
const AC_LEVELS: u32 = 19;

/// Largest quantized value of the AC amplitude scale.
const MAX_QUANTIZED_SCALE: f64 = 18.0;

/// Fixed-point step of the AC amplitude scale.
const SCALE_STEP: f64 = 166.0;

/// Largest packed `0xRRGGBB` value the four DC digits may hold.
const MAX_DC: u32 = 0xFF_FFFF;

// =============================================================================
// Encoding
// =============================================================================

/// Encode `grid` with explicit component counts.
///
/// The result is always `components.hash_len()` characters long.
pub fn encode_with_components(grid: &PixelGrid, components: ComponentCounts) -> String {
    let coeffs = encode_dct(grid, components);
    encode_coefficients(&coeffs)
}

/// Quantize and serialize a coefficient set.
pub fn encode_coefficients(coeffs: &CoefficientSet) -> String {
    let components = coeffs.components();
    let mut hash = String::with_capacity(components.hash_len());

    base83::encode_into(components.size_flag(), 1, &mut hash);

    let ac = coeffs.ac();
    let actual_max = if ac.is_empty() {
        base83::encode_into(0, 1, &mut hash);
        1.0
    } else {
        let max_value = ac
            .iter()
            .flat_map(|c| c.iter())
            .fold(0.0f64, |acc, v| acc.max(v.abs()));
        let quantized = (max_value * SCALE_STEP - 0.5)
            .round()
            .clamp(0.0, MAX_QUANTIZED_SCALE) as u32;
        base83::encode_into(quantized, 1, &mut hash);
        (quantized + 1) as f64 / SCALE_STEP
    };

    base83::encode_into(encode_dc(coeffs.dc()), 4, &mut hash);

    for value in ac {
        base83::encode_into(encode_ac(*value, actual_max), 2, &mut hash);
    }

    trace!(
        components_x = components.x,
        components_y = components.y,
        hash = %hash,
        "Encoded blur hash"
    );

    hash
}

fn encode_dc(value: [f64; 3]) -> u32 {
    let r = gamma_encode(value[0]) as u32;
    let g = gamma_encode(value[1]) as u32;
    let b = gamma_encode(value[2]) as u32;
    (r << 16) | (g << 8) | b
}

fn quantize_ac(value: f64, actual_max: f64) -> u32 {
    let companded = gamma_encode_signed(value / actual_max);
    (companded * 9.0 + 9.5)
        .floor()
        .clamp(0.0, (AC_LEVELS - 1) as f64) as u32
}

fn encode_ac(value: [f64; 3], actual_max: f64) -> u32 {
    let r = quantize_ac(value[0], actual_max);
    let g = quantize_ac(value[1], actual_max);
    let b = quantize_ac(value[2], actual_max);
    r * AC_LEVELS * AC_LEVELS + g * AC_LEVELS + b
}

// =============================================================================
// Decoding
// =============================================================================

/// Read the component counts from the size digit and check the hash length.
///
/// # Errors
///
/// Returns [`CodecError::MalformedHash`] if the hash is shorter than the
/// header, contains characters outside the alphabet, or its length does not
/// match the declared component counts.
pub fn components(hash: &str) -> Result<ComponentCounts, CodecError> {
    if hash.len() < HEADER_LEN {
        return Err(CodecError::malformed(format!(
            "expected at least {} characters, got {}",
            HEADER_LEN,
            hash.len()
        )));
    }
    if !base83::is_valid(hash) {
        return Err(CodecError::malformed(
            "hash contains characters outside the base-83 alphabet",
        ));
    }

    let ac_len = hash.len() - HEADER_LEN;
    if ac_len % 2 != 0 {
        return Err(CodecError::malformed(format!(
            "AC section has odd length {}",
            ac_len
        )));
    }

    let flag = base83::decode(&hash[0..1])?;
    let components = ComponentCounts::from_size_flag(flag)
        .map_err(|_| CodecError::malformed(format!("size digit {} out of range", flag)))?;

    if hash.len() != components.hash_len() {
        return Err(CodecError::malformed(format!(
            "length {} does not match {}x{} components (expected {})",
            hash.len(),
            components.x,
            components.y,
            components.hash_len()
        )));
    }

    read_dc(hash)?;

    Ok(components)
}

/// Parse a hash back into linear-light coefficients.
pub fn decode_coefficients(hash: &str) -> Result<CoefficientSet, CodecError> {
    let components = components(hash)?;

    let quantized_max = base83::decode(&hash[1..2])?;
    let actual_max = (quantized_max + 1) as f64 / SCALE_STEP;

    let mut values = Vec::with_capacity(components.total());
    values.push(decode_dc(read_dc(hash)?));

    for k in 1..components.total() {
        let start = HEADER_LEN + 2 * (k - 1);
        let packed = base83::decode(&hash[start..start + 2])?;
        values.push(decode_ac(packed, actual_max));
    }

    Ok(CoefficientSet::from_values(components, values))
}

/// Decode `hash` into a `width x height` grid.
///
/// # Errors
///
/// - [`CodecError::DimensionMismatch`] if `width` or `height` is zero
/// - [`CodecError::MalformedHash`] if the hash fails validation
pub fn decode(hash: &str, width: u32, height: u32) -> Result<PixelGrid, CodecError> {
    if width == 0 || height == 0 {
        return Err(CodecError::DimensionMismatch { width, height });
    }
    let coeffs = decode_coefficients(hash)?;
    decode_dct(&coeffs, width, height)
}

/// Average color of the hashed image, read from the DC digits only.
pub fn average_color(hash: &str) -> Result<[u8; 3], CodecError> {
    components(hash)?;
    let dc = read_dc(hash)?;
    Ok([(dc >> 16) as u8, (dc >> 8) as u8, dc as u8])
}

/// The packed DC color. Four base-83 digits reach past 24 bits, so larger
/// values are rejected rather than truncated.
fn read_dc(hash: &str) -> Result<u32, CodecError> {
    let dc = base83::decode(&hash[2..6])?;
    if dc > MAX_DC {
        return Err(CodecError::malformed(format!(
            "DC value {:#x} exceeds 24 bits",
            dc
        )));
    }
    Ok(dc)
}

fn decode_dc(value: u32) -> [f64; 3] {
    [
        gamma_decode((value >> 16) as u8),
        gamma_decode((value >> 8) as u8),
        gamma_decode(value as u8),
    ]
}

fn dequantize_ac(q: u32, actual_max: f64) -> f64 {
    gamma_decode_signed((q as f64 - 9.0) / 9.0) * actual_max
}

fn decode_ac(value: u32, actual_max: f64) -> [f64; 3] {
    let r = value / (AC_LEVELS * AC_LEVELS);
    let g = (value / AC_LEVELS) % AC_LEVELS;
    let b = value % AC_LEVELS;
    [
        dequantize_ac(r, actual_max),
        dequantize_ac(g, actual_max),
        dequantize_ac(b, actual_max),
    ]
}

// =============================================================================
// Tests
// =============================================================================
