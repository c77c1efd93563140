//! Codec integration tests.
//!
//! Tests verify:
//! - Known hashes and hash lengths for every component pair
//! - Component selection from aspect ratio
//! - Round-trip fidelity on smooth images
//! - Rejection of malformed hashes and empty targets

use std::f64::consts::PI;

use blurhash::codec::{self, base83, ComponentCounts, EncoderSettings, PixelGrid};
use blurhash::{constrain_dimensions, CodecError};

use super::test_utils::{gradient_grid, low_contrast_image, max_abs_diff, mean_abs_diff};

// =============================================================================
// Hash Format
// =============================================================================

#[test]
fn test_single_gray_pixel_known_hash() {
    let grid = PixelGrid::filled(1, 1, [128, 128, 128]).unwrap();
    let hash = codec::encode_with_components(&grid, ComponentCounts::new(1, 1).unwrap());
    assert_eq!(hash, "00Eyb[");

    let decoded = codec::decode(&hash, 1, 1).unwrap();
    for (channel, expected) in decoded.pixel(0, 0).iter().zip([128u8, 128, 128]) {
        assert!((*channel as i32 - expected as i32).abs() <= 3);
    }
}

#[test]
fn test_hash_length_for_every_component_pair() {
    let grid = gradient_grid(20, 20);

    for x in 1..=9 {
        for y in 1..=9 {
            let components = ComponentCounts::new(x, y).unwrap();
            let hash = codec::encode_with_components(&grid, components);

            assert_eq!(hash.len(), 6 + 2 * (x * y - 1) as usize, "{}x{}", x, y);
            assert!(base83::is_valid(&hash));
            assert_eq!(codec::components(&hash).unwrap(), components);
        }
    }
}

#[test]
fn test_encode_is_deterministic() {
    let grid = gradient_grid(37, 23);
    let first = codec::encode(&grid);
    for _ in 0..5 {
        assert_eq!(codec::encode(&grid), first);
    }
}

// =============================================================================
// Component Selection
// =============================================================================

#[test]
fn test_default_components_follow_aspect() {
    let wide = codec::encode(&gradient_grid(40, 20));
    assert_eq!(codec::components(&wide).unwrap(), ComponentCounts { x: 4, y: 3 });

    let tall = codec::encode(&gradient_grid(20, 40));
    assert_eq!(codec::components(&tall).unwrap(), ComponentCounts { x: 3, y: 4 });

    let square = codec::encode(&gradient_grid(30, 30));
    assert_eq!(codec::components(&square).unwrap(), ComponentCounts { x: 3, y: 3 });
}

#[test]
fn test_custom_component_settings() {
    let settings = EncoderSettings {
        baseline_components: 2,
        boosted_components: 6,
        ..EncoderSettings::default()
    };
    let hash = codec::encode_with_settings(&gradient_grid(50, 10), &settings);
    assert_eq!(codec::components(&hash).unwrap(), ComponentCounts { x: 6, y: 2 });
}

// =============================================================================
// Round Trip
// =============================================================================

#[test]
fn test_gradient_round_trip_is_close() {
    // A 40-level ramp keeps every AC coefficient (about 0.06 in linear light)
    // below the largest scale of 19/166, so nothing is clipped. What remains
    // is truncation of the ramp's higher harmonics, the half-pixel shift
    // between forward and inverse bases, and companded quantization. Each
    // contributes at most 2 to 3 levels at the image edges.
    let image = low_contrast_image(64, 48);
    let grid = PixelGrid::try_from(&image).unwrap();

    let hash = codec::encode(&grid);
    let decoded = image::RgbImage::from(&codec::decode(&hash, 64, 48).unwrap());

    let mean = mean_abs_diff(&image, &decoded);
    let max = max_abs_diff(&image, &decoded);
    assert!(mean < 6.0, "mean abs diff {}", mean);
    assert!(max <= 16, "max abs diff {}", max);
}

/// Mean of the forward basis along one axis of `len` samples.
///
/// The forward basis has no half-pixel offset, so this is `1 / len` for odd
/// frequencies rather than zero.
fn basis_mean(frequency: u32, len: u32) -> f64 {
    let sum: f64 = (0..len)
        .map(|p| (PI * frequency as f64 * p as f64 / len as f64).cos())
        .sum();
    sum / len as f64
}

/// Inclusive channel range a decoded flat grid may land in at `(x, y)`.
///
/// A flat grid of linear value `m` has AC coefficients
/// `2 * m * basis_mean(i, w) * basis_mean(j, h)`. Each decoded AC term is at
/// most the scale `M`, and otherwise within half a quantization step of its
/// coefficient: `1/18` in the companded domain, so `2.2 / 18 * M` after
/// expansion. The DC term round-trips exactly. One level of slack covers
/// rounding.
fn flat_channel_range(
    source: u8,
    components: ComponentCounts,
    scale: f64,
    (x, y): (u32, u32),
    (width, height): (u32, u32),
) -> (u8, u8) {
    let m = codec::gamma_decode(source);
    let mut bound = 0.0;

    for j in 0..components.y {
        for i in 0..components.x {
            if i == 0 && j == 0 {
                continue;
            }
            let coefficient = (2.0 * m * basis_mean(i, width) * basis_mean(j, height)).abs();
            let term = (coefficient + 2.2 / 18.0 * scale).min(scale);
            let basis_x = (PI * i as f64 * (x as f64 + 0.5) / width as f64).cos();
            let basis_y = (PI * j as f64 * (y as f64 + 0.5) / height as f64).cos();
            bound += term * (basis_x * basis_y).abs();
        }
    }

    let low = codec::gamma_encode(m - bound).saturating_sub(1);
    let high = codec::gamma_encode(m + bound).saturating_add(1);
    (low, high)
}

#[test]
fn test_flat_round_trip_stays_in_bounds_across_sizes() {
    let sizes = [
        (1, 1),
        (1, 64),
        (64, 1),
        (2, 3),
        (5, 5),
        (7, 40),
        (13, 9),
        (32, 32),
        (50, 17),
        (64, 64),
    ];
    let colors = [
        [0, 0, 0],
        [255, 255, 255],
        [128, 128, 128],
        [200, 40, 90],
        [12, 180, 250],
    ];

    for (width, height) in sizes {
        for color in colors {
            let grid = PixelGrid::filled(width, height, color).unwrap();
            let hash = codec::encode(&grid);
            let components = codec::components(&hash).unwrap();
            let scale = (base83::decode(&hash[1..2]).unwrap() + 1) as f64 / 166.0;

            let decoded = codec::decode(&hash, width, height).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (width, height));

            for y in 0..height {
                for x in 0..width {
                    let pixel = decoded.pixel(x, y);
                    for channel in 0..3 {
                        let (low, high) = flat_channel_range(
                            color[channel],
                            components,
                            scale,
                            (x, y),
                            (width, height),
                        );
                        assert!(
                            (low..=high).contains(&pixel[channel]),
                            "{}x{} {:?} at ({}, {}) channel {}: {} not in {}..={}",
                            width,
                            height,
                            color,
                            x,
                            y,
                            channel,
                            pixel[channel],
                            low,
                            high
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn test_average_color_of_flat_image() {
    let grid = PixelGrid::filled(16, 9, [12, 200, 77]).unwrap();
    let hash = codec::encode(&grid);
    assert_eq!(codec::average_color(&hash).unwrap(), [12, 200, 77]);
}

#[test]
fn test_decode_at_any_size() {
    for (w, h) in [(1, 1), (7, 3), (64, 64), (3, 100)] {
        let grid = codec::decode("00Eyb[", w, h).unwrap();
        assert_eq!((grid.width(), grid.height()), (w, h));
        assert!(grid.pixels().iter().all(|p| *p == [128, 128, 128]));
    }
}

// =============================================================================
// Malformed Input
// =============================================================================

#[test]
fn test_malformed_hashes_rejected() {
    let cases = [
        "",        // empty
        "00Eyb",   // shorter than header
        "00Eyb[0", // odd AC length
        "0 Eyb[",  // outside alphabet
        "~0Eyb[",  // size digit out of range
        "10Eyb[",  // 2x1 components need one AC pair
        "00Eyb€",  // non-ascii
        "00TSUB",  // DC wider than 24 bits
    ];

    for hash in cases {
        assert!(
            matches!(codec::decode(hash, 4, 4), Err(CodecError::MalformedHash { .. })),
            "accepted {:?}",
            hash
        );
    }
}

#[test]
fn test_zero_target_rejected() {
    assert!(matches!(
        codec::decode("00Eyb[", 0, 4),
        Err(CodecError::DimensionMismatch { width: 0, height: 4 })
    ));
}

#[test]
fn test_empty_grid_rejected() {
    assert!(matches!(
        PixelGrid::new(0, 0, Vec::new()),
        Err(CodecError::InvalidGrid { .. })
    ));
    assert!(matches!(
        PixelGrid::new(2, 2, vec![[0, 0, 0]; 3]),
        Err(CodecError::InvalidGrid { .. })
    ));
}

// =============================================================================
// Dimension Constraints
// =============================================================================

#[test]
fn test_constrain_dimensions() {
    assert_eq!(constrain_dimensions(1920, 1080, 64, 64), (64, 36));
    assert_eq!(constrain_dimensions(1080, 1920, 64, 64), (36, 64));
    assert_eq!(constrain_dimensions(40, 30, 64, 64), (40, 30));
    assert_eq!(constrain_dimensions(10_000, 10, 64, 64), (64, 1));
}
