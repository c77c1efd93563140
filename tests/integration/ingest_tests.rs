//! Ingestion integration tests.
//!
//! Tests verify:
//! - PNG and JPEG files are hashed at the bounded size
//! - Hashes persist and feed the renderer
//! - Undecodable files store nothing

use std::sync::Arc;

use async_trait::async_trait;

use blurhash::codec::{self, ComponentCounts, EncoderSettings};
use blurhash::error::IngestError;
use blurhash::ingest::{hash_from_bytes, Ingestor, MemoryPlaceholderStore, PlaceholderStore};
use blurhash::{PixelGrid, PlaceholderError, PlaceholderService};

use super::test_utils::{gradient_image, jpeg_bytes, png_bytes};

// =============================================================================
// File Formats
// =============================================================================

#[tokio::test]
async fn test_ingest_png() {
    let ingestor = Ingestor::new(MemoryPlaceholderStore::new());
    let bytes = png_bytes(&gradient_image(800, 400));

    let hash = ingestor.ingest("banner.png", &bytes).await.unwrap();
    assert_eq!(codec::components(&hash).unwrap(), ComponentCounts { x: 4, y: 3 });
    assert_eq!(
        ingestor.placeholder("banner.png").await.unwrap().as_deref(),
        Some(hash.as_str())
    );
}

#[tokio::test]
async fn test_ingest_jpeg() {
    let ingestor = Ingestor::new(MemoryPlaceholderStore::new());
    let bytes = jpeg_bytes(&gradient_image(300, 600), 90);

    let hash = ingestor.ingest("portrait.jpg", &bytes).await.unwrap();
    assert_eq!(codec::components(&hash).unwrap(), ComponentCounts { x: 3, y: 4 });
}

#[test]
fn test_large_and_bounded_sources_hash_alike() {
    let settings = EncoderSettings::default();
    let large = hash_from_bytes(&png_bytes(&gradient_image(1280, 640)), &settings).unwrap();
    let small = hash_from_bytes(&png_bytes(&gradient_image(64, 32)), &settings).unwrap();

    let large = codec::decode(&large, 64, 32).unwrap();
    let small = codec::decode(&small, 64, 32).unwrap();
    let diff: u64 = large
        .pixels()
        .iter()
        .zip(small.pixels())
        .flat_map(|(a, b)| a.iter().zip(b.iter()))
        .map(|(a, b)| (*a as i64 - *b as i64).unsigned_abs())
        .sum();
    let mean = diff as f64 / (64.0 * 32.0 * 3.0);
    assert!(mean < 12.0, "mean abs diff {}", mean);
}

#[test]
fn test_custom_bound_used_for_components() {
    let settings = EncoderSettings {
        max_resize_bound: 8,
        baseline_components: 2,
        boosted_components: 3,
    };
    let hash = hash_from_bytes(&png_bytes(&gradient_image(160, 40)), &settings).unwrap();
    assert_eq!(codec::components(&hash).unwrap(), ComponentCounts { x: 3, y: 2 });
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_undecodable_file_stores_nothing() {
    let ingestor = Ingestor::new(MemoryPlaceholderStore::new());
    let result = ingestor.ingest("corrupt.png", b"\x89PNG\r\n\x1a\ngarbage").await;

    assert!(matches!(
        result,
        Err(PlaceholderError::Ingest(IngestError::Decode { .. }))
    ));
    assert_eq!(ingestor.placeholder("corrupt.png").await.unwrap(), None);
}

/// A store whose writes always fail.
struct ReadOnlyStore;

#[async_trait]
impl PlaceholderStore for ReadOnlyStore {
    async fn put(&self, _image_id: &str, _hash: &str) -> Result<(), IngestError> {
        Err(IngestError::Store("read-only".to_string()))
    }

    async fn get(&self, _image_id: &str) -> Result<Option<String>, IngestError> {
        Ok(None)
    }
}

#[tokio::test]
async fn test_store_failure_propagates() {
    let ingestor = Ingestor::new(ReadOnlyStore);
    let result = ingestor
        .ingest("photo.png", &png_bytes(&gradient_image(10, 10)))
        .await;

    assert!(matches!(
        result,
        Err(PlaceholderError::Ingest(IngestError::Store(_)))
    ));
}

// =============================================================================
// Ingest Then Render
// =============================================================================

#[tokio::test]
async fn test_ingested_hash_renders() {
    let store = Arc::new(MemoryPlaceholderStore::new());
    let ingestor = Ingestor::new(Arc::clone(&store));
    let service = PlaceholderService::in_memory();

    let source = gradient_image(640, 480);
    ingestor.ingest("hero", &png_bytes(&source)).await.unwrap();

    let hash = store.get("hero").await.unwrap().unwrap();
    let style = service.style(&hash, 640, 480).await.unwrap();
    let rendered = super::test_utils::decode_data_uri(&style.data_uri);
    assert_eq!(rendered.dimensions(), (64, 48));

    let expected = PixelGrid::try_from(&rendered).unwrap();
    let direct = codec::decode(&hash, 64, 48).unwrap();
    assert_eq!(expected, direct);
}
