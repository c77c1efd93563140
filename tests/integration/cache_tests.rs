//! Render cache integration tests.
//!
//! Tests verify:
//! - A second request for the same key is served without rendering
//! - Different sizes are cached separately
//! - A failing store degrades to a miss
//! - Services sharing one store share its entries

use std::sync::Arc;

use blurhash::codec;
use blurhash::render::{MemoryCacheStore, PlaceholderService, RenderCache, RenderCacheKey};
use blurhash::PlaceholderError;

use super::test_utils::{gradient_grid, CallCounter, TrackingStore};

fn tiny_png() -> Result<Vec<u8>, PlaceholderError> {
    Ok(vec![0x89, b'P', b'N', b'G'])
}

// =============================================================================
// Hits and Misses
// =============================================================================

#[tokio::test]
async fn test_second_request_skips_render() {
    let cache = RenderCache::new(MemoryCacheStore::new());
    let counter = CallCounter::default();

    for expected_hit in [false, true, true] {
        let outcome = cache
            .get_or_render("00Eyb[", 40, 30, |_, _, _| {
                counter.hit();
                tiny_png()
            })
            .await
            .unwrap();
        assert_eq!(outcome.cache_hit, expected_hit);
        assert_eq!(outcome.data_uri, "data:image/png;base64,iVBORw==");
    }

    assert_eq!(counter.count(), 1);
}

#[tokio::test]
async fn test_sizes_are_cached_separately() {
    let store = Arc::new(MemoryCacheStore::new());
    let service = PlaceholderService::new(Arc::clone(&store));
    let hash = codec::encode(&gradient_grid(16, 16));

    service.style(&hash, 100, 100).await.unwrap();
    service.style(&hash, 200, 100).await.unwrap();
    service.style(&hash, 100, 100).await.unwrap();

    assert_eq!(store.len().await, 2);
    assert!(store.contains(&RenderCacheKey::new(hash.as_str(), 100, 100)).await);
    assert!(store.contains(&RenderCacheKey::new(hash.as_str(), 200, 100)).await);
}

#[tokio::test]
async fn test_render_error_is_not_cached() {
    let store = TrackingStore::new();
    let cache = RenderCache::new(store.clone());

    let result = cache
        .get_or_render("00Eyb[", 8, 8, |_, _, _| -> Result<Vec<u8>, PlaceholderError> {
            Err(blurhash::RenderError::EncodeFailed {
                message: "boom".to_string(),
            }
            .into())
        })
        .await;

    assert!(matches!(result, Err(PlaceholderError::Render(_))));
    assert_eq!(store.sets(), 0);
    assert_eq!(store.len().await, 0);
}

// =============================================================================
// Degraded Store
// =============================================================================

#[tokio::test]
async fn test_failing_store_still_renders() {
    let store = TrackingStore::new();
    store.set_failing(true);

    let service = PlaceholderService::new(store.clone());
    let hash = codec::encode(&gradient_grid(12, 12));

    let first = service.style(&hash, 50, 50).await.unwrap();
    let second = service.style(&hash, 50, 50).await.unwrap();

    assert!(!first.cache_hit);
    assert!(!second.cache_hit);
    assert_eq!(first.data_uri, second.data_uri);
    assert_eq!(store.gets(), 2);
    assert_eq!(store.sets(), 2);
}

#[tokio::test]
async fn test_store_recovers() {
    let store = TrackingStore::new();
    let service = PlaceholderService::new(store.clone());
    let hash = codec::encode(&gradient_grid(12, 12));

    store.set_failing(true);
    assert!(!service.style(&hash, 20, 20).await.unwrap().cache_hit);

    store.set_failing(false);
    assert!(!service.style(&hash, 20, 20).await.unwrap().cache_hit);
    assert!(service.style(&hash, 20, 20).await.unwrap().cache_hit);
}

// =============================================================================
// Shared Store
// =============================================================================

#[tokio::test]
async fn test_services_share_store() {
    let store = Arc::new(MemoryCacheStore::new());
    let a = PlaceholderService::new(Arc::clone(&store));
    let b = PlaceholderService::new(Arc::clone(&store));
    let hash = codec::encode(&gradient_grid(20, 10));

    let first = a.style(&hash, 320, 160).await.unwrap();
    let second = b.style(&hash, 320, 160).await.unwrap();

    assert!(!first.cache_hit);
    assert!(second.cache_hit);
    assert_eq!(first.data_uri, second.data_uri);
}

#[tokio::test]
async fn test_concurrent_requests_agree() {
    let service = Arc::new(PlaceholderService::in_memory());
    let hash = codec::encode(&gradient_grid(24, 18));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = Arc::clone(&service);
        let hash = hash.clone();
        handles.push(tokio::spawn(async move {
            service.style(&hash, 240, 180).await.unwrap().data_uri
        }));
    }

    let mut uris = Vec::new();
    for handle in handles {
        uris.push(handle.await.unwrap());
    }

    assert!(uris.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(service.store().len().await, 1);
}
