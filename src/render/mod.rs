//! Placeholder rendering layer.
//!
//! This module turns blur hashes into PNG data URIs and CSS backgrounds, and
//! memoizes the results.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            Markup generation            │
//! └────────────────────┬────────────────────┘
//!                      │ (hash, width, height)
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │           PlaceholderService            │
//! │  ┌──────────────┐  ┌─────────────────┐  │
//! │  │ RenderCache  │  │  PngRenderer    │  │
//! │  │ (base-64     │  │  (grid → PNG)   │  │
//! │  │  payloads)   │  │                 │  │
//! │  └──────┬───────┘  └─────────────────┘  │
//! └─────────┼───────────────────────────────┘
//!           ▼
//! ┌─────────────────────────────────────────┐
//! │     CacheStore (memory or external)     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`PlaceholderService`]: Main entry point, decode → render → cache
//! - [`RenderCache`]: Get-or-render over any [`CacheStore`]
//! - [`MemoryCacheStore`]: LRU store with size-based eviction
//! - [`RenderCacheKey`]: Composite key (hash, width, height)
//! - [`PngRenderer`]: Deterministic grid → PNG encoder

mod cache;
mod encoder;
mod service;

pub use cache::{
    CacheStore, MemoryCacheStore, RenderCache, RenderCacheKey, RenderOutcome,
    DEFAULT_RENDER_CACHE_CAPACITY,
};
pub use encoder::{
    background_style, data_uri_from_base64, to_base64, to_data_uri, PngRenderer,
    DATA_URI_PREFIX, PNG_MIME_TYPE,
};
pub use service::{PlaceholderService, PlaceholderStyle};
