//! Ingestion pipeline.
//!
//! Turns source image files into stored hashes:
//!
//! ```text
//! image bytes ──▶ image::load_from_memory ──▶ bound to max_resize_bound
//!             ──▶ PixelGrid ──▶ codec::encode ──▶ PlaceholderStore::put
//! ```
//!
//! Image file decoding is delegated to the `image` crate; persistence is
//! delegated to a [`PlaceholderStore`].

mod pipeline;
mod store;

pub use pipeline::{grid_from_bytes, grid_from_image, hash_from_bytes, Ingestor};
pub use store::{MemoryPlaceholderStore, PlaceholderStore};
