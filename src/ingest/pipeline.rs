//! Source image → stored hash.

use image::imageops::{self, FilterType};
use image::DynamicImage;
use tracing::{debug, info};

use crate::codec::{self, EncoderSettings, PixelGrid};
use crate::error::{CodecError, IngestError, PlaceholderError};

use super::store::PlaceholderStore;

// =============================================================================
// Grid Extraction
// =============================================================================

/// Convert a decoded image into a pixel grid no larger than the resize bound.
///
/// Alpha is dropped. Images larger than the bound are downscaled with a
/// triangle filter; smaller images are used as-is.
///
/// # Errors
///
/// Returns [`crate::error::CodecError::InvalidGrid`] for zero-sized images.
pub fn grid_from_image(
    image: &DynamicImage,
    settings: &EncoderSettings,
) -> Result<PixelGrid, PlaceholderError> {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(CodecError::InvalidGrid { width, height }.into());
    }

    let (grid_width, grid_height) = settings.bounded(width, height);

    let grid = if (grid_width, grid_height) == (width, height) {
        PixelGrid::try_from(&rgb)?
    } else {
        let scaled = imageops::resize(&rgb, grid_width, grid_height, FilterType::Triangle);
        PixelGrid::try_from(&scaled)?
    };

    Ok(grid)
}

/// Decode image file bytes into a bounded pixel grid.
pub fn grid_from_bytes(
    bytes: &[u8],
    settings: &EncoderSettings,
) -> Result<PixelGrid, PlaceholderError> {
    let image = image::load_from_memory(bytes).map_err(|e| IngestError::Decode {
        message: e.to_string(),
    })?;
    grid_from_image(&image, settings)
}

/// Decode image file bytes and return the hash.
pub fn hash_from_bytes(
    bytes: &[u8],
    settings: &EncoderSettings,
) -> Result<String, PlaceholderError> {
    let grid = grid_from_bytes(bytes, settings)?;
    Ok(codec::encode_with_settings(&grid, settings))
}

// =============================================================================
// Ingestor
// =============================================================================

/// Computes hashes for new images and persists them.
///
/// # Example
///
/// ```
/// use blurhash::ingest::{Ingestor, MemoryPlaceholderStore};
/// use image::{DynamicImage, RgbImage, Rgb};
///
/// #[tokio::main]
/// async fn main() {
///     let ingestor = Ingestor::new(MemoryPlaceholderStore::new());
///     let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(300, 150, Rgb([20, 80, 160])));
///
///     let hash = ingestor.ingest_image("photo-42", &image).await.unwrap();
///     assert_eq!(ingestor.placeholder("photo-42").await.unwrap(), Some(hash));
/// }
/// ```
pub struct Ingestor<P: PlaceholderStore> {
    store: P,
    settings: EncoderSettings,
}

impl<P: PlaceholderStore> Ingestor<P> {
    /// Create an ingestor with default settings.
    pub fn new(store: P) -> Self {
        Self::with_settings(store, EncoderSettings::default())
    }

    /// Create an ingestor with explicit settings.
    pub fn with_settings(store: P, settings: EncoderSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &EncoderSettings {
        &self.settings
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    /// Decode `bytes`, hash the image, and store the hash under `image_id`.
    ///
    /// Nothing is stored when decoding or encoding fails.
    pub async fn ingest(&self, image_id: &str, bytes: &[u8]) -> Result<String, PlaceholderError> {
        let grid = grid_from_bytes(bytes, &self.settings)?;
        self.store_grid(image_id, &grid).await
    }

    /// Hash an already-decoded image and store it under `image_id`.
    pub async fn ingest_image(
        &self,
        image_id: &str,
        image: &DynamicImage,
    ) -> Result<String, PlaceholderError> {
        let grid = grid_from_image(image, &self.settings)?;
        self.store_grid(image_id, &grid).await
    }

    /// The stored hash for `image_id`, if any.
    pub async fn placeholder(&self, image_id: &str) -> Result<Option<String>, PlaceholderError> {
        Ok(self.store.get(image_id).await?)
    }

    async fn store_grid(
        &self,
        image_id: &str,
        grid: &PixelGrid,
    ) -> Result<String, PlaceholderError> {
        let hash = codec::encode_with_settings(grid, &self.settings);

        debug!(
            image_id,
            grid_width = grid.width(),
            grid_height = grid.height(),
            "Encoded placeholder"
        );

        self.store.put(image_id, &hash).await?;
        info!(image_id, hash = %hash, "Stored placeholder");

        Ok(hash)
    }
}

// =============================================================================
// Tests
// =============================================================================
