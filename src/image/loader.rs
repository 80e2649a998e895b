use crate::utils::error::PredictError;
use crate::Result;
use image::{DynamicImage, GenericImageView};

/// Hard cap on decoded upload size, matching the request body limit.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub struct ImageLoader;

impl ImageLoader {
    /// Decodes an uploaded buffer into an image, guessing the format from
    /// the content rather than trusting any client-supplied filename.
    pub fn from_bytes(bytes: &[u8]) -> Result<DynamicImage> {
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(PredictError::FileTooLarge(bytes.len(), MAX_UPLOAD_BYTES));
        }

        let image = image::load_from_memory(bytes)?;
        Self::validate_dimensions(&image)?;

        Ok(image)
    }

    /// Reads and decodes a spooled upload from disk.
    pub async fn from_path(path: &std::path::Path) -> Result<DynamicImage> {
        let bytes = tokio::fs::read(path).await?;
        Self::from_bytes(&bytes)
    }

    fn validate_dimensions(image: &DynamicImage) -> Result<()> {
        let (width, height) = image.dimensions();

        if width < 16 || height < 16 {
            return Err(PredictError::InvalidInput(format!(
                "Image too small: {}x{}, minimum 16x16",
                width, height
            )));
        }

        if width > 8192 || height > 8192 {
            return Err(PredictError::InvalidInput(format!(
                "Image too large: {}x{}, maximum 8192x8192",
                width, height
            )));
        }

        Ok(())
    }
}
