//! Conversion of normalized slices to `image` buffers for display

use super::NormalizedImage;
use crate::error::{Result, ViewerError};
use image::{DynamicImage, GrayImage, ImageBuffer, RgbImage};
use ndarray::Axis;

/// Convert one slice of a normalized image to a `DynamicImage`
///
/// # Errors
///
/// Returns [`ViewerError::InvalidInput`] if the slice index is out of range
/// or the dimensions do not fit an image buffer
pub fn to_dynamic_image(image: &NormalizedImage, slice: usize) -> Result<DynamicImage> {
    if slice >= image.slices() {
        return Err(ViewerError::invalid(format!(
            "slice {slice} out of range (image has {})",
            image.slices()
        )));
    }

    let width = u32::try_from(image.cols())
        .map_err(|_| ViewerError::invalid("image too wide"))?;
    let height = u32::try_from(image.rows())
        .map_err(|_| ViewerError::invalid("image too tall"))?;

    // Row-major with interleaved channels, matching the image crate layout
    let pixels: Vec<u8> = image
        .data()
        .index_axis(Axis(0), slice)
        .iter()
        .copied()
        .collect();

    match image.channels() {
        1 => {
            let gray: GrayImage = ImageBuffer::from_raw(width, height, pixels)
                .ok_or_else(|| ViewerError::invalid("Failed to create grayscale image buffer"))?;
            Ok(DynamicImage::ImageLuma8(gray))
        }
        3 => {
            let rgb: RgbImage = ImageBuffer::from_raw(width, height, pixels)
                .ok_or_else(|| ViewerError::invalid("Failed to create RGB image buffer"))?;
            Ok(DynamicImage::ImageRgb8(rgb))
        }
        other => Err(ViewerError::invalid(format!(
            "unsupported channel count {other}"
        ))),
    }
}
