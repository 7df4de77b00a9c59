//! Generic raster files (PNG, JPEG, ...) loaded through the `image` crate

use super::Image;
use crate::error::{Result, ViewerError};
use ndarray::Array4;
use std::path::Path;
use tracing::debug;

/// Read a raster file into a single-slice [`Image`].
///
/// Grayscale files keep one channel; anything with color becomes RGB. Alpha
/// is dropped. Samples are scaled to 0.0..=1.0 by the decoder, which the
/// min-max normalization downstream makes irrelevant.
///
/// # Errors
///
/// Returns [`ViewerError::NotFound`] if the path does not exist and
/// [`ViewerError::Decode`] if the file is not a readable image
pub fn load_raster(path: &Path) -> Result<Image> {
    if !path.exists() {
        return Err(ViewerError::NotFound(path.to_path_buf()));
    }

    let decoded = image::open(path).map_err(|e| ViewerError::decode(path, e))?;
    let (width, height) = (decoded.width() as usize, decoded.height() as usize);
    debug!(
        "Decoded {} as {width}x{height} {:?}",
        path.display(),
        decoded.color()
    );

    let (channels, samples) = if decoded.color().has_color() {
        (3, decoded.to_rgb32f().into_raw())
    } else {
        (1, decoded.to_luma32f().into_raw())
    };

    let data = Array4::from_shape_vec((1, height, width, channels), samples)
        .map_err(|e| ViewerError::decode(path, e))?;
    Image::new(data)
}
