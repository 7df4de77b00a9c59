use super::TransferFunction;
use crate::error::{Result, ViewerError};
use crate::image::Image;
use image::{Rgb, RgbImage};
use ndarray::{Array2, Axis};

/// Lowest brightness a fully transparent voxel keeps in the preview
const MIN_VISIBILITY: f64 = 0.25;

/// Maximum intensity along the slice axis, shape `(rows, cols)`
///
/// # Errors
///
/// [`ViewerError::InvalidInput`] for color images
pub fn max_intensity_projection(image: &Image) -> Result<Array2<f32>> {
    if image.channels() != 1 {
        return Err(ViewerError::invalid("projection needs grayscale slices"));
    }
    let plane = image.data().index_axis(Axis(3), 0);
    Ok(plane.fold_axis(Axis(0), f32::NEG_INFINITY, |acc, &v| acc.max(v)))
}

/// Project the volume and color it through `tf`
///
/// # Errors
///
/// See [`max_intensity_projection`]
pub fn render_preview(image: &Image, tf: &TransferFunction) -> Result<RgbImage> {
    let projection = max_intensity_projection(image)?;
    let (rows, cols) = projection.dim();
    let width = u32::try_from(cols).map_err(|_| ViewerError::invalid("image too wide"))?;
    let height = u32::try_from(rows).map_err(|_| ViewerError::invalid("image too tall"))?;

    Ok(RgbImage::from_fn(width, height, |x, y| {
        let value = f64::from(projection[[y as usize, x as usize]]);
        let visibility = MIN_VISIBILITY + (1.0 - MIN_VISIBILITY) * tf.opacity_at(value);
        Rgb(tf.color_at(value).map(|c| (c * visibility * 255.0).round().clamp(0.0, 255.0) as u8))
    }))
}
