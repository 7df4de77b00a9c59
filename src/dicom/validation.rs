use anyhow::{bail, Result};
use crate::dicom::PhotometricInterpretation;
use crate::types::Dimensions;

#[inline]
pub fn validate_photometric_samples(
    photometric_interpretation: &PhotometricInterpretation,
    samples_per_pixel: u16,
) -> Result<usize> {
    match photometric_interpretation.channels() {
        Some(channels) if channels == usize::from(samples_per_pixel) => Ok(channels),
        Some(_) => bail!(
            "Inconsistent photometric interpretation {photometric_interpretation} with samples per pixel {samples_per_pixel}"
        ),
        None => bail!("Unsupported photometric interpretation {photometric_interpretation}"),
    }
}

#[inline]
pub fn validate_dimensions(dimensions: Dimensions) -> Result<()> {
    if !dimensions.is_valid() {
        bail!("Invalid image dimensions {dimensions}");
    }
    Ok(())
}

/// Decoded frame must match the header it was decoded from
pub fn validate_frame_shape(
    expected: (usize, usize, usize),
    actual: (usize, usize, usize),
) -> Result<()> {
    if expected != actual {
        bail!(
            "Decoded frame shape {actual:?} does not match header (rows, cols, samples) {expected:?}"
        );
    }
    Ok(())
}
