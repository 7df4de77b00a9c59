use super::NormalizedImage;
use crate::types::ToneParameters;

/// Apply brightness and contrast to a normalized image.
///
/// Contrast stretches samples around the image mean, then brightness scales
/// the result. The mean is taken from `image` on every call, so repeated
/// adjustments of the same baseline never drift.
#[must_use]
pub fn adjust(image: &NormalizedImage, tone: ToneParameters) -> NormalizedImage {
    if tone.is_identity() {
        return image.clone();
    }

    let mean = mean(image);
    let contrast = tone.contrast();
    let brightness = tone.brightness();

    // The cast truncates; neutral contrast skips the mean round trip
    let stretch = contrast != 1.0;
    NormalizedImage::from_array(image.data().mapv(|v| {
        let x = f64::from(v);
        let centred = if stretch { (x - mean) * contrast + mean } else { x };
        (centred * brightness).clamp(0.0, 255.0) as u8
    }))
}

#[inline]
fn mean(image: &NormalizedImage) -> f64 {
    let data = image.data();
    if data.is_empty() {
        return 0.0;
    }
    let sum: u64 = data.iter().map(|&v| u64::from(v)).sum();
    sum as f64 / data.len() as f64
}
