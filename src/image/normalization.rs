use super::{Image, NormalizedImage};

#[inline]
#[must_use]
pub fn find_min_max<'a>(values: impl IntoIterator<Item = &'a f32>) -> (f32, f32) {
    values
        .into_iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), &val| {
            (min.min(val), max.max(val))
        })
}

/// Map every sample of `image` onto 0..=255 using the global min and max.
///
/// The min and max are taken across all slices and channels, so a stack keeps
/// its relative intensities between slices. A constant image maps to all zeros.
#[must_use]
pub fn normalize(image: &Image) -> NormalizedImage {
    let (min, max) = find_min_max(image.data().iter());

    if max > min {
        // Widen to f64 so large physical ranges keep their precision
        let min = f64::from(min);
        let range = f64::from(max) - min;
        NormalizedImage::from_array(
            image
                .data()
                .mapv(|v| normalize_sample(f64::from(v), min, range)),
        )
    } else {
        NormalizedImage::from_array(image.data().mapv(|_| 0u8))
    }
}

#[inline]
#[must_use]
fn normalize_sample(value: f64, min: f64, range: f64) -> u8 {
    let scaled = (value - min) / range * 255.0;
    // Saturating cast guards against rounding just outside the range
    scaled.round().clamp(0.0, 255.0) as u8
}
