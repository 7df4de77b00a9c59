use super::NormalizedImage;
use ndarray::Axis;

pub const BIN_COUNT: usize = 256;

/// Per-channel intensity counts over 0..=255
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    channels: Vec<[u64; BIN_COUNT]>,
}

impl Histogram {
    /// Count samples of every channel independently
    #[must_use]
    pub fn compute(image: &NormalizedImage) -> Self {
        let channels = image
            .data()
            .axis_iter(Axis(3))
            .map(|channel| {
                let mut bins = [0u64; BIN_COUNT];
                for &value in channel {
                    bins[usize::from(value)] += 1;
                }
                bins
            })
            .collect();

        Self { channels }
    }

    #[inline]
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    #[inline]
    #[must_use]
    pub fn channel(&self, index: usize) -> Option<&[u64; BIN_COUNT]> {
        self.channels.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u64; BIN_COUNT]> {
        self.channels.iter()
    }

    /// Total count of one channel, equal to the pixel count of the image
    #[must_use]
    pub fn total(&self, index: usize) -> u64 {
        self.channel(index).map_or(0, |bins| bins.iter().sum())
    }

    /// Largest bin across all channels, used to scale plots
    #[must_use]
    pub fn peak(&self) -> u64 {
        self.channels
            .iter()
            .flat_map(|bins| bins.iter().copied())
            .max()
            .unwrap_or(0)
    }

    /// Merge the 256 bins of a channel into `buckets` roughly equal groups
    #[must_use]
    pub fn rebin(&self, index: usize, buckets: usize) -> Vec<u64> {
        let Some(bins) = self.channel(index) else {
            return Vec::new();
        };
        let buckets = buckets.clamp(1, BIN_COUNT);
        (0..buckets)
            .map(|b| {
                let start = b * BIN_COUNT / buckets;
                let end = (b + 1) * BIN_COUNT / buckets;
                bins[start..end].iter().sum()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{normalize, Image};
    use ndarray::Array;

    #[test]
    fn test_grayscale_histogram() {
        let image = NormalizedImage::from_array(
            Array::from_shape_vec((1, 2, 3, 1), vec![0, 0, 7, 255, 255, 255]).unwrap(),
        );
        let hist = Histogram::compute(&image);
        assert_eq!(hist.channel_count(), 1);
        let bins = hist.channel(0).unwrap();
        assert_eq!(bins[0], 2);
        assert_eq!(bins[7], 1);
        assert_eq!(bins[255], 3);
        assert_eq!(hist.total(0), 6);
        assert_eq!(hist.peak(), 3);
    }

    #[test]
    fn test_rgb_channels_are_independent() {
        // Two pixels: (10, 20, 30) and (10, 40, 30)
        let image = NormalizedImage::from_array(
            Array::from_shape_vec((1, 1, 2, 3), vec![10, 20, 30, 10, 40, 30]).unwrap(),
        );
        let hist = Histogram::compute(&image);
        assert_eq!(hist.channel_count(), 3);
        assert_eq!(hist.channel(0).unwrap()[10], 2);
        assert_eq!(hist.channel(1).unwrap()[20], 1);
        assert_eq!(hist.channel(1).unwrap()[40], 1);
        assert_eq!(hist.channel(2).unwrap()[30], 2);
        assert!(hist.channel(3).is_none());
    }

    #[test]
    fn test_counts_sum_to_pixel_count() {
        let values: Vec<f32> = (0..5 * 7 * 9 * 3).map(|i| ((i * 31) % 997) as f32).collect();
        let image = Image::new(Array::from_shape_vec((5, 7, 9, 3), values).unwrap()).unwrap();
        let normalized = normalize(&image);
        let hist = Histogram::compute(&normalized);
        for channel in 0..hist.channel_count() {
            assert_eq!(hist.total(channel), normalized.pixel_count() as u64);
        }
    }

    #[test]
    fn test_rebin_preserves_total() {
        let values: Vec<u8> = (0..=255).collect();
        let image = NormalizedImage::from_array(
            Array::from_shape_vec((1, 16, 16, 1), values).unwrap(),
        );
        let hist = Histogram::compute(&image);
        let buckets = hist.rebin(0, 60);
        assert_eq!(buckets.len(), 60);
        assert_eq!(buckets.iter().sum::<u64>(), 256);
        assert_eq!(hist.rebin(0, 1000).len(), BIN_COUNT);
        assert!(hist.rebin(1, 10).is_empty());
    }
}
