//! In-memory images and the display pipeline
//!
//! Every image is stored as a stack of slices with shape
//! `(slices, rows, cols, channels)`. A single 2D image is a stack of one.
//! Raw intensities live in [`Image`]; display-ready samples live in
//! [`NormalizedImage`], which only the normalizer and the tone adjuster produce.

mod convert;
mod histogram;
mod normalization;
mod raster;
mod tone;

pub use convert::to_dynamic_image;
pub use histogram::{Histogram, BIN_COUNT};
pub use normalization::normalize;
pub use raster::load_raster;
pub use tone::adjust;

use crate::error::{Result, ViewerError};
use ndarray::{Array3, Array4, ArrayView3, Axis};

/// Raw intensity samples of one image or a stack of slices
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    data: Array4<f32>,
}

impl Image {
    /// Wrap a `(slices, rows, cols, channels)` array.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::InvalidInput`] if the array has no samples, the
    /// channel count is not 1 or 3, or any sample is NaN or infinite
    pub fn new(data: Array4<f32>) -> Result<Self> {
        let (slices, rows, cols, channels) = data.dim();
        if slices == 0 || rows == 0 || cols == 0 {
            return Err(ViewerError::invalid(format!(
                "empty image ({slices} slices of {cols}x{rows})"
            )));
        }
        if !matches!(channels, 1 | 3) {
            return Err(ViewerError::invalid(format!(
                "unsupported channel count {channels} (expected 1 or 3)"
            )));
        }
        if let Some(bad) = data.iter().find(|v| !v.is_finite()) {
            return Err(ViewerError::invalid(format!("non-numeric sample {bad}")));
        }
        Ok(Self { data })
    }

    /// Wrap a single `(rows, cols, channels)` slice
    ///
    /// # Errors
    ///
    /// Same conditions as [`Image::new`]
    pub fn from_slice(slice: Array3<f32>) -> Result<Self> {
        Self::new(slice.insert_axis(Axis(0)))
    }

    /// Stack equally-shaped slices along a new leading axis
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::InvalidInput`] if there are no slices or their
    /// shapes differ, plus the conditions of [`Image::new`]
    pub fn stack(slices: &[ArrayView3<'_, f32>]) -> Result<Self> {
        let first = slices
            .first()
            .ok_or_else(|| ViewerError::invalid("cannot stack zero slices"))?;
        if let Some((idx, odd)) = slices
            .iter()
            .enumerate()
            .find(|(_, s)| s.dim() != first.dim())
        {
            return Err(ViewerError::invalid(format!(
                "slice {idx} has shape {:?}, expected {:?}",
                odd.dim(),
                first.dim()
            )));
        }
        let data = ndarray::stack(Axis(0), slices)
            .map_err(|e| ViewerError::invalid(format!("cannot stack slices: {e}")))?;
        Self::new(data)
    }

    #[inline]
    #[must_use]
    pub fn data(&self) -> &Array4<f32> {
        &self.data
    }

    #[must_use]
    pub fn into_data(self) -> Array4<f32> {
        self.data
    }

    #[inline]
    #[must_use]
    pub fn slices(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    #[inline]
    #[must_use]
    pub fn rows(&self) -> usize {
        self.data.len_of(Axis(1))
    }

    #[inline]
    #[must_use]
    pub fn cols(&self) -> usize {
        self.data.len_of(Axis(2))
    }

    #[inline]
    #[must_use]
    pub fn channels(&self) -> usize {
        self.data.len_of(Axis(3))
    }

    /// Keep only the given slices, in the given order
    #[must_use]
    pub fn select_slices(&self, indices: &[usize]) -> Option<Self> {
        if indices.is_empty() || indices.iter().any(|&i| i >= self.slices()) {
            return None;
        }
        Some(Self {
            data: self.data.select(Axis(0), indices),
        })
    }
}

/// 8-bit display samples; every adjustment yields a new value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedImage {
    data: Array4<u8>,
}

impl NormalizedImage {
    pub(crate) fn from_array(data: Array4<u8>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn data(&self) -> &Array4<u8> {
        &self.data
    }

    #[inline]
    #[must_use]
    pub fn slices(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    #[inline]
    #[must_use]
    pub fn rows(&self) -> usize {
        self.data.len_of(Axis(1))
    }

    #[inline]
    #[must_use]
    pub fn cols(&self) -> usize {
        self.data.len_of(Axis(2))
    }

    #[inline]
    #[must_use]
    pub fn channels(&self) -> usize {
        self.data.len_of(Axis(3))
    }

    /// Number of samples per channel (pixels across all slices)
    #[inline]
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.slices() * self.rows() * self.cols()
    }

    /// Copy one slice out as its own single-slice image
    #[must_use]
    pub fn slice(&self, index: usize) -> Option<Self> {
        (index < self.slices()).then(|| Self {
            data: self
                .data
                .index_axis(Axis(0), index)
                .to_owned()
                .insert_axis(Axis(0)),
        })
    }

    /// Samples in row-major order, channels interleaved
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        self.data.iter().copied().collect()
    }
}
