//! Domain-specific value types shared by the loaders and the pipeline

use crate::error::{Result, ViewerError};
use std::fmt;
use std::ops::RangeInclusive;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub rows: u16,
    pub cols: u16,
}

impl Dimensions {
    #[must_use]
    pub fn new(rows: u16, cols: u16) -> Self {
        Self { rows, cols }
    }

    #[inline]
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        usize::from(self.rows) * usize::from(self.cols)
    }

    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.rows > 0 && self.cols > 0
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{cols}x{rows}", cols = self.cols, rows = self.rows)
    }
}

/// Modality rescale converting stored pixel values to physical units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RescaleParams {
    pub slope: f64,
    pub intercept: f64,
}

impl RescaleParams {
    #[must_use]
    pub fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    #[must_use]
    pub const fn identity() -> Self {
        Self {
            slope: 1.0,
            intercept: 0.0,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.slope == 1.0 && self.intercept == 0.0
    }

    #[inline(always)]
    #[must_use]
    // Hot path: called for every sample of every slice
    pub fn apply(&self, stored: f32) -> f32 {
        f64::from(stored).mul_add(self.slope, self.intercept) as f32
    }
}

impl Default for RescaleParams {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for RescaleParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "slope={slope}, intercept={intercept}",
            slope = self.slope,
            intercept = self.intercept
        )
    }
}

/// Physical distance between pixel centers in mm (row spacing, column spacing)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSpacing {
    pub row: f64,
    pub col: f64,
}

impl PixelSpacing {
    #[must_use]
    pub fn new(row: f64, col: f64) -> Self {
        Self { row, col }
    }

    /// Parse a DICOM multi-valued `row\col` string
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let (row, col) = value.split_once('\\')?;
        let row = row.trim().parse::<f64>().ok()?;
        let col = col.trim().parse::<f64>().ok()?;
        (row > 0.0 && col > 0.0).then_some(Self { row, col })
    }

    /// Vertical stretch needed to display pixels with their true proportions
    #[inline]
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        self.row / self.col
    }
}

impl fmt::Display for PixelSpacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{row}\\{col}", row = self.row, col = self.col)
    }
}

/// Brightness and contrast applied to a normalized image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneParameters {
    brightness: f64,
    contrast: f64,
}

impl ToneParameters {
    pub const BRIGHTNESS_RANGE: RangeInclusive<f64> = 0.1..=2.0;
    pub const CONTRAST_RANGE: RangeInclusive<f64> = 0.5..=2.0;

    /// # Errors
    ///
    /// Returns [`ViewerError::InvalidInput`] if either value is outside its range
    pub fn new(brightness: f64, contrast: f64) -> Result<Self> {
        if !Self::BRIGHTNESS_RANGE.contains(&brightness) {
            return Err(ViewerError::invalid(format!(
                "brightness {brightness} outside {:?}",
                Self::BRIGHTNESS_RANGE
            )));
        }
        if !Self::CONTRAST_RANGE.contains(&contrast) {
            return Err(ViewerError::invalid(format!(
                "contrast {contrast} outside {:?}",
                Self::CONTRAST_RANGE
            )));
        }
        Ok(Self {
            brightness,
            contrast,
        })
    }

    /// Build parameters from arbitrary slider values, clamping into range
    #[must_use]
    pub fn clamped(brightness: f64, contrast: f64) -> Self {
        Self {
            brightness: clamp_to(brightness, &Self::BRIGHTNESS_RANGE),
            contrast: clamp_to(contrast, &Self::CONTRAST_RANGE),
        }
    }

    #[inline]
    #[must_use]
    pub fn brightness(&self) -> f64 {
        self.brightness
    }

    #[inline]
    #[must_use]
    pub fn contrast(&self) -> f64 {
        self.contrast
    }

    #[inline]
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.brightness == 1.0 && self.contrast == 1.0
    }
}

impl Default for ToneParameters {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            contrast: 1.0,
        }
    }
}

impl fmt::Display for ToneParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "brightness={brightness:.2}, contrast={contrast:.2}",
            brightness = self.brightness,
            contrast = self.contrast
        )
    }
}

// NaN falls back to the neutral value
fn clamp_to(value: f64, range: &RangeInclusive<f64>) -> f64 {
    if value.is_nan() {
        1.0
    } else {
        value.clamp(*range.start(), *range.end())
    }
}
