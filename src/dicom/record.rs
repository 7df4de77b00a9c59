//! Decoded slices

use super::metadata::MetadataField;
use super::PhotometricInterpretation;
use crate::types::{Dimensions, PixelSpacing, RescaleParams};
use ndarray::Array3;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Everything read from one file except its pixels
#[derive(Debug, Clone, PartialEq)]
pub struct SliceHeader {
    pub path: PathBuf,
    pub dimensions: Dimensions,
    pub channels: usize,
    pub photometric_interpretation: PhotometricInterpretation,
    pub rescale: RescaleParams,
    pub number_of_frames: u32,
    pub series_instance_uid: Option<String>,
    pub instance_number: Option<i32>,
    pub image_position: Option<[f64; 3]>,
    pub pixel_spacing: Option<PixelSpacing>,
    pub slice_thickness: Option<f64>,
    pub(crate) fields: BTreeMap<MetadataField, String>,
}

impl SliceHeader {
    /// Stored text of a descriptive field, if the file carried it
    #[must_use]
    pub fn field(&self, field: MetadataField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }

    #[cfg(test)]
    pub(crate) fn for_tests(fields: BTreeMap<MetadataField, String>) -> Self {
        Self {
            path: PathBuf::from("test.dcm"),
            dimensions: Dimensions::new(1, 1),
            channels: 1,
            photometric_interpretation: PhotometricInterpretation::Monochrome2,
            rescale: RescaleParams::identity(),
            number_of_frames: 1,
            series_instance_uid: None,
            instance_number: None,
            image_position: None,
            pixel_spacing: None,
            slice_thickness: None,
            fields,
        }
    }
}

/// One decoded slice: header plus `(rows, cols, channels)` samples in
/// physical units (modality rescale already applied)
#[derive(Debug, Clone)]
pub struct SliceRecord {
    pub header: SliceHeader,
    pub pixels: Array3<f32>,
}

impl SliceRecord {
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.header.path
    }

    #[must_use]
    pub fn into_parts(self) -> (SliceHeader, Array3<f32>) {
        (self.header, self.pixels)
    }
}
