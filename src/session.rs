//! Interactive viewing state
//!
//! A session owns the normalized baseline of whatever was loaded and the
//! current slider values. Rendering always starts again from the baseline.

use crate::dicom::{
    self, extract_metadata, MetadataSummary, SliceHeader, SliceRecord, NOT_AVAILABLE,
    SLICE_OVERLAY_FIELDS,
};
use crate::error::{Result, ViewerError};
use crate::image::{adjust, load_raster, normalize, Histogram, Image, NormalizedImage};
use crate::series::{load_series, LoadOptions, SeriesStack};
use crate::types::ToneParameters;
use std::path::Path;
use tracing::{debug, info};

/// Everything needed to draw the current view
#[derive(Debug, Clone)]
pub struct Frame {
    pub slice_index: usize,
    pub slice_count: usize,
    pub image: NormalizedImage,
    pub histogram: Histogram,
    pub metadata: Option<MetadataSummary>,
}

#[derive(Debug, Clone)]
pub struct ViewerSession {
    baseline: NormalizedImage,
    headers: Vec<SliceHeader>,
    tone: ToneParameters,
    slice_index: usize,
}

impl ViewerSession {
    /// Start a session over a raw image; `headers` is either empty or one per slice
    ///
    /// # Errors
    ///
    /// [`ViewerError::InvalidInput`] if there are headers but not one per slice
    pub fn new(image: &Image, headers: Vec<SliceHeader>) -> Result<Self> {
        if !headers.is_empty() && headers.len() != image.slices() {
            return Err(ViewerError::invalid(format!(
                "{} slice headers for {} slices",
                headers.len(),
                image.slices()
            )));
        }
        Ok(Self::with_headers(image, headers))
    }

    fn with_headers(image: &Image, headers: Vec<SliceHeader>) -> Self {
        let baseline = normalize(image);
        let slice_index = baseline.slices() / 2;
        Self {
            baseline,
            headers,
            tone: ToneParameters::default(),
            slice_index,
        }
    }

    /// Session over a stacked series, normalized across all slices
    #[must_use]
    pub fn from_series(stack: SeriesStack) -> Self {
        // load_series yields one header per stacked slice
        Self::with_headers(&stack.image, stack.headers)
    }

    /// Session over one DICOM file
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::InvalidInput`] if the decoded pixels are not a valid image
    pub fn from_record(record: SliceRecord) -> Result<Self> {
        let (header, pixels) = record.into_parts();
        let image = Image::from_slice(pixels)?;
        Ok(Self::with_headers(&image, vec![header]))
    }

    /// Session over a generic raster image (no metadata)
    #[must_use]
    pub fn from_raster(image: &Image) -> Self {
        Self::with_headers(image, Vec::new())
    }

    /// Open a directory as a series, a `.dcm` file as one slice, and anything
    /// else as a raster image
    ///
    /// # Errors
    ///
    /// [`ViewerError::NotFound`] for a missing path, otherwise whatever the
    /// matching loader reports
    pub fn open(path: &Path, options: &LoadOptions) -> Result<Self> {
        if !path.exists() {
            return Err(ViewerError::NotFound(path.to_path_buf()));
        }

        if path.is_dir() {
            let stack = load_series(path, options)?;
            info!("Loaded {} slices from {}", stack.len(), path.display());
            return Ok(Self::from_series(stack));
        }

        let is_dicom = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(dicom::is_dicom_file_name);
        if is_dicom {
            Self::from_record(dicom::decode_slice(path)?)
        } else {
            Ok(Self::from_raster(&load_raster(path)?))
        }
    }

    #[must_use]
    pub fn baseline(&self) -> &NormalizedImage {
        &self.baseline
    }

    #[must_use]
    pub fn tone(&self) -> ToneParameters {
        self.tone
    }

    #[must_use]
    pub fn slice_index(&self) -> usize {
        self.slice_index
    }

    #[must_use]
    pub fn slice_count(&self) -> usize {
        self.baseline.slices()
    }

    pub fn set_brightness(&mut self, brightness: f64) {
        self.tone = ToneParameters::clamped(brightness, self.tone.contrast());
    }

    pub fn set_contrast(&mut self, contrast: f64) {
        self.tone = ToneParameters::clamped(self.tone.brightness(), contrast);
    }

    pub fn set_tone(&mut self, tone: ToneParameters) {
        self.tone = tone;
    }

    /// Move to a slice, clamping to the last one
    pub fn select_slice(&mut self, index: usize) {
        self.slice_index = index.min(self.slice_count().saturating_sub(1));
    }

    /// Header of the current slice, when the session came from DICOM
    #[must_use]
    pub fn current_header(&self) -> Option<&SliceHeader> {
        self.headers.get(self.slice_index)
    }

    /// Adjust the current slice of the baseline and recompute its histogram
    #[must_use]
    pub fn render(&self) -> Frame {
        let slice = self
            .baseline
            .slice(self.slice_index)
            .unwrap_or_else(|| self.baseline.clone());
        let image = adjust(&slice, self.tone);
        let histogram = Histogram::compute(&image);
        debug!("Rendered slice {} with {}", self.slice_index, self.tone);

        Frame {
            slice_index: self.slice_index,
            slice_count: self.slice_count(),
            image,
            histogram,
            metadata: self
                .current_header()
                .map(|h| extract_metadata(h, &SLICE_OVERLAY_FIELDS, NOT_AVAILABLE)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dicom::testing::SyntheticSlice;
    use crate::dicom::MetadataField;
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;
    use ndarray::Array;
    use std::collections::BTreeMap;

    fn stack_of(values: &[f32], slices: usize) -> Image {
        let per_slice = values.len() / slices;
        Image::new(Array::from_shape_vec((slices, 1, per_slice, 1), values.to_vec()).unwrap())
            .unwrap()
    }

    #[test]
    fn test_starts_on_middle_slice_with_defaults() {
        let session = ViewerSession::from_raster(&stack_of(&[0.0; 10], 5));
        assert_eq!(session.slice_index(), 2);
        assert_eq!(session.slice_count(), 5);
        assert!(session.tone().is_identity());
    }

    #[test]
    fn test_render_at_defaults_is_the_baseline_slice() {
        let session = ViewerSession::from_raster(&stack_of(&[0.0, 10.0, 20.0, 40.0], 2));
        let frame = session.render();
        assert_eq!(frame.slice_index, 1);
        assert_eq!(frame.image.to_vec(), vec![128, 255]);
        assert_eq!(frame.histogram.total(0), 2);
        assert!(frame.metadata.is_none());
    }

    #[test]
    fn test_sliders_are_clamped_and_not_cumulative() {
        let mut session = ViewerSession::from_raster(&stack_of(&[0.0, 50.0, 100.0], 1));
        let baseline = session.render().image;

        session.set_brightness(10.0);
        assert_relative_eq!(session.tone().brightness(), 2.0);
        session.set_contrast(0.1);
        assert_relative_eq!(session.tone().contrast(), 0.5);
        let _ = session.render();
        let _ = session.render();

        session.set_brightness(1.0);
        session.set_contrast(1.0);
        assert_eq!(session.render().image, baseline);
    }

    #[test]
    fn test_select_slice_clamps() {
        let mut session = ViewerSession::from_raster(&stack_of(&[0.0; 6], 3));
        session.select_slice(0);
        assert_eq!(session.slice_index(), 0);
        session.select_slice(99);
        assert_eq!(session.slice_index(), 2);
    }

    #[test]
    fn test_metadata_follows_the_slice() {
        let image = stack_of(&[0.0, 1.0, 2.0, 3.0], 2);
        let headers = ["first", "second"]
            .into_iter()
            .map(|desc| {
                let mut fields = BTreeMap::new();
                fields.insert(MetadataField::StudyDescription, desc.to_string());
                SliceHeader::for_tests(fields)
            })
            .collect();
        let mut session = ViewerSession::new(&image, headers).unwrap();

        session.select_slice(0);
        let metadata = session.render().metadata.unwrap();
        assert_eq!(metadata.get(MetadataField::StudyDescription), Some("first"));
        assert_eq!(metadata.get(MetadataField::PatientName), Some("N/A"));

        session.select_slice(1);
        let metadata = session.render().metadata.unwrap();
        assert_eq!(metadata.get(MetadataField::StudyDescription), Some("second"));
    }

    #[test]
    fn test_open_dispatches_on_path_kind() {
        let dir = tempfile::tempdir().unwrap();
        let series = dir.path().join("series");
        std::fs::create_dir(&series).unwrap();
        for idx in 0..3u16 {
            SyntheticSlice::filled(2, 2, idx * 10).write(&series.join(format!("{idx}.dcm")));
        }
        let session = ViewerSession::open(&series, &LoadOptions::default()).unwrap();
        assert_eq!(session.slice_count(), 3);
        assert_eq!(session.slice_index(), 1);
        assert!(session.current_header().is_some());

        let single = ViewerSession::open(&series.join("2.dcm"), &LoadOptions::default()).unwrap();
        assert_eq!(single.slice_count(), 1);
        assert!(single.render().metadata.is_some());

        let png = dir.path().join("plain.png");
        ::image::GrayImage::from_raw(2, 1, vec![0, 255]).unwrap().save(&png).unwrap();
        let raster = ViewerSession::open(&png, &LoadOptions::default()).unwrap();
        assert_eq!(raster.baseline().to_vec(), vec![0, 255]);
        assert!(raster.current_header().is_none());

        assert_matches!(
            ViewerSession::open(&dir.path().join("missing"), &LoadOptions::default()),
            Err(ViewerError::NotFound(_))
        );
    }

    #[test]
    fn test_header_count_must_match_slices() {
        let image = stack_of(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0], 3);
        let headers = vec![SliceHeader::for_tests(BTreeMap::new()); 2];
        assert_matches!(
            ViewerSession::new(&image, headers),
            Err(ViewerError::InvalidInput(_))
        );

        let session = ViewerSession::new(&image, Vec::new()).unwrap();
        assert!(session.current_header().is_none());
    }
}
