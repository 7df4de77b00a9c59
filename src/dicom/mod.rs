//! DICOM file parsing
//!
//! This module opens DICOM files, extracts the attributes the viewer needs
//! and decodes the first frame of pixel data into physical units.

mod metadata;
mod parser;
mod photometric;
mod record;
mod validation;

pub use metadata::{
    extract_metadata, MetadataField, MetadataSummary, NOT_AVAILABLE, SLICE_OVERLAY_FIELDS,
    UNKNOWN, VOLUME_OVERLAY_FIELDS,
};
pub use photometric::PhotometricInterpretation;
pub use record::{SliceHeader, SliceRecord};

use crate::error::{Result, ViewerError};
use anyhow::Context;
use dicom::dictionary_std::tags;
use dicom::object::{
    open_file,
    FileDicomObject,
    InMemDicomObject,
    OpenFileOptions,
    StandardDataDictionary
};
use dicom::pixeldata::PixelDecoder;
use dicom_pixeldata::{ConvertOptions, ModalityLutOption};
use ndarray::{Array3, Axis};
use std::path::Path;
use tracing::debug;

pub type DicomFile = FileDicomObject<InMemDicomObject<StandardDataDictionary>>;

/// Extension that marks a file as DICOM
pub const DICOM_EXTENSION: &str = ".dcm";

/// Whether a file name denotes a DICOM file
#[inline]
#[must_use]
pub fn is_dicom_file_name(name: &str) -> bool {
    name.ends_with(DICOM_EXTENSION)
}

/// Open and parse a DICOM file
///
/// # Errors
///
/// [`ViewerError::NotFound`] if the path does not exist,
/// [`ViewerError::Decode`] if it is not a readable DICOM file
pub fn open_dicom_file(file_path: &Path) -> Result<DicomFile> {
    ensure_exists(file_path)?;
    open_file(file_path).map_err(|e| ViewerError::decode(file_path, e))
}

/// Read attributes only, stopping before the pixel data
///
/// # Errors
///
/// Same as [`open_dicom_file`], plus [`ViewerError::Decode`] when the image
/// attributes are missing or inconsistent
pub fn read_header(file_path: &Path) -> Result<SliceHeader> {
    ensure_exists(file_path)?;
    let obj = OpenFileOptions::new()
        .read_until(tags::PIXEL_DATA)
        .open_file(file_path)
        .map_err(|e| ViewerError::decode(file_path, e))?;
    extract_header(file_path, &obj).map_err(|e| ViewerError::decode(file_path, e))
}

/// Open a file and decode its first frame with the modality rescale applied
///
/// # Errors
///
/// Same as [`open_dicom_file`], plus [`ViewerError::Decode`] when the pixel
/// data cannot be decoded
pub fn decode_slice(file_path: &Path) -> Result<SliceRecord> {
    let obj = open_dicom_file(file_path)?;
    decode_object(file_path, &obj).map_err(|e| ViewerError::decode(file_path, e))
}

fn ensure_exists(file_path: &Path) -> Result<()> {
    if file_path.exists() {
        Ok(())
    } else {
        Err(ViewerError::NotFound(file_path.to_path_buf()))
    }
}

fn extract_header(file_path: &Path, obj: &DicomFile) -> anyhow::Result<SliceHeader> {
    let error_context = parser::ErrorContext::from(obj);

    let dimensions = parser::extract_dimensions(obj, &error_context)?;
    validation::validate_dimensions(dimensions)?;

    let photometric_interpretation = parser::extract_photometric_interpretation(obj);
    let samples_per_pixel = parser::extract_samples_per_pixel(obj);
    let channels =
        validation::validate_photometric_samples(&photometric_interpretation, samples_per_pixel)?;

    Ok(SliceHeader {
        path: file_path.to_path_buf(),
        dimensions,
        channels,
        photometric_interpretation,
        rescale: parser::extract_rescale_params(obj),
        number_of_frames: parser::extract_number_of_frames(obj),
        series_instance_uid: parser::extract_series_instance_uid(obj),
        instance_number: parser::extract_instance_number(obj),
        image_position: parser::extract_image_position(obj),
        pixel_spacing: parser::extract_pixel_spacing(obj),
        slice_thickness: parser::extract_slice_thickness(obj),
        fields: parser::extract_fields(obj),
    })
}

fn decode_object(file_path: &Path, obj: &DicomFile) -> anyhow::Result<SliceRecord> {
    let header = extract_header(file_path, obj)?;

    if header.number_of_frames > 1 {
        debug!(
            "{} has {} frames, using the first",
            file_path.display(),
            header.number_of_frames
        );
    }

    let decoded = obj
        .decode_pixel_data()
        .context("Failed to decode pixel data")?;

    // Stored values only; the rescale is applied below from the header
    let options = ConvertOptions::new().with_modality_lut(ModalityLutOption::None);
    let frames = decoded
        .to_ndarray_with_options::<f32>(&options)
        .context("Failed to convert pixel data")?;

    let frame: Array3<f32> = frames.index_axis_move(Axis(0), 0);
    validation::validate_frame_shape(
        (
            usize::from(header.dimensions.rows),
            usize::from(header.dimensions.cols),
            header.channels,
        ),
        frame.dim(),
    )?;

    let pixels = if header.rescale.is_identity() {
        frame
    } else {
        let rescale = header.rescale;
        frame.mapv_into(|v| rescale.apply(v))
    };

    Ok(SliceRecord { header, pixels })
}
