use super::metadata::MetadataField;
use super::{DicomFile, PhotometricInterpretation};
use crate::types::{Dimensions, PixelSpacing, RescaleParams};
use anyhow::{Context, Result};
use dicom::core::dictionary::UidDictionary;
use dicom::dictionary_std::sop_class;
use dicom::dictionary_std::tags;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Partial metadata for error message context
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    pub modality: Option<String>,
    pub sop_class: Option<String>,
}

impl ErrorContext {
    pub fn format_error(&self, tag_name: &str) -> String {
        let mut parts = Vec::new();

        if let Some(modality) = &self.modality {
            parts.push(format!("Modality: {modality}"));
        }

        if let Some(sc) = &self.sop_class {
            parts.push(format!("SOP Class: {sc}"));
        }

        if parts.is_empty() {
            format!("Missing or invalid {tag_name} tag")
        } else {
            format!(
                "Missing or invalid {tag_name} tag - this may be a non-image DICOM file ({})",
                parts.join(", ")
            )
        }
    }
}

impl From<&DicomFile> for ErrorContext {
    fn from(obj: &DicomFile) -> Self {
        ErrorContext {
            modality: extract_string(obj, tags::MODALITY),
            sop_class: extract_sop_class_name(obj),
        }
    }
}

fn extract_string(obj: &DicomFile, tag: dicom::core::Tag) -> Option<String> {
    obj.get(tag)
        .and_then(|e| e.value().to_str().ok())
        .map(|s| s.trim().to_string())
}

pub fn extract_dimensions(obj: &DicomFile, error_context: &ErrorContext) -> Result<Dimensions> {
    let rows = obj
        .get(tags::ROWS)
        .and_then(|e| e.to_int::<u16>().ok())
        .with_context(|| error_context.format_error("Rows"))?;

    let cols = obj
        .get(tags::COLUMNS)
        .and_then(|e| e.to_int::<u16>().ok())
        .with_context(|| error_context.format_error("Columns"))?;

    Ok(Dimensions::new(rows, cols))
}

pub fn extract_rescale_params(obj: &DicomFile) -> RescaleParams {
    // Rescale Slope/Intercept are optional; CT and PET carry them to reach
    // Hounsfield or activity units, most other modalities store physical values
    let slope = obj
        .get(tags::RESCALE_SLOPE)
        .and_then(|e| e.to_float64().ok())
        .unwrap_or(1.0);

    let intercept = obj
        .get(tags::RESCALE_INTERCEPT)
        .and_then(|e| e.to_float64().ok())
        .unwrap_or(0.0);

    RescaleParams::new(slope, intercept)
}

#[inline]
pub fn extract_samples_per_pixel(obj: &DicomFile) -> u16 {
    obj.get(tags::SAMPLES_PER_PIXEL)
        .and_then(|e| e.to_int::<u16>().ok())
        .unwrap_or(1)
}

#[inline]
pub fn extract_number_of_frames(obj: &DicomFile) -> u32 {
    obj.get(tags::NUMBER_OF_FRAMES)
        .and_then(|e| e.to_int::<u32>().ok())
        .unwrap_or(1)
}

pub fn extract_photometric_interpretation(obj: &DicomFile) -> PhotometricInterpretation {
    extract_string(obj, tags::PHOTOMETRIC_INTERPRETATION)
        .map_or(PhotometricInterpretation::Monochrome2, |s| {
            match PhotometricInterpretation::from_str(&s) {
                Ok(pi) => pi,
                Err(never) => match never {},
            }
        })
}

pub fn extract_pixel_spacing(obj: &DicomFile) -> Option<PixelSpacing> {
    obj.get(tags::PIXEL_SPACING)
        .and_then(|e| e.value().to_str().ok())
        .and_then(|s| PixelSpacing::parse(&s))
}

#[inline]
pub fn extract_slice_thickness(obj: &DicomFile) -> Option<f64> {
    obj.get(tags::SLICE_THICKNESS)
        .and_then(|e| e.to_float64().ok())
}

#[inline]
pub fn extract_instance_number(obj: &DicomFile) -> Option<i32> {
    obj.get(tags::INSTANCE_NUMBER)
        .and_then(|e| e.to_int::<i32>().ok())
}

pub fn extract_image_position(obj: &DicomFile) -> Option<[f64; 3]> {
    let values = obj
        .get(tags::IMAGE_POSITION_PATIENT)
        .and_then(|e| e.to_multi_float64().ok())?;
    match values.as_slice() {
        [x, y, z] => Some([*x, *y, *z]),
        _ => None,
    }
}

#[inline]
pub fn extract_series_instance_uid(obj: &DicomFile) -> Option<String> {
    extract_string(obj, tags::SERIES_INSTANCE_UID)
        .map(|uid| uid.trim_end_matches('\0').to_string())
        .filter(|uid| !uid.is_empty())
}

pub fn extract_sop_class_name(obj: &DicomFile) -> Option<String> {
    obj.get(tags::SOP_CLASS_UID)
        .and_then(|e| e.value().to_str().ok())
        .and_then(|uid| {
            let uid = uid.trim_end_matches(['\0', ' ']);
            sop_class::StandardSopClassDictionary
                .by_uid(uid)
                .map(|entry| entry.name.to_string())
        })
}

/// Text of every schema field present on the object
pub fn extract_fields(obj: &DicomFile) -> BTreeMap<MetadataField, String> {
    MetadataField::ALL
        .into_iter()
        .filter_map(|field| extract_string(obj, field.tag()).map(|value| (field, value)))
        .collect()
}
