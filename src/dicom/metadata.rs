//! Descriptive fields shown next to an image
//!
//! The recognized fields form a fixed schema. A slice header stores whatever
//! subset its file carried; extraction fills the gaps with a placeholder.

use super::SliceHeader;
use dicom::core::Tag;
use dicom::dictionary_std::tags;
use std::fmt;

/// Placeholder used by the slice viewer overlay
pub const NOT_AVAILABLE: &str = "N/A";
/// Placeholder used by the volume overlay
pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetadataField {
    PatientName,
    PatientId,
    PatientSex,
    PatientBirthDate,
    Modality,
    StudyDate,
    StudyDescription,
    SeriesNumber,
    SliceThickness,
    PixelSpacing,
    Manufacturer,
    BodyPartExamined,
}

impl MetadataField {
    pub const ALL: [Self; 12] = [
        Self::PatientName,
        Self::PatientId,
        Self::PatientSex,
        Self::PatientBirthDate,
        Self::Modality,
        Self::StudyDate,
        Self::StudyDescription,
        Self::SeriesNumber,
        Self::SliceThickness,
        Self::PixelSpacing,
        Self::Manufacturer,
        Self::BodyPartExamined,
    ];

    #[must_use]
    pub fn tag(self) -> Tag {
        match self {
            Self::PatientName => tags::PATIENT_NAME,
            Self::PatientId => tags::PATIENT_ID,
            Self::PatientSex => tags::PATIENT_SEX,
            Self::PatientBirthDate => tags::PATIENT_BIRTH_DATE,
            Self::Modality => tags::MODALITY,
            Self::StudyDate => tags::STUDY_DATE,
            Self::StudyDescription => tags::STUDY_DESCRIPTION,
            Self::SeriesNumber => tags::SERIES_NUMBER,
            Self::SliceThickness => tags::SLICE_THICKNESS,
            Self::PixelSpacing => tags::PIXEL_SPACING,
            Self::Manufacturer => tags::MANUFACTURER,
            Self::BodyPartExamined => tags::BODY_PART_EXAMINED,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::PatientName => "Patient Name",
            Self::PatientId => "Patient ID",
            Self::PatientSex => "Patient Sex",
            Self::PatientBirthDate => "Patient Birthdate",
            Self::Modality => "Modality",
            Self::StudyDate => "Study Date",
            Self::StudyDescription => "Study Description",
            Self::SeriesNumber => "Series Number",
            Self::SliceThickness => "Slice Thickness",
            Self::PixelSpacing => "Pixel Spacing",
            Self::Manufacturer => "Manufacturer",
            Self::BodyPartExamined => "Body Part Examined",
        }
    }
}

impl fmt::Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fields shown over a single slice
pub const SLICE_OVERLAY_FIELDS: [MetadataField; 12] = MetadataField::ALL;

/// Fields shown over a rendered volume
pub const VOLUME_OVERLAY_FIELDS: [MetadataField; 4] = [
    MetadataField::PatientName,
    MetadataField::StudyDate,
    MetadataField::Modality,
    MetadataField::Manufacturer,
];

/// Ordered field values ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataSummary {
    entries: Vec<(MetadataField, String)>,
}

impl MetadataSummary {
    #[must_use]
    pub fn get(&self, field: MetadataField) -> Option<&str> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (MetadataField, &str)> {
        self.entries.iter().map(|(f, v)| (*f, v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for MetadataSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (field, value)) in self.entries.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {value}", field.label())?;
        }
        Ok(())
    }
}

/// Look up `fields` on a slice header, in order.
///
/// A field the file did not carry is reported as `placeholder`; this never fails.
#[must_use]
pub fn extract_metadata(
    header: &SliceHeader,
    fields: &[MetadataField],
    placeholder: &str,
) -> MetadataSummary {
    let entries = fields
        .iter()
        .map(|&field| {
            let value = header.field(field).unwrap_or(placeholder).to_string();
            (field, value)
        })
        .collect();
    MetadataSummary { entries }
}
