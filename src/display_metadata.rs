use crate::dicom::{MetadataSummary, SliceHeader};
use crate::volume::TransferFunction;

pub fn print_metadata(summary: &MetadataSummary) {
    for line in metadata_lines(summary) {
        println!("{line}");
    }
}

/// Aligned `name: value` lines for an overlay
pub fn metadata_lines(summary: &MetadataSummary) -> Vec<String> {
    summary
        .iter()
        .map(|(field, value)| format!("{:20}: {value}", field.label()))
        .collect()
}

/// Geometry of the slice being shown
pub fn print_slice_info(header: &SliceHeader, slice_index: usize, slice_count: usize) {
    for line in slice_info_lines(header, slice_index, slice_count) {
        println!("{line}");
    }
}

/// Position, dimensions and rescale of a slice; spacing is left to the overlay
pub fn slice_info_lines(header: &SliceHeader, slice_index: usize, slice_count: usize) -> Vec<String> {
    let mut lines = vec![
        format!("{:20}: {} of {}", "Slice", slice_index + 1, slice_count),
        format!(
            "{:20}: {} [{}]",
            "Dimensions", header.dimensions, header.photometric_interpretation
        ),
    ];
    if !header.rescale.is_identity() {
        lines.push(format!("{:20}: {}", "Rescale", header.rescale));
    }
    lines
}

pub fn print_transfer_function(tf: &TransferFunction) {
    println!("{tf}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dicom::{
        extract_metadata, MetadataField, NOT_AVAILABLE, SLICE_OVERLAY_FIELDS, UNKNOWN,
        VOLUME_OVERLAY_FIELDS,
    };
    use crate::types::{PixelSpacing, RescaleParams};
    use std::collections::BTreeMap;

    #[test]
    fn test_lines_are_aligned() {
        let mut fields = BTreeMap::new();
        fields.insert(MetadataField::Modality, "MR".to_string());
        let header = SliceHeader::for_tests(fields);
        let summary = extract_metadata(&header, &VOLUME_OVERLAY_FIELDS, UNKNOWN);

        let lines = metadata_lines(&summary);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], format!("{:20}: Unknown", "Patient Name"));
        assert!(lines.contains(&format!("{:20}: MR", "Modality")));
    }

    #[test]
    fn test_spacing_is_printed_once() {
        let mut fields = BTreeMap::new();
        fields.insert(MetadataField::PixelSpacing, "0.5\\0.5".to_string());
        fields.insert(MetadataField::SliceThickness, "2".to_string());
        let mut header = SliceHeader::for_tests(fields);
        header.pixel_spacing = Some(PixelSpacing::new(0.5, 0.5));
        header.slice_thickness = Some(2.0);
        header.rescale = RescaleParams::new(1.0, -1024.0);

        let summary = extract_metadata(&header, &SLICE_OVERLAY_FIELDS, NOT_AVAILABLE);
        let lines: Vec<String> = slice_info_lines(&header, 0, 3)
            .into_iter()
            .chain(metadata_lines(&summary))
            .collect();

        let count = |label: &str| lines.iter().filter(|l| l.starts_with(label)).count();
        assert_eq!(count("Pixel Spacing"), 1);
        assert_eq!(count("Slice Thickness"), 1);
        assert_eq!(count("Rescale"), 1);
        assert_eq!(lines[0], format!("{:20}: 1 of 3", "Slice"));
    }
}
