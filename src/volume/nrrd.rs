//! Gzip-compressed NRRD output
//!
//! Format reference: <http://teem.sourceforge.net/nrrd/format.html>

use crate::dicom::SliceHeader;
use crate::error::{Result, ViewerError};
use crate::image::Image;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Output file used when none is given
pub const DEFAULT_OUTPUT: &str = "volume.nrrd";

/// Voxel spacing and origin in patient space, axes ordered x (columns),
/// y (rows), z (slices)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeGeometry {
    pub spacing: [f64; 3],
    pub origin: [f64; 3],
}

impl Default for VolumeGeometry {
    fn default() -> Self {
        Self {
            spacing: [1.0; 3],
            origin: [0.0; 3],
        }
    }
}

impl VolumeGeometry {
    /// Geometry of headers in stack order.
    ///
    /// In-plane spacing comes from the first slice that carries it. Slice
    /// spacing is the mean z step between positioned slices, falling back to
    /// Slice Thickness. The origin is the first slice's position.
    #[must_use]
    pub fn from_headers(headers: &[SliceHeader]) -> Self {
        let mut geometry = Self::default();

        if let Some(spacing) = headers.iter().find_map(|h| h.pixel_spacing) {
            geometry.spacing[0] = spacing.col;
            geometry.spacing[1] = spacing.row;
        }
        if let Some(step) = z_step(headers).or_else(|| {
            headers
                .iter()
                .find_map(|h| h.slice_thickness)
                .filter(|t| *t > 0.0)
        }) {
            geometry.spacing[2] = step;
        }
        if let Some(origin) = headers.first().and_then(|h| h.image_position) {
            geometry.origin = origin;
        }

        geometry
    }
}

// Needs every slice positioned; an unsorted stack has no single step
fn z_step(headers: &[SliceHeader]) -> Option<f64> {
    let zs: Vec<f64> = headers
        .iter()
        .map(|h| h.image_position.map(|p| p[2]))
        .collect::<Option<_>>()?;
    let (first, last) = (zs.first()?, zs.last()?);
    if zs.len() < 2 || zs.windows(2).any(|w| w[1] <= w[0]) {
        return None;
    }
    Some((last - first) / (zs.len() - 1) as f64)
}

/// Write a grayscale stack to `path` as a gzip NRRD of signed shorts
///
/// # Errors
///
/// [`ViewerError::InvalidInput`] for color images, [`ViewerError::Io`] if the
/// file cannot be written
pub fn write_nrrd(image: &Image, geometry: &VolumeGeometry, path: &Path) -> Result<()> {
    if image.channels() != 1 {
        return Err(ViewerError::invalid(format!(
            "volume output needs grayscale slices, got {} channels",
            image.channels()
        )));
    }

    let file = File::create(path).map_err(|e| ViewerError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    encode_nrrd(image, geometry, &mut writer).map_err(|e| ViewerError::io(path, e))?;
    writer.flush().map_err(|e| ViewerError::io(path, e))?;

    info!(
        "Wrote {}x{}x{} volume to {}",
        image.cols(),
        image.rows(),
        image.slices(),
        path.display()
    );
    Ok(())
}

/// Encode header and compressed body into `writer`
pub fn encode_nrrd<W: Write>(image: &Image, geometry: &VolumeGeometry, mut writer: W) -> io::Result<()> {
    let [sx, sy, sz] = geometry.spacing;
    let [ox, oy, oz] = geometry.origin;

    write!(
        writer,
        "NRRD0004\n\
         # Complete NRRD file format specification at:\n\
         # http://teem.sourceforge.net/nrrd/format.html\n\
         type: short\n\
         dimension: 3\n\
         space: left-posterior-superior\n\
         sizes: {cols} {rows} {slices}\n\
         space directions: ({sx},0,0) (0,{sy},0) (0,0,{sz})\n\
         kinds: domain domain domain\n\
         endian: little\n\
         encoding: gzip\n\
         space origin: ({ox},{oy},{oz})\n\
         \n",
        cols = image.cols(),
        rows = image.rows(),
        slices = image.slices(),
    )?;

    // Standard layout iterates columns fastest, then rows, then slices
    let mut encoder = GzEncoder::new(writer, Compression::default());
    for &value in image.data() {
        encoder.write_all(&to_short(value).to_le_bytes())?;
    }
    encoder.finish()?;
    Ok(())
}

#[inline]
fn to_short(value: f32) -> i16 {
    // Float to int casts saturate at the type bounds
    value.round() as i16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dicom::{MetadataField, SliceHeader};
    use crate::types::PixelSpacing;
    use assert_matches::assert_matches;
    use flate2::read::GzDecoder;
    use ndarray::Array;
    use std::collections::BTreeMap;
    use std::io::Read;

    fn split_header(bytes: &[u8]) -> (String, Vec<u8>) {
        let end = bytes
            .windows(2)
            .position(|w| w == b"\n\n")
            .expect("header terminator");
        let header = String::from_utf8(bytes[..end].to_vec()).unwrap();
        let mut body = Vec::new();
        GzDecoder::new(&bytes[end + 2..])
            .read_to_end(&mut body)
            .unwrap();
        (header, body)
    }

    #[test]
    fn test_encode_header_and_body() {
        let values = vec![-1024.4, 0.0, 1.5, 40000.0, -40000.0, 7.0];
        let image = Image::new(Array::from_shape_vec((2, 1, 3, 1), values).unwrap()).unwrap();
        let geometry = VolumeGeometry {
            spacing: [0.25, 0.5, 2.5],
            origin: [-10.0, 0.0, 30.5],
        };

        let mut bytes = Vec::new();
        encode_nrrd(&image, &geometry, &mut bytes).unwrap();
        let (header, body) = split_header(&bytes);

        let lines: Vec<&str> = header.lines().collect();
        assert_eq!(lines[0], "NRRD0004");
        assert!(lines.contains(&"type: short"));
        assert!(lines.contains(&"sizes: 3 1 2"));
        assert!(lines.contains(&"space directions: (0.25,0,0) (0,0.5,0) (0,0,2.5)"));
        assert!(lines.contains(&"encoding: gzip"));
        assert!(lines.contains(&"space origin: (-10,0,30.5)"));

        let shorts: Vec<i16> = body
            .chunks_exact(2)
            .map(|c| i16::from_le_bytes([c[0], c[1]]))
            .collect();
        assert_eq!(shorts, [-1024, 0, 2, i16::MAX, i16::MIN, 7]);
    }

    #[test]
    fn test_write_rejects_color() {
        let dir = tempfile::tempdir().unwrap();
        let image = Image::new(Array::zeros((1, 2, 2, 3))).unwrap();
        assert_matches!(
            write_nrrd(&image, &VolumeGeometry::default(), &dir.path().join("out.nrrd")),
            Err(ViewerError::InvalidInput(_))
        );
    }

    #[test]
    fn test_write_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.nrrd");
        let image = Image::new(Array::from_elem((3, 4, 5, 1), 12.0)).unwrap();
        write_nrrd(&image, &VolumeGeometry::default(), &path).unwrap();

        let (header, body) = split_header(&std::fs::read(&path).unwrap());
        assert!(header.contains("sizes: 5 4 3"));
        assert_eq!(body.len(), 5 * 4 * 3 * 2);
    }

    #[test]
    fn test_geometry_from_headers() {
        let mut first = SliceHeader::for_tests(BTreeMap::<MetadataField, String>::new());
        first.image_position = Some([1.0, 2.0, 3.0]);
        let mut second = first.clone();
        second.pixel_spacing = Some(PixelSpacing::new(0.7, 0.6));
        second.slice_thickness = Some(1.25);

        let geometry = VolumeGeometry::from_headers(&[first, second]);
        assert_eq!(geometry.spacing, [0.6, 0.7, 1.25]);
        assert_eq!(geometry.origin, [1.0, 2.0, 3.0]);
        assert_eq!(VolumeGeometry::from_headers(&[]), VolumeGeometry::default());
    }

    #[test]
    fn test_slice_spacing_from_positions() {
        let headers: Vec<SliceHeader> = [-5.0, 2.5, 10.0]
            .into_iter()
            .map(|z| {
                let mut header = SliceHeader::for_tests(BTreeMap::new());
                header.image_position = Some([0.0, 0.0, z]);
                header.slice_thickness = Some(1.0);
                header
            })
            .collect();

        let geometry = VolumeGeometry::from_headers(&headers);
        assert_eq!(geometry.spacing, [1.0, 1.0, 7.5]);
        assert_eq!(geometry.origin, [0.0, 0.0, -5.0]);

        // Out of order positions fall back to the thickness
        let shuffled = [headers[2].clone(), headers[0].clone(), headers[1].clone()];
        let geometry = VolumeGeometry::from_headers(&shuffled);
        assert_eq!(geometry.spacing, [1.0, 1.0, 1.0]);
        assert_eq!(geometry.origin, [0.0, 0.0, 10.0]);
    }
}
