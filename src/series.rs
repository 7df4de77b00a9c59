//! Loading a directory of DICOM slices as one stacked volume

use crate::dicom::{self, SliceHeader};
use crate::error::{Result, ViewerError};
use crate::image::Image;
use clap::ValueEnum;
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// How slices are ordered along the stack axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SliceOrder {
    /// Lexicographic by file name
    #[default]
    FileName,
    /// Ascending Instance Number
    InstanceNumber,
    /// Ascending z of Image Position (Patient)
    ImagePosition,
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub order: SliceOrder,
    /// Only keep slices of this Series Instance UID
    pub series_uid: Option<String>,
}

/// Ordered slice headers and the matching stacked image
#[derive(Debug, Clone)]
pub struct SeriesStack {
    pub headers: Vec<SliceHeader>,
    pub image: Image,
}

impl SeriesStack {
    #[must_use]
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    #[must_use]
    pub fn first_header(&self) -> Option<&SliceHeader> {
        self.headers.first()
    }
}

/// A series found by [`scan_series`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesSummary {
    pub uid: Option<String>,
    pub file_count: usize,
}

/// DICOM files of `dir`, sorted by file name
///
/// # Errors
///
/// [`ViewerError::NotFound`] if `dir` does not exist, [`ViewerError::Io`] if it
/// cannot be listed, [`ViewerError::EmptySeries`] if it holds no DICOM files
pub fn list_dicom_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(ViewerError::NotFound(dir.to_path_buf()));
    }

    let mut files: Vec<(String, PathBuf)> = fs::read_dir(dir)
        .map_err(|e| ViewerError::io(dir, e))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            dicom::is_dicom_file_name(&name).then(|| (name, entry.path()))
        })
        .collect();

    if files.is_empty() {
        return Err(ViewerError::EmptySeries {
            dir: dir.to_path_buf(),
        });
    }

    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files.into_iter().map(|(_, path)| path).collect())
}

/// Load every DICOM file of `dir` and stack the slices.
///
/// With a series filter, only files of that series have their pixel data
/// decoded. Any file that fails to decode aborts the whole load.
///
/// # Errors
///
/// See [`list_dicom_files`]; additionally [`ViewerError::Decode`] for an
/// unreadable file, [`ViewerError::EmptySeries`] if the series filter keeps
/// nothing, and [`ViewerError::InvalidInput`] if slice shapes differ
pub fn load_series(dir: &Path, options: &LoadOptions) -> Result<SeriesStack> {
    let mut files = list_dicom_files(dir)?;

    // Other series are skipped on their headers, before any pixel decoding
    if let Some(uid) = &options.series_uid {
        let mut matching = Vec::with_capacity(files.len());
        for path in files {
            let header = dicom::read_header(&path)?;
            if header.series_instance_uid.as_deref() == Some(uid.as_str()) {
                matching.push(path);
            }
        }
        if matching.is_empty() {
            return Err(ViewerError::EmptySeries {
                dir: dir.to_path_buf(),
            });
        }
        files = matching;
    }
    info!("Reading {} DICOM files from {}", files.len(), dir.display());

    let mut records = Vec::with_capacity(files.len());
    for path in &files {
        let record = dicom::decode_slice(path)?;
        debug!("Decoded {}", path.display());
        records.push(record);
    }

    // Stable sort keeps file name order among equal keys
    match options.order {
        SliceOrder::FileName => {}
        SliceOrder::InstanceNumber => records.sort_by(|a, b| {
            compare_keys(
                a.header.instance_number.map(f64::from),
                b.header.instance_number.map(f64::from),
            )
        }),
        SliceOrder::ImagePosition => records.sort_by(|a, b| {
            compare_keys(
                a.header.image_position.map(|p| p[2]),
                b.header.image_position.map(|p| p[2]),
            )
        }),
    }

    let image = {
        let views: Vec<_> = records.iter().map(|r| r.pixels.view()).collect();
        Image::stack(&views)?
    };

    let headers = records.into_iter().map(|r| r.into_parts().0).collect();
    Ok(SeriesStack { headers, image })
}

// Slices without the key go last
fn compare_keys(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// List the series present in `dir` without decoding pixel data
///
/// # Errors
///
/// Same as [`list_dicom_files`], plus [`ViewerError::Decode`] for an unreadable file
pub fn scan_series(dir: &Path) -> Result<Vec<SeriesSummary>> {
    let mut series: Vec<SeriesSummary> = Vec::new();
    for path in list_dicom_files(dir)? {
        let header = dicom::read_header(&path)?;
        match series.iter_mut().find(|s| s.uid == header.series_instance_uid) {
            Some(summary) => summary.file_count += 1,
            None => series.push(SeriesSummary {
                uid: header.series_instance_uid,
                file_count: 1,
            }),
        }
    }
    Ok(series)
}
