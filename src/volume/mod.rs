//! Volume export and preview for a stacked series

mod nrrd;
mod preview;
mod transfer;

pub use nrrd::{encode_nrrd, write_nrrd, VolumeGeometry, DEFAULT_OUTPUT};
pub use preview::{max_intensity_projection, render_preview};
pub use transfer::{Rgb, TransferFunction};

use crate::error::Result;
use crate::series::SeriesStack;
use std::path::Path;

/// Write a loaded series as NRRD, taking geometry from its headers
///
/// # Errors
///
/// See [`write_nrrd`]
pub fn write_series(stack: &SeriesStack, path: &Path) -> Result<()> {
    let geometry = VolumeGeometry::from_headers(&stack.headers);
    write_nrrd(&stack.image, &geometry, path)
}
