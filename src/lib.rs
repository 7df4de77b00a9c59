pub mod cli;
pub mod dicom;
pub mod display;
pub mod display_metadata;
pub mod error;
pub mod image;
pub mod series;
pub mod session;
pub mod types;
pub mod volume;

// Re-export commonly used items
pub use display_metadata::print_metadata;
pub use error::{Result, ViewerError};
pub use session::{Frame, ViewerSession};
