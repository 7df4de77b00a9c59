use crate::series::SliceOrder;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// A terminal viewer for DICOM series and raster images
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Log progress to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show one slice with brightness/contrast applied
    View(ViewArgs),
    /// Export a series as NRRD and print its overlay
    Volume(VolumeArgs),
}

/// Output size in terminal cells
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct SizeArgs {
    /// Output width in terminal columns
    #[arg(short = 'W', long)]
    pub width: Option<u32>,

    /// Output height in terminal rows
    #[arg(short = 'H', long)]
    pub height: Option<u32>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ViewArgs {
    /// Directory of .dcm files, a single .dcm file, or a raster image
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    #[command(flatten)]
    pub size: SizeArgs,

    /// Brightness factor (0.1 to 2.0)
    #[arg(short, long, default_value_t = 1.0)]
    pub brightness: f64,

    /// Contrast factor (0.5 to 2.0)
    #[arg(short, long, default_value_t = 1.0)]
    pub contrast: f64,

    /// Slice to show; defaults to the middle one
    #[arg(short, long)]
    pub slice: Option<usize>,

    /// Slice ordering within a directory
    #[arg(long, value_enum, default_value_t)]
    pub order: SliceOrder,

    /// Only load slices of this Series Instance UID
    #[arg(long, value_name = "UID")]
    pub series: Option<String>,

    /// Skip the histogram
    #[arg(long)]
    pub no_histogram: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct VolumeArgs {
    /// Directory of .dcm files
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// NRRD output file
    #[arg(short, long, default_value = crate::volume::DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Show a maximum intensity projection colored by the transfer function
    #[arg(long)]
    pub preview: bool,

    #[command(flatten)]
    pub size: SizeArgs,

    /// Slice ordering within the directory
    #[arg(long, value_enum, default_value_t = SliceOrder::ImagePosition)]
    pub order: SliceOrder,

    /// Only load slices of this Series Instance UID
    #[arg(long, value_name = "UID")]
    pub series: Option<String>,
}
