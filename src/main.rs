use anyhow::{Context, Result};
use clap::Parser;
use image::DynamicImage;
use medview::cli::{Args, Command, ViewArgs, VolumeArgs};
use medview::dicom::{extract_metadata, UNKNOWN, VOLUME_OVERLAY_FIELDS};
use medview::display;
use medview::display_metadata;
use medview::image::to_dynamic_image;
use medview::series::{self, LoadOptions};
use medview::types::ToneParameters;
use medview::volume::{self, TransferFunction};
use medview::ViewerSession;
use tracing::{debug, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    if let Err(e) = tracing::subscriber::set_global_default(
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish(),
    ) {
        eprintln!("[ERROR] Could not set up logging: {e}");
    }
}

fn run(args: &Args) -> Result<()> {
    match &args.command {
        Command::View(view) => run_view(view),
        Command::Volume(volume) => run_volume(volume),
    }
}

/// Load the input, apply the sliders and print one slice
fn run_view(args: &ViewArgs) -> Result<()> {
    let options = LoadOptions {
        order: args.order,
        series_uid: args.series.clone(),
    };
    let session = build_session(args, &options)?;
    let frame = session.render();

    if let Some(header) = session.current_header() {
        display_metadata::print_slice_info(header, frame.slice_index, frame.slice_count);
    }
    if let Some(metadata) = &frame.metadata {
        display_metadata::print_metadata(metadata);
    }
    println!();

    let image = to_dynamic_image(&frame.image, 0)?;
    let aspect_ratio = session
        .current_header()
        .and_then(|h| h.pixel_spacing)
        .map(|s| s.aspect_ratio());
    display::print_image(&image, aspect_ratio, &args.size)?;

    if !args.no_histogram {
        display::print_histogram(&frame.histogram, args.size.width);
    }

    Ok(())
}

fn build_session(args: &ViewArgs, options: &LoadOptions) -> Result<ViewerSession> {
    let tone = ToneParameters::new(args.brightness, args.contrast)?;
    let mut session = ViewerSession::open(&args.path, options)?;
    session.set_tone(tone);

    if let Some(slice) = args.slice {
        if slice >= session.slice_count() {
            warn!(
                "Slice {slice} out of range, showing last of {}",
                session.slice_count()
            );
        }
        session.select_slice(slice);
    }
    debug!("Session ready: {} slices, {}", session.slice_count(), session.tone());
    Ok(session)
}

/// Export the series, print its overlay and optionally a preview
fn run_volume(args: &VolumeArgs) -> Result<()> {
    let series_uid = match &args.series {
        Some(uid) => Some(uid.clone()),
        None => {
            let found = series::scan_series(&args.dir)?;
            if found.len() > 1 {
                warn!(
                    "{} series in {}, using the first; pick one with --series",
                    found.len(),
                    args.dir.display()
                );
                for summary in &found {
                    warn!(
                        "  {} ({} files)",
                        summary.uid.as_deref().unwrap_or(UNKNOWN),
                        summary.file_count
                    );
                }
            }
            found.into_iter().next().and_then(|s| s.uid)
        }
    };

    let options = LoadOptions {
        order: args.order,
        series_uid,
    };
    let stack = series::load_series(&args.dir, &options)?;
    volume::write_series(&stack, &args.output)
        .with_context(|| format!("Failed to export {}", args.dir.display()))?;
    println!("{:20}: {}", "Output", args.output.display());
    println!(
        "{:20}: {}x{}x{}",
        "Volume",
        stack.image.cols(),
        stack.image.rows(),
        stack.image.slices()
    );

    if let Some(header) = stack.first_header() {
        let overlay = extract_metadata(header, &VOLUME_OVERLAY_FIELDS, UNKNOWN);
        display_metadata::print_metadata(&overlay);
    }

    let tf = TransferFunction::default();
    display_metadata::print_transfer_function(&tf);

    if args.preview {
        println!();
        let preview = volume::render_preview(&stack.image, &tf)?;
        let aspect_ratio = stack
            .first_header()
            .and_then(|h| h.pixel_spacing)
            .map(|s| s.aspect_ratio());
        display::print_image(&DynamicImage::ImageRgb8(preview), aspect_ratio, &args.size)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use medview::cli::SizeArgs;
    use medview::series::SliceOrder;
    use medview::ViewerError;
    use std::path::PathBuf;

    fn view_args(path: PathBuf) -> ViewArgs {
        ViewArgs {
            path,
            size: SizeArgs::default(),
            brightness: 1.0,
            contrast: 1.0,
            slice: None,
            order: SliceOrder::FileName,
            series: None,
            no_histogram: true,
        }
    }

    #[test]
    fn test_missing_path_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let args = view_args(dir.path().join("nothing.dcm"));
        let err = build_session(&args, &LoadOptions::default()).unwrap_err();
        assert_matches!(err.downcast_ref::<ViewerError>(), Some(ViewerError::NotFound(_)));
    }

    #[test]
    fn test_out_of_range_tone_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("a.png");
        image::GrayImage::from_raw(2, 2, vec![0, 64, 128, 255]).unwrap().save(&png).unwrap();

        let mut args = view_args(png);
        args.brightness = 5.0;
        let err = build_session(&args, &LoadOptions::default()).unwrap_err();
        assert_matches!(err.downcast_ref::<ViewerError>(), Some(ViewerError::InvalidInput(_)));
    }

    #[test]
    fn test_session_from_raster_with_slice_override() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("a.png");
        image::GrayImage::from_raw(2, 2, vec![0, 64, 128, 255]).unwrap().save(&png).unwrap();

        let mut args = view_args(png);
        args.contrast = 2.0;
        args.slice = Some(7);
        let session = build_session(&args, &LoadOptions::default()).unwrap();
        assert_eq!(session.slice_index(), 0);
        assert_eq!(session.tone().contrast(), 2.0);
    }

    #[test]
    fn test_volume_on_empty_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let args = VolumeArgs {
            dir: dir.path().to_path_buf(),
            output: dir.path().join("out.nrrd"),
            preview: false,
            size: SizeArgs::default(),
            order: SliceOrder::FileName,
            series: None,
        };
        let err = run_volume(&args).unwrap_err();
        assert_matches!(err.downcast_ref::<ViewerError>(), Some(ViewerError::EmptySeries { .. }));
        assert!(!args.output.exists());
    }
}
