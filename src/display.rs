use crate::cli::SizeArgs;
use crate::image::{Histogram, BIN_COUNT};
use anyhow::{anyhow, Result};
use crossterm::style::{Color, Stylize};
use image::DynamicImage;
use std::io::{IsTerminal, Write};
use viuer::{print, Config as ViuerConfig};

const DEFAULT_WIDTH: u32 = 24;
const SPARK_LEVELS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Print an image to the terminal
///
/// `aspect_ratio` is vertical over horizontal pixel size; 2.0 means pixels
/// twice as tall as wide.
pub fn print_image(image: &DynamicImage, aspect_ratio: Option<f64>, size: &SizeArgs) -> Result<()> {
    let is_tty = std::io::stdout().is_terminal();
    let ratio = aspect_ratio.filter(|r| r.is_finite() && *r > 0.0).unwrap_or(1.0);

    let (config_width, config_height) = match (size.width, size.height) {
        (Some(w), ..) => (Some(w), None),
        (None, Some(h)) => (None, Some((f64::from(h) * ratio).round() as u32)),
        (None, None) => (Some(DEFAULT_WIDTH), None),
    };

    let config = ViuerConfig {
        width: config_width,
        height: config_height,
        absolute_offset: false,
        use_kitty: is_tty,
        use_iterm: is_tty,
        use_sixel: is_tty,
        ..Default::default()
    };

    std::io::stdout().flush()
        .map_err(|e| anyhow!("Failed to flush stdout: {e}"))?;

    print(image, &config)
        .map_err(|e| anyhow!("Failed to display image: {e}"))?;

    Ok(())
}

/// Print one sparkline per channel, scaled to the tallest bucket
pub fn print_histogram(histogram: &Histogram, width: Option<u32>) {
    let columns = width
        .map(|w| w as usize)
        .or_else(|| crossterm::terminal::size().ok().map(|(cols, _)| cols as usize))
        .unwrap_or(64)
        .saturating_sub(4)
        .clamp(1, BIN_COUNT);

    let colors: &[Color] = if histogram.channel_count() == 3 {
        &[Color::Red, Color::Green, Color::Blue]
    } else {
        &[Color::Grey]
    };

    for (line, color) in histogram_lines(histogram, columns).into_iter().zip(colors.iter().cycle()) {
        println!("{}", line.with(*color));
    }
}

/// Sparklines of each channel rebinned to `columns` buckets
pub fn histogram_lines(histogram: &Histogram, columns: usize) -> Vec<String> {
    let channels: Vec<Vec<u64>> = (0..histogram.channel_count())
        .map(|c| histogram.rebin(c, columns))
        .collect();
    let peak = channels.iter().flatten().copied().max().unwrap_or(0);

    channels
        .iter()
        .map(|buckets| buckets.iter().map(|&count| spark(count, peak)).collect())
        .collect()
}

fn spark(count: u64, peak: u64) -> char {
    if peak == 0 || count == 0 {
        return SPARK_LEVELS[0];
    }
    let top = (SPARK_LEVELS.len() - 1) as u64;
    // Any non-empty bucket gets at least the lowest bar
    let level = (count * top).div_ceil(peak).clamp(1, top);
    SPARK_LEVELS[level as usize]
}
