//! Piecewise linear opacity and color transfer functions

use std::fmt;

/// RGB triple with components in [0, 1]
pub type Rgb = [f64; 3];

#[derive(Debug, Clone, PartialEq)]
pub struct TransferFunction {
    opacity: Vec<(f64, f64)>,
    color: Vec<(f64, Rgb)>,
}

impl Default for TransferFunction {
    /// Preset tuned for CT: soft tissue faint, bone opaque
    fn default() -> Self {
        Self::new(
            vec![(0.0, 0.0), (1000.0, 0.1), (3000.0, 1.0)],
            vec![
                (0.0, [0.0, 0.0, 0.0]),
                (500.0, [0.0, 1.0, 0.0]),
                (1000.0, [0.0, 0.5, 1.0]),
                (1500.0, [1.0, 1.0, 0.0]),
                (3000.0, [1.0, 1.0, 1.0]),
            ],
        )
    }
}

impl TransferFunction {
    /// Build from control points; they are sorted by intensity
    #[must_use]
    pub fn new(mut opacity: Vec<(f64, f64)>, mut color: Vec<(f64, Rgb)>) -> Self {
        opacity.sort_by(|a, b| a.0.total_cmp(&b.0));
        color.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { opacity, color }
    }

    #[must_use]
    pub fn opacity_points(&self) -> &[(f64, f64)] {
        &self.opacity
    }

    #[must_use]
    pub fn color_points(&self) -> &[(f64, Rgb)] {
        &self.color
    }

    /// Opacity at `intensity`, 0 when no points are defined
    #[must_use]
    pub fn opacity_at(&self, intensity: f64) -> f64 {
        interpolate(&self.opacity, intensity, |a, b, t| a + (b - a) * t).unwrap_or(0.0)
    }

    /// Color at `intensity`, black when no points are defined
    #[must_use]
    pub fn color_at(&self, intensity: f64) -> Rgb {
        interpolate(&self.color, intensity, |a, b, t| {
            [0, 1, 2].map(|i| a[i] + (b[i] - a[i]) * t)
        })
        .unwrap_or([0.0; 3])
    }
}

fn interpolate<T: Copy>(points: &[(f64, T)], x: f64, lerp: impl Fn(T, T, f64) -> T) -> Option<T> {
    let (first, last) = (points.first()?, points.last()?);
    if x <= first.0 {
        return Some(first.1);
    }
    if x >= last.0 {
        return Some(last.1);
    }

    let upper = points.partition_point(|(px, _)| *px <= x);
    let (x0, v0) = points[upper - 1];
    let (x1, v1) = points[upper];
    let span = x1 - x0;
    if span <= 0.0 {
        return Some(v1);
    }
    Some(lerp(v0, v1, (x - x0) / span))
}

impl fmt::Display for TransferFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Opacity:")?;
        for (x, a) in &self.opacity {
            writeln!(f, "  {x:>7.1} -> {a:.2}")?;
        }
        write!(f, "Color:")?;
        for (x, [r, g, b]) in &self.color {
            write!(f, "\n  {x:>7.1} -> ({r:.2}, {g:.2}, {b:.2})")?;
        }
        Ok(())
    }
}
