use crate::canvas::Rgba;
use crate::config::PaletteKind;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Position along the ramp, in [0, 1].
    pub position: f32,
    pub color: Rgba,
}

impl GradientStop {
    pub const fn new(position: f32, color: Rgba) -> Self {
        Self { position, color }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GradientError {
    TooFewStops(usize),
    OutOfRange { index: usize, position: f32 },
    NotSorted { index: usize },
    MissingEndpoint { position: f32 },
}

impl fmt::Display for GradientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewStops(n) => write!(f, "gradient needs at least 2 stops, got {n}"),
            Self::OutOfRange { index, position } => {
                write!(f, "stop {index} position {position} outside [0, 1]")
            }
            Self::NotSorted { index } => {
                write!(f, "stop {index} position decreases; stops must be non-decreasing")
            }
            Self::MissingEndpoint { position } => {
                write!(f, "gradient must have a stop at position {position}")
            }
        }
    }
}

impl std::error::Error for GradientError {}

/// An ordered color ramp with non-decreasing stop positions and both
/// endpoints present.
#[derive(Debug, Clone)]
pub struct LinearGradient {
    stops: Vec<GradientStop>,
}

impl LinearGradient {
    pub fn new(stops: Vec<GradientStop>) -> Result<Self, GradientError> {
        if stops.len() < 2 {
            return Err(GradientError::TooFewStops(stops.len()));
        }
        for (index, stop) in stops.iter().enumerate() {
            if !(0.0..=1.0).contains(&stop.position) || !stop.position.is_finite() {
                return Err(GradientError::OutOfRange {
                    index,
                    position: stop.position,
                });
            }
            if index > 0 && stop.position < stops[index - 1].position {
                return Err(GradientError::NotSorted { index });
            }
        }
        if stops[0].position != 0.0 {
            return Err(GradientError::MissingEndpoint { position: 0.0 });
        }
        if stops[stops.len() - 1].position != 1.0 {
            return Err(GradientError::MissingEndpoint { position: 1.0 });
        }
        Ok(Self { stops })
    }

    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }

    /// Color at `t` in [0, 1], linearly interpolated between the bracketing
    /// stops. Out-of-range inputs clamp to the endpoints.
    pub fn sample(&self, t: f32) -> Rgba {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let mut prev = &self.stops[0];
        for stop in &self.stops[1..] {
            if t <= stop.position {
                let span = stop.position - prev.position;
                if span <= f32::EPSILON {
                    return stop.color;
                }
                let k = (t - prev.position) / span;
                return lerp_rgba(prev.color, stop.color, k);
            }
            prev = stop;
        }
        self.stops[self.stops.len() - 1].color
    }
}

fn lerp_rgba(a: Rgba, b: Rgba, k: f32) -> Rgba {
    let k = k.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * k).round() as u8;
    Rgba::new(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b), mix(a.a, b.a))
}

const fn hex(v: u32) -> Rgba {
    Rgba::opaque((v >> 16) as u8, (v >> 8) as u8, v as u8)
}

/// The five vertical stops of a named palette, top to bottom.
pub fn palette_stops(kind: PaletteKind) -> Vec<GradientStop> {
    let ramp: [Rgba; 5] = match kind {
        PaletteKind::Night => [
            hex(0x11001c),
            hex(0x190028),
            hex(0x220135),
            hex(0x32004f),
            hex(0x3a015c),
        ],
        PaletteKind::Day => [
            hex(0x1e90ff),
            hex(0x4ba3f5),
            hex(0x87ceeb),
            hex(0xb8e2f8),
            hex(0xe6f7ff),
        ],
        PaletteKind::Sunrise => [
            hex(0x1a1a40),
            hex(0x4b2e83),
            hex(0xc06c84),
            hex(0xf67280),
            hex(0xf8b195),
        ],
        PaletteKind::Sunset => [
            hex(0x2b1331),
            hex(0x6b2d5c),
            hex(0xb14a68),
            hex(0xe96443),
            hex(0xffb88c),
        ],
    };
    ramp.iter()
        .enumerate()
        .map(|(i, &color)| GradientStop::new(i as f32 * 0.25, color))
        .collect()
}

/// Blend alpha used when the palette layer is composited over the backdrop.
/// Night is translucent; the other palettes paint opaque.
pub fn palette_alpha(kind: PaletteKind) -> f32 {
    match kind {
        PaletteKind::Night => 0.7,
        PaletteKind::Day | PaletteKind::Sunrise | PaletteKind::Sunset => 1.0,
    }
}

pub fn build_palette(kind: PaletteKind) -> Result<LinearGradient, GradientError> {
    LinearGradient::new(palette_stops(kind))
}

/// Fixed 7-stop rainbow used to color the spectrum bars, evenly spaced.
pub fn bar_rainbow() -> Result<LinearGradient, GradientError> {
    let colors = [
        hex(0xff0000), // red
        hex(0xffa500), // orange
        hex(0xffff00), // yellow
        hex(0x008000), // green
        hex(0x00ffff), // aqua
        hex(0x0000ff), // blue
        hex(0xffc0cb), // pink
    ];
    let stops = colors
        .iter()
        .enumerate()
        .map(|(i, &color)| GradientStop::new(i as f32 / 6.0, color))
        .collect();
    LinearGradient::new(stops)
}
