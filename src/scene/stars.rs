use crate::canvas::{PixelBuffer, Rgba};

/// Stars are confined to the top `height / STAR_BAND_DIVISOR` of the canvas.
pub const STAR_BAND_DIVISOR: f32 = 2.7;

/// Halo softness when the shine phase is glowing.
pub const GLOW_BLUR: f32 = 15.0;

/// Immutable after generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub base_radius: f32,
}

pub struct StarField {
    stars: Vec<Star>,
}

impl StarField {
    /// Place `count` stars: x uniform over the canvas width, y uniform over
    /// the upper band, base radius uniform over [0, max_base_radius). The set
    /// never changes afterwards.
    pub fn generate(
        count: usize,
        max_base_radius: f32,
        canvas_width: usize,
        canvas_height: usize,
        rng: &mut fastrand::Rng,
    ) -> Self {
        let band = canvas_height as f32 / STAR_BAND_DIVISOR;
        let stars = (0..count)
            .map(|_| Star {
                x: rng.f32() * canvas_width as f32,
                y: rng.f32() * band,
                base_radius: rng.f32() * max_base_radius,
            })
            .collect();
        Self { stars }
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Draw every star at its audio-modulated radius:
    /// max_radius_scale * (loudness / 255) * base_radius. When `glowing`, a
    /// soft halo goes down before each disc.
    pub fn render(
        &self,
        canvas: &mut PixelBuffer,
        loudness_percent: f32,
        color: Rgba,
        max_radius_scale: f32,
        glowing: bool,
    ) {
        let gain = max_radius_scale * (loudness_percent / 255.0);
        for star in &self.stars {
            let radius = gain * star.base_radius;
            if glowing {
                canvas.glow_circle(star.x, star.y, radius, GLOW_BLUR, color);
            }
            canvas.fill_circle(star.x, star.y, radius, color);
        }
    }
}

/// The blink state for the star glow: flips once per tick the show-shine flag
/// is set, producing an on/off oscillation at half the frame rate. This is
/// cross-frame state, not configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShinePhase {
    #[default]
    Plain,
    Glowing,
}

impl ShinePhase {
    pub fn advance(&mut self) {
        *self = match self {
            Self::Plain => Self::Glowing,
            Self::Glowing => Self::Plain,
        };
    }

    pub fn is_glowing(self) -> bool {
        self == Self::Glowing
    }
}
