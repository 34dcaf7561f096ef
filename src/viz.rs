use crate::canvas::{PixelBuffer, Rgba};
use crate::config::{PaletteKind, SampleMode};
use crate::filters;
use crate::frame::{AnalysisSource, FrameError, FrameSource};
use crate::gradient::{self, LinearGradient};
use crate::scene::{self, parallax::ParallaxBand, stars::ShinePhase, stars::StarField};
use std::sync::Arc;

pub const CANVAS_WIDTH: usize = 800;
pub const CANVAS_HEIGHT: usize = 600;

/// Per-tick configuration snapshot: which layers and filters run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerFlags {
    pub show_gradient: bool,
    pub show_bars: bool,
    pub show_stars: bool,
    pub show_silhouette: bool,
    pub show_shine: bool,
    pub show_invert: bool,
    pub show_grayscale: bool,
    pub show_emboss: bool,
}

impl Default for LayerFlags {
    fn default() -> Self {
        Self {
            show_gradient: true,
            show_bars: true,
            show_stars: true,
            show_silhouette: true,
            show_shine: false,
            show_invert: false,
            show_grayscale: false,
            show_emboss: false,
        }
    }
}

/// Mutable settings driven by the host between ticks.
#[derive(Debug, Clone, Copy)]
pub struct Settings {
    pub mode: SampleMode,
    pub palette: PaletteKind,
    pub star_color: Rgba,
    pub max_radius_scale: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: SampleMode::Frequency,
            palette: PaletteKind::Night,
            star_color: Rgba::opaque(255, 255, 0),
            max_radius_scale: 1.3,
        }
    }
}

/// Owns every piece of cross-frame state and runs the fixed per-tick draw
/// sequence. Single-threaded: `draw` must return before the next tick.
pub struct Visualizer {
    frame_source: FrameSource,
    canvas: PixelBuffer,
    stars: StarField,
    parallax: ParallaxBand,
    shine: ShinePhase,
    loudness: f32,
    mode: SampleMode,
    star_color: Rgba,
    max_radius_scale: f32,
    palette: PaletteKind,
    palette_gradient: LinearGradient,
    palette_alpha: f32,
    rainbow: LinearGradient,
}

impl Visualizer {
    pub fn new(
        source: Arc<dyn AnalysisSource>,
        settings: Settings,
        num_stars: usize,
        max_base_radius: f32,
        rng: &mut fastrand::Rng,
    ) -> anyhow::Result<Self> {
        let mut frame_source = FrameSource::new();
        frame_source.attach(source)?;

        let stars = StarField::generate(num_stars, max_base_radius, CANVAS_WIDTH, CANVAS_HEIGHT, rng);
        let parallax = ParallaxBand::new(scene::parallax::night_skyline(rng));

        let palette_gradient = gradient::build_palette(settings.palette)?;
        let rainbow = gradient::bar_rainbow()?;

        Ok(Self {
            frame_source,
            canvas: PixelBuffer::new(CANVAS_WIDTH, CANVAS_HEIGHT),
            stars,
            parallax,
            shine: ShinePhase::default(),
            loudness: 0.0,
            mode: settings.mode,
            star_color: settings.star_color,
            max_radius_scale: settings.max_radius_scale,
            palette: settings.palette,
            palette_gradient,
            palette_alpha: gradient::palette_alpha(settings.palette),
            rainbow,
        })
    }

    /// One animation tick: acquire the frame, composite the enabled layers,
    /// then run the enabled pixel filters in their fixed order. Every optional
    /// step is guarded by its own flag; none depends on another having run.
    pub fn draw(&mut self, flags: &LayerFlags) -> Result<(), FrameError> {
        let samples = self.frame_source.acquire(self.mode)?;

        scene::draw_backdrop(&mut self.canvas);

        if flags.show_gradient {
            scene::draw_palette_layer(&mut self.canvas, &self.palette_gradient, self.palette_alpha);
        }

        if flags.show_bars {
            self.loudness = scene::draw_bars(&mut self.canvas, samples, &self.rainbow);
        }

        if flags.show_stars {
            let glowing = flags.show_shine && self.shine.is_glowing();
            self.stars.render(
                &mut self.canvas,
                self.loudness,
                self.star_color,
                self.max_radius_scale,
                glowing,
            );
        }

        if flags.show_shine {
            self.shine.advance();
        }

        if flags.show_silhouette {
            self.parallax.render(&mut self.canvas);
        }

        if flags.show_invert {
            filters::invert(&mut self.canvas);
        }
        if flags.show_grayscale {
            filters::grayscale(&mut self.canvas);
        }
        if flags.show_emboss {
            filters::emboss(&mut self.canvas);
        }

        Ok(())
    }

    /// The composited framebuffer for the host to commit to its display.
    pub fn canvas(&self) -> &PixelBuffer {
        &self.canvas
    }

    /// Per-frame loudness percent in [0, 255], updated by the bars pass.
    pub fn loudness(&self) -> f32 {
        self.loudness
    }

    pub fn stars(&self) -> &StarField {
        &self.stars
    }

    pub fn scroll(&self) -> i32 {
        self.parallax.scroll()
    }

    pub fn shine_glowing(&self) -> bool {
        self.shine.is_glowing()
    }

    pub fn mode(&self) -> SampleMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: SampleMode) {
        self.mode = mode;
    }

    pub fn palette(&self) -> PaletteKind {
        self.palette
    }

    /// Switch palettes, rebuilding the cached gradient. A build failure is
    /// logged and the previous gradient stays in effect.
    pub fn set_palette(&mut self, kind: PaletteKind) {
        match gradient::build_palette(kind) {
            Ok(g) => {
                self.palette = kind;
                self.palette_gradient = g;
                self.palette_alpha = gradient::palette_alpha(kind);
            }
            Err(err) => {
                log::warn!("palette {} rejected: {err}; keeping previous gradient", kind.label());
            }
        }
    }

    pub fn star_color(&self) -> Rgba {
        self.star_color
    }

    pub fn set_star_color(&mut self, color: Rgba) {
        self.star_color = color;
    }

    pub fn max_radius_scale(&self) -> f32 {
        self.max_radius_scale
    }

    pub fn set_max_radius_scale(&mut self, scale: f32) {
        self.max_radius_scale = scale.clamp(0.0, 8.0);
    }
}
