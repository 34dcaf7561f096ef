use crate::audio::AudioSystem;
use crate::canvas::Rgba;
use crate::config::{Config, RendererMode};
use crate::render::{AsciiRenderer, Frame, HalfBlockRenderer, Renderer};
use crate::terminal::TerminalGuard;
use crate::viz::{LayerFlags, Settings, Visualizer};
use anyhow::Context;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::io::BufWriter;
use std::time::{Duration, Instant};

const STAR_COLOR_CYCLE: &[&str] = &["yellow", "white", "gold", "aqua", "pink", "silver"];

pub fn run(cfg: Config) -> anyhow::Result<()> {
    let star_color = Rgba::parse(&cfg.star_color)
        .with_context(|| format!("parse --star-color {:?}", cfg.star_color))?;

    let audio = AudioSystem::new(cfg.device.as_deref()).context("start audio capture")?;

    let seed = cfg.seed.unwrap_or_else(|| fastrand::u64(..));
    let mut rng = fastrand::Rng::with_seed(seed);

    let settings = Settings {
        mode: cfg.mode,
        palette: cfg.palette,
        star_color,
        max_radius_scale: cfg.max_radius_scale,
    };
    let mut viz = Visualizer::new(
        audio.analysis(),
        settings,
        cfg.num_stars,
        cfg.star_radius,
        &mut rng,
    )
    .context("set up visualizer")?;

    let mut flags = LayerFlags {
        show_gradient: cfg.gradient,
        show_bars: cfg.bars,
        show_stars: cfg.stars,
        show_silhouette: cfg.silhouette,
        show_shine: cfg.shine,
        show_invert: cfg.invert,
        show_grayscale: cfg.grayscale,
        show_emboss: cfg.emboss,
    };

    let _term = TerminalGuard::new()?;
    let mut out = BufWriter::new(TerminalGuard::stdout());

    let mut renderer: Box<dyn Renderer> = match cfg.renderer {
        RendererMode::Ascii => Box::new(AsciiRenderer::new()),
        RendererMode::HalfBlock => Box::new(HalfBlockRenderer::new()),
    };

    let size = crossterm::terminal::size().context("get terminal size")?;
    if size.1 < 2 || size.0 < 4 {
        return Err(anyhow::anyhow!(
            "terminal too small (need at least 4x2, got {}x{})",
            size.0,
            size.1
        ));
    }

    let mut show_hud = true;
    let mut color_idx = 0usize;
    let mut fps = FpsCounter::new();

    loop {
        let now = Instant::now();

        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(k) if k.kind != KeyEventKind::Release => {
                    if handle_key(
                        k.code,
                        k.modifiers,
                        &mut viz,
                        &mut flags,
                        &mut show_hud,
                        &mut color_idx,
                    ) {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }

        if let Err(err) = viz.draw(&flags) {
            // Degrade gracefully: skip the frame and keep ticking.
            log::warn!("frame skipped: {err}");
        }

        let (term_cols, term_rows) = crossterm::terminal::size()?;
        let hud_rows: u16 = if show_hud && term_rows > 2 { 1 } else { 0 };
        let visual_rows = term_rows.saturating_sub(hud_rows).max(1);

        let hud = if hud_rows > 0 {
            build_hud(&viz, &flags, fps.fps())
        } else {
            String::new()
        };

        let canvas = viz.canvas();
        let frame = Frame {
            term_cols,
            term_rows,
            visual_rows,
            canvas_width: canvas.width(),
            canvas_height: canvas.height(),
            pixels_rgba: canvas.data(),
            hud: &hud,
            hud_rows,
            sync_updates: cfg.sync_updates,
        };
        renderer.render(&frame, &mut out)?;

        fps.tick();

        // Frame pacing.
        let target = Duration::from_secs_f32(1.0 / cfg.fps.max(1) as f32);
        let elapsed = now.elapsed();
        if elapsed < target {
            std::thread::sleep(target - elapsed);
        }
    }
}

fn handle_key(
    code: KeyCode,
    modifiers: KeyModifiers,
    viz: &mut Visualizer,
    flags: &mut LayerFlags,
    show_hud: &mut bool,
    color_idx: &mut usize,
) -> bool {
    match code {
        KeyCode::Esc | KeyCode::Char('q') => return true,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Char('g') => flags.show_gradient = !flags.show_gradient,
        KeyCode::Char('b') => flags.show_bars = !flags.show_bars,
        KeyCode::Char('s') => flags.show_stars = !flags.show_stars,
        KeyCode::Char('c') => flags.show_silhouette = !flags.show_silhouette,
        KeyCode::Char('h') => flags.show_shine = !flags.show_shine,
        KeyCode::Char('i') => flags.show_invert = !flags.show_invert,
        KeyCode::Char('y') => flags.show_grayscale = !flags.show_grayscale,
        KeyCode::Char('e') => flags.show_emboss = !flags.show_emboss,
        KeyCode::Char('m') => {
            let mode = viz.mode().toggle();
            viz.set_mode(mode);
        }
        KeyCode::Char('p') => {
            let next = viz.palette().next();
            viz.set_palette(next);
        }
        KeyCode::Char('o') => {
            *color_idx = (*color_idx + 1) % STAR_COLOR_CYCLE.len();
            if let Ok(color) = Rgba::parse(STAR_COLOR_CYCLE[*color_idx]) {
                viz.set_star_color(color);
            }
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            viz.set_max_radius_scale(viz.max_radius_scale() + 0.1);
        }
        KeyCode::Char('-') => {
            viz.set_max_radius_scale(viz.max_radius_scale() - 0.1);
        }
        KeyCode::Char('u') => *show_hud = !*show_hud,
        _ => {}
    }
    false
}

fn build_hud(viz: &Visualizer, flags: &LayerFlags, fps: f32) -> String {
    let mark = |on: bool, ch: char| if on { ch.to_ascii_uppercase() } else { ch };
    format!(
        "fps {:>5.1} | {} | {} | loud {:>3.0} | scale {:.1} | [{}{}{}{}{}{}{}{}] q quit",
        fps,
        viz.mode().label(),
        viz.palette().label(),
        viz.loudness(),
        viz.max_radius_scale(),
        mark(flags.show_gradient, 'g'),
        mark(flags.show_bars, 'b'),
        mark(flags.show_stars, 's'),
        mark(flags.show_silhouette, 'c'),
        mark(flags.show_shine, 'h'),
        mark(flags.show_invert, 'i'),
        mark(flags.show_grayscale, 'y'),
        mark(flags.show_emboss, 'e'),
    )
}

struct FpsCounter {
    last: Instant,
    frames: u32,
    fps: f32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last: Instant::now(),
            frames: 0,
            fps: 0.0,
        }
    }

    fn tick(&mut self) {
        self.frames += 1;
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        if dt >= 0.5 {
            self.fps = (self.frames as f32) / dt;
            self.frames = 0;
            self.last = now;
        }
    }

    fn fps(&self) -> f32 {
        self.fps
    }
}
