use skyline_visualizer::canvas::Rgba;
use skyline_visualizer::config::{PaletteKind, SampleMode};
use skyline_visualizer::frame::{AnalysisSource, FrameError, FrameSource};
use skyline_visualizer::viz::{LayerFlags, Settings, Visualizer, CANVAS_HEIGHT, CANVAS_WIDTH};
use std::sync::Arc;

/// Canned analysis provider standing in for the capture stack.
struct StubSource {
    len: usize,
    spectrum: u8,
    waveform: u8,
}

impl StubSource {
    fn new(len: usize, spectrum: u8, waveform: u8) -> Arc<Self> {
        Arc::new(Self {
            len,
            spectrum,
            waveform,
        })
    }
}

impl AnalysisSource for StubSource {
    fn half_window(&self) -> usize {
        self.len
    }

    fn fill_spectrum(&self, out: &mut [u8]) {
        out.fill(self.spectrum);
    }

    fn fill_waveform(&self, out: &mut [u8]) {
        out.fill(self.waveform);
    }
}

fn no_layers() -> LayerFlags {
    LayerFlags {
        show_gradient: false,
        show_bars: false,
        show_stars: false,
        show_silhouette: false,
        show_shine: false,
        show_invert: false,
        show_grayscale: false,
        show_emboss: false,
    }
}

fn visualizer(source: Arc<StubSource>) -> Visualizer {
    let mut rng = fastrand::Rng::with_seed(11);
    Visualizer::new(source, Settings::default(), 50, 10.0, &mut rng).expect("visualizer setup")
}

// ── FrameSource ─────────────────────────────────────────────────────────────

#[test]
fn acquire_length_is_half_the_window_and_constant() {
    let mut fs = FrameSource::new();
    fs.attach(StubSource::new(512, 7, 9)).unwrap();
    assert_eq!(fs.acquire(SampleMode::Frequency).unwrap().len(), 512);
    assert_eq!(fs.acquire(SampleMode::Waveform).unwrap().len(), 512);
    assert_eq!(fs.len(), 512);
}

#[test]
fn acquire_before_attach_is_a_precondition_violation() {
    let mut fs = FrameSource::new();
    assert_eq!(
        fs.acquire(SampleMode::Frequency).unwrap_err(),
        FrameError::SourceNotAttached
    );
}

#[test]
fn attach_rejects_a_zero_length_window() {
    let mut fs = FrameSource::new();
    assert_eq!(
        fs.attach(StubSource::new(0, 0, 0)).unwrap_err(),
        FrameError::EmptyWindow
    );
}

#[test]
fn acquire_selects_the_buffer_for_the_mode() {
    let mut fs = FrameSource::new();
    fs.attach(StubSource::new(16, 200, 100)).unwrap();
    assert!(fs.acquire(SampleMode::Frequency).unwrap().iter().all(|&v| v == 200));
    assert!(fs.acquire(SampleMode::Waveform).unwrap().iter().all(|&v| v == 100));
}

// ── End-to-end draw ─────────────────────────────────────────────────────────

#[test]
fn silent_frame_with_bars_leaves_the_canvas_black_and_loudness_zero() {
    let mut viz = visualizer(StubSource::new(512, 0, 0));
    let flags = LayerFlags {
        show_bars: true,
        ..no_layers()
    };

    viz.draw(&flags).unwrap();
    assert_eq!(viz.loudness(), 0.0);
    for y in (0..CANVAS_HEIGHT).step_by(29) {
        for x in (0..CANVAS_WIDTH).step_by(31) {
            assert_eq!(viz.canvas().pixel(x, y), Rgba::BLACK, "at ({x}, {y})");
        }
    }
}

#[test]
fn full_scale_frame_drives_loudness_and_star_radii() {
    let mut viz = visualizer(StubSource::new(512, 255, 128));
    let flags = LayerFlags {
        show_bars: true,
        show_stars: true,
        ..no_layers()
    };

    viz.draw(&flags).unwrap();
    assert_eq!(viz.loudness(), 255.0);

    // loudness/255 == 1, so the displayed radius is max_radius_scale * base.
    let big = viz
        .stars()
        .stars()
        .iter()
        .find(|s| 1.3 * s.base_radius >= 2.0)
        .copied()
        .expect("seeded field should contain a big star");
    assert_eq!(
        viz.canvas().pixel(big.x as usize, big.y as usize),
        Rgba::opaque(255, 255, 0)
    );
}

#[test]
fn loudness_persists_when_bars_are_disabled() {
    let mut viz = visualizer(StubSource::new(512, 255, 128));
    let bars = LayerFlags {
        show_bars: true,
        ..no_layers()
    };

    viz.draw(&bars).unwrap();
    assert_eq!(viz.loudness(), 255.0);
    viz.draw(&no_layers()).unwrap();
    assert_eq!(viz.loudness(), 255.0, "metric holds its last value without a bar pass");
}

#[test]
fn invert_alone_turns_the_backdrop_white() {
    let mut viz = visualizer(StubSource::new(512, 0, 0));
    let flags = LayerFlags {
        show_invert: true,
        ..no_layers()
    };

    viz.draw(&flags).unwrap();
    let px = viz.canvas().pixel(400, 300);
    assert_eq!(px, Rgba::opaque(255, 255, 255));
}

#[test]
fn waveform_mode_reads_the_temporal_buffer() {
    let mut viz = visualizer(StubSource::new(512, 0, 128));
    let flags = LayerFlags {
        show_bars: true,
        ..no_layers()
    };

    viz.set_mode(SampleMode::Waveform);
    viz.draw(&flags).unwrap();
    assert_eq!(viz.loudness(), 128.0);
}

#[test]
fn shine_phase_advances_once_per_enabled_tick() {
    let mut viz = visualizer(StubSource::new(512, 255, 0));
    let shine = LayerFlags {
        show_stars: true,
        show_shine: true,
        ..no_layers()
    };

    assert!(!viz.shine_glowing());
    viz.draw(&shine).unwrap();
    assert!(viz.shine_glowing());
    viz.draw(&shine).unwrap();
    assert!(!viz.shine_glowing());

    // Disabled shine leaves the phase alone.
    viz.draw(&no_layers()).unwrap();
    assert!(!viz.shine_glowing());
}

#[test]
fn parallax_counter_advances_only_when_the_layer_runs() {
    let mut viz = visualizer(StubSource::new(512, 0, 0));
    let silhouette = LayerFlags {
        show_silhouette: true,
        ..no_layers()
    };

    assert_eq!(viz.scroll(), 0);
    viz.draw(&silhouette).unwrap();
    viz.draw(&silhouette).unwrap();
    assert_eq!(viz.scroll(), 2);
    viz.draw(&no_layers()).unwrap();
    assert_eq!(viz.scroll(), 2);
}

#[test]
fn gradient_layer_blends_the_night_palette_over_black() {
    let mut viz = visualizer(StubSource::new(512, 0, 0));
    let flags = LayerFlags {
        show_gradient: true,
        ..no_layers()
    };

    viz.draw(&flags).unwrap();
    // Top stop #11001c at alpha 0.7 over black: floor(0.7 * channel).
    assert_eq!(viz.canvas().pixel(0, 0), Rgba::opaque(11, 0, 19));
}

#[test]
fn palette_switch_rebuilds_the_cached_gradient() {
    let mut viz = visualizer(StubSource::new(512, 0, 0));
    let flags = LayerFlags {
        show_gradient: true,
        ..no_layers()
    };

    viz.set_palette(PaletteKind::Day);
    assert_eq!(viz.palette(), PaletteKind::Day);
    viz.draw(&flags).unwrap();
    // Day is opaque, so the top row is exactly the first stop.
    assert_eq!(viz.canvas().pixel(0, 0), Rgba::opaque(0x1e, 0x90, 0xff));
}

#[test]
fn radius_scale_setter_clamps_to_a_sane_range() {
    let mut viz = visualizer(StubSource::new(512, 0, 0));
    viz.set_max_radius_scale(-1.0);
    assert_eq!(viz.max_radius_scale(), 0.0);
    viz.set_max_radius_scale(99.0);
    assert_eq!(viz.max_radius_scale(), 8.0);
    viz.set_max_radius_scale(1.3);
    assert_eq!(viz.max_radius_scale(), 1.3);
}
