use skyline_visualizer::canvas::{PixelBuffer, Rgba, Sprite};
use skyline_visualizer::gradient::bar_rainbow;
use skyline_visualizer::scene::parallax::{
    night_skyline, ParallaxBand, DEST_WIDTH, SCROLL_WRAP, STRIP_HEIGHT, STRIP_WIDTH,
};
use skyline_visualizer::scene::stars::{ShinePhase, StarField, STAR_BAND_DIVISOR};
use skyline_visualizer::scene::{draw_backdrop, draw_bars};
use skyline_visualizer::viz::{CANVAS_HEIGHT, CANVAS_WIDTH};

fn canvas() -> PixelBuffer {
    PixelBuffer::new(CANVAS_WIDTH, CANVAS_HEIGHT)
}

// ── Backdrop and bars ───────────────────────────────────────────────────────

#[test]
fn backdrop_resets_the_whole_canvas_to_black() {
    let mut c = canvas();
    c.fill(Rgba::opaque(40, 80, 120));
    draw_backdrop(&mut c);
    assert_eq!(c.pixel(0, 0), Rgba::BLACK);
    assert_eq!(c.pixel(CANVAS_WIDTH - 1, CANVAS_HEIGHT - 1), Rgba::BLACK);
}

#[test]
fn zero_samples_keep_bars_at_the_baseline() {
    let mut c = canvas();
    draw_backdrop(&mut c);
    let rainbow = bar_rainbow().unwrap();

    let loudness = draw_bars(&mut c, &[0u8; 512], &rainbow);
    assert_eq!(loudness, 0.0);
    // Baseline y=650 sits below the canvas, so zero-amplitude bars paint
    // nothing at all.
    for y in (0..CANVAS_HEIGHT).step_by(17) {
        for x in (0..CANVAS_WIDTH).step_by(13) {
            assert_eq!(c.pixel(x, y), Rgba::BLACK, "at ({x}, {y})");
        }
    }
}

#[test]
fn full_scale_samples_give_loudness_255_and_tall_bars() {
    let mut c = canvas();
    draw_backdrop(&mut c);
    let rainbow = bar_rainbow().unwrap();

    let loudness = draw_bars(&mut c, &[255u8; 512], &rainbow);
    assert_eq!(loudness, 255.0);

    // Bar 0 is anchored at x=10 and rises to 650 - 255*1.5 = 267.5.
    assert_eq!(c.pixel(10, 400), Rgba::opaque(255, 0, 0), "first bar is rainbow red");
    assert_eq!(c.pixel(10, 200), Rgba::BLACK, "above the bar top");
}

#[test]
fn loudness_is_the_plain_sample_average() {
    let mut c = canvas();
    let rainbow = bar_rainbow().unwrap();

    let mut samples = vec![0u8; 512];
    samples[..256].fill(255);
    let loudness = draw_bars(&mut c, &samples, &rainbow);
    assert_eq!(loudness, 127.5);

    assert_eq!(draw_bars(&mut c, &[], &rainbow), 0.0);
}

#[test]
fn bar_color_follows_the_rainbow_span() {
    let mut c = canvas();
    draw_backdrop(&mut c);
    let rainbow = bar_rainbow().unwrap();
    draw_bars(&mut c, &[255u8; 512], &rainbow);

    // Bar 37 is anchored at x = 10 + 37*20 = 750, the far end of the span.
    assert_eq!(c.pixel(750, 400), Rgba::opaque(255, 192, 203), "last span bar is pink");
}

// ── Star field ──────────────────────────────────────────────────────────────

#[test]
fn starfield_has_exactly_the_requested_count_within_bounds() {
    let mut rng = fastrand::Rng::with_seed(42);
    let field = StarField::generate(50, 10.0, CANVAS_WIDTH, CANVAS_HEIGHT, &mut rng);
    assert_eq!(field.len(), 50);

    let band = CANVAS_HEIGHT as f32 / STAR_BAND_DIVISOR;
    for star in field.stars() {
        assert!(star.x >= 0.0 && star.x < CANVAS_WIDTH as f32);
        assert!(star.y >= 0.0 && star.y < band, "star outside the upper band");
        assert!(star.base_radius >= 0.0 && star.base_radius < 10.0);
    }
}

#[test]
fn starfield_generation_is_reproducible_for_a_seed() {
    let mut a = fastrand::Rng::with_seed(7);
    let mut b = fastrand::Rng::with_seed(7);
    let fa = StarField::generate(20, 10.0, CANVAS_WIDTH, CANVAS_HEIGHT, &mut a);
    let fb = StarField::generate(20, 10.0, CANVAS_WIDTH, CANVAS_HEIGHT, &mut b);
    assert_eq!(fa.stars(), fb.stars());
}

#[test]
fn star_positions_never_change_across_renders() {
    let mut rng = fastrand::Rng::with_seed(3);
    let field = StarField::generate(30, 10.0, CANVAS_WIDTH, CANVAS_HEIGHT, &mut rng);
    let before = field.stars().to_vec();

    let mut c = canvas();
    for tick in 0..100 {
        let loudness = (tick * 31 % 256) as f32;
        field.render(&mut c, loudness, Rgba::opaque(255, 255, 0), 1.3, tick % 2 == 0);
    }
    assert_eq!(field.stars(), &before[..]);
}

#[test]
fn zero_loudness_draws_no_stars() {
    let mut rng = fastrand::Rng::with_seed(5);
    let field = StarField::generate(50, 10.0, CANVAS_WIDTH, CANVAS_HEIGHT, &mut rng);
    let mut c = canvas();
    field.render(&mut c, 0.0, Rgba::WHITE, 1.3, false);
    for y in (0..CANVAS_HEIGHT).step_by(3) {
        for x in (0..CANVAS_WIDTH).step_by(3) {
            assert_eq!(c.pixel(x, y), Rgba::BLACK);
        }
    }
}

#[test]
fn full_loudness_paints_star_centers() {
    let mut rng = fastrand::Rng::with_seed(11);
    let field = StarField::generate(50, 10.0, CANVAS_WIDTH, CANVAS_HEIGHT, &mut rng);
    let mut c = canvas();
    field.render(&mut c, 255.0, Rgba::opaque(255, 255, 0), 1.3, false);

    let big = field
        .stars()
        .iter()
        .find(|s| s.base_radius >= 2.0)
        .expect("seeded field should contain a star with base radius >= 2");
    assert_eq!(
        c.pixel(big.x as usize, big.y as usize),
        Rgba::opaque(255, 255, 0)
    );
}

#[test]
fn shine_phase_flips_each_advance() {
    let mut phase = ShinePhase::default();
    assert!(!phase.is_glowing());
    phase.advance();
    assert!(phase.is_glowing());
    phase.advance();
    assert!(!phase.is_glowing());
}

// ── Parallax band ───────────────────────────────────────────────────────────

fn solid_strip(c: Rgba) -> Sprite {
    let mut s = Sprite::new(STRIP_WIDTH, STRIP_HEIGHT);
    s.fill_rect(0, 0, STRIP_WIDTH, STRIP_HEIGHT, c);
    s
}

#[test]
fn scroll_counter_cycles_in_order_without_skips() {
    let mut band = ParallaxBand::new(solid_strip(Rgba::opaque(0, 60, 0)));
    let mut c = canvas();

    for tick in 0..(2 * SCROLL_WRAP + 50) {
        let before = band.scroll();
        let drawn = if before >= SCROLL_WRAP { 0 } else { before };
        assert_eq!(drawn, tick % SCROLL_WRAP, "wrong offset at tick {tick}");
        band.render(&mut c);
        assert_eq!(band.scroll(), drawn + 1);
    }
}

#[test]
fn two_copies_cover_the_full_width_at_any_offset() {
    let green = Rgba::opaque(0, 200, 0);
    let mut band = ParallaxBand::new(solid_strip(green));

    for _ in 0..3 {
        let mut c = canvas();
        for _ in 0..257 {
            band.render(&mut c);
        }
        for x in 0..DEST_WIDTH {
            assert_eq!(c.pixel(x, 0), green, "seam at x={x}, scroll={}", band.scroll());
            assert_eq!(c.pixel(x, CANVAS_HEIGHT - 1), green);
        }
    }
}

// ── Procedural skyline ──────────────────────────────────────────────────────

#[test]
fn night_skyline_is_deterministic_and_strip_sized() {
    let mut a = fastrand::Rng::with_seed(99);
    let mut b = fastrand::Rng::with_seed(99);
    let sa = night_skyline(&mut a);
    let sb = night_skyline(&mut b);

    assert_eq!(sa.width(), STRIP_WIDTH);
    assert_eq!(sa.height(), STRIP_HEIGHT);
    for (x, y) in [(0, 0), (100, 300), (283, 583), (563, 450)] {
        assert_eq!(sa.pixel(x, y), sb.pixel(x, y));
    }
}

#[test]
fn night_skyline_keeps_the_sky_transparent_and_the_base_built() {
    let mut rng = fastrand::Rng::with_seed(123);
    let strip = night_skyline(&mut rng);

    // Buildings top out at 420px, so the top rows are always sky.
    for x in (0..STRIP_WIDTH).step_by(47) {
        assert_eq!(strip.pixel(x, 10).a, 0, "sky should be transparent at x={x}");
    }
    // The bottom row is always inside some building.
    for x in (0..STRIP_WIDTH).step_by(47) {
        assert_eq!(strip.pixel(x, STRIP_HEIGHT - 1).a, 255, "base should be opaque at x={x}");
    }
}
