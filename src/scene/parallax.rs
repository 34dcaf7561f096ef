use crate::canvas::{PixelBuffer, Rgba, Sprite};

/// The scroll counter lives in [0, SCROLL_WRAP); the two strip copies stay
/// exactly SCROLL_WRAP pixels apart, so the loop has no visible seam.
pub const SCROLL_WRAP: i32 = 800;

/// Native size of the strip image's sampled region.
pub const STRIP_WIDTH: usize = 564;
pub const STRIP_HEIGHT: usize = 584;

/// Each copy is scaled up to this destination rectangle.
pub const DEST_WIDTH: usize = 800;
pub const DEST_HEIGHT: usize = 600;

/// A fixed strip image blitted twice per frame at a cyclically advancing
/// offset, producing a continuous horizontal scroll.
pub struct ParallaxBand {
    strip: Sprite,
    scroll: i32,
}

impl ParallaxBand {
    pub fn new(strip: Sprite) -> Self {
        Self { strip, scroll: 0 }
    }

    pub fn scroll(&self) -> i32 {
        self.scroll
    }

    /// Draw both copies and advance the counter. The wrap check runs before
    /// the increment, so the value used for drawing is always in
    /// [0, SCROLL_WRAP).
    pub fn render(&mut self, canvas: &mut PixelBuffer) {
        if self.scroll >= SCROLL_WRAP {
            self.scroll = 0;
        }

        // right copy
        canvas.blit_scaled(
            &self.strip,
            0,
            0,
            STRIP_WIDTH,
            STRIP_HEIGHT,
            self.scroll,
            0,
            DEST_WIDTH,
            DEST_HEIGHT,
        );
        // left copy
        canvas.blit_scaled(
            &self.strip,
            0,
            0,
            STRIP_WIDTH,
            STRIP_HEIGHT,
            self.scroll - SCROLL_WRAP,
            0,
            DEST_WIDTH,
            DEST_HEIGHT,
        );

        self.scroll += 1;
    }
}

const BUILDING_BODY: Rgba = Rgba::opaque(5, 8, 18);
const BUILDING_EDGE: Rgba = Rgba::opaque(10, 14, 28);
const WINDOW_LIT: Rgba = Rgba::opaque(250, 214, 140);
const WINDOW_DARK: Rgba = Rgba::opaque(14, 18, 32);

/// Procedural city-silhouette strip: adjacent dark buildings of random width
/// and height against a transparent sky, with sparse lit windows and the
/// occasional rooftop antenna. Deterministic for a given rng state.
pub fn night_skyline(rng: &mut fastrand::Rng) -> Sprite {
    let mut strip = Sprite::new(STRIP_WIDTH, STRIP_HEIGHT);

    let mut x = 0usize;
    while x < STRIP_WIDTH {
        let width = 24 + rng.usize(..40);
        let width = width.min(STRIP_WIDTH - x);
        let height = 100 + rng.usize(..320);
        let top = STRIP_HEIGHT - height;

        strip.fill_rect(x, top, width, height, BUILDING_BODY);
        // Lighter left edge so adjacent towers read as separate buildings.
        strip.fill_rect(x, top, 1, height, BUILDING_EDGE);

        if width >= 12 && rng.f32() < 0.3 {
            let mast_x = x + width / 2;
            let mast_h = 16 + rng.usize(..28);
            strip.fill_rect(mast_x, top.saturating_sub(mast_h), 2, mast_h, BUILDING_BODY);
        }

        draw_windows(&mut strip, x, top, width, height, rng);
        x += width;
    }

    strip
}

fn draw_windows(
    strip: &mut Sprite,
    bx: usize,
    top: usize,
    width: usize,
    height: usize,
    rng: &mut fastrand::Rng,
) {
    let mut wy = top + 8;
    while wy + 6 < top + height {
        let mut wx = bx + 4;
        while wx + 5 < bx + width {
            let color = if rng.f32() < 0.18 { WINDOW_LIT } else { WINDOW_DARK };
            strip.fill_rect(wx, wy, 4, 5, color);
            wx += 9;
        }
        wy += 13;
    }
}
