pub mod parallax;
pub mod stars;

use crate::canvas::{PixelBuffer, Rgba};
use crate::gradient::LinearGradient;

/// Bars rise from this baseline. It sits below the visible canvas, so only
/// samples tall enough to clear the bottom edge show up.
pub const BAR_BASELINE_Y: i32 = 650;
pub const BAR_LEFT_X: i32 = 10;
pub const BAR_STRIDE: i32 = 20;
pub const BAR_WIDTH: u32 = 20;
pub const BAR_GAIN: f32 = 1.5;

/// Canvas-space x span the bar rainbow is anchored to.
pub const RAINBOW_X0: f32 = 10.0;
pub const RAINBOW_X1: f32 = 750.0;

/// Unconditional opaque black fill. Always the first layer, so every frame
/// starts from the same base regardless of which layers are enabled.
pub fn draw_backdrop(canvas: &mut PixelBuffer) {
    canvas.fill(Rgba::BLACK);
}

/// Composite the palette gradient over the whole canvas at its blend alpha.
pub fn draw_palette_layer(canvas: &mut PixelBuffer, gradient: &LinearGradient, alpha: f32) {
    canvas.fill_vertical_gradient(gradient, alpha);
}

/// One vertical stroked segment per sample, colored by the rainbow at the
/// segment's canvas x. Returns this frame's loudness percent: the sample sum
/// divided by the frame length.
pub fn draw_bars(canvas: &mut PixelBuffer, samples: &[u8], rainbow: &LinearGradient) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let mut accum = 0.0f32;
    for (i, &v) in samples.iter().enumerate() {
        accum += v as f32;

        let x = BAR_LEFT_X + i as i32 * BAR_STRIDE;
        let top = (BAR_BASELINE_Y as f32 - v as f32 * BAR_GAIN).round() as i32;
        let t = ((x as f32 - RAINBOW_X0) / (RAINBOW_X1 - RAINBOW_X0)).clamp(0.0, 1.0);
        canvas.fill_bar(x, top, BAR_BASELINE_Y, BAR_WIDTH, rainbow.sample(t));
    }

    accum / samples.len() as f32
}
