use crate::canvas::{sample_channel, PixelBuffer};

/// Replace each color channel with its complement. Alpha is untouched, so the
/// filter is involutive.
pub fn invert(canvas: &mut PixelBuffer) {
    for px in canvas.data_mut().chunks_exact_mut(4) {
        px[0] = 255 - px[0];
        px[1] = 255 - px[1];
        px[2] = 255 - px[2];
    }
}

/// Average the color channels, then store the average with a slight warm
/// tint: R = avg + 5, G = avg, B = avg - 5, each clamped to [0, 255]. The
/// average is computed from whatever values are in the buffer, so an earlier
/// invert pass feeds inverted channels into this one.
pub fn grayscale(canvas: &mut PixelBuffer) {
    for px in canvas.data_mut().chunks_exact_mut(4) {
        let avg = (px[0] as f32 + px[1] as f32 + px[2] as f32) / 3.0;
        px[0] = (avg + 5.0).clamp(0.0, 255.0) as u8;
        px[1] = avg.clamp(0.0, 255.0) as u8;
        px[2] = (avg - 5.0).clamp(0.0, 255.0) as u8;
    }
}

/// Per-channel spatial emboss: out = clamp(127 + 2*in - right - below).
/// Neighbor reads are edge-replicated, so the last row and column see
/// themselves instead of reading past the buffer. Reads come from a snapshot
/// of the input, alpha passes through.
pub fn emboss(canvas: &mut PixelBuffer) {
    let w = canvas.width();
    let h = canvas.height();
    if w == 0 || h == 0 {
        return;
    }
    let src = canvas.data().to_vec();
    let out = canvas.data_mut();

    for y in 0..h {
        for x in 0..w {
            let i = (y * w + x) * 4;
            for ch in 0..3 {
                let center = src[i + ch] as i32;
                let right = sample_channel(&src, w, h, x as isize + 1, y as isize, ch) as i32;
                let below = sample_channel(&src, w, h, x as isize, y as isize + 1, ch) as i32;
                out[i + ch] = (127 + 2 * center - right - below).clamp(0, 255) as u8;
            }
        }
    }
}
