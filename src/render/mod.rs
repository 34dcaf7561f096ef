mod ascii;
mod halfblock;

pub use ascii::AsciiRenderer;
pub use halfblock::HalfBlockRenderer;

use std::io::Write;

/// One frame handed to a terminal renderer: the fixed-size canvas plus the
/// current terminal geometry. Renderers nearest-sample the canvas down to the
/// cell grid, so the canvas never resizes with the terminal.
pub struct Frame<'a> {
    pub term_cols: u16,
    pub term_rows: u16,
    pub visual_rows: u16,
    pub canvas_width: usize,
    pub canvas_height: usize,
    pub pixels_rgba: &'a [u8],
    pub hud: &'a str,
    pub hud_rows: u16,
    pub sync_updates: bool,
}

pub trait Renderer {
    fn name(&self) -> &'static str;
    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()>;
}

/// Validates the frame and writes the shared preamble (sync begin, home,
/// reset, autowrap off). Returns `None` when there is nothing to draw.
pub fn text_frame_begin(
    frame: &Frame<'_>,
    out: &mut dyn Write,
) -> anyhow::Result<Option<(usize, usize)>> {
    let cols = frame.term_cols as usize;
    let visual_rows = frame.visual_rows as usize;
    if cols == 0 || visual_rows == 0 || frame.canvas_width == 0 || frame.canvas_height == 0 {
        return Ok(None);
    }

    let need = frame
        .canvas_width
        .saturating_mul(frame.canvas_height)
        .saturating_mul(4);
    if frame.pixels_rgba.len() < need {
        // Internal mismatch; skip the frame rather than index out of bounds.
        return Ok(None);
    }

    if frame.sync_updates {
        out.write_all(b"\x1b[?2026h")?;
    }
    out.write_all(b"\x1b[H\x1b[0m")?;
    // Autowrap off while painting full-width rows; wrapped last columns leave
    // visible gaps in some terminals.
    out.write_all(b"\x1b[?7l")?;

    Ok(Some((cols, visual_rows)))
}

/// Writes the HUD rows, restores autowrap, ends the sync bracket, flushes.
pub fn text_frame_end(
    frame: &Frame<'_>,
    cols: usize,
    visual_rows: usize,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let mut hud_lines = frame.hud.lines();
    for i in 0..(frame.hud_rows as usize) {
        write!(out, "\x1b[{};1H\x1b[0m\x1b[2K", visual_rows + i + 1)?;
        if let Some(mut line) = hud_lines.next() {
            if line.len() > cols {
                line = &line[..cols];
            }
            write!(out, "{line}")?;
        }
    }

    out.write_all(b"\x1b[?7h")?;
    if frame.sync_updates {
        out.write_all(b"\x1b[?2026l")?;
    }
    out.flush()?;
    Ok(())
}

/// Nearest-sampled canvas pixel at normalized (u, v) in [0, 1).
#[inline]
pub fn canvas_sample(frame: &Frame<'_>, u: f32, v: f32) -> (u8, u8, u8) {
    let x = ((u * frame.canvas_width as f32) as usize).min(frame.canvas_width - 1);
    let y = ((v * frame.canvas_height as f32) as usize).min(frame.canvas_height - 1);
    let i = (y * frame.canvas_width + x) * 4;
    (
        frame.pixels_rgba[i],
        frame.pixels_rgba[i + 1],
        frame.pixels_rgba[i + 2],
    )
}

#[inline]
pub fn luma_u8(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 54 + g as u32 * 183 + b as u32 * 19) >> 8) as u8
}

pub fn write_fg_rgb(out: &mut dyn Write, r: u8, g: u8, b: u8) -> anyhow::Result<()> {
    write!(out, "\x1b[38;2;{};{};{}m", r, g, b)?;
    Ok(())
}

pub fn write_bg_rgb(out: &mut dyn Write, r: u8, g: u8, b: u8) -> anyhow::Result<()> {
    write!(out, "\x1b[48;2;{};{};{}m", r, g, b)?;
    Ok(())
}
