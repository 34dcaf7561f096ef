use crate::render::{canvas_sample, luma_u8, text_frame_begin, text_frame_end, write_fg_rgb, Frame, Renderer};
use std::io::Write;

pub struct AsciiRenderer {
    last_fg: Option<(u8, u8, u8)>,
}

impl AsciiRenderer {
    pub fn new() -> Self {
        Self { last_fg: None }
    }
}

impl Default for AsciiRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for AsciiRenderer {
    fn name(&self) -> &'static str {
        "ascii"
    }

    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
        let Some((cols, visual_rows)) = text_frame_begin(frame, out)? else {
            return Ok(());
        };

        self.last_fg = None;

        // Dark -> bright ramp. ASCII-safe and compact.
        const RAMP: &[u8] = b" .,:;irsXA253hMHGS#9B&@";

        for row in 0..visual_rows {
            let v = row as f32 / visual_rows as f32;
            for x in 0..cols {
                let u = x as f32 / cols as f32;
                let (r, g, b) = canvas_sample(frame, u, v);

                let l = luma_u8(r, g, b) as usize;
                let ridx = l * (RAMP.len() - 1) / 255;
                let ch = RAMP[ridx];

                let fg = (r, g, b);
                if self.last_fg != Some(fg) {
                    write_fg_rgb(out, fg.0, fg.1, fg.2)?;
                    self.last_fg = Some(fg);
                }
                out.write_all(&[ch])?;
            }
            out.write_all(b"\r\n")?;
        }

        text_frame_end(frame, cols, visual_rows, out)
    }
}
