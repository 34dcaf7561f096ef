use crate::render::{canvas_sample, text_frame_begin, text_frame_end, write_bg_rgb, write_fg_rgb, Frame, Renderer};
use std::io::Write;

pub struct HalfBlockRenderer {
    last_fg: Option<(u8, u8, u8)>,
    last_bg: Option<(u8, u8, u8)>,
}

impl HalfBlockRenderer {
    pub fn new() -> Self {
        Self {
            last_fg: None,
            last_bg: None,
        }
    }
}

impl Default for HalfBlockRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for HalfBlockRenderer {
    fn name(&self) -> &'static str {
        "halfblock"
    }

    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
        let Some((cols, visual_rows)) = text_frame_begin(frame, out)? else {
            return Ok(());
        };

        self.last_fg = None;
        self.last_bg = None;

        const HALF_BLOCK: char = '\u{2580}';

        // Two canvas sample rows per cell row: foreground is the top half,
        // background the bottom.
        let sub_rows = visual_rows * 2;
        for row in 0..visual_rows {
            let v_top = (row * 2) as f32 / sub_rows as f32;
            let v_bot = (row * 2 + 1) as f32 / sub_rows as f32;
            for x in 0..cols {
                let u = x as f32 / cols as f32;
                let top = canvas_sample(frame, u, v_top);
                let bot = canvas_sample(frame, u, v_bot);

                if self.last_fg != Some(top) {
                    write_fg_rgb(out, top.0, top.1, top.2)?;
                    self.last_fg = Some(top);
                }
                if self.last_bg != Some(bot) {
                    write_bg_rgb(out, bot.0, bot.1, bot.2)?;
                    self.last_bg = Some(bot);
                }
                write!(out, "{HALF_BLOCK}")?;
            }
            out.write_all(b"\r\n")?;
        }

        text_frame_end(frame, cols, visual_rows, out)
    }
}
