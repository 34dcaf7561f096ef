use clap::{Parser, ValueEnum};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "skyline-visualizer",
    version,
    about = "Audio-reactive night-skyline visualizer for truecolor terminals"
)]
pub struct Config {
    /// Acquisition mode for the amplitude buffer.
    #[arg(long, value_enum, default_value_t = SampleMode::Frequency)]
    pub mode: SampleMode,

    #[arg(long, value_enum, default_value_t = PaletteKind::Night)]
    pub palette: PaletteKind,

    #[arg(long, value_enum, default_value_t = RendererMode::HalfBlock)]
    pub renderer: RendererMode,

    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Star color: a named color or #rrggbb.
    #[arg(long, default_value = "yellow")]
    pub star_color: String,

    #[arg(long, default_value_t = 1.3)]
    pub max_radius_scale: f32,

    #[arg(long, default_value_t = 50)]
    pub num_stars: usize,

    /// Upper bound for the random base radius of a generated star.
    #[arg(long, default_value_t = 10.0)]
    pub star_radius: f32,

    /// Seed for star and skyline generation. Random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub gradient: bool,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub bars: bool,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub stars: bool,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub silhouette: bool,

    #[arg(long, default_value_t = false, action = clap::ArgAction::Set)]
    pub shine: bool,

    #[arg(long, default_value_t = false, action = clap::ArgAction::Set)]
    pub invert: bool,

    #[arg(long, default_value_t = false, action = clap::ArgAction::Set)]
    pub grayscale: bool,

    #[arg(long, default_value_t = false, action = clap::ArgAction::Set)]
    pub emboss: bool,

    #[arg(long, default_value_t = false)]
    pub list_devices: bool,

    /// Substring match against input device names.
    #[arg(long)]
    pub device: Option<String>,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub sync_updates: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SampleMode {
    /// Amplitude by frequency bin.
    #[value(alias = "spectral", alias = "freq")]
    Frequency,
    /// Amplitude by time sample.
    #[value(alias = "temporal", alias = "wave")]
    Waveform,
}

impl SampleMode {
    pub fn toggle(self) -> Self {
        match self {
            Self::Frequency => Self::Waveform,
            Self::Waveform => Self::Frequency,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Frequency => "frequency",
            Self::Waveform => "waveform",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PaletteKind {
    Night,
    Day,
    Sunrise,
    Sunset,
}

impl PaletteKind {
    pub const fn all() -> [Self; 4] {
        [Self::Night, Self::Day, Self::Sunrise, Self::Sunset]
    }

    pub fn next(self) -> Self {
        let all = Self::all();
        let mut idx = 0usize;
        while idx < all.len() {
            if all[idx] == self {
                return all[(idx + 1) % all.len()];
            }
            idx += 1;
        }
        Self::Night
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Night => "night",
            Self::Day => "day",
            Self::Sunrise => "sunrise",
            Self::Sunset => "sunset",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RendererMode {
    #[value(alias = "ansi", alias = "text")]
    Ascii,
    #[value(name = "half-block", alias = "halfblock", alias = "half_block", alias = "hb")]
    HalfBlock,
}
