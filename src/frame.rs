use crate::config::SampleMode;
use std::fmt;
use std::sync::Arc;

/// Audio analysis capability: fills fixed-length byte amplitude buffers on
/// demand, in either spectral or temporal form. The window length is half the
/// analysis FFT size and must not change for the provider's lifetime.
pub trait AnalysisSource: Send + Sync {
    fn half_window(&self) -> usize;
    fn fill_spectrum(&self, out: &mut [u8]);
    fn fill_waveform(&self, out: &mut [u8]);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    SourceNotAttached,
    EmptyWindow,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceNotAttached => write!(f, "acquire before an analysis source was attached"),
            Self::EmptyWindow => write!(f, "analysis source reports a zero-length window"),
        }
    }
}

impl std::error::Error for FrameError {}

/// Owns the reused amplitude buffer. Each `acquire` overwrites the buffer in
/// place; the previous frame's contents are invalid once the next acquisition
/// starts.
pub struct FrameSource {
    source: Option<Arc<dyn AnalysisSource>>,
    buf: Vec<u8>,
}

impl FrameSource {
    pub fn new() -> Self {
        Self {
            source: None,
            buf: Vec::new(),
        }
    }

    pub fn attach(&mut self, source: Arc<dyn AnalysisSource>) -> Result<(), FrameError> {
        let len = source.half_window();
        if len == 0 {
            return Err(FrameError::EmptyWindow);
        }
        self.buf.resize(len, 0);
        self.source = Some(source);
        Ok(())
    }

    /// Buffer length, fixed once a source is attached.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Populates the shared buffer for this tick and returns a view of it.
    pub fn acquire(&mut self, mode: SampleMode) -> Result<&[u8], FrameError> {
        let source = self.source.as_ref().ok_or(FrameError::SourceNotAttached)?;
        match mode {
            SampleMode::Frequency => source.fill_spectrum(&mut self.buf),
            SampleMode::Waveform => source.fill_waveform(&mut self.buf),
        }
        Ok(&self.buf)
    }
}

impl Default for FrameSource {
    fn default() -> Self {
        Self::new()
    }
}
