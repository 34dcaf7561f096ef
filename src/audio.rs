use crate::frame::AnalysisSource;
use anyhow::{anyhow, Context};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Sample, SampleFormat};
use ringbuf::traits::{Consumer as _, Producer as _, Split as _};
use ringbuf::HeapRb;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use std::f32::consts::PI;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Analysis window size. The amplitude buffers handed to the visualizer are
/// half this long.
pub const FFT_SIZE: usize = 1024;
pub const HALF_WINDOW: usize = FFT_SIZE / 2;

const HOP: usize = 256;

/// Per-bin exponential smoothing factor applied to spectral magnitudes before
/// the dB mapping, matching the analyser the original canvas wrapped.
const SMOOTHING: f32 = 0.8;
const MIN_DB: f32 = -100.0;
const MAX_DB: f32 = -30.0;

struct AnalysisWindows {
    spectrum: Vec<u8>,
    waveform: Vec<u8>,
}

/// Byte-quantized analysis snapshot shared between the analyzer thread and
/// the render loop.
pub struct SharedAnalysis {
    windows: Mutex<AnalysisWindows>,
}

impl SharedAnalysis {
    fn new() -> Self {
        Self {
            windows: Mutex::new(AnalysisWindows {
                spectrum: vec![0u8; HALF_WINDOW],
                waveform: vec![128u8; HALF_WINDOW],
            }),
        }
    }

    fn store(&self, spectrum: &[u8], waveform: &[u8]) {
        if let Ok(mut w) = self.windows.lock() {
            w.spectrum.copy_from_slice(spectrum);
            w.waveform.copy_from_slice(waveform);
        }
    }
}

impl AnalysisSource for SharedAnalysis {
    fn half_window(&self) -> usize {
        HALF_WINDOW
    }

    fn fill_spectrum(&self, out: &mut [u8]) {
        if let Ok(w) = self.windows.lock() {
            let n = out.len().min(w.spectrum.len());
            out[..n].copy_from_slice(&w.spectrum[..n]);
        }
    }

    fn fill_waveform(&self, out: &mut [u8]) {
        if let Ok(w) = self.windows.lock() {
            let n = out.len().min(w.waveform.len());
            out[..n].copy_from_slice(&w.waveform[..n]);
        }
    }
}

pub fn list_input_devices() -> anyhow::Result<()> {
    let host = cpal::default_host();
    let devices = host.input_devices().context("enumerate input devices")?;

    let mut out = io::stdout();
    writeln!(out, "Input devices:")?;
    for dev in devices {
        let name = dev.name().unwrap_or_else(|_| "<unknown>".to_string());
        writeln!(out, "  - {}", name)?;
    }
    Ok(())
}

/// Microphone capture plus the analyzer thread that keeps the shared byte
/// windows current.
pub struct AudioSystem {
    // The stream must stay alive for the capture to keep running.
    _stream: cpal::Stream,
    stop: Arc<AtomicBool>,
    analyzer_handle: Option<thread::JoinHandle<()>>,
    shared: Arc<SharedAnalysis>,
    pub sample_rate_hz: u32,
}

impl AudioSystem {
    pub fn new(device_query: Option<&str>) -> anyhow::Result<Self> {
        let host = cpal::default_host();
        let device = select_input_device(&host, device_query)?;
        let supported = device
            .default_input_config()
            .context("get default input config")?;
        let sample_rate_hz = supported.sample_rate().0;
        let channels = supported.channels() as usize;
        let config: cpal::StreamConfig = supported.clone().into();

        let rb_capacity = (sample_rate_hz as usize).saturating_mul(4);
        let rb = HeapRb::<f32>::new(rb_capacity);
        let (mut prod, mut cons) = rb.split();

        let stop = Arc::new(AtomicBool::new(false));
        let shared = Arc::new(SharedAnalysis::new());
        let shared_for_thread = Arc::clone(&shared);
        let stop_for_thread = Arc::clone(&stop);

        let err_fn = |err| log::error!("audio stream error: {err}");

        let stream = match supported.sample_format() {
            SampleFormat::F32 => device.build_input_stream(
                &config,
                move |data: &[f32], _| push_interleaved(data, channels, &mut prod),
                err_fn,
                None,
            )?,
            SampleFormat::I16 => device.build_input_stream(
                &config,
                move |data: &[i16], _| push_interleaved(data, channels, &mut prod),
                err_fn,
                None,
            )?,
            SampleFormat::U16 => device.build_input_stream(
                &config,
                move |data: &[u16], _| push_interleaved(data, channels, &mut prod),
                err_fn,
                None,
            )?,
            fmt => return Err(anyhow!("unsupported sample format: {fmt:?}")),
        };

        stream.play().context("start input stream")?;

        let analyzer_handle =
            thread::spawn(move || analyze_loop(&mut cons, &stop_for_thread, &shared_for_thread));

        Ok(Self {
            _stream: stream,
            stop,
            analyzer_handle: Some(analyzer_handle),
            shared,
            sample_rate_hz,
        })
    }

    /// Handle implementing the analysis capability the visualizer consumes.
    pub fn analysis(&self) -> Arc<SharedAnalysis> {
        Arc::clone(&self.shared)
    }
}

impl Drop for AudioSystem {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(h) = self.analyzer_handle.take() {
            let _ = h.join();
        }
    }
}

fn select_input_device(
    host: &cpal::Host,
    device_query: Option<&str>,
) -> anyhow::Result<cpal::Device> {
    let devices = host
        .input_devices()
        .context("enumerate input devices")?
        .collect::<Vec<_>>();

    let want = device_query.map(|s| s.to_lowercase());
    if let Some(want) = want.as_deref() {
        if let Some(dev) = devices.iter().find(|d| {
            d.name()
                .map(|n| n.to_lowercase().contains(want))
                .unwrap_or(false)
        }) {
            return Ok(dev.clone());
        }
        return Err(anyhow!("no input device matching: {want}"));
    }

    host.default_input_device()
        .ok_or_else(|| anyhow!("no default input device found"))
}

fn push_interleaved<T: Sample<Float = f32> + Copy>(
    data: &[T],
    channels: usize,
    prod: &mut ringbuf::HeapProd<f32>,
) {
    for frame in data.chunks(channels) {
        let mut acc = 0.0f32;
        for s in frame {
            acc += (*s).to_float_sample();
        }
        let mono = acc / channels as f32;
        let _ = prod.try_push(mono);
    }
}

fn analyze_loop(cons: &mut ringbuf::HeapCons<f32>, stop: &AtomicBool, shared: &SharedAnalysis) {
    let n = FFT_SIZE;
    let half = HALF_WINDOW;

    let mut scratch = vec![0.0f32; n];
    let mut write_pos = 0usize;
    let mut filled = 0usize;
    let mut since_last = 0usize;

    let hann = (0..n)
        .map(|i| 0.5 - 0.5 * ((2.0 * PI * i as f32) / (n as f32)).cos())
        .collect::<Vec<_>>();

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(n);
    let mut fft_buf = vec![Complex { re: 0.0, im: 0.0 }; n];

    let mut smoothed = vec![0.0f32; half];
    let mut spectrum = vec![0u8; half];
    let mut waveform = vec![128u8; half];

    while !stop.load(Ordering::Relaxed) {
        let mut got_any = false;
        while let Some(s) = cons.try_pop() {
            got_any = true;
            scratch[write_pos] = s;
            write_pos = (write_pos + 1) % n;
            if filled < n {
                filled += 1;
            }
            since_last += 1;
            if filled == n && since_last >= HOP {
                since_last = 0;

                for i in 0..n {
                    let x = scratch[(write_pos + i) % n];
                    fft_buf[i].re = x * hann[i];
                    fft_buf[i].im = 0.0;
                }
                fft.process(&mut fft_buf);

                for (i, c) in fft_buf.iter().take(half).enumerate() {
                    let mag = (c.re * c.re + c.im * c.im).sqrt() * 2.0 / n as f32;
                    smoothed[i] = smoothed[i] * SMOOTHING + mag * (1.0 - SMOOTHING);
                    spectrum[i] = db_to_byte(20.0 * smoothed[i].max(1e-10).log10());
                }

                // Most recent half-window of mono samples, oldest first.
                for (k, w) in waveform.iter_mut().enumerate() {
                    let s = scratch[(write_pos + n - half + k) % n].clamp(-1.0, 1.0);
                    *w = ((s * 0.5 + 0.5) * 255.0) as u8;
                }

                shared.store(&spectrum, &waveform);
            }
        }

        if !got_any {
            thread::sleep(Duration::from_millis(1));
        }
    }
}

/// Map decibels onto the byte range: MIN_DB and below -> 0, MAX_DB and
/// above -> 255.
fn db_to_byte(db: f32) -> u8 {
    let t = (db - MIN_DB) / (MAX_DB - MIN_DB);
    (t.clamp(0.0, 1.0) * 255.0) as u8
}
