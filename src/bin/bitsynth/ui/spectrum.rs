//! Spectrum analyzer widget
//!
//! FFT of the decimated output on a log-frequency axis. The delta-sigma
//! modulator pushes its quantization noise toward Nyquist, so the top of
//! the plot is where the hiss shows up.

use std::sync::Arc;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Points on the plotted curve
const SPECTRUM_POINTS: usize = 64;
const MIN_FREQ: f64 = 20.0;
const FLOOR_DB: f64 = -100.0;

pub struct SpectrumAnalyzer {
    /// Hann window
    window: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// FFT bin behind each plotted point
    bin_indices: Vec<usize>,
    bin_hz: f64,
    /// (log10 Hz, dB)
    points: Vec<(f64, f64)>,
    /// Loudest FFT bin from the last update, in Hz
    peak_hz: Option<f64>,
}

impl SpectrumAnalyzer {
    pub fn new(buffer_len: usize, sample_rate: f32) -> Self {
        let buffer_len = buffer_len.max(4);
        let fft = FftPlanner::new().plan_fft_forward(buffer_len);

        let denom = (buffer_len - 1) as f32;
        let window = (0..buffer_len)
            .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / denom).cos()))
            .collect();

        let nyquist = (sample_rate as f64 / 2.0).max(MIN_FREQ * 2.0);
        let bin_hz = sample_rate as f64 / buffer_len as f64;
        let half = buffer_len / 2;

        let ratio = nyquist / MIN_FREQ;
        let mut bin_indices = Vec::with_capacity(SPECTRUM_POINTS);
        let mut points = Vec::with_capacity(SPECTRUM_POINTS);
        for i in 0..SPECTRUM_POINTS {
            let t = i as f64 / (SPECTRUM_POINTS - 1) as f64;
            let freq = MIN_FREQ * ratio.powf(t);
            let index = ((freq / bin_hz).round() as usize).clamp(1, half - 1);
            bin_indices.push(index);
            points.push((freq.log10(), FLOOR_DB));
        }

        Self {
            window,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); buffer_len],
            bin_indices,
            bin_hz,
            points,
            peak_hz: None,
        }
    }

    /// Recompute from the latest samples. Buffers of the wrong length are
    /// ignored.
    pub fn update(&mut self, buffer: &[f32]) {
        if buffer.len() != self.window.len() {
            return;
        }

        for ((bin, &sample), &w) in self.scratch.iter_mut().zip(buffer).zip(&self.window) {
            *bin = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        let half = self.scratch.len() / 2;
        let power = |bin: Complex<f32>| (bin.norm_sqr() as f64).max(1e-12);

        for (point, &index) in self.points.iter_mut().zip(&self.bin_indices) {
            point.1 = (10.0 * power(self.scratch[index]).log10()).max(FLOOR_DB);
        }

        self.peak_hz = self.scratch[1..half]
            .iter()
            .enumerate()
            .max_by(|a, b| power(*a.1).total_cmp(&power(*b.1)))
            .filter(|(_, bin)| power(**bin) > 1e-3)
            .map(|(i, _)| (i + 1) as f64 * self.bin_hz);
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn peak_hz(&self) -> Option<f64> {
        self.peak_hz
    }
}

pub fn render_spectrum(frame: &mut Frame, area: Rect, spectrum: &[(f64, f64)]) {
    let block = Block::default()
        .title(" Spectrum ")
        .borders(Borders::ALL);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(spectrum);

    let min_x = spectrum.first().map(|p| p.0).unwrap_or(0.0);
    let max_x = spectrum.last().map(|p| p.0).unwrap_or(1.0).max(min_x + 1.0);
    let max_db = spectrum.iter().map(|p| p.1).fold(FLOOR_DB, f64::max);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([min_x, max_x])
                .labels(vec!["20", "200", "2k", "20k"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, max_db.max(0.0) + 10.0])
                .labels(vec!["-100", "-50", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
