//! TUI module for bitsynth
//!
//! Keyboard control of the register protocol plus real-time views of the
//! decimated output.

mod header;
mod registers;
mod spectrum;
pub mod state;
mod waveform;

use std::time::{Duration, Instant};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;

use bitsynth::{
    patch::{frequency_word, Patch},
    protocol::ProtocolEngine,
    registers::map::{self, control},
};

use header::{render_header, AudioStats};
use registers::render_registers;
use spectrum::{render_spectrum, SpectrumAnalyzer};
use state::{key_to_semitone, note_hz, UiState, NOTE_LENGTH};
use waveform::render_waveform;

/// Audio visualization buffer size
pub const VIS_BUFFER_SIZE: usize = 1024;

/// UI application state
pub struct UiApp {
    /// Host side of the register protocol
    engine: ProtocolEngine,
    /// Ring buffer receiver for audio samples
    audio_rx: Consumer<f32>,
    /// Audio sample buffer for visualization
    audio_buffer: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    presets: Vec<Patch>,
    state: UiState,
    sample_rate: f32,
    tick_rate: f64,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        engine: ProtocolEngine,
        audio_rx: Consumer<f32>,
        presets: Vec<Patch>,
        sample_rate: f32,
        tick_rate: f64,
    ) -> Self {
        let mut app = Self {
            engine,
            audio_rx,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            spectrum: SpectrumAnalyzer::new(VIS_BUFFER_SIZE, sample_rate),
            presets,
            state: UiState::default(),
            sample_rate,
            tick_rate,
            should_quit: false,
        };
        app.load_preset(0);
        app
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.spectrum.update(&self.audio_buffer);
            self.release_expired_note();

            terminal.draw(|frame| self.render(frame))?;

            // Handle keyboard input (non-blocking, ~60fps)
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        self.engine.set_gate_input(false);
        Ok(())
    }

    /// Poll for new audio samples from ring buffer
    fn poll_audio(&mut self) {
        let mut received = false;
        while let Ok(sample) = self.audio_rx.pop() {
            self.audio_buffer.push(sample);
            received = true;
        }

        if received && self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
    }

    fn release_expired_note(&mut self) {
        if let Some(deadline) = self.state.note_off_at {
            if Instant::now() >= deadline && !self.state.latched {
                self.engine.set_gate_input(false);
                self.state.note_off_at = None;
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char(' ') => {
                self.state.latched = !self.state.latched;
                self.engine.set_gate_input(self.state.latched);
            }
            KeyCode::Char('p') => {
                if !self.presets.is_empty() {
                    let next = (self.state.preset_index + 1) % self.presets.len();
                    self.load_preset(next);
                }
            }
            KeyCode::Char('z') => self.state.octave = (self.state.octave - 1).max(0),
            KeyCode::Char('x') => self.state.octave = (self.state.octave + 1).min(8),
            KeyCode::Char('r') => {
                self.state.last_outcome = Some(self.engine.system_reset());
                self.load_preset(self.state.preset_index);
            }
            KeyCode::Char('v') => {
                let enable = self.engine.read(map::FILTER_ENABLE) ^ 0x01;
                self.state.last_outcome = Some(self.engine.write(map::FILTER_ENABLE, enable));
            }
            KeyCode::Char('l') => {
                let value = self.engine.read(map::CONTROL) ^ control::ENVELOPE_LOOP;
                self.state.last_outcome = Some(self.engine.write(map::CONTROL, value));
            }
            KeyCode::Char(c @ '1'..='6') => {
                let bit = 1u8 << (c as u8 - b'1');
                let select = self.engine.read(map::WAVE_SELECT) ^ bit;
                self.state.last_outcome = Some(self.engine.write(map::WAVE_SELECT, select));
            }
            KeyCode::Char(c) => {
                if let Some(semitone) = key_to_semitone(c) {
                    self.play_note(semitone);
                }
            }
            _ => {}
        }
    }

    fn play_note(&mut self, semitone: i32) {
        let hz = note_hz(self.state.octave, semitone);
        let [l, m, h, _] = frequency_word(hz, self.tick_rate).to_le_bytes();
        // One transaction, so the pipeline never plays a half-written word.
        self.state.last_outcome = Some(self.engine.write_burst(map::FREQ_L, &[l, m, h]));
        self.state.last_note_hz = Some(hz);

        self.engine.set_gate_input(true);
        self.state.note_off_at = Some(Instant::now() + NOTE_LENGTH);
    }

    fn load_preset(&mut self, index: usize) {
        let Some(patch) = self.presets.get(index) else {
            return;
        };
        self.state.preset_index = index;
        self.state.last_outcome = Some(match patch.apply(&mut self.engine) {
            Ok(written) => bitsynth::protocol::CommitOutcome::Committed(written),
            Err(outcome) => outcome,
        });
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(10),   // Scopes + registers
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(rows[1]);

        let scopes = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[0]);

        let preset = self
            .presets
            .get(self.state.preset_index)
            .map(|p| p.name.as_str())
            .unwrap_or("-");
        let stats = AudioStats::from_buffer(&self.audio_buffer)
            .with_fundamental(self.spectrum.peak_hz());
        render_header(
            frame,
            rows[0],
            &self.engine,
            &self.state,
            preset,
            self.sample_rate,
            &stats,
        );

        render_waveform(frame, scopes[0], &self.audio_buffer);
        render_spectrum(frame, scopes[1], self.spectrum.data());
        render_registers(frame, columns[1], &self.engine);

        let help = Paragraph::new(
            " [A-K] Play  [Z/X] Octave  [Space] Latch  [1-6] Waves  [V] Filter  [L] Loop  [P] Preset  [R] Reset  [Q] Quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, rows[2]);
    }
}
