//! Header bar: patch, panel LEDs, note and output level

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use bitsynth::{dsp::EnvelopeState, protocol::CommitOutcome, protocol::ProtocolEngine};

use super::state::UiState;

/// Level and pitch of the visualization buffer
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
    /// Loudest spectral line, if any
    pub fundamental: Option<f64>,
}

impl AudioStats {
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self {
                peak: 0.0,
                rms: 0.0,
                fundamental: None,
            };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self {
            peak,
            rms,
            fundamental: None,
        }
    }

    pub fn with_fundamental(mut self, hz: Option<f64>) -> Self {
        self.fundamental = hz;
        self
    }
}

fn led(label: &str, on: bool, color: Color) -> Span<'static> {
    let style = if on {
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Span::styled(format!("● {label}  "), style)
}

fn stage_label(stage: EnvelopeState) -> (&'static str, Color) {
    match stage {
        EnvelopeState::Idle => ("IDLE", Color::DarkGray),
        EnvelopeState::Attack => ("ATTACK", Color::Green),
        EnvelopeState::Decay => ("DECAY", Color::Yellow),
        EnvelopeState::Sustain => ("SUSTAIN", Color::Cyan),
        EnvelopeState::Release => ("RELEASE", Color::Magenta),
    }
}

fn outcome_span(outcome: Option<&CommitOutcome>) -> Span<'static> {
    match outcome {
        None => Span::raw(""),
        Some(CommitOutcome::Committed(n)) => Span::styled(
            format!("ok ({n})  "),
            Style::default().fg(Color::DarkGray),
        ),
        Some(other) => Span::styled(format!("{other:?}  "), Style::default().fg(Color::Red)),
    }
}

pub fn render_header(
    frame: &mut Frame,
    area: Rect,
    engine: &ProtocolEngine,
    state: &UiState,
    preset: &str,
    sample_rate: f32,
    stats: &AudioStats,
) {
    let block = Block::default()
        .title(" bitsynth ")
        .borders(Borders::ALL);

    let lines = engine.lines();
    let (stage, stage_color) = stage_label(lines.envelope_state());

    let note = match state.last_note_hz {
        Some(hz) => format!("{hz:.1}Hz"),
        None => "-".to_string(),
    };
    let heard = match stats.fundamental {
        Some(hz) => format!("~{hz:.0}Hz"),
        None => "-".to_string(),
    };

    let line = Line::from(vec![
        Span::styled(format!(" {preset}  "), Style::default().fg(Color::Cyan)),
        led("GATE", lines.gate_active(), Color::Green),
        led("OSC", lines.oscillator_running(), Color::Yellow),
        Span::styled(format!("{stage:<8}"), Style::default().fg(stage_color)),
        Span::styled(
            format!("Oct {}  ", state.octave),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("{note} / {heard}  "),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            if state.latched { "LATCH  " } else { "" },
            Style::default().fg(Color::Yellow),
        ),
        outcome_span(state.last_outcome.as_ref()),
        Span::styled(
            format!("{:.1}kHz  ", sample_rate / 1000.0),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", stats.peak, stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}
