//! UI-side state: what the player is doing with the keyboard.

use std::time::{Duration, Instant};

use bitsynth::protocol::CommitOutcome;

/// How long a key press holds the gate when the gate is not latched.
pub const NOTE_LENGTH: Duration = Duration::from_millis(300);

/// Piano row: A S D F G H J K → C D E F G A B C, with W E T Y U for the
/// black keys.
pub fn key_to_semitone(key: char) -> Option<i32> {
    let semitone = match key {
        'a' => 0,
        'w' => 1,
        's' => 2,
        'e' => 3,
        'd' => 4,
        'f' => 5,
        't' => 6,
        'g' => 7,
        'y' => 8,
        'h' => 9,
        'u' => 10,
        'j' => 11,
        'k' => 12,
        _ => return None,
    };
    Some(semitone)
}

/// Frequency of `semitone` above C in `octave` (C4 = middle C).
pub fn note_hz(octave: i32, semitone: i32) -> f64 {
    let midi = (octave + 1) * 12 + semitone;
    440.0 * 2.0_f64.powf((midi as f64 - 69.0) / 12.0)
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub preset_index: usize,
    pub octave: i32,
    /// Gate held until toggled instead of for one note length.
    pub latched: bool,
    pub note_off_at: Option<Instant>,
    pub last_note_hz: Option<f64>,
    pub last_outcome: Option<CommitOutcome>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            preset_index: 0,
            octave: 4,
            latched: false,
            note_off_at: None,
            last_note_hz: None,
            last_outcome: None,
        }
    }
}
