pub mod config;
pub mod dsp; // Fixed-point per-tick primitives
pub mod io;
pub mod patch;
pub mod protocol; // Register protocol (host side)
pub mod registers;
pub mod synth; // Tick pipeline composition

pub use config::SynthConfig;
pub use synth::Synth;

/// Largest block `Synth::render_block` fills in one call.
pub const MAX_BLOCK_SIZE: usize = 2048;
