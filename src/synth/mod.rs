// Purpose: Tick pipeline composition, status lines
// This layer owns every DSP primitive and runs them in dependency order

pub mod lines;
mod pipeline;

pub use lines::SharedLines;
pub use pipeline::Synth;
