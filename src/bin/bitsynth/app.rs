//! Bitsynth - audio setup and runner

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::RingBuffer;

use bitsynth::{patch::Patch, Synth, SynthConfig, MAX_BLOCK_SIZE};

use super::ui::{UiApp, VIS_BUFFER_SIZE};

/// Main application builder
pub struct Bitsynth {
    config: SynthConfig,
    presets: Vec<Patch>,
}

impl Bitsynth {
    pub fn new(config: SynthConfig) -> Self {
        Self {
            config,
            presets: Vec::new(),
        }
    }

    /// Patches the preset key cycles through. The first is loaded at start.
    pub fn presets(mut self, presets: Vec<Patch>) -> Self {
        self.presets = presets;
        self
    }

    /// Run the application (takes over the terminal, plays audio)
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;
        // Every output sample averages `decimation` ticks.
        let tick_rate = sample_rate as f64 * self.config.decimation as f64;

        let (mut synth, engine) = Synth::with_protocol(self.config);
        let (mut audio_tx, audio_rx) = RingBuffer::<f32>::new(VIS_BUFFER_SIZE * 4);

        let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _| {
                    let total_frames = data.len() / channels;
                    let mut frames_written = 0;

                    while frames_written < total_frames {
                        let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                        let block = &mut render_buf[..frames];
                        synth.render_block(block);

                        // Copy to output (mono to all channels)
                        let out_off = frames_written * channels;
                        for (i, &s) in block.iter().enumerate() {
                            for ch in 0..channels {
                                data[out_off + i * channels + ch] = s;
                            }
                            // Visualisation is best effort; drop when full.
                            let _ = audio_tx.push(s);
                        }

                        frames_written += frames;
                    }
                },
                |err| log::error!("audio stream error: {err}"),
                None,
            )
            .wrap_err("failed to build output stream")?;

        stream.play().wrap_err("failed to start output stream")?;

        let mut app = UiApp::new(engine, audio_rx, self.presets, sample_rate, tick_rate);
        let mut terminal = ratatui::init();
        let result = app.run(&mut terminal);
        ratatui::restore();

        drop(stream);
        result
    }
}
