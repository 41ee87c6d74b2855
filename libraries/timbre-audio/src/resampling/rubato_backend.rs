//! Rubato resampler backend
//!
//! Drives rubato's synchronous FFT resampler over a whole planar signal:
//! full chunks first, then the zero-padded tail, then enough flush calls to
//! push the filter delay out. The delay is trimmed from the front and the
//! result cut (or zero-padded) to the exact rational length.

use super::{RationalRatio, ResamplingError, Result};
use rubato::{FftFixedIn, Resampler as RubatoResamplerTrait};

/// Input chunk size handed to rubato
const CHUNK_SIZE: usize = 1024;

/// Sub-chunks per FFT chunk (trades latency for efficiency)
const SUB_CHUNKS: usize = 2;

/// Upper bound on flush calls once input is exhausted
const MAX_FLUSHES: usize = 64;

/// Rubato-based whole-buffer resampler
pub struct RubatoResampler {
    resampler: FftFixedIn<f32>,
    ratio: RationalRatio,
    channels: usize,
}

impl RubatoResampler {
    /// Create a new rubato resampler
    pub fn new(input_rate: u32, output_rate: u32, channels: usize) -> Result<Self> {
        let ratio = RationalRatio::new(input_rate, output_rate)?;

        let resampler = FftFixedIn::<f32>::new(
            input_rate as usize,
            output_rate as usize,
            CHUNK_SIZE,
            SUB_CHUNKS,
            channels,
        )
        .map_err(|e| ResamplingError::InitializationFailed(format!("FftFixedIn creation failed: {}", e)))?;

        Ok(Self {
            resampler,
            ratio,
            channels,
        })
    }

    /// Resample every channel of a planar signal
    ///
    /// All channels must have the same length.
    pub fn process_all(&mut self, input: &[Vec<f32>]) -> Result<Vec<Vec<f32>>> {
        let frames = input.first().map_or(0, Vec::len);
        if input.iter().any(|channel| channel.len() != frames) {
            return Err(ResamplingError::RaggedInput);
        }

        let target = self.ratio.output_frames(frames);
        let delay = self.resampler.output_delay();
        let mut output: Vec<Vec<f32>> = vec![Vec::with_capacity(target + delay); self.channels];

        let mut position = 0;
        while position < frames {
            let needed = self.resampler.input_frames_next();
            let end = (position + needed).min(frames);
            let chunk: Vec<&[f32]> = input.iter().map(|c| &c[position..end]).collect();

            let processed = if end - position == needed {
                self.resampler.process(&chunk[..], None)
            } else {
                self.resampler.process_partial(Some(&chunk[..]), None)
            }
            .map_err(|e| ResamplingError::ProcessingFailed(e.to_string()))?;

            append(&mut output, processed);
            position = end;
        }

        let mut flushes = 0;
        while output.first().map_or(0, Vec::len) < delay + target && flushes < MAX_FLUSHES {
            let processed = self
                .resampler
                .process_partial::<&[f32]>(None, None)
                .map_err(|e| ResamplingError::ProcessingFailed(e.to_string()))?;

            if processed.first().map_or(true, Vec::is_empty) {
                break;
            }
            append(&mut output, processed);
            flushes += 1;
        }

        for channel in &mut output {
            channel.drain(..delay.min(channel.len()));
            channel.resize(target, 0.0);
        }

        Ok(output)
    }
}

fn append(output: &mut [Vec<f32>], processed: Vec<Vec<f32>>) {
    for (dst, src) in output.iter_mut().zip(processed) {
        dst.extend(src);
    }
}
