/// In-memory playback/recording device
///
/// Everything played is queued and handed back, in order, by `record()`.
/// Lets callers exercise code written against `AudioOutput`/`AudioInput`
/// without touching real hardware.
use std::collections::VecDeque;
use timbre_core::{AudioBuffer, AudioInput, AudioOutput, Result, TimbreError};
use tracing::trace;

#[derive(Debug, Default)]
pub struct LoopbackDevice {
    queue: VecDeque<AudioBuffer>,
}

impl LoopbackDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of buffers waiting to be recorded
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl AudioOutput for LoopbackDevice {
    fn play(&mut self, buffer: &AudioBuffer) -> Result<()> {
        trace!(frames = buffer.frames(), "loopback play");
        self.queue.push_back(buffer.clone());
        Ok(())
    }
}

impl AudioInput for LoopbackDevice {
    fn record(&mut self) -> Result<AudioBuffer> {
        self.queue
            .pop_front()
            .ok_or_else(|| TimbreError::decode("Loopback device has nothing to record"))
    }
}
