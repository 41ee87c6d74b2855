//! Audio effects processing
//!
//! Every effect is a pure function `(&AudioBuffer, params) -> Result<AudioBuffer>`:
//! the input is never mutated, parameters are validated before any sample is
//! touched, and all filter/envelope state lives inside the call.
//!
//! Available effects:
//! - **parametric_eq**: 3-band peaking equalizer
//! - **reduce_noise**: STFT spectral subtraction
//! - **delay**, **chorus**, **reverb**: time-based effects (frame count preserved)
//! - **soft_clip**: tanh distortion
//! - **highpass**, **lowpass**: 4th-order Butterworth
//! - **pan**: constant-power stereo panning
//! - **compress**, **normalize**, **auto_gain**, **apply_gain**: dynamics and level

mod chorus;
mod compressor;
mod delay;
mod distortion;
mod eq;
mod filters;
mod gain;
mod noise_reducer;
mod pan;
mod reverb;

pub use chorus::chorus;
pub use compressor::compress;
pub use delay::{delay, delay_samples};
pub use distortion::soft_clip;
pub use eq::parametric_eq;
pub use filters::{highpass, lowpass};
pub use gain::{apply_gain, auto_gain, normalize};
pub use noise_reducer::{reduce_noise, FRAME_SIZE, HOP_SIZE};
pub use pan::{pan, pan_gains};
pub use reverb::{fft_convolve, impulse_response, impulse_response_head, impulse_response_len, reverb};
