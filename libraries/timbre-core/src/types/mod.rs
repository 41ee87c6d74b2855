mod audio;
pub mod params;

pub use audio::{AudioBuffer, AudioFormat, SampleRate};
pub use params::{
    ChorusParams, CompressorParams, DelayParams, DistortionParams, EqParams, FilterSpec,
    NoiseReducerParams, ReverbParams,
};
