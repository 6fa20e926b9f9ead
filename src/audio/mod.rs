pub mod decode;
pub mod wav;

pub use decode::{decode_segment, DecodeError, Waveform, CANONICAL_CHANNELS, CANONICAL_SAMPLE_RATE};
pub use wav::waveform_to_wav;
