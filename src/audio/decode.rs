use std::io::Cursor;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;
use tracing::debug;

/// Canonical waveform sample rate expected by transcription providers
pub const CANONICAL_SAMPLE_RATE: u32 = 16000;

/// Canonical channel count (mono)
pub const CANONICAL_CHANNELS: u16 = 1;

/// Decoded audio in canonical form: 16-bit linear PCM, mono, 16kHz
/// (or the native rate when it is already below the canonical rate)
#[derive(Debug, Clone)]
pub struct Waveform {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl Waveform {
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / (self.sample_rate as f64 * self.channels as f64)
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unrecognized container or codec: {0}")]
    UnsupportedFormat(String),

    #[error("segment contains no audio track")]
    NoAudioTrack,

    #[error("malformed audio packet: {0}")]
    Malformed(String),

    #[error("segment decoded to zero samples")]
    Empty,
}

/// Decode one opaque compressed audio segment into a canonical waveform.
///
/// Stateless, pure function of the input bytes: probes the container format,
/// decodes every packet of the first audio track, then downmixes to mono and
/// downsamples to 16kHz.
pub fn decode_segment(bytes: &[u8]) -> Result<Waveform, DecodeError> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());

    let probed = symphonia::default::get_probe()
        .format(
            &Hint::new(),
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| DecodeError::UnsupportedFormat(e.to_string()))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(DecodeError::NoAudioTrack)?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| DecodeError::UnsupportedFormat(e.to_string()))?;

    let mut samples: Vec<i16> = Vec::new();
    let mut sample_rate = codec_params.sample_rate.unwrap_or(CANONICAL_SAMPLE_RATE);
    let mut channels = codec_params
        .channels
        .map(|c| c.count() as u16)
        .unwrap_or(CANONICAL_CHANNELS);
    let mut sample_buf: Option<SampleBuffer<i16>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break; // end of stream
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(DecodeError::Malformed(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                sample_rate = spec.rate;
                channels = spec.channels.count() as u16;

                if sample_buf.is_none() {
                    sample_buf = Some(SampleBuffer::new(decoded.capacity() as u64, spec));
                }

                if let Some(buf) = sample_buf.as_mut() {
                    buf.copy_interleaved_ref(decoded);
                    samples.extend_from_slice(buf.samples());
                }
            }
            // An undecodable packet is skipped; the rest of the segment may
            // still be usable
            Err(SymphoniaError::DecodeError(e)) => {
                debug!("skipping corrupt packet: {}", e);
                continue;
            }
            Err(e) => return Err(DecodeError::Malformed(e.to_string())),
        }
    }

    if samples.is_empty() {
        return Err(DecodeError::Empty);
    }

    let waveform = Waveform {
        samples,
        sample_rate,
        channels,
    };

    Ok(canonicalize(waveform))
}

/// Convert a decoded waveform to the canonical format: mono, 16kHz
fn canonicalize(waveform: Waveform) -> Waveform {
    let mut processed = waveform;

    if processed.channels != CANONICAL_CHANNELS {
        processed = downmix_to_mono(processed);
    }

    if processed.sample_rate != CANONICAL_SAMPLE_RATE {
        processed = downsample(processed, CANONICAL_SAMPLE_RATE);
    }

    processed
}

/// Downmix interleaved stereo to mono by summing channels
fn downmix_to_mono(waveform: Waveform) -> Waveform {
    if waveform.channels == 1 {
        return waveform;
    }

    let channels = waveform.channels as usize;
    let mut mono_samples = Vec::with_capacity(waveform.samples.len() / channels);

    for frame in waveform.samples.chunks_exact(channels) {
        let sum: i32 = frame.iter().map(|&s| s as i32).sum();
        let mono = sum.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
        mono_samples.push(mono);
    }

    Waveform {
        samples: mono_samples,
        sample_rate: waveform.sample_rate,
        channels: 1,
    }
}

/// Downsample by decimation
fn downsample(waveform: Waveform, target_rate: u32) -> Waveform {
    if waveform.sample_rate == target_rate {
        return waveform;
    }

    let ratio = waveform.sample_rate / target_rate;
    if ratio <= 1 {
        return waveform; // Can't upsample
    }

    let downsampled: Vec<i16> = waveform
        .samples
        .iter()
        .step_by(ratio as usize)
        .copied()
        .collect();

    Waveform {
        samples: downsampled,
        sample_rate: waveform.sample_rate / ratio,
        channels: waveform.channels,
    }
}
