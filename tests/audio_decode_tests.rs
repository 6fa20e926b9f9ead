// Integration tests for segment decoding: compressed container bytes in,
// canonical 16kHz mono waveform out.

use anyhow::Result;
use scribe_server::audio::{
    decode_segment, waveform_to_wav, DecodeError, Waveform, CANONICAL_SAMPLE_RATE,
};

fn wav_bytes(samples: Vec<i16>, sample_rate: u32, channels: u16) -> Result<Vec<u8>> {
    waveform_to_wav(&Waveform {
        samples,
        sample_rate,
        channels,
    })
}

#[test]
fn decodes_canonical_wav_unchanged() -> Result<()> {
    let samples: Vec<i16> = (0..1600).map(|i| (i % 256) as i16).collect();
    let bytes = wav_bytes(samples.clone(), 16000, 1)?;

    let waveform = decode_segment(&bytes)?;

    assert_eq!(waveform.sample_rate, CANONICAL_SAMPLE_RATE);
    assert_eq!(waveform.channels, 1);
    assert_eq!(waveform.samples, samples);

    Ok(())
}

#[test]
fn stereo_input_is_downmixed_to_mono() -> Result<()> {
    // Interleaved L/R pairs; downmix sums the channels
    let bytes = wav_bytes(vec![100, 200, -50, 25, 1000, 2000], 16000, 2)?;

    let waveform = decode_segment(&bytes)?;

    assert_eq!(waveform.channels, 1);
    assert_eq!(waveform.samples, vec![300, -25, 3000]);

    Ok(())
}

#[test]
fn high_sample_rate_input_is_decimated() -> Result<()> {
    let samples: Vec<i16> = (0..4800).map(|i| (i % 100) as i16).collect();
    let bytes = wav_bytes(samples, 48000, 1)?;

    let waveform = decode_segment(&bytes)?;

    assert_eq!(waveform.sample_rate, 16000);
    assert_eq!(waveform.samples.len(), 1600);

    Ok(())
}

#[test]
fn garbage_bytes_are_rejected() {
    let err = decode_segment(b"this is not an audio container at all").unwrap_err();

    assert!(matches!(err, DecodeError::UnsupportedFormat(_)));
}

#[test]
fn empty_input_is_rejected() {
    assert!(decode_segment(&[]).is_err());
}

#[test]
fn duration_reflects_canonical_rate() -> Result<()> {
    let bytes = wav_bytes(vec![0i16; 16000], 16000, 1)?;

    let waveform = decode_segment(&bytes)?;

    assert!((waveform.duration_seconds() - 1.0).abs() < 1e-9);

    Ok(())
}
