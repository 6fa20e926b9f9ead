use super::decode::Waveform;
use anyhow::{Context, Result};
use std::io::Cursor;

/// Encode a waveform as an in-memory WAV file (16-bit PCM).
///
/// Hosted transcription providers consume WAV payloads; the encoded buffer is
/// never written to disk.
pub fn waveform_to_wav(waveform: &Waveform) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: waveform.channels,
        sample_rate: waveform.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());

    {
        let mut writer =
            hound::WavWriter::new(&mut cursor, spec).context("Failed to create WAV writer")?;

        for &sample in &waveform.samples {
            writer
                .write_sample(sample)
                .context("Failed to write sample to WAV buffer")?;
        }

        writer.finalize().context("Failed to finalize WAV buffer")?;
    }

    Ok(cursor.into_inner())
}
