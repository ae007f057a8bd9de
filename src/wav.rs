//! WAV container boundary.
//!
//! All file-format concerns live here, behind `hound`; the DSP stages
//! never see container bytes. Only 16-bit integer PCM is transcoded —
//! every other sample format is rejected up front rather than silently
//! converted.

use std::io::Cursor;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use ndarray::{Array1, Array2};

use crate::error::{FormatError, TranscodeResult};
use crate::repr::AudioBuffer;

/// Parse a WAV container into an [`AudioBuffer`].
///
/// Multi-channel audio is deinterleaved into channels × frames; trailing
/// samples of a ragged final frame are dropped.
///
/// # Errors
/// [`FormatError::InvalidWav`] for malformed containers,
/// [`FormatError::UnsupportedFormat`] for anything but 16-bit integer
/// PCM, [`FormatError::Empty`] when no samples decode.
pub fn decode(bytes: &[u8]) -> TranscodeResult<AudioBuffer> {
    let mut reader =
        WavReader::new(Cursor::new(bytes)).map_err(|e| FormatError::InvalidWav(e.to_string()))?;
    let spec = reader.spec();

    match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 16) => {}
        (format, bits) => {
            return Err(FormatError::UnsupportedFormat(format!(
                "{bits}-bit {}",
                match format {
                    SampleFormat::Int => "integer",
                    SampleFormat::Float => "float",
                }
            ))
            .into());
        }
    }

    let samples = reader
        .samples::<i16>()
        .collect::<Result<Vec<i16>, _>>()
        .map_err(|e| FormatError::InvalidWav(e.to_string()))?;
    if samples.is_empty() {
        return Err(FormatError::Empty.into());
    }

    let channels = usize::from(spec.channels.max(1));
    if channels == 1 {
        return Ok(AudioBuffer::new_mono(
            Array1::from_vec(samples),
            spec.sample_rate,
        ));
    }

    let frames = samples.len() / channels;
    let mut deinterleaved = Array2::<i16>::zeros((channels, frames));
    for frame in 0..frames {
        for channel in 0..channels {
            deinterleaved[(channel, frame)] = samples[frame * channels + channel];
        }
    }
    Ok(AudioBuffer::new_multi(deinterleaved, spec.sample_rate))
}

/// Serialize mono 16-bit PCM samples into a WAV container.
pub fn encode_mono(samples: &[i16], sample_rate: u32) -> TranscodeResult<Vec<u8>> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut bytes = Vec::new();
    {
        let mut writer = WavWriter::new(Cursor::new(&mut bytes), spec)
            .map_err(|e| FormatError::InvalidWav(e.to_string()))?;
        for &sample in samples {
            writer
                .write_sample(sample)
                .map_err(|e| FormatError::InvalidWav(e.to_string()))?;
        }
        writer
            .finalize()
            .map_err(|e| FormatError::InvalidWav(e.to_string()))?;
    }
    Ok(bytes)
}
