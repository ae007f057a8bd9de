//! Pipeline orchestration for the two transcoding directions.
//!
//! `wav2ulaw`: WAV decode → optional mono downmix → band limiting →
//! dynamics → anti-aliased resample to the canonical 8 kHz telephony rate
//! → μ-law encode.
//!
//! `ulaw2wav`: μ-law decode → windowed-sinc resample to the requested
//! rate → 16-bit mono WAV encode. The decoded signal is preserved as-is:
//! no filtering or compression on the way back out.
//!
//! Configuration is validated before any audio is touched, and output
//! bytes are fully materialized before the caller writes anything, so a
//! failed invocation never produces partial output.

use tracing::debug;

use crate::config::{TELEPHONY_RATE, TranscodeConfig};
use crate::dsp::{self, FilterBank, FilterSpec};
use crate::error::{ConfigError, FormatError, TranscodeResult};
use crate::repr::AudioBuffer;
use crate::{ulaw, wav};

/// Transcode a WAV container to raw μ-law bytes at 8 kHz.
///
/// # Errors
/// Configuration errors surface before the input is parsed; format errors
/// cover malformed or unsupported WAV payloads.
pub fn wav_to_ulaw(wav_bytes: &[u8], config: &TranscodeConfig) -> TranscodeResult<Vec<u8>> {
    config.validate()?;
    let buffer = wav::decode(wav_bytes)?;
    pcm_to_ulaw(buffer, config)
}

/// Run the forward engine on an already-decoded PCM buffer.
///
/// This is the container-free entry point: band limiting, dynamics,
/// anti-aliased resampling and μ-law encoding, per the configuration.
pub fn pcm_to_ulaw(buffer: AudioBuffer, config: &TranscodeConfig) -> TranscodeResult<Vec<u8>> {
    config.validate()?;
    if buffer.samples_per_channel() == 0 {
        return Err(FormatError::Empty.into());
    }

    let source_rate = config.input_sample_rate.unwrap_or(buffer.sample_rate());
    let buffer = if buffer.num_channels() > 1 {
        if !config.force_mono {
            return Err(FormatError::UnsupportedFormat(format!(
                "{}-channel input without mono downmix",
                buffer.num_channels()
            ))
            .into());
        }
        debug!(channels = buffer.num_channels(), "downmixing to mono");
        buffer.downmix_mono()
    } else {
        buffer
    };

    let mut samples = buffer.to_f64();
    debug!(
        samples = samples.len(),
        source_rate, "starting wav2ulaw pipeline"
    );

    let mut band = FilterBank::new(
        f64::from(source_rate),
        config.high_pass_cutoff,
        config.low_pass_cutoff,
    );
    band.process_in_place(&mut samples);

    dsp::dynamics::apply(
        &mut samples,
        config.normalize_peak,
        config.compression_ratio,
        config.compression_threshold,
    );

    if source_rate != TELEPHONY_RATE {
        let anti_aliasing = anti_aliasing_spec(config)?;
        debug!(
            from = source_rate,
            to = TELEPHONY_RATE,
            family = %config.anti_aliasing_family,
            "resampling"
        );
        samples = dsp::resample(
            &samples,
            source_rate,
            TELEPHONY_RATE,
            config.window_size,
            Some(&anti_aliasing),
        )?;
    }

    let quantized = AudioBuffer::from_f64(&samples, TELEPHONY_RATE)
        .into_mono()
        .to_vec();
    let encoded = ulaw::encode_slice(&quantized);
    debug!(bytes = encoded.len(), "mu-law encode complete");
    Ok(encoded)
}

/// Transcode raw μ-law bytes to a 16-bit mono WAV container at
/// `sample_rate`.
///
/// # Errors
/// Rejects a zero sample rate or a window size below 2 before touching
/// the input; an empty payload is a format error.
pub fn ulaw_to_wav(
    ulaw_bytes: &[u8],
    sample_rate: u32,
    window_size: usize,
) -> TranscodeResult<Vec<u8>> {
    let buffer = ulaw_to_pcm(ulaw_bytes, sample_rate, window_size)?;
    let samples = buffer.into_mono().to_vec();
    wav::encode_mono(&samples, sample_rate)
}

/// Decode μ-law bytes and resample to `sample_rate`, without a container.
pub fn ulaw_to_pcm(
    ulaw_bytes: &[u8],
    sample_rate: u32,
    window_size: usize,
) -> TranscodeResult<AudioBuffer> {
    if sample_rate == 0 {
        return Err(ConfigError::out_of_range(
            "sample-rate",
            "must be a positive integer",
            sample_rate,
        )
        .into());
    }
    if window_size < 2 {
        return Err(ConfigError::out_of_range(
            "window-size",
            "must be >= 2",
            window_size,
        )
        .into());
    }
    if ulaw_bytes.is_empty() {
        return Err(FormatError::Empty.into());
    }

    let decoded = ulaw::decode_slice(ulaw_bytes);
    debug!(samples = decoded.len(), "mu-law decode complete");
    if sample_rate == TELEPHONY_RATE {
        return Ok(AudioBuffer::new_mono(decoded.into(), TELEPHONY_RATE));
    }

    // Playback upsampling needs no anti-aliasing gate; the plain windowed
    // kernel preserves the decoded signal.
    let float: Vec<f64> = decoded
        .iter()
        .map(|&s| f64::from(s) / crate::repr::FULL_SCALE)
        .collect();
    let resampled = dsp::resample(&float, TELEPHONY_RATE, sample_rate, window_size, None)?;
    debug!(from = TELEPHONY_RATE, to = sample_rate, "resampled for output");
    Ok(AudioBuffer::from_f64(&resampled, sample_rate))
}

/// Build the anti-aliasing specification for the forward path: the
/// configured family at `anti_aliasing_ratio` × the target Nyquist.
fn anti_aliasing_spec(config: &TranscodeConfig) -> Result<FilterSpec, ConfigError> {
    FilterSpec::lowpass(
        config.anti_aliasing_family,
        config.anti_aliasing_ratio * f64::from(TELEPHONY_RATE) / 2.0,
        config.filter_order,
        config.chebyshev_ripple,
    )
}
