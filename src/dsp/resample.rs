//! Windowed-sinc sample-rate conversion.
//!
//! Each output sample is a convolution of the input with a sinc kernel
//! truncated to `window_size` taps per side and tapered by a Blackman
//! window. When downsampling, the kernel cutoff is pulled down to the
//! anti-aliasing filter's cutoff (a fraction of the target Nyquist) and
//! the input is first gated by the configured filter family, so folded
//! spectra never reach the output. Upsampling needs no anti-aliasing and
//! uses the plain kernel.
//!
//! `window_size` is a pure quality/speed knob: any value >= 2 produces a
//! valid, audibly continuous result, larger values just ring and alias
//! less.

use std::f64::consts::PI;

use crate::dsp::design::{FilterSpec, SosChain, design_lowpass};
use crate::error::ConfigError;

/// Resample `input` from `source_rate` to `target_rate`.
///
/// `anti_aliasing` supplies the filter specification used to gate the
/// input before decimation; it is only consulted when downsampling. Equal
/// rates short-circuit to a copy.
///
/// # Errors
/// Propagates coefficient-design failures for the anti-aliasing spec
/// (cutoff at or above the working Nyquist).
pub fn resample(
    input: &[f64],
    source_rate: u32,
    target_rate: u32,
    window_size: usize,
    anti_aliasing: Option<&FilterSpec>,
) -> Result<Vec<f64>, ConfigError> {
    if source_rate == target_rate || input.is_empty() {
        return Ok(input.to_vec());
    }

    let downsampling = target_rate < source_rate;
    if !downsampling {
        // No aliasing risk: interpolate with the full-band kernel.
        return Ok(windowed_sinc(input, source_rate, target_rate, window_size, 1.0));
    }

    let source_nyquist = f64::from(source_rate) / 2.0;
    let (gated, cutoff) = match anti_aliasing {
        Some(spec) => {
            let mut chain = SosChain::new(design_lowpass(spec, f64::from(source_rate))?);
            let mut samples = input.to_vec();
            chain.process_in_place(&mut samples);
            (samples, spec.cutoff_hz / source_nyquist)
        }
        None => {
            let target_nyquist = f64::from(target_rate) / 2.0;
            (input.to_vec(), target_nyquist / source_nyquist)
        }
    };
    Ok(windowed_sinc(
        &gated,
        source_rate,
        target_rate,
        window_size,
        cutoff,
    ))
}

/// Windowed-sinc interpolation with the kernel cutoff expressed as a
/// fraction of the source Nyquist frequency.
fn windowed_sinc(
    input: &[f64],
    source_rate: u32,
    target_rate: u32,
    window_size: usize,
    cutoff: f64,
) -> Vec<f64> {
    // Integer arithmetic keeps the length exact (1 s in, 1 s out).
    let output_len =
        (input.len() as u64 * u64::from(target_rate) / u64::from(source_rate)) as usize;
    let step = f64::from(source_rate) / f64::from(target_rate);
    let window = blackman_window(2 * window_size + 1);
    let half = window_size as isize;

    let mut output = Vec::with_capacity(output_len);
    for i in 0..output_len {
        let position = i as f64 * step;
        let center = position as isize;

        let mut acc = 0.0;
        let mut weight_sum = 0.0;
        for j in -half..=half {
            let index = center + j;
            if index < 0 || index as usize >= input.len() {
                continue;
            }
            let x = PI * cutoff * (position - index as f64);
            let sinc = if x == 0.0 { 1.0 } else { x.sin() / x };
            let weight = window[(j + half) as usize] * sinc;
            acc += input[index as usize] * weight;
            weight_sum += weight;
        }
        // Normalizing by the weight sum flattens passband droop and keeps
        // edge samples (with a truncated kernel) at the right level.
        if weight_sum.abs() > f64::EPSILON {
            acc /= weight_sum;
        }
        output.push(acc);
    }
    output
}

/// Blackman window of length `len`.
fn blackman_window(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| {
            let x = i as f64 / (len - 1) as f64;
            0.42 - 0.5 * (2.0 * PI * x).cos() + 0.08 * (4.0 * PI * x).cos()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterFamily;

    fn sine(freq: f64, sample_rate: u32, seconds: f64) -> Vec<f64> {
        let len = (f64::from(sample_rate) * seconds) as usize;
        (0..len)
            .map(|i| (2.0 * PI * freq * i as f64 / f64::from(sample_rate)).sin())
            .collect()
    }

    fn rms_error(a: &[f64], b: &[f64]) -> f64 {
        let len = a.len().min(b.len());
        // Ignore the kernel-truncated edges.
        let margin = len / 16;
        let mut acc = 0.0;
        for i in margin..len - margin {
            let diff = a[i] - b[i];
            acc += diff * diff;
        }
        (acc / (len - 2 * margin) as f64).sqrt()
    }

    #[test]
    fn test_equal_rates_pass_through() {
        let input = sine(440.0, 8000, 0.1);
        let output = resample(&input, 8000, 8000, 16, None).expect("resample");
        assert_eq!(output, input);
    }

    #[test]
    fn test_output_length_is_exact() {
        let input = sine(1000.0, 44100, 1.0);
        let output = resample(&input, 44100, 8000, 32, None).expect("resample");
        assert_eq!(output.len(), 8000);
    }

    #[test]
    fn test_round_trip_error_bounded_and_shrinking() {
        let original = sine(440.0, 8000, 0.25);
        let mut previous_error = f64::INFINITY;
        for window_size in [8usize, 32, 64] {
            let up = resample(&original, 8000, 44100, window_size, None).expect("upsample");
            let down = resample(&up, 44100, 8000, window_size, None).expect("downsample");
            let error = rms_error(&original, &down);
            assert!(error < 0.05, "window {window_size}: rms error {error}");
            assert!(
                error <= previous_error * 1.05,
                "window {window_size}: error {error} did not shrink from {previous_error}"
            );
            previous_error = error;
        }
    }

    #[test]
    fn test_downsampling_kills_super_nyquist_energy() {
        // 10 kHz cannot be represented at 8 kHz; it must not fold back.
        let input = sine(10_000.0, 44100, 0.25);
        let spec = FilterSpec::lowpass(FilterFamily::Butterworth, 3800.0, 4, None)
            .expect("valid spec");
        let output = resample(&input, 44100, 8000, 32, Some(&spec)).expect("resample");
        let rms = (output.iter().map(|x| x * x).sum::<f64>() / output.len() as f64).sqrt();
        assert!(rms < 0.05, "aliased rms {rms}");
    }

    #[test]
    fn test_voice_band_tone_survives_downsampling() {
        let input = sine(1000.0, 44100, 0.25);
        let spec = FilterSpec::lowpass(FilterFamily::Butterworth, 3800.0, 4, None)
            .expect("valid spec");
        let output = resample(&input, 44100, 8000, 64, Some(&spec)).expect("resample");
        let peak = output.iter().fold(0.0f64, |acc, &x| acc.max(x.abs()));
        assert!(peak > 0.9, "peak {peak}");
    }

    #[test]
    fn test_tiny_window_still_produces_valid_output() {
        let input = sine(440.0, 8000, 0.1);
        let output = resample(&input, 8000, 16000, 2, None).expect("resample");
        assert_eq!(output.len(), input.len() * 2);
        assert!(output.iter().all(|x| x.is_finite()));
        let peak = output.iter().fold(0.0f64, |acc, &x| acc.max(x.abs()));
        assert!(peak > 0.5 && peak < 1.5, "peak {peak}");
    }
}
