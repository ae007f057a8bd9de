//! Audio buffer representation for the transcoding pipeline.
//!
//! [`AudioBuffer`] pairs raw 16-bit PCM samples with their sample rate.
//! Mono audio is stored as a 1-D `ndarray` array; multi-channel audio as a
//! 2-D array with one row per channel. Buffers are owned by exactly one
//! pipeline stage at a time and move stage-to-stage; the DSP stages
//! themselves run on `f64` slices in `[-1, 1]` obtained through
//! [`AudioBuffer::to_f64`] and restored with [`AudioBuffer::from_f64`].

use ndarray::{Array1, Array2, Axis};

/// Full-scale magnitude of a 16-bit PCM sample.
pub const FULL_SCALE: f64 = 32767.0;

/// Sample storage: mono as a flat array, multi-channel as channels × frames.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioData {
    /// Single-channel samples.
    Mono(Array1<i16>),
    /// Channels × frames, one row per channel.
    Multi(Array2<i16>),
}

/// PCM samples plus the metadata the pipeline needs to interpret them.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    data: AudioData,
    sample_rate: u32,
}

impl AudioBuffer {
    /// Create a mono buffer.
    pub const fn new_mono(samples: Array1<i16>, sample_rate: u32) -> Self {
        Self {
            data: AudioData::Mono(samples),
            sample_rate,
        }
    }

    /// Create a multi-channel buffer from a channels × frames array.
    pub const fn new_multi(samples: Array2<i16>, sample_rate: u32) -> Self {
        Self {
            data: AudioData::Multi(samples),
            sample_rate,
        }
    }

    /// Sample rate in Hz.
    pub const fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Borrow the underlying sample storage.
    pub const fn data(&self) -> &AudioData {
        &self.data
    }

    /// Number of channels.
    pub fn num_channels(&self) -> usize {
        match &self.data {
            AudioData::Mono(_) => 1,
            AudioData::Multi(samples) => samples.nrows(),
        }
    }

    /// Number of frames per channel.
    pub fn samples_per_channel(&self) -> usize {
        match &self.data {
            AudioData::Mono(samples) => samples.len(),
            AudioData::Multi(samples) => samples.ncols(),
        }
    }

    /// Duration in seconds at this buffer's sample rate.
    pub fn duration_seconds(&self) -> f64 {
        self.samples_per_channel() as f64 / self.sample_rate as f64
    }

    /// Downmix to mono by averaging channels per frame.
    ///
    /// Mono buffers pass through unchanged. Accumulation happens in `i32`
    /// so channel sums cannot wrap.
    pub fn downmix_mono(self) -> Self {
        let sample_rate = self.sample_rate;
        match self.data {
            AudioData::Mono(_) => self,
            AudioData::Multi(samples) => {
                let channels = samples.nrows() as i32;
                let mono = samples
                    .axis_iter(Axis(1))
                    .map(|frame| {
                        let sum: i32 = frame.iter().map(|&s| i32::from(s)).sum();
                        (sum / channels) as i16
                    })
                    .collect::<Array1<i16>>();
                Self::new_mono(mono, sample_rate)
            }
        }
    }

    /// Convert mono samples to normalized `f64` in `[-1, 1]`.
    ///
    /// # Panics
    /// Panics if the buffer is multi-channel; the pipeline downmixes (or
    /// rejects) multi-channel input before reaching the DSP stages.
    pub fn to_f64(&self) -> Vec<f64> {
        match &self.data {
            AudioData::Mono(samples) => samples
                .iter()
                .map(|&s| f64::from(s) / FULL_SCALE)
                .collect(),
            AudioData::Multi(_) => {
                panic!("DSP stages operate on mono audio; downmix first")
            }
        }
    }

    /// Re-quantize normalized `f64` samples into a mono buffer.
    ///
    /// Residual overflow is hard-clipped to the representable range, never
    /// wrapped.
    pub fn from_f64(samples: &[f64], sample_rate: u32) -> Self {
        let quantized = samples
            .iter()
            .map(|&x| clamp_to_i16(x * FULL_SCALE))
            .collect::<Array1<i16>>();
        Self::new_mono(quantized, sample_rate)
    }

    /// Consume the buffer, returning mono samples.
    ///
    /// # Panics
    /// Panics if the buffer is multi-channel.
    pub fn into_mono(self) -> Array1<i16> {
        match self.data {
            AudioData::Mono(samples) => samples,
            AudioData::Multi(_) => {
                panic!("DSP stages operate on mono audio; downmix first")
            }
        }
    }
}

/// Round and clamp a full-scale `f64` sample into `i16` range.
pub fn clamp_to_i16(value: f64) -> i16 {
    value.round().clamp(f64::from(i16::MIN), f64::from(i16::MAX)) as i16
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_mono_buffer_metadata() {
        let buffer = AudioBuffer::new_mono(array![0i16, 100, -100, 200], 8000);
        assert_eq!(buffer.num_channels(), 1);
        assert_eq!(buffer.samples_per_channel(), 4);
        assert_eq!(buffer.sample_rate(), 8000);
        assert!((buffer.duration_seconds() - 0.0005).abs() < 1e-12);
    }

    #[test]
    fn test_downmix_averages_channels() {
        let stereo = AudioBuffer::new_multi(
            array![[100i16, -200, 300], [300i16, 200, -100]],
            44100,
        );
        let mono = stereo.downmix_mono();
        assert_eq!(mono.num_channels(), 1);
        assert_eq!(mono.into_mono(), array![200i16, 0, 100]);
    }

    #[test]
    fn test_downmix_is_identity_for_mono() {
        let buffer = AudioBuffer::new_mono(array![1i16, 2, 3], 8000);
        let expected = buffer.clone();
        assert_eq!(buffer.downmix_mono(), expected);
    }

    #[test]
    fn test_downmix_extreme_values_do_not_wrap() {
        let stereo = AudioBuffer::new_multi(
            array![[i16::MAX, i16::MIN], [i16::MAX, i16::MIN]],
            8000,
        );
        let mono = stereo.downmix_mono();
        assert_eq!(mono.into_mono(), array![i16::MAX, i16::MIN]);
    }

    #[test]
    fn test_f64_round_trip() {
        let buffer = AudioBuffer::new_mono(array![0i16, 16384, -16384, 32767], 8000);
        let float = buffer.to_f64();
        let back = AudioBuffer::from_f64(&float, 8000);
        assert_eq!(back, buffer);
    }

    #[test]
    fn test_from_f64_clamps_overflow() {
        let buffer = AudioBuffer::from_f64(&[1.5, -1.5], 8000);
        assert_eq!(buffer.into_mono(), array![i16::MAX, i16::MIN]);
    }
}
