//! Transcoding configuration and eager parameter validation.
//!
//! The full parameter surface is a flat configuration struct constructed
//! once per invocation and read-only thereafter. Validation happens at
//! [`TranscodeConfig::validate`] before any audio is touched, so a bad
//! parameter can never abort a half-finished pipeline.

use std::fmt;

use crate::error::ConfigError;

/// Canonical telephony sample rate (Hz) produced by the `wav2ulaw` path.
pub const TELEPHONY_RATE: u32 = 8000;

/// Anti-aliasing filter families selectable per invocation.
///
/// The family is dispatched once when the filter specification is built;
/// coefficient computation is a pure function of the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterFamily {
    /// Single-pole RC-equivalent low-pass. Cheapest CPU cost, softest knee.
    Simple,
    /// Maximally flat passband magnitude response.
    Butterworth,
    /// Maximally flat group delay, preserving transient shape.
    Bessel,
    /// Chebyshev Type I: passband ripple traded for the steepest roll-off
    /// at a given order. The only family that consumes the ripple parameter.
    Chebyshev,
}

impl FilterFamily {
    /// Resolve the numeric CLI code (0=Simple, 1=Butterworth, 2=Bessel,
    /// 3=Chebyshev) into a family.
    pub fn from_code(code: i64) -> Result<Self, ConfigError> {
        match code {
            0 => Ok(Self::Simple),
            1 => Ok(Self::Butterworth),
            2 => Ok(Self::Bessel),
            3 => Ok(Self::Chebyshev),
            other => Err(ConfigError::UnknownFilterFamily(other)),
        }
    }

    /// Human-readable family name, used in error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Simple => "Simple",
            Self::Butterworth => "Butterworth",
            Self::Bessel => "Bessel",
            Self::Chebyshev => "Chebyshev",
        }
    }

    /// Whether this family consumes the Chebyshev ripple parameter.
    pub const fn uses_ripple(self) -> bool {
        matches!(self, Self::Chebyshev)
    }
}

impl fmt::Display for FilterFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Full parameter set for one transcoding invocation.
///
/// Amplitude-domain parameters (`normalize_peak`, `compression_threshold`)
/// are expressed as fractions of full scale in `[0, 1]`; frequency-domain
/// parameters are plain Hz against the working sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeConfig {
    /// Input sample rate override in Hz. `None` detects the rate from the
    /// WAV header.
    pub input_sample_rate: Option<u32>,
    /// Downmix multi-channel input to mono before processing.
    pub force_mono: bool,
    /// Low-pass band-limiting cutoff in Hz. Zero disables the stage.
    pub low_pass_cutoff: f64,
    /// High-pass band-limiting cutoff in Hz. Zero disables the stage.
    pub high_pass_cutoff: f64,
    /// Peak level to normalize to, as a fraction of full scale in (0, 1].
    pub normalize_peak: f64,
    /// Compression ratio above the threshold; 1.0 is a no-op.
    pub compression_ratio: f64,
    /// Compression threshold as a fraction of full scale in [0, 1].
    pub compression_threshold: f64,
    /// Windowed-sinc half-width in taps. Larger trades CPU for less
    /// ringing and aliasing; any value >= 2 is valid.
    pub window_size: usize,
    /// Anti-aliasing cutoff as a fraction of the target Nyquist, in (0, 1].
    pub anti_aliasing_ratio: f64,
    /// Anti-aliasing filter family applied before downsampling.
    pub anti_aliasing_family: FilterFamily,
    /// Filter order for the Butterworth/Bessel/Chebyshev families.
    /// Must be even, in [2, 6].
    pub filter_order: usize,
    /// Passband ripple in dB. Required for Chebyshev, rejected otherwise.
    pub chebyshev_ripple: Option<f64>,
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self {
            input_sample_rate: None,
            force_mono: true,
            low_pass_cutoff: 3400.0,
            high_pass_cutoff: 200.0,
            normalize_peak: 0.95,
            compression_ratio: 1.5,
            compression_threshold: 0.5,
            window_size: 64,
            anti_aliasing_ratio: 0.95,
            anti_aliasing_family: FilterFamily::Butterworth,
            filter_order: 4,
            chebyshev_ripple: None,
        }
    }
}

impl TranscodeConfig {
    /// Validate every parameter against its documented range.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] encountered. Called by the
    /// pipeline before any processing begins.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(rate) = self.input_sample_rate
            && rate == 0
        {
            return Err(ConfigError::out_of_range(
                "sample-rate",
                "must be a positive integer",
                rate,
            ));
        }
        if self.low_pass_cutoff < 0.0 || !self.low_pass_cutoff.is_finite() {
            return Err(ConfigError::out_of_range(
                "low-pass",
                "must be a non-negative frequency in Hz",
                self.low_pass_cutoff,
            ));
        }
        if self.high_pass_cutoff < 0.0 || !self.high_pass_cutoff.is_finite() {
            return Err(ConfigError::out_of_range(
                "high-pass",
                "must be a non-negative frequency in Hz",
                self.high_pass_cutoff,
            ));
        }
        if !(self.normalize_peak > 0.0 && self.normalize_peak <= 1.0) {
            return Err(ConfigError::out_of_range(
                "normalize",
                "must be in (0, 1]",
                self.normalize_peak,
            ));
        }
        if !(self.compression_ratio >= 1.0) || !self.compression_ratio.is_finite() {
            return Err(ConfigError::out_of_range(
                "compress-ratio",
                "must be >= 1.0",
                self.compression_ratio,
            ));
        }
        if !(0.0..=1.0).contains(&self.compression_threshold) {
            return Err(ConfigError::out_of_range(
                "compress-threshold",
                "must be in [0, 1]",
                self.compression_threshold,
            ));
        }
        if self.window_size < 2 {
            return Err(ConfigError::out_of_range(
                "window-size",
                "must be >= 2",
                self.window_size,
            ));
        }
        if !(self.anti_aliasing_ratio > 0.0 && self.anti_aliasing_ratio <= 1.0) {
            return Err(ConfigError::out_of_range(
                "anti-aliasing-ratio",
                "must be in (0, 1]",
                self.anti_aliasing_ratio,
            ));
        }
        if self.filter_order < 2 || self.filter_order > 6 || self.filter_order % 2 != 0 {
            return Err(ConfigError::out_of_range(
                "filter-order",
                "must be an even integer in [2, 6]",
                self.filter_order,
            ));
        }
        match self.chebyshev_ripple {
            Some(_) if !self.anti_aliasing_family.uses_ripple() => {
                return Err(ConfigError::UnexpectedChebyshevRipple {
                    family: self.anti_aliasing_family.name(),
                });
            }
            Some(ripple) if !(ripple > 0.0 && ripple.is_finite()) => {
                return Err(ConfigError::out_of_range(
                    "chebyshev-ripple",
                    "must be a positive number of dB",
                    ripple,
                ));
            }
            None if self.anti_aliasing_family.uses_ripple() => {
                return Err(ConfigError::MissingChebyshevRipple);
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(TranscodeConfig::default().validate().is_ok());
    }

    #[test]
    fn test_family_codes_round_trip() {
        assert_eq!(FilterFamily::from_code(0), Ok(FilterFamily::Simple));
        assert_eq!(FilterFamily::from_code(1), Ok(FilterFamily::Butterworth));
        assert_eq!(FilterFamily::from_code(2), Ok(FilterFamily::Bessel));
        assert_eq!(FilterFamily::from_code(3), Ok(FilterFamily::Chebyshev));
        assert_eq!(
            FilterFamily::from_code(9),
            Err(ConfigError::UnknownFilterFamily(9))
        );
    }

    #[test]
    fn test_normalize_range_is_exclusive_of_zero() {
        let mut config = TranscodeConfig::default();
        config.normalize_peak = 0.0;
        assert!(config.validate().is_err());
        config.normalize_peak = 1.0;
        assert!(config.validate().is_ok());
        config.normalize_peak = 1.01;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_compression_ratio_below_one_rejected() {
        let mut config = TranscodeConfig::default();
        config.compression_ratio = 0.5;
        assert!(config.validate().is_err());
        config.compression_ratio = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_odd_or_out_of_range_order_rejected() {
        let mut config = TranscodeConfig::default();
        for order in [0, 1, 3, 5, 7, 8] {
            config.filter_order = order;
            assert!(config.validate().is_err(), "order {order} should fail");
        }
        for order in [2, 4, 6] {
            config.filter_order = order;
            assert!(config.validate().is_ok(), "order {order} should pass");
        }
    }

    #[test]
    fn test_chebyshev_requires_ripple() {
        let mut config = TranscodeConfig {
            anti_aliasing_family: FilterFamily::Chebyshev,
            ..TranscodeConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::MissingChebyshevRipple)
        );
        config.chebyshev_ripple = Some(0.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_ripple_with_other_family_rejected() {
        let config = TranscodeConfig {
            chebyshev_ripple: Some(0.5),
            ..TranscodeConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnexpectedChebyshevRipple {
                family: "Butterworth"
            })
        );
    }

    #[test]
    fn test_window_size_lower_bound() {
        let mut config = TranscodeConfig::default();
        config.window_size = 1;
        assert!(config.validate().is_err());
        config.window_size = 2;
        assert!(config.validate().is_ok());
    }
}
