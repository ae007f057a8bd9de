//! Error types and result utilities for the transcoding engine.

use std::path::PathBuf;
use thiserror::Error;

/// Convenience type alias for results that may contain a [`TranscodeError`].
pub type TranscodeResult<T> = Result<T, TranscodeError>;

/// Top-level error type for a transcoding invocation.
///
/// Every failure is fatal: the transform is deterministic and pure, so a
/// retry with unchanged input and configuration would reproduce the same
/// error. Configuration errors are raised before any processing begins,
/// so a failed invocation never leaves partial output behind.
#[derive(Error, Debug)]
pub enum TranscodeError {
    /// Invalid or inconsistent configuration, detected before processing.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Unreadable input or unwritable output path, with the underlying cause.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The path that could not be read or written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Input bytes not parseable as the expected container or encoding.
    #[error("Format error: {0}")]
    Format(#[from] FormatError),
}

impl TranscodeError {
    /// Wrap an I/O error together with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors raised while validating a [`TranscodeConfig`](crate::TranscodeConfig)
/// or constructing a filter specification from it.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    /// A parameter value falls outside its documented range.
    #[error("Parameter `{name}` {requirement} (got {value})")]
    OutOfRange {
        /// Name of the offending parameter.
        name: &'static str,
        /// The requirement the value failed to meet.
        requirement: &'static str,
        /// The rejected value, rendered for display.
        value: String,
    },

    /// The numeric anti-aliasing filter family code is not one of 0..=3.
    #[error("Unknown anti-aliasing filter type {0} (expected 0=Simple, 1=Butterworth, 2=Bessel, 3=Chebyshev)")]
    UnknownFilterFamily(i64),

    /// The Chebyshev family was selected without supplying a ripple value.
    #[error("Chebyshev filter family requires a ripple value in dB")]
    MissingChebyshevRipple,

    /// A ripple value was supplied for a family that does not consume one.
    #[error("Chebyshev ripple supplied but the filter family is {family}")]
    UnexpectedChebyshevRipple {
        /// Name of the non-Chebyshev family that was selected.
        family: &'static str,
    },
}

impl ConfigError {
    /// Construct an [`ConfigError::OutOfRange`] with a displayable value.
    pub fn out_of_range(
        name: &'static str,
        requirement: &'static str,
        value: impl std::fmt::Display,
    ) -> Self {
        Self::OutOfRange {
            name,
            requirement,
            value: value.to_string(),
        }
    }
}

/// Errors raised while parsing or producing audio containers.
#[derive(Error, Debug)]
pub enum FormatError {
    /// The input bytes are not a well-formed WAV container.
    #[error("Invalid WAV data: {0}")]
    InvalidWav(String),

    /// The WAV container is valid but uses a sample format the engine
    /// does not transcode.
    #[error("Unsupported sample format: expected 16-bit integer PCM, got {0}")]
    UnsupportedFormat(String),

    /// The input decoded to zero samples.
    #[error("Input contains no audio samples")]
    Empty,
}
