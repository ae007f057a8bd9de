// Correctness and logic
#![warn(clippy::unit_cmp)]
#![warn(clippy::match_same_arms)]
// Performance-focused
#![warn(clippy::inefficient_to_string)]
#![warn(clippy::map_clone)]
#![warn(clippy::unnecessary_to_owned)]
#![warn(clippy::needless_collect)]
// Style and idiomatic Rust
#![warn(clippy::redundant_clone)]
#![warn(clippy::needless_return)]
#![warn(clippy::manual_map)]
#![warn(clippy::unwrap_used)]
// Maintainability
#![warn(clippy::missing_panics_doc)]
#![deny(missing_docs)]

//! # wav2ulaw
//!
//! Telephone-bandwidth transcoding between linear-PCM WAV audio and
//! G.711 μ-law companded audio, tuned for telephony / TTS-style signal
//! paths.
//!
//! The engine composes five stages into two directional pipelines:
//!
//! - band limiting ([`dsp::band`]) emulating the telephone voice band,
//! - soft-knee compression and peak normalization ([`dsp::dynamics`]),
//! - anti-aliased windowed-sinc resampling ([`dsp::resample`]) gated by a
//!   configurable filter family ([`dsp::design`]),
//! - the μ-law companding codec ([`ulaw`]),
//! - WAV container handling ([`wav`], behind `hound`).
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use wav2ulaw::{TranscodeConfig, wav_to_ulaw};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let wav_bytes = std::fs::read("speech.wav")?;
//! let ulaw = wav_to_ulaw(&wav_bytes, &TranscodeConfig::default())?;
//! std::fs::write("speech.ulaw", ulaw)?;
//! # Ok(())
//! # }
//! ```
//!
//! The reverse direction decodes μ-law bytes and resamples them for
//! playback:
//!
//! ```rust,no_run
//! use wav2ulaw::ulaw_to_wav;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let ulaw = std::fs::read("speech.ulaw")?;
//! let wav = ulaw_to_wav(&ulaw, 44100, 64)?;
//! std::fs::write("speech.wav", wav)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error handling
//!
//! Every fallible operation returns [`TranscodeResult`]. Configuration
//! problems ([`ConfigError`]) are reported before any processing starts;
//! container problems are [`FormatError`]s; I/O failures carry the path
//! they occurred on. The transform itself is deterministic and pure, so
//! there are no retries anywhere.

pub mod config;
pub mod dsp;
pub mod error;
pub mod pipeline;
pub mod repr;
pub mod ulaw;
pub mod wav;

pub use config::{FilterFamily, TELEPHONY_RATE, TranscodeConfig};
pub use error::{ConfigError, FormatError, TranscodeError, TranscodeResult};
pub use pipeline::{pcm_to_ulaw, ulaw_to_pcm, ulaw_to_wav, wav_to_ulaw};
pub use repr::{AudioBuffer, AudioData, FULL_SCALE};
