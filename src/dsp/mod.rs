//! Signal processing stages of the transcoding pipeline.
//!
//! Each stage is a pure transform over normalized `f64` samples with any
//! mutable filter history held in explicit state values, so long buffers
//! can be processed in chunks: feeding chunk N through the same state a
//! previous chunk finished with is equivalent to one pass over the whole
//! buffer.
//!
//! - [`design`] - anti-aliasing filter coefficient computation
//! - [`band`] - telephone band limiting (high-pass + low-pass)
//! - [`dynamics`] - soft-knee compression and peak normalization
//! - [`resample`] - windowed-sinc sample-rate conversion

pub mod band;
pub mod design;
pub mod dynamics;
pub mod resample;

pub use band::FilterBank;
pub use design::{Biquad, FilterSpec, SosChain, design_lowpass};
pub use resample::resample;
