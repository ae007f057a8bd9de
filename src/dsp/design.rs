//! Anti-aliasing filter design.
//!
//! Computes digital low-pass coefficients for the four filter families as
//! cascades of second-order sections (biquads), which stay numerically
//! stable at every supported order. The analog prototypes come from
//! published pole placements — Butterworth poles on the unit circle,
//! tabulated Bessel poles, Chebyshev poles from the standard hyperbolic
//! formulas — mapped to the digital domain per section with a
//! frequency-prewarped bilinear transform.

use std::f64::consts::PI;

use num_complex::Complex64;

use crate::config::FilterFamily;
use crate::error::ConfigError;

/// Immutable low-pass filter specification.
///
/// Produced once per invocation from the validated configuration and
/// consumed by [`design_lowpass`]; the family is dispatched here, not at
/// application time.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    /// Filter family to realize.
    pub family: FilterFamily,
    /// Cutoff frequency in Hz against the working sample rate.
    pub cutoff_hz: f64,
    /// Filter order; even, in [2, 6].
    pub order: usize,
    /// Passband ripple in dB; present iff `family` is Chebyshev.
    pub ripple_db: Option<f64>,
}

impl FilterSpec {
    /// Build a validated low-pass specification.
    ///
    /// # Errors
    /// Rejects a non-positive cutoff, an odd or out-of-range order, a
    /// missing ripple for Chebyshev, and a supplied ripple for any other
    /// family (inconsistent configuration).
    pub fn lowpass(
        family: FilterFamily,
        cutoff_hz: f64,
        order: usize,
        ripple_db: Option<f64>,
    ) -> Result<Self, ConfigError> {
        if !(cutoff_hz > 0.0) || !cutoff_hz.is_finite() {
            return Err(ConfigError::out_of_range(
                "cutoff",
                "must be a positive frequency in Hz",
                cutoff_hz,
            ));
        }
        if order < 2 || order > 6 || order % 2 != 0 {
            return Err(ConfigError::out_of_range(
                "filter-order",
                "must be an even integer in [2, 6]",
                order,
            ));
        }
        match ripple_db {
            Some(_) if !family.uses_ripple() => {
                return Err(ConfigError::UnexpectedChebyshevRipple {
                    family: family.name(),
                });
            }
            None if family.uses_ripple() => {
                return Err(ConfigError::MissingChebyshevRipple);
            }
            Some(ripple) if !(ripple > 0.0 && ripple.is_finite()) => {
                return Err(ConfigError::out_of_range(
                    "chebyshev-ripple",
                    "must be a positive number of dB",
                    ripple,
                ));
            }
            _ => {}
        }
        Ok(Self {
            family,
            cutoff_hz,
            order,
            ripple_db,
        })
    }
}

/// Normalized biquad coefficients (`a0` divided out).
///
/// Realizes `y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2] - a1*y[n-1] - a2*y[n-2]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Biquad {
    /// Feed-forward coefficients.
    pub b0: f64,
    /// Feed-forward, one delay.
    pub b1: f64,
    /// Feed-forward, two delays.
    pub b2: f64,
    /// Feed-back, one delay.
    pub a1: f64,
    /// Feed-back, two delays.
    pub a2: f64,
}

impl Biquad {
    /// Second-order low-pass section at `frequency` Hz with quality `q`,
    /// from the bilinear transform with frequency prewarping (RBJ cookbook
    /// form). Unity gain at DC.
    fn lowpass(sample_rate: f64, frequency: f64, q: f64) -> Self {
        let omega = 2.0 * PI * frequency / sample_rate;
        let cos_w = omega.cos();
        let alpha = omega.sin() / (2.0 * q);

        let a0 = 1.0 + alpha;
        Self {
            b0: ((1.0 - cos_w) / 2.0) / a0,
            b1: (1.0 - cos_w) / a0,
            b2: ((1.0 - cos_w) / 2.0) / a0,
            a1: (-2.0 * cos_w) / a0,
            a2: (1.0 - alpha) / a0,
        }
    }

    /// First-order RC low-pass expressed as a degenerate biquad
    /// (second taps zeroed): `y[n] = y[n-1] + alpha * (x[n] - y[n-1])`.
    fn one_pole_lowpass(sample_rate: f64, frequency: f64) -> Self {
        let rc = 1.0 / (2.0 * PI * frequency);
        let dt = 1.0 / sample_rate;
        let alpha = dt / (rc + dt);
        Self {
            b0: alpha,
            b1: 0.0,
            b2: 0.0,
            a1: -(1.0 - alpha),
            a2: 0.0,
        }
    }

    /// Scale the section's feed-forward path by `gain`.
    fn with_gain(mut self, gain: f64) -> Self {
        self.b0 *= gain;
        self.b1 *= gain;
        self.b2 *= gain;
        self
    }

    /// DC gain of the section, `B(1) / A(1)`.
    pub fn dc_gain(&self) -> f64 {
        (self.b0 + self.b1 + self.b2) / (1.0 + self.a1 + self.a2)
    }
}

/// Compute the cascaded sections realizing `spec` at `sample_rate`.
///
/// # Errors
/// Rejects a cutoff at or above the Nyquist frequency of `sample_rate`.
pub fn design_lowpass(spec: &FilterSpec, sample_rate: f64) -> Result<Vec<Biquad>, ConfigError> {
    let nyquist = sample_rate / 2.0;
    if spec.cutoff_hz >= nyquist {
        return Err(ConfigError::out_of_range(
            "cutoff",
            "must be below the Nyquist frequency of the working sample rate",
            spec.cutoff_hz,
        ));
    }

    let sections = match spec.family {
        FilterFamily::Simple => {
            let section = Biquad::one_pole_lowpass(sample_rate, spec.cutoff_hz);
            vec![section; spec.order / 2]
        }
        FilterFamily::Butterworth => {
            sections_from_poles(&butterworth_poles(spec.order), spec, sample_rate)
        }
        FilterFamily::Bessel => sections_from_poles(&bessel_poles(spec.order), spec, sample_rate),
        FilterFamily::Chebyshev => {
            // FilterSpec::lowpass guarantees the ripple is present here.
            let ripple_db = spec.ripple_db.unwrap_or(0.1);
            let mut sections =
                sections_from_poles(&chebyshev_poles(spec.order, ripple_db), spec, sample_rate);
            // Even-order Chebyshev peaks +ripple dB above DC; pull the
            // ripple crests back to unity.
            let gain = 10f64.powf(-ripple_db / 20.0);
            if let Some(first) = sections.first_mut() {
                *first = first.with_gain(gain);
            }
            sections
        }
    };
    Ok(sections)
}

/// Map conjugate-pair prototype poles (normalized to unit cutoff) into
/// digital low-pass sections at the spec's cutoff.
///
/// Each pole pair `p` contributes a section with resonant frequency
/// `|p| * cutoff` and quality `|p| / (2 * -Re(p))`. Warped section
/// frequencies are kept strictly below Nyquist so the prewarp tangent
/// stays in range.
fn sections_from_poles(poles: &[Complex64], spec: &FilterSpec, sample_rate: f64) -> Vec<Biquad> {
    poles
        .iter()
        .map(|pole| {
            let omega0 = pole.norm();
            let q = omega0 / (2.0 * -pole.re);
            let frequency = (spec.cutoff_hz * omega0).min(0.49 * sample_rate);
            Biquad::lowpass(sample_rate, frequency, q)
        })
        .collect()
}

/// Upper-half-plane Butterworth poles for an even order: evenly spaced on
/// the unit circle, all with unit magnitude.
fn butterworth_poles(order: usize) -> Vec<Complex64> {
    (0..order / 2)
        .map(|k| {
            let theta = PI * (2 * k + 1) as f64 / (2 * order) as f64;
            Complex64::new(-theta.sin(), theta.cos())
        })
        .collect()
}

/// Upper-half-plane Bessel (Thomson) poles, normalized for a -3 dB point
/// at unit frequency. Tabulated values from the standard filter-design
/// references; only even orders 2, 4, 6 are reachable.
fn bessel_poles(order: usize) -> Vec<Complex64> {
    let pairs: &[(f64, f64)] = match order {
        2 => &[(-1.1016, 0.6364)],
        4 => &[(-1.3701, 0.4102), (-0.9952, 1.2571)],
        6 => &[(-1.5716, 0.3209), (-1.3819, 0.9715), (-0.9307, 1.6620)],
        _ => unreachable!("FilterSpec::lowpass only admits even orders 2-6"),
    };
    pairs.iter().map(|&(re, im)| Complex64::new(re, im)).collect()
}

/// Upper-half-plane Chebyshev Type I poles for `ripple_db` of passband
/// ripple, normalized to the ripple-band edge at unit frequency.
fn chebyshev_poles(order: usize, ripple_db: f64) -> Vec<Complex64> {
    let n = order as f64;
    let epsilon = (10f64.powf(ripple_db / 10.0) - 1.0).sqrt();
    let mu = (1.0 / epsilon).asinh() / n;
    let sinh_mu = mu.sinh();
    let cosh_mu = mu.cosh();

    (0..order / 2)
        .map(|k| {
            let theta = PI * (2 * k + 1) as f64 / (2 * order) as f64;
            Complex64::new(-sinh_mu * theta.sin(), cosh_mu * theta.cos())
        })
        .collect()
}

/// Cascaded second-order sections with their per-section delay lines.
///
/// The delay state lives inside the chain and persists across calls, so a
/// buffer may be processed in chunks: chunk N resumes from the exact state
/// chunk N-1 finished with. [`SosChain::reset`] returns to the cold-start
/// (all-zero) state between independent passes.
#[derive(Debug, Clone)]
pub struct SosChain {
    sections: Vec<(Biquad, BiquadState)>,
}

#[derive(Debug, Clone, Copy, Default)]
struct BiquadState {
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl SosChain {
    /// Wrap designed sections with zeroed delay lines.
    pub fn new(sections: Vec<Biquad>) -> Self {
        Self {
            sections: sections
                .into_iter()
                .map(|coeffs| (coeffs, BiquadState::default()))
                .collect(),
        }
    }

    /// Push one sample through every section in series.
    pub fn process_sample(&mut self, input: f64) -> f64 {
        let mut x = input;
        for (coeffs, state) in &mut self.sections {
            let y = coeffs.b0 * x + coeffs.b1 * state.x1 + coeffs.b2 * state.x2
                - coeffs.a1 * state.y1
                - coeffs.a2 * state.y2;
            state.x2 = state.x1;
            state.x1 = x;
            state.y2 = state.y1;
            state.y1 = y;
            x = y;
        }
        x
    }

    /// Filter a buffer in place, single pass, no look-ahead.
    pub fn process_in_place(&mut self, samples: &mut [f64]) {
        for sample in samples.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }

    /// Zero every delay line.
    pub fn reset(&mut self) {
        for (_, state) in &mut self.sections {
            *state = BiquadState::default();
        }
    }
}
