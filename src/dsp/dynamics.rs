//! Soft-knee dynamic range compression and peak normalization.
//!
//! Both operations are stateless per-buffer transforms over normalized
//! `f64` samples. Compression runs first and normalization last, so the
//! configured peak level is what actually lands on the wire after the
//! gain staging.

/// Width of the soft-knee transition band in dB.
///
/// Samples within half a knee of the threshold blend between the linear
/// and compressed regions instead of switching abruptly.
const KNEE_WIDTH_DB: f64 = 6.0;

/// Floor for log-domain level computation. Keeps the dB conversion finite
/// for near-silent samples and a zero threshold.
const LEVEL_FLOOR: f64 = 1e-6;

/// Apply the full dynamics stage: compression, then normalization.
pub fn apply(samples: &mut [f64], normalize_peak: f64, ratio: f64, threshold: f64) {
    compress(samples, ratio, threshold);
    normalize(samples, normalize_peak);
}

/// Soft-knee downward compression above `threshold`.
///
/// The static curve is computed in the log domain: levels above the
/// threshold are reduced toward it with slope `1/ratio`, and a quadratic
/// knee of [`KNEE_WIDTH_DB`] blends the two regions. `ratio == 1.0` is an
/// exact no-op. Sample signs are preserved; only magnitudes move.
pub fn compress(samples: &mut [f64], ratio: f64, threshold: f64) {
    if ratio == 1.0 {
        return;
    }
    let threshold_db = to_db(threshold);

    for sample in samples.iter_mut() {
        let magnitude = sample.abs();
        if magnitude <= LEVEL_FLOOR {
            continue;
        }
        let level_db = to_db(magnitude);
        let compressed_db = static_curve(level_db, threshold_db, ratio);
        let gain = 10f64.powf((compressed_db - level_db) / 20.0);
        *sample *= gain;
    }
}

/// Static compression curve in dB, with a quadratic soft knee.
fn static_curve(level_db: f64, threshold_db: f64, ratio: f64) -> f64 {
    let overshoot = level_db - threshold_db;
    if 2.0 * overshoot < -KNEE_WIDTH_DB {
        level_db
    } else if 2.0 * overshoot.abs() <= KNEE_WIDTH_DB {
        let knee_excess = overshoot + KNEE_WIDTH_DB / 2.0;
        level_db + (1.0 / ratio - 1.0) * knee_excess * knee_excess / (2.0 * KNEE_WIDTH_DB)
    } else {
        threshold_db + overshoot / ratio
    }
}

/// Scale the buffer so its peak absolute amplitude equals `peak`.
///
/// An all-zero buffer is returned unchanged; there is nothing to scale
/// and dividing by the zero peak would poison the output.
pub fn normalize(samples: &mut [f64], peak: f64) {
    let current_peak = samples.iter().fold(0.0f64, |acc, &x| acc.max(x.abs()));
    if current_peak == 0.0 {
        return;
    }
    let scale = peak / current_peak;
    for sample in samples.iter_mut() {
        *sample *= scale;
    }
}

fn to_db(magnitude: f64) -> f64 {
    20.0 * magnitude.max(LEVEL_FLOOR).log10()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx_eq::assert_approx_eq;

    #[test]
    fn test_zero_buffer_stays_zero() {
        let mut samples = vec![0.0; 128];
        apply(&mut samples, 0.95, 1.5, 0.5);
        assert!(samples.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_unit_ratio_is_exact_identity() {
        let original: Vec<f64> = (0..64).map(|i| (i as f64 / 10.0).sin() * 0.9).collect();
        let mut samples = original.clone();
        compress(&mut samples, 1.0, 0.5);
        assert_eq!(samples, original);
    }

    #[test]
    fn test_samples_below_threshold_untouched() {
        // Well below the knee region around a 0.5 threshold.
        let original = vec![0.1, -0.2, 0.05, -0.15];
        let mut samples = original.clone();
        compress(&mut samples, 4.0, 0.5);
        for (a, e) in samples.iter().zip(original.iter()) {
            assert_approx_eq!(*a, *e, 1e-12);
        }
    }

    #[test]
    fn test_loud_samples_are_reduced_toward_threshold() {
        let mut samples = vec![1.0, -1.0];
        compress(&mut samples, 2.0, 0.25);
        // 12 dB over threshold at ratio 2 comes out 6 dB over: 0.5.
        assert_approx_eq!(samples[0], 0.5, 1e-9);
        assert_approx_eq!(samples[1], -0.5, 1e-9);
    }

    #[test]
    fn test_compression_preserves_sign_symmetry() {
        let mut samples = vec![0.8, -0.8];
        compress(&mut samples, 3.0, 0.4);
        assert_approx_eq!(samples[0], -samples[1], 1e-12);
        assert!(samples[0] < 0.8);
    }

    #[test]
    fn test_knee_is_continuous() {
        // The static curve should not jump across the knee edges.
        let ratio = 4.0;
        let threshold_db = -6.0;
        let edges = [
            threshold_db - KNEE_WIDTH_DB / 2.0,
            threshold_db + KNEE_WIDTH_DB / 2.0,
        ];
        for edge in edges {
            let below = static_curve(edge - 1e-9, threshold_db, ratio);
            let above = static_curve(edge + 1e-9, threshold_db, ratio);
            assert!((below - above).abs() < 1e-6, "jump at {edge}");
        }
    }

    #[test]
    fn test_normalize_hits_requested_peak() {
        let mut samples = vec![0.1, -0.4, 0.2];
        normalize(&mut samples, 0.95);
        let peak = samples.iter().fold(0.0f64, |acc, &x| acc.max(x.abs()));
        assert_approx_eq!(peak, 0.95, 1e-12);
    }

    #[test]
    fn test_normalize_scales_down_too() {
        let mut samples = vec![2.0, -1.0];
        normalize(&mut samples, 0.5);
        assert_approx_eq!(samples[0], 0.5, 1e-12);
        assert_approx_eq!(samples[1], -0.25, 1e-12);
    }

    #[test]
    fn test_apply_lands_on_configured_peak() {
        let mut samples: Vec<f64> = (0..2048)
            .map(|i| (2.0 * std::f64::consts::PI * i as f64 / 64.0).sin())
            .collect();
        apply(&mut samples, 0.95, 1.5, 0.5);
        let peak = samples.iter().fold(0.0f64, |acc, &x| acc.max(x.abs()));
        assert_approx_eq!(peak, 0.95, 1e-9);
    }
}
