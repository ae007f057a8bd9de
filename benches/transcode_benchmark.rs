//! Throughput benchmark for the forward transcoding pipeline.
//!
//! Measures wall-clock time for `wav2ulaw` over a synthetic speech-band
//! signal at several window sizes, since the resampling window is the
//! dominant cost knob.

use std::f64::consts::PI;
use std::time::Instant;

use ndarray::Array1;
use wav2ulaw::{AudioBuffer, FULL_SCALE, TranscodeConfig, pcm_to_ulaw};

/// Generate a mix of voice-band tones as a mono buffer.
fn generate_test_audio(duration_seconds: f64, sample_rate: u32) -> AudioBuffer {
    let num_samples = (duration_seconds * f64::from(sample_rate)) as usize;
    let data: Array1<i16> = Array1::from_iter((0..num_samples).map(|i| {
        let t = i as f64 / f64::from(sample_rate);
        let mix = 0.5 * (2.0 * PI * 220.0 * t).sin()
            + 0.3 * (2.0 * PI * 850.0 * t).sin()
            + 0.2 * (2.0 * PI * 2400.0 * t).sin();
        (mix * 0.8 * FULL_SCALE) as i16
    }));
    AudioBuffer::new_mono(data, sample_rate)
}

fn benchmark_window_size(window_size: usize, audio: &AudioBuffer, duration: f64) {
    let config = TranscodeConfig {
        window_size,
        ..TranscodeConfig::default()
    };

    // Warm up
    for _ in 0..2 {
        let _ = pcm_to_ulaw(audio.clone(), &config);
    }

    let num_runs = 5;
    let mut times = Vec::with_capacity(num_runs);
    for _ in 0..num_runs {
        let start = Instant::now();
        let encoded = pcm_to_ulaw(audio.clone(), &config).expect("transcode");
        times.push(start.elapsed().as_secs_f64());
        assert!(!encoded.is_empty());
    }

    let average = times.iter().sum::<f64>() / num_runs as f64;
    let realtime_factor = duration / average;
    println!(
        "window {window_size:>3}: {:.1} ms avg, {realtime_factor:.0}x realtime",
        average * 1000.0
    );
}

fn main() {
    let duration = 10.0;
    let sample_rate = 44100;
    let audio = generate_test_audio(duration, sample_rate);
    println!(
        "transcoding {duration:.0} s of {sample_rate} Hz audio ({} samples)",
        audio.samples_per_channel()
    );

    for window_size in [8, 16, 32, 64, 128] {
        benchmark_window_size(window_size, &audio, duration);
    }
}
