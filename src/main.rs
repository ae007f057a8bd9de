//! Command-line front end for the wav2ulaw transcoding engine.
//!
//! Reads the whole input file, runs the selected pipeline, and writes the
//! output file only after the transform has fully succeeded, so a failing
//! invocation never leaves a partial output behind.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use colored::Colorize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use wav2ulaw::{
    FilterFamily, TranscodeConfig, TranscodeError, TranscodeResult, ulaw_to_wav, wav_to_ulaw,
};

/// Conversion direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// WAV container in, raw mu-law bytes out (8 kHz).
    #[value(name = "wav2ulaw")]
    WavToUlaw,
    /// Raw mu-law bytes in, 16-bit mono WAV out.
    #[value(name = "ulaw2wav")]
    UlawToWav,
}

#[derive(Debug, Parser)]
#[command(name = "wav2ulaw")]
#[command(about = "Transcode between linear PCM WAV and G.711 mu-law audio", long_about = None)]
struct Args {
    /// Input file path.
    #[arg(long)]
    input: PathBuf,

    /// Output file path.
    #[arg(long)]
    output: PathBuf,

    /// Conversion mode.
    #[arg(long, value_enum, default_value_t = Mode::WavToUlaw)]
    mode: Mode,

    /// Sample rate in Hz. For ulaw2wav this is the output WAV rate; for
    /// wav2ulaw it overrides the rate read from the WAV header.
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Low-pass filter cutoff frequency in Hz (0 disables).
    #[arg(long, default_value_t = 3400.0)]
    low_pass: f64,

    /// High-pass filter cutoff frequency in Hz (0 disables).
    #[arg(long, default_value_t = 200.0)]
    high_pass: f64,

    /// Normalize audio to this peak level (0..1].
    #[arg(long, default_value_t = 0.95)]
    normalize: f64,

    /// Compression ratio (1.0 means no compression).
    #[arg(long, default_value_t = 1.5)]
    compress_ratio: f64,

    /// Compression threshold as a fraction of full scale [0..1].
    #[arg(long, default_value_t = 0.5)]
    compress_threshold: f64,

    /// Resampling window size in taps per side (larger = better quality
    /// but slower).
    #[arg(long, default_value_t = 64)]
    window_size: usize,

    /// Anti-aliasing cutoff as a fraction of the target Nyquist (0..1].
    #[arg(long, default_value_t = 0.95)]
    anti_aliasing_ratio: f64,

    /// Anti-aliasing filter type (0=Simple, 1=Butterworth, 2=Bessel,
    /// 3=Chebyshev).
    #[arg(long, default_value_t = 1)]
    anti_aliasing_type: i64,

    /// Filter order for Butterworth/Bessel/Chebyshev (2, 4 or 6).
    #[arg(long, default_value_t = 4)]
    filter_order: usize,

    /// Ripple in dB for the Chebyshev filter (required when
    /// --anti-aliasing-type is 3).
    #[arg(long)]
    chebyshev_ripple: Option<f64>,

    /// Downmix multi-channel input to mono before processing.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    force_mono: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> TranscodeResult<()> {
    // Resolve the configuration first: a bad parameter must fail before
    // the input file is even opened.
    let output = match args.mode {
        Mode::WavToUlaw => {
            let config = config_from_args(args)?;
            config.validate()?;
            let input = read_input(args)?;
            wav_to_ulaw(&input, &config)?
        }
        Mode::UlawToWav => {
            let sample_rate = args.sample_rate.unwrap_or(wav2ulaw::TELEPHONY_RATE);
            let input = read_input(args)?;
            ulaw_to_wav(&input, sample_rate, args.window_size)?
        }
    };

    std::fs::write(&args.output, &output)
        .map_err(|e| TranscodeError::io(args.output.clone(), e))?;
    info!(
        input = %args.input.display(),
        output = %args.output.display(),
        bytes = output.len(),
        "conversion complete"
    );
    Ok(())
}

fn read_input(args: &Args) -> TranscodeResult<Vec<u8>> {
    std::fs::read(&args.input).map_err(|e| TranscodeError::io(args.input.clone(), e))
}

fn config_from_args(args: &Args) -> TranscodeResult<TranscodeConfig> {
    let family = FilterFamily::from_code(args.anti_aliasing_type)?;
    Ok(TranscodeConfig {
        input_sample_rate: args.sample_rate,
        force_mono: args.force_mono,
        low_pass_cutoff: args.low_pass,
        high_pass_cutoff: args.high_pass,
        normalize_peak: args.normalize,
        compression_ratio: args.compress_ratio,
        compression_threshold: args.compress_threshold,
        window_size: args.window_size,
        anti_aliasing_ratio: args.anti_aliasing_ratio,
        anti_aliasing_family: family,
        filter_order: args.filter_order,
        chebyshev_ripple: args.chebyshev_ripple,
    })
}
