use clap::{Parser, Subcommand};
use std::path::PathBuf;

use sello_core::wav::{self, WavAudio};
use sello_core::{SecretKey, WatermarkConfig};

#[derive(Parser)]
#[command(name = "sello", about = "Spread-spectrum audio watermarking tool", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Embed a watermark into a 32-bit float WAV file
    Embed {
        /// Input WAV file
        #[arg(short, long)]
        input: PathBuf,

        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,

        /// Payload as a string of 0/1 characters, e.g. "10110010"
        #[arg(short, long)]
        payload: String,

        /// Old payload to cancel while embedding (re-signing)
        #[arg(long)]
        remove_payload: Option<String>,

        /// Secret shared with the extractor
        #[arg(short, long, default_value = "sello-default-secret")]
        secret: String,

        /// Base embedding strength
        #[arg(long, default_value = "0.007")]
        strength: f64,

        /// Hop size in frames; one block spans 4 hops
        #[arg(long, default_value = "1024")]
        hop_size: usize,

        /// Require this sample rate in the input file
        #[arg(long)]
        expect_sample_rate: Option<u32>,

        /// Require this channel count in the input file
        #[arg(long)]
        expect_channels: Option<u16>,
    },
    /// Extract watermark correlations from a 32-bit float WAV file
    Extract {
        /// Input WAV file
        #[arg(short, long)]
        input: PathBuf,

        /// Payload length in bits (must match the embedded payload)
        #[arg(short, long)]
        payload_len: usize,

        /// Secret shared with the embedder
        #[arg(short, long, default_value = "sello-default-secret")]
        secret: String,

        /// Hop size in frames; one block spans 4 hops
        #[arg(long, default_value = "1024")]
        hop_size: usize,

        /// Print the per-block correlations instead of only the voted bits
        #[arg(long)]
        correlations: bool,
    },
}

fn parse_bits(s: &str) -> Result<Vec<u8>, String> {
    s.chars()
        .map(|c| match c {
            '0' => Ok(0),
            '1' => Ok(1),
            other => Err(format!("invalid payload character {other:?} (expected 0 or 1)")),
        })
        .collect()
}

/// Sum the correlations of every repetition of each payload position and
/// decide each bit by the sign of the sum.
fn soft_vote(correlations: &[f32], payload_len: usize) -> Vec<u8> {
    (0..payload_len)
        .map(|p| {
            let sum: f64 = correlations
                .iter()
                .skip(p)
                .step_by(payload_len)
                .map(|&c| c as f64)
                .sum();
            if sum > 0.0 { 1 } else { 0 }
        })
        .collect()
}

fn bits_to_string(bits: &[u8]) -> String {
    bits.iter().map(|&b| if b != 0 { '1' } else { '0' }).collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Embed {
            input,
            output,
            payload,
            remove_payload,
            secret,
            strength,
            hop_size,
            expect_sample_rate,
            expect_channels,
        } => {
            let payload = parse_bits(&payload)?;
            let remove_payload = remove_payload.as_deref().map(parse_bits).transpose()?;

            let audio = wav::read_wav(&input)?;
            audio.ensure_format(expect_sample_rate, expect_channels)?;

            let key = SecretKey::from_bytes(secret.as_bytes());
            let config = WatermarkConfig {
                sample_rate: audio.sample_rate,
                channels: audio.channels,
                hop_size,
                strength,
            };

            eprintln!(
                "Embedding {} bits into {} ({} frames, {} Hz, {} ch, {:.1} ms/bit)...",
                payload.len(),
                input.display(),
                audio.frames(),
                audio.sample_rate,
                audio.channels,
                config.seconds_per_bit() * 1000.0
            );

            let blocks = audio.frames() / config.samples_per_bit();
            if blocks < payload.len() {
                eprintln!(
                    "Warning: audio fits only {} of {} payload bits; extraction will need \
                     at least {:.2}s of audio for one full repetition.",
                    blocks,
                    payload.len(),
                    payload.len() as f64 * config.seconds_per_bit()
                );
            }

            let mut samples = audio.samples;
            sello_core::embed_with_removal(
                &mut samples,
                &payload,
                remove_payload.as_deref(),
                &key,
                &config,
            )?;

            wav::write_wav(
                &output,
                &WavAudio {
                    sample_rate: audio.sample_rate,
                    channels: audio.channels,
                    samples,
                },
            )?;

            eprintln!("Watermarked audio written to {}", output.display());
        }
        Command::Extract {
            input,
            payload_len,
            secret,
            hop_size,
            correlations,
        } => {
            let audio = wav::read_wav(&input)?;

            let key = SecretKey::from_bytes(secret.as_bytes());
            let config = WatermarkConfig {
                sample_rate: audio.sample_rate,
                channels: audio.channels,
                hop_size,
                ..WatermarkConfig::default()
            };

            eprintln!(
                "Extracting from {} ({} frames, {} Hz, {} ch)...",
                input.display(),
                audio.frames(),
                audio.sample_rate,
                audio.channels
            );

            let extraction = sello_core::extract(&audio.samples, payload_len, &key, &config)?;

            if extraction.blocks_analyzed == 0 {
                eprintln!("Audio is shorter than one block; nothing analyzed.");
                std::process::exit(1);
            }

            let repetitions = extraction.blocks_analyzed as usize / payload_len;
            let voted = soft_vote(&extraction.correlations, payload_len);

            println!("Voted bits:  {}", bits_to_string(&voted));
            println!("Blocks:      {}", extraction.blocks_analyzed);
            println!("Repetitions: {repetitions}");
            println!("Confidence:  {:.4}", extraction.bit_confidence);

            if correlations {
                for (k, c) in extraction.correlations.iter().enumerate() {
                    println!("block {k:5}  position {:4}  corr {c:+.5}", k % payload_len);
                }
            }
        }
    }

    Ok(())
}
