use crate::block::Blocks;
use crate::carrier::CarrierBank;
use crate::config::WatermarkConfig;
use crate::error::{Error, Result};
use crate::key::SecretKey;

/// Signal energies at or below this are treated as silence.
const MIN_SIGNAL_ENERGY: f64 = 1e-20;

/// Result of a watermark extraction pass.
///
/// One entry per analyzed block, in stream order. The extractor performs no
/// voting or synchronization: block `k` was embedded with payload position
/// `k % payload_len`, and aggregating repetitions (e.g. soft voting over
/// `correlations`) is the caller's job.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Hard-decision bit per block: 1 when the normalized correlation is
    /// positive, else 0.
    pub bitstream: Vec<u8>,
    /// Normalized correlation per block: `Σ mono·carrier / sqrt(Σ mono²)`.
    /// Volume-invariant, signed; the soft value for voting.
    pub correlations: Vec<f32>,
    /// Mean per-block confidence, in `[0, 1]`.
    pub bit_confidence: f64,
    /// Reserved; always 1.0.
    pub band_agreement: f64,
    /// Number of whole blocks analyzed.
    pub blocks_analyzed: u64,
}

/// Extract per-block soft correlations from interleaved float samples.
///
/// `payload_len` must equal the payload length used at embed time, since it
/// selects which carrier each block is correlated against.
pub fn extract(
    samples: &[f32],
    payload_len: usize,
    key: &SecretKey,
    config: &WatermarkConfig,
) -> Result<Extraction> {
    config.validate()?;
    if payload_len == 0 {
        return Err(Error::EmptyPayload);
    }
    let channels = config.channels as usize;
    if !samples.len().is_multiple_of(channels) {
        return Err(Error::RaggedBuffer {
            len: samples.len(),
            channels: config.channels,
        });
    }

    let block_len = config.samples_per_bit();
    let bank = CarrierBank::generate(key, payload_len, block_len);

    let total_frames = samples.len() / channels;
    let mut correlations = Vec::with_capacity(total_frames / block_len);
    let mut confidence_sum = 0.0f64;

    for (k, start) in Blocks::new(total_frames, block_len) {
        let chunk = &samples[start * channels..(start + block_len) * channels];
        let (correlation, confidence) =
            analyze_block(chunk, channels, bank.carrier(k % payload_len));
        correlations.push(correlation);
        confidence_sum += confidence;
    }

    let blocks_analyzed = correlations.len() as u64;
    let bitstream = correlations
        .iter()
        .map(|&c| if c > 0.0 { 1 } else { 0 })
        .collect();

    Ok(Extraction {
        bitstream,
        correlations,
        bit_confidence: if blocks_analyzed > 0 {
            confidence_sum / blocks_analyzed as f64
        } else {
            0.0
        },
        band_agreement: 1.0,
        blocks_analyzed,
    })
}

/// Correlate one block of interleaved frames against a carrier.
///
/// Returns `(normalized_correlation, confidence)`. A silent block yields
/// zero for both rather than an error.
pub(crate) fn analyze_block(chunk: &[f32], channels: usize, carrier: &[f64]) -> (f32, f64) {
    let block_len = chunk.len() / channels;
    let mut correlation = 0.0f64;
    let mut signal_energy = 0.0f64;
    let mut carrier_energy = 0.0f64;

    for frame in 0..block_len {
        let mono = crate::embed::mono_sample(chunk, channels, frame);
        let c = carrier[frame];
        correlation += mono * c;
        signal_energy += mono * mono;
        carrier_energy += c * c;
    }

    let normalized = if signal_energy > MIN_SIGNAL_ENERGY {
        correlation / signal_energy.sqrt()
    } else {
        0.0
    };
    let confidence = if signal_energy > MIN_SIGNAL_ENERGY && carrier_energy > MIN_SIGNAL_ENERGY {
        (correlation.abs() / (signal_energy * carrier_energy).sqrt()).min(1.0)
    } else {
        0.0
    };

    (normalized as f32, confidence)
}
