//! Optional parallel processing using rayon.
//!
//! Enable with the `parallel` feature flag. Carrier generation is
//! parallelized across payload positions and block processing across
//! non-overlapping blocks; both paths produce output bit-identical to the
//! sequential API, since blocks neither overlap nor depend on each other.

use rayon::prelude::*;

use crate::block::Blocks;
use crate::carrier::{self, CarrierBank};
use crate::config::WatermarkConfig;
use crate::embed::embed_block;
use crate::error::{Error, Result};
use crate::extract::{Extraction, analyze_block};
use crate::key::SecretKey;

/// Generate a carrier bank with one rayon task per payload position.
fn generate_bank_parallel(key: &SecretKey, positions: usize, samples_per_bit: usize) -> CarrierBank {
    let carriers: Vec<Vec<f64>> = (0..positions)
        .into_par_iter()
        .map(|p| carrier::generate_carrier(key.seed_for_position(p), samples_per_bit))
        .collect();
    CarrierBank::from_carriers(carriers, samples_per_bit)
}

/// Embed a watermark using parallel processing.
///
/// Functionally identical to [`crate::embed`].
pub fn embed_parallel(
    samples: &mut [f32],
    payload: &[u8],
    key: &SecretKey,
    config: &WatermarkConfig,
) -> Result<()> {
    embed_parallel_with_removal(samples, payload, None, key, config)
}

/// Embed in parallel, additionally cancelling an existing watermark.
///
/// Functionally identical to [`crate::embed_with_removal`].
pub fn embed_parallel_with_removal(
    samples: &mut [f32],
    payload: &[u8],
    remove_payload: Option<&[u8]>,
    key: &SecretKey,
    config: &WatermarkConfig,
) -> Result<()> {
    config.validate()?;
    if payload.is_empty() {
        return Err(Error::EmptyPayload);
    }
    if remove_payload.is_some_and(|r| r.is_empty()) {
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
    let bank = generate_bank_parallel(key, payload.len(), block_len);

    let total_frames = samples.len() / channels;
    let num_blocks = Blocks::new(total_frames, block_len).total();
    let usable = num_blocks * block_len * channels;
    let strength = config.strength;

    samples[..usable]
        .par_chunks_mut(block_len * channels)
        .enumerate()
        .for_each(|(k, chunk)| {
            embed_block(chunk, channels, k, payload, remove_payload, &bank, strength);
        });

    Ok(())
}

/// Extract per-block correlations using parallel processing.
///
/// Functionally identical to [`crate::extract`].
pub fn extract_parallel(
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
    let bank = generate_bank_parallel(key, payload_len, block_len);

    let total_frames = samples.len() / channels;
    let num_blocks = Blocks::new(total_frames, block_len).total();
    let usable = num_blocks * block_len * channels;

    let per_block: Vec<(f32, f64)> = samples[..usable]
        .par_chunks(block_len * channels)
        .enumerate()
        .map(|(k, chunk)| analyze_block(chunk, channels, bank.carrier(k % payload_len)))
        .collect();

    // Fold confidences sequentially in block order so the mean matches the
    // sequential path bit-for-bit.
    let mut confidence_sum = 0.0f64;
    let mut correlations = Vec::with_capacity(per_block.len());
    for (correlation, confidence) in per_block {
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
