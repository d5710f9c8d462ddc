//! Spread-spectrum audio watermarking.
//!
//! A fixed payload bitstream is modulated into stereo (or mono) float audio
//! as keyed pseudo-noise: each block of `4 * hop_size` frames carries one
//! payload bit on a carrier derived from `(secret, bit position)`. The
//! extractor regenerates the carriers from the same secret and emits one
//! soft correlation per block; recovering the payload from repetitions
//! (voting, error control, synchronization) is the caller's layer.

pub mod block;
pub mod carrier;
pub mod config;
pub mod embed;
pub mod error;
pub mod extract;
pub mod key;
pub mod wav;

#[cfg(feature = "parallel")]
pub mod parallel;

// Re-export primary API types
pub use carrier::CarrierBank;
pub use config::WatermarkConfig;
pub use error::Error;
pub use extract::Extraction;
pub use key::SecretKey;

#[cfg(feature = "parallel")]
pub use parallel::{embed_parallel, extract_parallel};

/// Embed a watermark into interleaved float samples (in-place).
///
/// This is the one-shot API for file-based workflows. The payload is a
/// slice of bits (zero / non-zero bytes) repeated for the whole stream.
pub fn embed(
    samples: &mut [f32],
    payload: &[u8],
    key: &SecretKey,
    config: &WatermarkConfig,
) -> error::Result<()> {
    embed::embed(samples, payload, key, config)
}

/// Embed a watermark while cancelling an existing one (re-signing).
pub fn embed_with_removal(
    samples: &mut [f32],
    payload: &[u8],
    remove_payload: Option<&[u8]>,
    key: &SecretKey,
    config: &WatermarkConfig,
) -> error::Result<()> {
    embed::embed_with_removal(samples, payload, remove_payload, key, config)
}

/// Extract per-block soft correlations and hard bits from float samples.
///
/// `payload_len` must match the payload length used at embed time.
pub fn extract(
    samples: &[f32],
    payload_len: usize,
    key: &SecretKey,
    config: &WatermarkConfig,
) -> error::Result<Extraction> {
    extract::extract(samples, payload_len, key, config)
}
