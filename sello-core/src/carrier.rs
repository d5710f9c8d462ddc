//! Position-indexed pseudo-noise carrier generation.
//!
//! Each payload position gets one shaped carrier of `samples_per_bit`
//! samples: raw PN from the keyed PRNG, box low-pass, local-mean DC removal,
//! energy normalization, Hann taper. The shaping order is part of the wire
//! contract: both ends must produce bit-exact sequences from the same secret.

use crate::key::{SecretKey, XorShift64};

/// Half-width of the box low-pass applied to the raw PN sequence.
const SMOOTH_HALF_WIDTH: usize = 32;

/// Half-width of the local-mean window used for DC removal.
const DC_HALF_WIDTH: usize = 256;

/// Carriers with RMS at or below this keep their unnormalized scale.
const MIN_CARRIER_RMS: f64 = 1e-10;

/// The set of shaped carriers for one secret, indexed by payload position.
#[derive(Debug, Clone)]
pub struct CarrierBank {
    carriers: Vec<Vec<f64>>,
    samples_per_bit: usize,
}

impl CarrierBank {
    /// Generate carriers for `positions` payload positions, each of
    /// `samples_per_bit` samples.
    pub fn generate(key: &SecretKey, positions: usize, samples_per_bit: usize) -> Self {
        let carriers = (0..positions)
            .map(|p| generate_carrier(key.seed_for_position(p), samples_per_bit))
            .collect();
        Self {
            carriers,
            samples_per_bit,
        }
    }

    pub(crate) fn from_carriers(carriers: Vec<Vec<f64>>, samples_per_bit: usize) -> Self {
        Self {
            carriers,
            samples_per_bit,
        }
    }

    /// Number of payload positions covered by this bank.
    pub fn positions(&self) -> usize {
        self.carriers.len()
    }

    /// Carrier length in samples.
    pub fn samples_per_bit(&self) -> usize {
        self.samples_per_bit
    }

    /// The carrier for a payload position. Panics if `position` is out of
    /// range; callers index with `block % positions`.
    pub fn carrier(&self, position: usize) -> &[f64] {
        &self.carriers[position]
    }
}

/// Generate the final (windowed) carrier for one seed.
pub(crate) fn generate_carrier(seed: u64, len: usize) -> Vec<f64> {
    let mut carrier = shaped_carrier(seed, len);
    apply_hann(&mut carrier);
    carrier
}

/// Shaped but unwindowed carrier: raw PN, low-pass, DC removal, normalization.
///
/// After this step the sequence has mean square ≈ 1; the Hann taper is
/// applied separately so block boundaries meet at zero.
fn shaped_carrier(seed: u64, len: usize) -> Vec<f64> {
    let mut prng = XorShift64::new(seed);
    let mut raw = Vec::with_capacity(len);
    for _ in 0..len {
        raw.push(2.0 * prng.next_f64() - 1.0);
    }

    // Box low-pass: pushes the carrier energy below the bands where added
    // noise is most audible. Edge windows shrink to the valid range and the
    // divisor is the actual sample count.
    let smoothed = local_mean(&raw, SMOOTH_HALF_WIDTH);

    // DC removal: subtract the local mean of the smoothed sequence, computed
    // from a snapshot so later samples see the same input.
    let dc = local_mean(&smoothed, DC_HALF_WIDTH);
    let mut carrier: Vec<f64> = smoothed.iter().zip(dc.iter()).map(|(s, m)| s - m).collect();

    // Energy normalization to unit mean square. Near-zero energy keeps the
    // carrier as-is rather than amplifying rounding noise.
    let mut energy = 0.0;
    for &x in &carrier {
        energy += x * x;
    }
    let rms = (energy / len as f64).sqrt();
    if rms > MIN_CARRIER_RMS {
        for x in &mut carrier {
            *x /= rms;
        }
    }

    carrier
}

/// Mean of `x[i - half_width ..= i + half_width]`, clamped to valid indices.
fn local_mean(x: &[f64], half_width: usize) -> Vec<f64> {
    let len = x.len();
    let mut out = vec![0.0; len];
    for (i, o) in out.iter_mut().enumerate() {
        let lo = i.saturating_sub(half_width);
        let hi = (i + half_width).min(len - 1);
        let mut sum = 0.0;
        for &v in &x[lo..=hi] {
            sum += v;
        }
        *o = sum / (hi - lo + 1) as f64;
    }
    out
}

/// Symmetric Hann taper `0.5 * (1 - cos(2πi / (len-1)))`: zero at both ends
/// so abutting blocks join without discontinuities.
fn apply_hann(carrier: &mut [f64]) {
    let n = (carrier.len() - 1) as f64;
    for (i, x) in carrier.iter_mut().enumerate() {
        *x *= 0.5 * (1.0 - (2.0 * std::f64::consts::PI * i as f64 / n).cos());
    }
}
