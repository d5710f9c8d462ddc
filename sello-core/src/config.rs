use crate::error::{Error, Result};

/// Configuration for watermark embedding and extraction.
#[derive(Debug, Clone)]
pub struct WatermarkConfig {
    /// Sample rate in Hz (e.g. 44100, 48000). Informational; the time-domain
    /// codec is rate-agnostic, but callers use it to size buffers and report
    /// durations.
    pub sample_rate: u32,
    /// Channel count of the interleaved sample buffer (1 or 2).
    pub channels: u16,
    /// Hop size in frames. One watermark block spans `4 * hop_size` frames.
    /// Default: 1024.
    pub hop_size: usize,
    /// Base embedding strength. Scaled per block by the adaptive gain, which
    /// keeps the effective strength between 10% and 60% of this value.
    /// Default: 0.007 (~0.7% of full scale).
    pub strength: f64,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            channels: 2,
            hop_size: 1024,
            strength: 0.007,
        }
    }
}

impl WatermarkConfig {
    /// Block length in frames: each block carries exactly one payload bit.
    pub fn samples_per_bit(&self) -> usize {
        self.hop_size * 4
    }

    /// Duration of one block in seconds, for reporting.
    pub fn seconds_per_bit(&self) -> f64 {
        self.samples_per_bit() as f64 / self.sample_rate as f64
    }

    /// Check that the configuration describes a processable stream.
    pub fn validate(&self) -> Result<()> {
        if self.hop_size == 0 {
            return Err(Error::InvalidHopSize);
        }
        if self.channels == 0 || self.channels > 2 {
            return Err(Error::UnsupportedChannels(self.channels));
        }
        Ok(())
    }
}
