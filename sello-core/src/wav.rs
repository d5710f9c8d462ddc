//! 32-bit float WAV reading and writing.
//!
//! The watermark pipeline works on IEEE float samples end to end, so the
//! reader accepts only format-3 (float) 32-bit files and rejects everything
//! else up front. The writer emits the same encoding.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::error::{Error, Result};

/// Decoded audio: interleaved float samples plus stream parameters.
#[derive(Debug, Clone)]
pub struct WavAudio {
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<f32>,
}

impl WavAudio {
    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Check the stream against a caller-declared format.
    pub fn ensure_format(&self, sample_rate: Option<u32>, channels: Option<u16>) -> Result<()> {
        if let Some(expected) = sample_rate
            && expected != self.sample_rate
        {
            return Err(Error::SampleRateMismatch {
                expected,
                got: self.sample_rate,
            });
        }
        if let Some(expected) = channels
            && expected != self.channels
        {
            return Err(Error::ChannelMismatch {
                expected,
                got: self.channels,
            });
        }
        Ok(())
    }
}

/// Read a WAV file, accepting only IEEE float 32-bit data.
pub fn read_wav(path: &Path) -> Result<WavAudio> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    if spec.sample_format != SampleFormat::Float || spec.bits_per_sample != 32 {
        return Err(Error::UnsupportedWavFormat {
            bits: spec.bits_per_sample,
            format: match spec.sample_format {
                SampleFormat::Float => "float",
                SampleFormat::Int => "integer",
            },
        });
    }

    let samples = reader
        .into_samples::<f32>()
        .collect::<std::result::Result<Vec<f32>, _>>()?;

    Ok(WavAudio {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        samples,
    })
}

/// Write interleaved samples as a 32-bit float WAV file.
pub fn write_wav(path: &Path, audio: &WavAudio) -> Result<()> {
    let spec = WavSpec {
        channels: audio.channels,
        sample_rate: audio.sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec)?;
    for &sample in &audio.samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}
