use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("payload is empty")]
    EmptyPayload,

    #[error("hop size must be positive")]
    InvalidHopSize,

    #[error("unsupported channel count: {0} (expected 1 or 2)")]
    UnsupportedChannels(u16),

    #[error("sample buffer length {len} is not a multiple of {channels} channels")]
    RaggedBuffer { len: usize, channels: u16 },

    #[error("only 32-bit float WAV supported (file is {bits}-bit {format})")]
    UnsupportedWavFormat { bits: u16, format: &'static str },

    #[error("sample rate mismatch: expected {expected} Hz, file is {got} Hz")]
    SampleRateMismatch { expected: u32, got: u32 },

    #[error("channel count mismatch: expected {expected}, file has {got}")]
    ChannelMismatch { expected: u16, got: u16 },

    #[error("WAV I/O error: {0}")]
    Wav(#[from] hound::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
