//! Transcription error types.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TranscribeError>;

#[derive(Debug, Error)]
pub enum TranscribeError {
    /// The request body was not valid base64.
    #[error("invalid base64 audio: {0}")]
    Decode(#[from] base64::DecodeError),

    /// Filesystem failure anywhere in the pipeline.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// `ffmpeg` failed to convert the audio to 16 kHz wav.
    #[error("audio conversion failed: {0}")]
    Convert(String),

    /// Model download script failed.
    #[error("model download failed: {0}")]
    Download(String),

    /// The whisper binary exited with an error.
    #[error("transcription failed: {0}")]
    Whisper(String),

    /// The audio produced an empty transcript.
    #[error("no text found in audio")]
    NoText,
}
