//! Local speech-to-text via whisper.cpp.
//!
//! The pipeline takes base64-encoded audio and returns the transcript:
//!
//! 1. decode and write the raw audio to the audio directory
//! 2. convert to 16 kHz mono PCM wav with `ffmpeg`
//! 3. download the ggml model on first use
//! 4. run the whisper.cpp binary with `-otxt`
//! 5. read the `.txt` output, trim it, fail on empty
//!
//! Intermediate files use a fresh UUID per invocation, so concurrent
//! transcriptions never clobber each other. All intermediates are removed
//! on success.

pub mod error;
pub mod whisper;

pub use error::{Result, TranscribeError};
pub use whisper::{ModelSize, Whisper, WhisperConfig};
