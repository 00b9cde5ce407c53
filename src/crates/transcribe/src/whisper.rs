//! whisper.cpp invocation.

use crate::error::{Result, TranscribeError};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// ggml model sizes published by whisper.cpp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelSize {
    #[default]
    Tiny,
    Base,
    Small,
    Medium,
    Large,
}

impl ModelSize {
    pub fn name(&self) -> &'static str {
        match self {
            ModelSize::Tiny => "tiny",
            ModelSize::Base => "base",
            ModelSize::Small => "small",
            ModelSize::Medium => "medium",
            ModelSize::Large => "large",
        }
    }

    /// Model file name as the download script writes it.
    pub fn file_name(&self) -> String {
        format!("ggml-{}.bin", self.name())
    }
}

/// Filesystem layout and model selection.
///
/// `whisper_dir` is expected to contain the whisper.cpp build:
///
/// ```text
/// <whisper_dir>/audios/       scratch space for intermediates
/// <whisper_dir>/bin/main      the whisper.cpp binary
/// <whisper_dir>/bin/models/   ggml models + download script
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperConfig {
    pub whisper_dir: PathBuf,
    #[serde(default)]
    pub model: ModelSize,
}

impl WhisperConfig {
    pub fn new(whisper_dir: impl Into<PathBuf>) -> Self {
        Self {
            whisper_dir: whisper_dir.into(),
            model: ModelSize::default(),
        }
    }

    pub fn with_model(mut self, model: ModelSize) -> Self {
        self.model = model;
        self
    }

    pub fn audio_dir(&self) -> PathBuf {
        self.whisper_dir.join("audios")
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.whisper_dir.join("bin")
    }

    pub fn models_dir(&self) -> PathBuf {
        self.bin_dir().join("models")
    }

    pub fn model_path(&self) -> PathBuf {
        self.models_dir().join(self.model.file_name())
    }
}

/// Transcription pipeline around a local whisper.cpp build.
#[derive(Debug, Clone)]
pub struct Whisper {
    config: WhisperConfig,
}

impl Whisper {
    pub fn new(config: WhisperConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WhisperConfig {
        &self.config
    }

    /// Transcribe base64-encoded audio to text.
    pub async fn transcribe_base64(&self, audio_b64: &str) -> Result<String> {
        let bytes = BASE64.decode(audio_b64.trim())?;
        self.transcribe_bytes(&bytes).await
    }

    /// Transcribe raw audio bytes to text.
    pub async fn transcribe_bytes(&self, audio: &[u8]) -> Result<String> {
        self.ensure_model().await?;

        let stem = Uuid::new_v4().to_string();
        let audio_dir = self.config.audio_dir();
        tokio::fs::create_dir_all(&audio_dir).await?;

        let raw_path = audio_dir.join(&stem);
        let wav_path = audio_dir.join(format!("{stem}.wav"));
        let txt_path = audio_dir.join(format!("{stem}.wav.txt"));

        tokio::fs::write(&raw_path, audio).await?;

        let result = self.run_pipeline(&raw_path, &wav_path, &txt_path).await;

        // Intermediates are scratch; remove them whatever happened.
        for path in [&raw_path, &wav_path, &txt_path] {
            if let Err(err) = tokio::fs::remove_file(path).await {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %path.display(), error = %err, "failed to remove scratch file");
                }
            }
        }

        result
    }

    async fn run_pipeline(
        &self,
        raw_path: &Path,
        wav_path: &Path,
        txt_path: &Path,
    ) -> Result<String> {
        self.convert_to_wav(raw_path, wav_path).await?;
        self.run_whisper(wav_path).await?;

        let txt = tokio::fs::read_to_string(txt_path).await?;
        let txt = txt.trim();
        if txt.is_empty() {
            return Err(TranscribeError::NoText);
        }

        info!(chars = txt.len(), "transcription complete");
        Ok(txt.to_string())
    }

    /// Convert arbitrary audio to the 16 kHz mono PCM wav whisper expects.
    async fn convert_to_wav(&self, input: &Path, output: &Path) -> Result<()> {
        debug!(input = %input.display(), "converting audio with ffmpeg");

        let status_output = Command::new("ffmpeg")
            .arg("-y")
            .arg("-i")
            .arg(input)
            .args(["-acodec", "pcm_s16le", "-ar", "16000", "-ac", "1"])
            .arg(output)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !status_output.status.success() {
            let stderr = String::from_utf8_lossy(&status_output.stderr);
            let hint: String = stderr.chars().take(500).collect();
            return Err(TranscribeError::Convert(hint));
        }

        Ok(())
    }

    /// Download the ggml model on first use.
    async fn ensure_model(&self) -> Result<()> {
        let model_path = self.config.model_path();
        if tokio::fs::try_exists(&model_path).await? {
            return Ok(());
        }

        info!(model = self.config.model.name(), "downloading ggml model");

        let output = Command::new("./download-ggml-model.sh")
            .arg(self.config.model.name())
            .current_dir(self.config.models_dir())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let hint: String = stderr.chars().take(500).collect();
            return Err(TranscribeError::Download(hint));
        }

        Ok(())
    }

    async fn run_whisper(&self, wav_path: &Path) -> Result<()> {
        debug!(wav = %wav_path.display(), "running whisper");

        let output = Command::new("./main")
            .arg("-m")
            .arg(self.config.model_path())
            .arg("-otxt")
            .arg("-f")
            .arg(wav_path)
            .current_dir(self.config.bin_dir())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let hint: String = stderr.chars().take(500).collect();
            return Err(TranscribeError::Whisper(hint));
        }

        Ok(())
    }
}
