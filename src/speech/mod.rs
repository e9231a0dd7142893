//! Text-to-speech gateway
//!
//! One request in, one whole audio clip out. No retries, no streaming.

mod gemini;

use std::sync::Arc;

use async_trait::async_trait;

pub use gemini::{DEFAULT_MODEL, GEMINI_API_URL, GeminiSpeech};

/// Synthesized audio as returned by the vendor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedAudio {
    /// Raw encoded audio bytes
    pub data: Vec<u8>,
    /// MIME type reported by the vendor (e.g. `audio/L16;codec=pcm;rate=24000`)
    pub mime_type: String,
}

/// Speech synthesis failures
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    /// No text to synthesize
    #[error("no text provided")]
    EmptyInput,

    /// No speech backend was configured at startup
    #[error("speech synthesis not configured")]
    NotConfigured,

    /// The vendor call failed or returned no audio
    #[error("speech synthesis failed: {0}")]
    Synthesis(String),
}

/// Backend that turns text into audio
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize non-empty text
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Synthesis` if the backend fails or returns no audio
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, SpeechError>;
}

/// Validates input and forwards it to the configured backend, if any
#[derive(Clone, Default)]
pub struct SpeechGateway {
    backend: Option<Arc<dyn SpeechSynthesizer>>,
}

impl SpeechGateway {
    /// Create a gateway; `None` leaves synthesis disabled
    #[must_use]
    pub fn new(backend: Option<Arc<dyn SpeechSynthesizer>>) -> Self {
        Self { backend }
    }

    /// Whether a backend is configured
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    /// Synthesize text
    ///
    /// Empty text is rejected before any backend is consulted.
    ///
    /// # Errors
    ///
    /// Returns `EmptyInput`, `NotConfigured`, or the backend's `Synthesis` error
    pub async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, SpeechError> {
        if text.is_empty() {
            return Err(SpeechError::EmptyInput);
        }

        let backend = self.backend.as_ref().ok_or(SpeechError::NotConfigured)?;
        backend.synthesize(text).await
    }
}
