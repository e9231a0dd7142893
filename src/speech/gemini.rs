//! Gemini text-to-speech backend

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::{SpeechError, SpeechSynthesizer, SynthesizedAudio};
use crate::{Error, Result};

/// Generative Language API base URL
pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";

/// Default TTS model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-tts";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [TextPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_modalities: [&'static str; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    speech_config: Option<SpeechConfig<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig<'a> {
    voice_config: VoiceConfig<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig<'a> {
    prebuilt_voice_config: PrebuiltVoice<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoice<'a> {
    voice_name: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

/// Pull the first inline-data part out of the first candidate
fn extract_audio(response: GenerateResponse) -> std::result::Result<SynthesizedAudio, SpeechError> {
    let inline = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().find_map(|p| p.inline_data))
        .ok_or_else(|| SpeechError::Synthesis("response contained no audio part".to_string()))?;

    let data = base64::engine::general_purpose::STANDARD
        .decode(inline.data.as_bytes())
        .map_err(|e| SpeechError::Synthesis(format!("invalid audio payload: {e}")))?;

    Ok(SynthesizedAudio {
        data,
        mime_type: inline.mime_type,
    })
}

/// Gemini TTS client
pub struct GeminiSpeech {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    voice: Option<String>,
}

impl std::fmt::Debug for GeminiSpeech {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiSpeech")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("voice", &self.voice)
            .finish_non_exhaustive()
    }
}

impl GeminiSpeech {
    /// Create a new Gemini TTS client
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty or the HTTP client cannot be built
    pub fn new(
        api_key: SecretString,
        model: String,
        voice: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        if api_key.expose_secret().is_empty() {
            return Err(Error::Config("Gemini API key required for TTS".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: GEMINI_API_URL.to_string(),
            model,
            voice,
        })
    }

    /// Point the client at a different API host
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Model identifier in use
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl SpeechSynthesizer for GeminiSpeech {
    async fn synthesize(&self, text: &str) -> std::result::Result<SynthesizedAudio, SpeechError> {
        let request = GenerateRequest {
            contents: [Content {
                parts: [TextPart { text }],
            }],
            generation_config: GenerationConfig {
                response_modalities: ["AUDIO"],
                speech_config: self.voice.as_deref().map(|voice_name| SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoice { voice_name },
                    },
                }),
            },
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| SpeechError::Synthesis(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::Synthesis(format!(
                "Gemini TTS error {status}: {body}"
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::Synthesis(format!("invalid response: {e}")))?;

        let audio = extract_audio(body)?;
        tracing::debug!(
            bytes = audio.data.len(),
            mime_type = %audio.mime_type,
            "speech synthesized"
        );
        Ok(audio)
    }
}
