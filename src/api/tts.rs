//! Text-to-speech endpoint

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::ApiState;
use crate::speech::SpeechError;

/// Build TTS router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new().route("/tts", post(tts)).with_state(state)
}

/// Synthesis request
#[derive(Debug, Default, Deserialize)]
pub struct TtsRequest {
    #[serde(default)]
    pub text: Option<String>,
}

/// Synthesis response; audio is base64 so it fits in JSON
#[derive(Debug, Serialize)]
pub struct TtsResponse {
    pub audio_data: String,
    pub mime_type: String,
}

/// Synthesize text to speech
async fn tts(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<TtsRequest>,
) -> Result<Json<TtsResponse>, TtsError> {
    let text = request.text.unwrap_or_default();

    let audio = state.speech.synthesize(&text).await.map_err(|e| {
        if !matches!(e, SpeechError::EmptyInput) {
            tracing::error!(error = %e, "speech synthesis failed");
        }
        TtsError::from(e)
    })?;

    Ok(Json(TtsResponse {
        audio_data: base64::engine::general_purpose::STANDARD.encode(&audio.data),
        mime_type: audio.mime_type,
    }))
}

/// Client-facing TTS errors; vendor details stay in the logs
#[derive(Debug)]
pub enum TtsError {
    NoText,
    Failed,
}

impl From<SpeechError> for TtsError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::EmptyInput => Self::NoText,
            SpeechError::NotConfigured | SpeechError::Synthesis(_) => Self::Failed,
        }
    }
}

impl IntoResponse for TtsError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: &'static str,
        }

        let (status, error) = match self {
            Self::NoText => (StatusCode::BAD_REQUEST, "No text provided"),
            Self::Failed => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate speech"),
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}
