//! Shared test utilities

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use leadchat_gateway::api::ApiServerBuilder;
use leadchat_gateway::{
    Conversation, FaqTable, LeadRecord, LeadSink, LeadSinks, SinkError, SpeechError,
    SpeechGateway, SpeechSynthesizer, SynthesizedAudio,
};
use tower::ServiceExt;

/// Lead sink that keeps rows in memory, optionally failing every append
#[derive(Default)]
pub struct MemorySink {
    pub rows: Mutex<Vec<Vec<String>>>,
    pub fail: bool,
}

impl MemorySink {
    pub fn failing() -> Self {
        Self {
            rows: Mutex::default(),
            fail: true,
        }
    }

    pub fn rows(&self) -> Vec<Vec<String>> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl LeadSink for MemorySink {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn append(&self, record: &LeadRecord) -> Result<(), SinkError> {
        if self.fail {
            return Err(SinkError::Remote("sheet offline".to_string()));
        }
        self.rows.lock().unwrap().push(record.to_row());
        Ok(())
    }
}

/// Speech backend returning fixed bytes, or failing
pub struct FixedSpeech {
    pub audio: Vec<u8>,
    pub fail: bool,
}

#[async_trait]
impl SpeechSynthesizer for FixedSpeech {
    async fn synthesize(&self, _text: &str) -> Result<SynthesizedAudio, SpeechError> {
        if self.fail {
            return Err(SpeechError::Synthesis("quota exceeded".to_string()));
        }
        Ok(SynthesizedAudio {
            data: self.audio.clone(),
            mime_type: "audio/L16;codec=pcm;rate=24000".to_string(),
        })
    }
}

/// Handles a test keeps after building the router
pub struct TestApp {
    pub router: axum::Router,
    pub remote: Option<Arc<MemorySink>>,
    pub local: Arc<MemorySink>,
}

impl TestApp {
    /// Send one request through a fresh clone of the router
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// POST a JSON body and decode the JSON answer
    pub async fn post_json(
        &self,
        uri: &str,
        body: serde_json::Value,
    ) -> (axum::http::StatusCode, serde_json::Value) {
        let response = self
            .send(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    /// GET a path and decode the JSON answer
    pub async fn get_json(&self, uri: &str) -> (axum::http::StatusCode, serde_json::Value) {
        let response = self
            .send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }
}

/// Builder for a router wired to in-memory fakes
#[derive(Default)]
pub struct TestAppBuilder {
    remote: Option<Arc<MemorySink>>,
    local: Option<Arc<MemorySink>>,
    speech: Option<Arc<dyn SpeechSynthesizer>>,
    credentials: bool,
}

impl TestAppBuilder {
    pub fn remote(mut self, sink: MemorySink) -> Self {
        self.remote = Some(Arc::new(sink));
        self
    }

    pub fn local(mut self, sink: MemorySink) -> Self {
        self.local = Some(Arc::new(sink));
        self
    }

    pub fn speech(mut self, backend: FixedSpeech) -> Self {
        self.speech = Some(Arc::new(backend));
        self
    }

    pub fn credentials(mut self) -> Self {
        self.credentials = true;
        self
    }

    pub fn build(self) -> TestApp {
        let local = self.local.unwrap_or_default();
        let sinks = LeadSinks::new(
            self.remote
                .clone()
                .map(|sink| sink as Arc<dyn LeadSink>),
            local.clone() as Arc<dyn LeadSink>,
        );
        let conversation = Conversation::new(Arc::new(FaqTable::builtin()), sinks);

        let router = ApiServerBuilder::new(conversation, 0)
            .speech(SpeechGateway::new(self.speech))
            .credentials_available(self.credentials)
            .build()
            .router();

        TestApp {
            router,
            remote: self.remote,
            local,
        }
    }
}

/// A fully filled lead form
pub fn complete_form() -> serde_json::Value {
    serde_json::json!({
        "name": "Asha Rao",
        "contact_number": "+91 98310 00000",
        "location": "Kolkata",
        "email": "asha@example.com",
        "comments": "Need a demand forecasting dashboard"
    })
}
