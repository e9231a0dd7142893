//! Leadchat Gateway - backend for an embeddable sales chat widget
//!
//! This library provides:
//! - A fixed FAQ table matched on normalized text
//! - A four-state conversation controller whose state lives in the widget
//! - Lead storage in a Google Sheet, falling back to a local CSV file
//! - Text-to-speech through the Gemini API
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                 Chat widget (browser)                │
//! │        POST /chat  {message, state, user_data}       │
//! │        POST /tts   {text}                            │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                  API (axum)                          │
//! │   Conversation  │  FAQ Table  │  Speech Gateway      │
//! └───────┬─────────────────────────────────┬───────────┘
//!         │                                 │
//! ┌───────▼──────────────┐        ┌─────────▼───────────┐
//! │ Lead Sinks           │        │ Gemini TTS          │
//! │ Sheets  │  CSV file  │        └─────────────────────┘
//! └──────────────────────┘
//! ```

pub mod api;
pub mod config;
pub mod conversation;
pub mod credentials;
pub mod daemon;
pub mod error;
pub mod faq;
pub mod leads;
pub mod speech;

pub use config::Config;
pub use conversation::{Conversation, ConversationState, Reply, Step, transition};
pub use daemon::Daemon;
pub use error::{Error, Result};
pub use faq::FaqTable;
pub use leads::{CsvLeadSink, Lead, LeadRecord, LeadSink, LeadSinks, SinkError, UserData};
pub use speech::{SpeechError, SpeechGateway, SpeechSynthesizer, SynthesizedAudio};
