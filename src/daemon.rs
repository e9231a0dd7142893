//! Daemon - the main gateway service
//!
//! Builds every external handle once at startup. A handle that fails to come
//! up is logged and left out; the gateway keeps serving with that feature
//! degraded.

use std::sync::Arc;

use crate::api::ApiServerBuilder;
use crate::config::SpeechConfig;
use crate::conversation::Conversation;
use crate::credentials::{ServiceAccount, TokenProvider};
use crate::faq::FaqTable;
use crate::leads::sheets::SHEETS_SCOPE;
use crate::leads::{CsvLeadSink, LeadSink, LeadSinks, SheetsClient};
use crate::speech::{GeminiSpeech, SpeechGateway, SpeechSynthesizer};
use crate::{Config, Result};

/// The leadchat daemon
pub struct Daemon {
    config: Config,
    conversation: Conversation,
    speech: SpeechGateway,
    credentials_available: bool,
}

impl Daemon {
    /// Create a new daemon instance, provisioning integrations
    ///
    /// Integration failures are not errors; they leave the feature unavailable.
    pub async fn new(mut config: Config) -> Self {
        let credentials = Self::init_credentials(&config);
        let credentials_available = credentials.is_some();

        let remote = match credentials {
            Some(tokens) => Self::init_sheet(&config, tokens).await,
            None => None,
        };

        let local: Arc<dyn LeadSink> = Arc::new(CsvLeadSink::new(config.leads.file.clone()));
        if remote.is_none() {
            tracing::warn!(
                path = %config.leads.file.display(),
                "lead sheet unavailable, leads will be written to the local file"
            );
        }

        let conversation = Conversation::new(
            Arc::new(FaqTable::builtin()),
            LeadSinks::new(remote, local),
        );

        let speech = SpeechGateway::new(Self::init_speech(&mut config.speech));

        Self {
            config,
            conversation,
            speech,
            credentials_available,
        }
    }

    /// Load the service account used by the spreadsheet backend
    fn init_credentials(config: &Config) -> Option<Arc<dyn TokenProvider>> {
        match ServiceAccount::from_file(
            &config.leads.credentials,
            &[SHEETS_SCOPE],
            config.leads.timeout,
        ) {
            Ok(account) => {
                tracing::info!(
                    account = %account.client_email(),
                    project = ?account.project_id(),
                    "service account loaded"
                );
                Some(Arc::new(account))
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    path = %config.leads.credentials.display(),
                    "failed to load service account"
                );
                None
            }
        }
    }

    /// Provision the lead spreadsheet
    async fn init_sheet(
        config: &Config,
        tokens: Arc<dyn TokenProvider>,
    ) -> Option<Arc<dyn LeadSink>> {
        let Some(spreadsheet) = config.leads.spreadsheet.as_deref() else {
            tracing::info!("no spreadsheet configured");
            return None;
        };

        match SheetsClient::provision(
            tokens,
            spreadsheet,
            &config.leads.worksheet,
            config.leads.timeout,
        )
        .await
        {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                tracing::error!(error = %e, "failed to initialize lead sheet");
                None
            }
        }
    }

    /// Configure the speech backend
    fn init_speech(config: &mut SpeechConfig) -> Option<Arc<dyn SpeechSynthesizer>> {
        let Some(api_key) = config.api_key.take() else {
            tracing::warn!("GOOGLE_API_KEY not set, text-to-speech disabled");
            return None;
        };

        match GeminiSpeech::new(
            api_key,
            config.model.clone(),
            config.voice.clone(),
            config.timeout,
        ) {
            Ok(tts) => {
                tracing::info!(model = %tts.model(), "text-to-speech enabled");
                Some(Arc::new(tts))
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to configure text-to-speech");
                None
            }
        }
    }

    /// Run the daemon until interrupted
    ///
    /// # Errors
    ///
    /// Returns error if the API server cannot bind or fails
    pub async fn run(self) -> Result<()> {
        tracing::info!(
            port = self.config.server.port,
            lead_sheet = self.conversation.leads().remote_available(),
            speech = self.speech.is_available(),
            "daemon running"
        );

        ApiServerBuilder::new(self.conversation, self.config.server.port)
            .speech(self.speech)
            .credentials_available(self.credentials_available)
            .static_dir(self.config.server.static_dir.clone())
            .build()
            .run()
            .await
    }
}
