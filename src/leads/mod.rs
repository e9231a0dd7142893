//! Lead capture and storage
//!
//! A lead is appended to the remote spreadsheet when it was provisioned at
//! startup, otherwise to a local CSV file. A failing remote append is reported
//! to the caller; it does not fall back to the file.

mod csv_file;
pub mod sheets;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

pub use csv_file::CsvLeadSink;
pub use sheets::SheetsClient;

/// Timestamp format stored alongside each lead
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Column names, in row order
pub const HEADER: [&str; 6] = [
    "name",
    "contact_number",
    "location",
    "email",
    "comments",
    "timestamp",
];

/// Lead form fields as sent by the widget; every field is optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserData {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
}

impl UserData {
    /// Validate the form, returning a lead only when all five fields are filled
    ///
    /// Whitespace-only values count as missing.
    #[must_use]
    pub fn to_lead(&self) -> Option<Lead> {
        fn filled(field: Option<&String>) -> Option<String> {
            field.filter(|v| !v.trim().is_empty()).cloned()
        }

        Some(Lead {
            name: filled(self.name.as_ref())?,
            contact_number: filled(self.contact_number.as_ref())?,
            location: filled(self.location.as_ref())?,
            email: filled(self.email.as_ref())?,
            comments: filled(self.comments.as_ref())?,
        })
    }
}

/// A validated lead whose five fields are all non-empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lead {
    pub name: String,
    pub contact_number: String,
    pub location: String,
    pub email: String,
    pub comments: String,
}

impl Lead {
    /// Attach a submission timestamp
    #[must_use]
    pub fn stamp(self, timestamp: String) -> LeadRecord {
        LeadRecord {
            lead: self,
            timestamp,
        }
    }

    /// Attach the current local time as the submission timestamp
    #[must_use]
    pub fn stamp_now(self) -> LeadRecord {
        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
        self.stamp(timestamp)
    }
}

/// A lead ready to be appended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadRecord {
    pub lead: Lead,
    pub timestamp: String,
}

impl LeadRecord {
    /// Row values in `HEADER` order
    #[must_use]
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.lead.name.clone(),
            self.lead.contact_number.clone(),
            self.lead.location.clone(),
            self.lead.email.clone(),
            self.lead.comments.clone(),
            self.timestamp.clone(),
        ]
    }
}

/// Lead storage failures
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// Remote spreadsheet append failed
    #[error("remote sheet append failed: {0}")]
    Remote(String),

    /// Local file append failed
    #[error("local file append failed: {0}")]
    Local(String),
}

/// Destination that durably records a lead
#[async_trait]
pub trait LeadSink: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Append one row for the record
    ///
    /// # Errors
    ///
    /// Returns error if the row could not be written
    async fn append(&self, record: &LeadRecord) -> Result<(), SinkError>;
}

/// Availability-based choice between the remote sheet and the local file
#[derive(Clone)]
pub struct LeadSinks {
    remote: Option<Arc<dyn LeadSink>>,
    local: Arc<dyn LeadSink>,
}

impl LeadSinks {
    /// Create the selector; `remote` is `None` when provisioning failed
    #[must_use]
    pub fn new(remote: Option<Arc<dyn LeadSink>>, local: Arc<dyn LeadSink>) -> Self {
        Self { remote, local }
    }

    /// Whether the remote backend was provisioned
    #[must_use]
    pub fn remote_available(&self) -> bool {
        self.remote.is_some()
    }

    /// Append through the remote backend when present, the local one otherwise
    ///
    /// # Errors
    ///
    /// Returns the selected backend's error; there is no retry on the other backend
    pub async fn append(&self, record: &LeadRecord) -> Result<(), SinkError> {
        let sink = self.remote.as_ref().unwrap_or(&self.local);

        match sink.append(record).await {
            Ok(()) => {
                tracing::info!(sink = sink.name(), "lead recorded");
                Ok(())
            }
            Err(e) => {
                tracing::error!(sink = sink.name(), error = %e, "failed to record lead");
                Err(e)
            }
        }
    }
}
