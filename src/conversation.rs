//! Conversation state machine
//!
//! The widget holds the conversation state and echoes it back with every
//! message. Nothing is kept on the server between requests: the next state is
//! a function of the current state, the normalized message, and (while
//! collecting a lead) the submitted form.
//!
//! ```text
//!   GREETING ──faq hit──▶ AWAITING_CONFIRMATION ──no──▶ ENDED
//!     │   ▲                      │
//!     │   └────────yes───────────┘
//!     │
//!     └─other queries / idle_timeout──▶ COLLECTING_LEAD ──stored──▶ GREETING
//! ```

use crate::faq::{FaqTable, normalize};
use crate::leads::{Lead, LeadSinks, UserData};

/// Message that moves a greeting to lead collection
pub const OTHER_QUERIES: &str = "other queries";

/// Message sent by the widget after a period of inactivity
pub const IDLE_TIMEOUT: &str = "idle_timeout";

/// Message sent by the widget when the lead form is submitted
pub const SUBMIT_LEAD_FORM: &str = "submit_lead_form";

/// Appended to every FAQ answer
pub const CONFIRMATION_SUFFIX: &str = "  Can I help you with anything else? (Yes/No)";

/// Asks for contact details before lead collection
pub const HANDOFF: &str = "Thank you for your query. Please provide your details, and a member of our team will be in touch shortly.";

/// Greeting fallback when no FAQ entry matches
pub const NOT_UNDERSTOOD: &str = "I'm sorry, I don't understand that. Please select one of the options or type 'Other Queries' for more assistance.";

/// Reply to "yes" after an FAQ answer
pub const HELP_AGAIN: &str = "Great! How else can I help you?";

/// Reply to "no" after an FAQ answer; the conversation ends
pub const CLOSING: &str = "Thank you for chatting with me. Have a great day!";

/// Re-prompt when the confirmation is neither yes nor no
pub const YES_NO_REPROMPT: &str =
    "I'm sorry, I didn't understand that. Can I help you with anything else? (Yes/No)";

/// Confirmation once a lead is stored
pub const LEAD_RECORDED: &str = "Thank you! A member of our team will contact you shortly. for further details Mail id:info@redswitchglobal.com, Contact number: +91 9831076943, +91 7977167595.";

/// Retry prompt when the lead could not be stored
pub const LEAD_FAILED: &str =
    "There was an error submitting your details. Please try again or contact us directly.";

/// Prompt while the lead form is incomplete
pub const DETAILS_REQUIRED: &str =
    "Please provide all the required details to get a personalized response.";

/// Dialog position, echoed by the caller as an integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversationState {
    Greeting,
    AwaitingConfirmation,
    CollectingLead,
    Ended,
}

impl ConversationState {
    /// All states in wire order
    pub const ALL: [Self; 4] = [
        Self::Greeting,
        Self::AwaitingConfirmation,
        Self::CollectingLead,
        Self::Ended,
    ];

    /// Wire code of the state
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Greeting => 0,
            Self::AwaitingConfirmation => 1,
            Self::CollectingLead => 2,
            Self::Ended => 3,
        }
    }

    /// State for a wire code; `None` for codes outside 0..=3
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Greeting),
            1 => Some(Self::AwaitingConfirmation),
            2 => Some(Self::CollectingLead),
            3 => Some(Self::Ended),
            _ => None,
        }
    }

    /// Whether no further input can change the state
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Ended)
    }
}

/// Text to show the visitor together with the state to echo next time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub response: String,
    pub next: ConversationState,
}

impl Reply {
    fn new(response: impl Into<String>, next: ConversationState) -> Self {
        Self {
            response: response.into(),
            next,
        }
    }
}

/// Outcome of a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Answer immediately
    Reply(Reply),
    /// A complete lead form was submitted and must be stored before replying
    SubmitLead(Lead),
}

/// Decide the next step for a message in the given state
///
/// Pure: no I/O happens here. `user_data` is only read while collecting a lead.
#[must_use]
pub fn transition(
    faq: &FaqTable,
    state: ConversationState,
    message: &str,
    user_data: &UserData,
) -> Step {
    use ConversationState::{AwaitingConfirmation, CollectingLead, Ended, Greeting};

    let message = normalize(message);

    let reply = match state {
        Greeting => {
            if message == OTHER_QUERIES || message == IDLE_TIMEOUT {
                Reply::new(HANDOFF, CollectingLead)
            } else if let Some(answer) = faq.lookup(&message) {
                Reply::new(format!("{answer}{CONFIRMATION_SUFFIX}"), AwaitingConfirmation)
            } else {
                Reply::new(NOT_UNDERSTOOD, Greeting)
            }
        }
        AwaitingConfirmation => match message.as_str() {
            "yes" => Reply::new(HELP_AGAIN, Greeting),
            "no" => Reply::new(CLOSING, Ended),
            _ => Reply::new(YES_NO_REPROMPT, AwaitingConfirmation),
        },
        CollectingLead => {
            if message == SUBMIT_LEAD_FORM {
                if let Some(lead) = user_data.to_lead() {
                    return Step::SubmitLead(lead);
                }
            }
            Reply::new(DETAILS_REQUIRED, CollectingLead)
        }
        Ended => Reply::new("", Ended),
    };

    Step::Reply(reply)
}

/// Runs transitions and carries out lead submissions
#[derive(Clone)]
pub struct Conversation {
    faq: std::sync::Arc<FaqTable>,
    leads: LeadSinks,
}

impl Conversation {
    #[must_use]
    pub fn new(faq: std::sync::Arc<FaqTable>, leads: LeadSinks) -> Self {
        Self { faq, leads }
    }

    /// FAQ table in use
    #[must_use]
    pub fn faq(&self) -> &FaqTable {
        &self.faq
    }

    /// Lead sinks in use
    #[must_use]
    pub fn leads(&self) -> &LeadSinks {
        &self.leads
    }

    /// Produce the reply for a message, storing a lead when one is submitted
    ///
    /// Storage failures keep the conversation in lead collection so the
    /// visitor can retry.
    pub async fn respond(
        &self,
        state: ConversationState,
        message: &str,
        user_data: &UserData,
    ) -> Reply {
        match transition(&self.faq, state, message, user_data) {
            Step::Reply(reply) => reply,
            Step::SubmitLead(lead) => {
                let record = lead.stamp_now();
                match self.leads.append(&record).await {
                    Ok(()) => Reply::new(LEAD_RECORDED, ConversationState::Greeting),
                    Err(_) => Reply::new(LEAD_FAILED, ConversationState::CollectingLead),
                }
            }
        }
    }
}
