//! API request and response types

use crate::inbound::InboundEvent;
use crate::prompt::Prompt;
use serde::{Deserialize, Serialize};

/// A batch of normalized inbound events
#[derive(Debug, Deserialize, Serialize)]
pub struct EventBatchRequest {
    pub events: Vec<InboundEvent>,
}

/// Replies in the same order as the request's events
#[derive(Debug, Serialize, Deserialize)]
pub struct EventBatchResponse {
    pub replies: Vec<EventReply>,
}

/// Reply to one inbound event; `prompts` is empty when the event gets no answer
#[derive(Debug, Serialize, Deserialize)]
pub struct EventReply {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    pub prompts: Vec<Prompt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MenuQuery {
    pub length: Option<String>,
}

/// Rendered listing for one branch and category
#[derive(Debug, Serialize, Deserialize)]
pub struct MenuListingResponse {
    pub branch: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<String>,
    /// Length codes to choose from when the category is priced by length
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lengths: Vec<String>,
    pub lines: Vec<String>,
}

/// Generic success response
#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
