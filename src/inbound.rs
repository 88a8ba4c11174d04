//! Normalized inbound events
//!
//! The transport layer (webhook parsing, signature checks) turns platform
//! payloads into these before they reach the dialog controller.

use serde::{Deserialize, Serialize};

/// One event from one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    pub user_id: String,
    /// Transport delivery id, used to drop redeliveries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(flatten)]
    pub kind: EventKind,
}

/// What happened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    /// Typed text message
    Text { text: String },
    /// Structured control action (button, picker)
    Action {
        data: String,
        #[serde(default)]
        params: ActionParams,
    },
    /// The user added the bot
    Follow,
}

/// Structured picker values attached to a control action
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

/// Builders for transports and tests
#[cfg(test)]
impl InboundEvent {
    pub fn text(user_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            event_id: None,
            kind: EventKind::Text { text: text.into() },
        }
    }

    pub fn action(user_id: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            event_id: None,
            kind: EventKind::Action {
                data: data.into(),
                params: ActionParams::default(),
            },
        }
    }

    pub fn follow(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            event_id: None,
            kind: EventKind::Follow,
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: ActionParams) -> Self {
        if let EventKind::Action { params: p, .. } = &mut self.kind {
            *p = params;
        }
        self
    }

    #[must_use]
    pub fn with_event_id(mut self, event_id: impl Into<String>) -> Self {
        self.event_id = Some(event_id.into());
        self
    }
}

impl InboundEvent {
    /// Short label for logs
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            EventKind::Text { .. } => "text",
            EventKind::Action { .. } => "action",
            EventKind::Follow => "follow",
        }
    }
}
