//! Abstract outbound prompts
//!
//! The rendering layer turns these into platform payloads; the core never
//! builds platform-specific messages.

use serde::{Deserialize, Serialize};

/// A single outbound message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Prompt {
    /// Plain free-text message
    Text { text: String },

    /// Message with a fixed menu of labeled choices
    Selector {
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subtitle: Option<String>,
        choices: Vec<Choice>,
    },

    /// Summary awaiting accept or restart
    Confirmation {
        title: String,
        summary: String,
        accept: Choice,
        restart: Choice,
    },

    /// Menu price lines
    PriceListing { lines: Vec<String> },
}

impl Prompt {
    pub fn text(text: impl Into<String>) -> Self {
        Prompt::Text { text: text.into() }
    }

    pub fn selector(title: impl Into<String>, choices: Vec<Choice>) -> Self {
        Prompt::Selector {
            title: title.into(),
            subtitle: None,
            choices,
        }
    }

    #[must_use]
    pub fn with_subtitle(self, subtitle: impl Into<String>) -> Self {
        match self {
            Prompt::Selector { title, choices, .. } => Prompt::Selector {
                title,
                subtitle: Some(subtitle.into()),
                choices,
            },
            other => other,
        }
    }

    /// Title or text, for logging and assertions
    pub fn headline(&self) -> &str {
        match self {
            Prompt::Text { text } => text,
            Prompt::Selector { title, .. } | Prompt::Confirmation { title, .. } => title,
            Prompt::PriceListing { lines } => lines.first().map_or("", String::as_str),
        }
    }
}

/// A labeled choice on a selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,
    #[serde(flatten)]
    pub action: ChoiceAction,
}

/// What selecting a choice sends back
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ChoiceAction {
    /// Control action carrying a discriminator payload
    Postback { data: String },
    /// Sends the given text as if typed
    Message { text: String },
    /// Opens a date picker; the chosen date comes back as a control action
    DatePicker { data: String },
    /// Opens a time picker
    TimePicker { data: String },
    /// External link
    Link { uri: String },
}

impl Choice {
    pub fn postback(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: ChoiceAction::Postback { data: data.into() },
        }
    }

    pub fn message(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: ChoiceAction::Message { text: text.into() },
        }
    }

    pub fn date_picker(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: ChoiceAction::DatePicker { data: data.into() },
        }
    }

    pub fn time_picker(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: ChoiceAction::TimePicker { data: data.into() },
        }
    }

    pub fn link(label: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: ChoiceAction::Link { uri: uri.into() },
        }
    }
}
