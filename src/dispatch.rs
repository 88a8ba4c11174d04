//! Trigger dispatch
//!
//! Classifies every inbound event before any sub-flow sees it. Triggers are
//! rows of `{language, pattern}` derived from the language table.

use crate::i18n::{Language, LANGUAGES};
use crate::inbound::{EventKind, InboundEvent};
use crate::menu::MenuAction;
use crate::state_machine::BookingAction;
use regex::Regex;

/// Kind of trigger a row recognises
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    StartBooking,
    Menu,
}

#[derive(Debug, Clone)]
struct TriggerRow {
    language: Language,
    kind: TriggerKind,
    pattern: Regex,
}

/// How an inbound event should be handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Follow,
    /// Start trigger; `language` is the row that matched
    StartBooking { language: Language },
    MenuTrigger,
    MenuAction(MenuAction),
    BookingAction(BookingAction),
    FreeText(String),
}

/// Exact-match trigger table
#[derive(Debug, Clone)]
pub struct TriggerTable {
    rows: Vec<TriggerRow>,
}

/// Whole-message, case-insensitive, whitespace-tolerant match for one word
fn exact_pattern(word: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"(?i)^\s*{}\s*$", regex::escape(word)))
}

impl TriggerTable {
    pub fn new() -> Result<Self, regex::Error> {
        let mut rows = Vec::with_capacity(LANGUAGES.len() * 2);
        for profile in LANGUAGES {
            rows.push(TriggerRow {
                language: profile.language,
                kind: TriggerKind::StartBooking,
                pattern: exact_pattern(profile.start_trigger)?,
            });
            rows.push(TriggerRow {
                language: profile.language,
                kind: TriggerKind::Menu,
                pattern: exact_pattern(profile.menu_trigger)?,
            });
        }
        Ok(Self { rows })
    }

    /// First row of `kind` matching the text
    pub fn matches(&self, kind: TriggerKind, text: &str) -> Option<Language> {
        self.rows
            .iter()
            .find(|row| row.kind == kind && row.pattern.is_match(text))
            .map(|row| row.language)
    }

    /// Classify by precedence: start trigger, menu trigger, control action
    /// for the owning sub-flow, then free text
    pub fn classify(&self, event: &InboundEvent) -> Dispatch {
        match &event.kind {
            EventKind::Follow => Dispatch::Follow,
            EventKind::Text { text } => {
                if let Some(language) = self.matches(TriggerKind::StartBooking, text) {
                    Dispatch::StartBooking { language }
                } else if self.matches(TriggerKind::Menu, text).is_some() {
                    Dispatch::MenuTrigger
                } else {
                    Dispatch::FreeText(text.clone())
                }
            }
            EventKind::Action { data, params } => match MenuAction::parse(data) {
                Some(action) => Dispatch::MenuAction(action),
                None => Dispatch::BookingAction(BookingAction::parse(
                    data,
                    params.date.as_deref(),
                    params.time.as_deref(),
                )),
            },
        }
    }
}
