//! Booking session state types

use crate::branch::Branch;
use crate::i18n::Language;
use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

/// Shortest accepted phone number, counting a leading `+`
pub const MIN_PHONE_LEN: usize = 7;

static DATE_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date pattern"));
static TIME_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}:\d{2}$").expect("valid time pattern"));

// ============================================================================
// Booking Steps
// ============================================================================

/// Data-collection steps, in strict forward order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStep {
    PickLanguage,
    PickBranch,
    PickDate,
    PickTime,
    PickService,
    AskName,
    AskPhone,
    AskDiscount,
    Confirm,
    Completed,
}

impl BookingStep {
    /// The step that follows this one, `None` once completed
    pub fn next(self) -> Option<BookingStep> {
        match self {
            BookingStep::PickLanguage => Some(BookingStep::PickBranch),
            BookingStep::PickBranch => Some(BookingStep::PickDate),
            BookingStep::PickDate => Some(BookingStep::PickTime),
            BookingStep::PickTime => Some(BookingStep::PickService),
            BookingStep::PickService => Some(BookingStep::AskName),
            BookingStep::AskName => Some(BookingStep::AskPhone),
            BookingStep::AskPhone => Some(BookingStep::AskDiscount),
            BookingStep::AskDiscount => Some(BookingStep::Confirm),
            BookingStep::Confirm => Some(BookingStep::Completed),
            BookingStep::Completed => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BookingStep::PickLanguage => "pick_language",
            BookingStep::PickBranch => "pick_branch",
            BookingStep::PickDate => "pick_date",
            BookingStep::PickTime => "pick_time",
            BookingStep::PickService => "pick_service",
            BookingStep::AskName => "ask_name",
            BookingStep::AskPhone => "ask_phone",
            BookingStep::AskDiscount => "ask_discount",
            BookingStep::Confirm => "confirm",
            BookingStep::Completed => "completed",
        }
    }
}

// ============================================================================
// Collected Values
// ============================================================================

/// Preferred calendar date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingDate(NaiveDate);

impl BookingDate {
    /// Typed text must be exactly `YYYY-MM-DD` and a real date
    pub fn parse_text(text: &str) -> Option<Self> {
        let text = text.trim();
        if !DATE_TEXT.is_match(text) {
            return None;
        }
        NaiveDate::parse_from_str(text, DATE_FORMAT).ok().map(Self)
    }

    /// Value delivered by a date picker
    pub fn from_picker(value: &str) -> Option<Self> {
        NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
            .ok()
            .map(Self)
    }
}

impl fmt::Display for BookingDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

/// Preferred time of day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingTime(NaiveTime);

impl BookingTime {
    /// Typed text must be exactly `HH:MM` and a real time of day
    pub fn parse_text(text: &str) -> Option<Self> {
        let text = text.trim();
        if !TIME_TEXT.is_match(text) {
            return None;
        }
        NaiveTime::parse_from_str(text, TIME_FORMAT).ok().map(Self)
    }

    /// Value delivered by a time picker or quick option
    pub fn from_picker(value: &str) -> Option<Self> {
        NaiveTime::parse_from_str(value.trim(), TIME_FORMAT)
            .ok()
            .map(Self)
    }
}

impl fmt::Display for BookingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIME_FORMAT))
    }
}

/// Contact number stripped to digits and an optional leading `+`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn parse(text: &str) -> Option<Self> {
        let mut stripped = String::with_capacity(text.len());
        for c in text.chars() {
            if c.is_ascii_digit() || (c == '+' && stripped.is_empty()) {
                stripped.push(c);
            }
        }
        (stripped.chars().count() >= MIN_PHONE_LEN).then_some(Self(stripped))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Discount answer; `None` on the field means not yet asked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "code", rename_all = "snake_case")]
pub enum Discount {
    NoDiscount,
    Code(String),
}

impl Discount {
    pub fn parse(text: &str) -> Self {
        let code = text.trim();
        if code.is_empty() || crate::i18n::is_negation(code) {
            Discount::NoDiscount
        } else {
            Discount::Code(code.to_string())
        }
    }
}

/// Fields collected during a booking attempt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingFields {
    pub branch: Option<Branch>,
    pub date: Option<BookingDate>,
    pub time: Option<BookingTime>,
    pub service: Option<String>,
    pub name: Option<String>,
    pub phone: Option<PhoneNumber>,
    pub discount: Option<Discount>,
}

impl BookingFields {
    /// Human-readable summary block
    pub fn summary(&self, header: &str) -> String {
        fn or_dash<T: ToString>(value: Option<&T>) -> String {
            value.map_or_else(|| "-".to_string(), ToString::to_string)
        }

        let discount = match &self.discount {
            Some(Discount::Code(code)) => code.clone(),
            Some(Discount::NoDiscount) | None => "—".to_string(),
        };

        [
            format!("{header}:"),
            format!("• Branch: {}", or_dash(self.branch.as_ref())),
            format!("• Date: {}", or_dash(self.date.as_ref())),
            format!("• Time: {}", or_dash(self.time.as_ref())),
            format!("• Menu: {}", or_dash(self.service.as_ref())),
            format!("• Name: {}", or_dash(self.name.as_ref())),
            format!("• Phone: {}", or_dash(self.phone.as_ref())),
            format!("• Discount: {discount}"),
        ]
        .join("\n")
    }
}

// ============================================================================
// Session
// ============================================================================

/// Per-user conversation state for one booking attempt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub language: Option<Language>,
    /// Absent until a start trigger is recognised
    pub step: Option<BookingStep>,
    #[serde(default)]
    pub fields: BookingFields,
}

impl Session {
    /// Fresh session positioned at language selection
    pub fn begin() -> Self {
        Self {
            language: None,
            step: Some(BookingStep::PickLanguage),
            fields: BookingFields::default(),
        }
    }

    pub fn started(&self) -> bool {
        self.step.is_some()
    }

    pub fn completed(&self) -> bool {
        self.step == Some(BookingStep::Completed)
    }

    pub fn language_or_base(&self) -> Language {
        self.language.unwrap_or(Language::BASE)
    }
}

/// Context for a dialog (immutable per event)
#[derive(Debug, Clone)]
pub struct DialogContext {
    pub user_id: String,
}

impl DialogContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// A confirmed booking handed off for follow-up by staff
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmedBooking {
    pub user_id: String,
    pub language: Language,
    pub fields: BookingFields,
}
