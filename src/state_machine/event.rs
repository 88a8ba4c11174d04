//! Events that drive the booking dialog

/// Events that trigger booking transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A start trigger was recognised; always resets the session
    Start,

    /// Free text typed by the user
    Text(String),

    /// A control action addressed to the booking dialog
    Action(BookingAction),
}

/// Control actions understood by the booking dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingAction {
    /// `lang=<code>`
    Language(String),
    /// `branch=<id>`
    Branch(String),
    /// Date picker result
    DatePicked(String),
    /// Time picker result
    TimePicked(String),
    /// `confirm=yes`
    Confirm,
    /// `confirm=restart`
    Restart,
    /// Any payload this dialog does not recognise
    Other(String),
}

impl BookingAction {
    /// Parse a control action payload plus picker params
    pub fn parse(data: &str, date: Option<&str>, time: Option<&str>) -> Self {
        if let Some(date) = date {
            return BookingAction::DatePicked(date.to_string());
        }
        if let Some(time) = time {
            return BookingAction::TimePicked(time.to_string());
        }

        let (key, value) = data.split_once('=').unwrap_or((data, ""));
        match (key, value) {
            ("lang", code) => BookingAction::Language(code.to_string()),
            ("branch", id) => BookingAction::Branch(id.replace("%20", " ")),
            ("confirm", "yes") => BookingAction::Confirm,
            ("confirm", "restart") => BookingAction::Restart,
            _ => BookingAction::Other(data.to_string()),
        }
    }
}
