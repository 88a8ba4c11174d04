//! Pure booking transition function
//!
//! Given the same session, context and event it always produces the same
//! new session and effects. All I/O happens in the runtime.

use super::prompts::{completion_prompts, step_prompts};
use super::state::{
    BookingDate, BookingStep, BookingTime, ConfirmedBooking, DialogContext, Discount, PhoneNumber,
    Session,
};
use super::{BookingAction, Effect, Event};
use crate::branch::Branch;
use crate::i18n::Language;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_session: Session,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(session: Session) -> Self {
        Self {
            new_session: session,
            effects: vec![],
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    #[must_use]
    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }

    /// Prompts among the effects, in emission order
    pub fn replies(&self) -> impl Iterator<Item = &crate::prompt::Prompt> {
        self.effects.iter().filter_map(Effect::as_reply)
    }
}

/// Events the dialog declines to handle
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("No booking in progress")]
    NotStarted,
    #[error("Booking already completed")]
    AlreadyCompleted,
}

/// Pure transition function
pub fn transition(
    session: &Session,
    context: &DialogContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    // A start trigger resets from anywhere, including before start and after completion
    if event == Event::Start {
        return Ok(restart());
    }

    let step = match session.step {
        None => return Err(TransitionError::NotStarted),
        Some(BookingStep::Completed) => return Err(TransitionError::AlreadyCompleted),
        Some(step) => step,
    };

    let result = match (step, event) {
        // ============================================================
        // Language
        // ============================================================
        (BookingStep::PickLanguage, Event::Action(BookingAction::Language(code))) => {
            match Language::from_code(&code) {
                Some(lang) => advance(session, |s| s.language = Some(lang)),
                None => reprompt(session, step),
            }
        }
        (BookingStep::PickLanguage, Event::Text(text)) => {
            let lang = Language::from_free_text(&text);
            advance(session, |s| s.language = Some(lang))
        }

        // ============================================================
        // Branch
        // ============================================================
        (BookingStep::PickBranch, Event::Action(BookingAction::Branch(id))) => {
            accept(session, step, Branch::from_id(&id), |s, b| s.fields.branch = Some(b))
        }
        (BookingStep::PickBranch, Event::Text(text)) => {
            accept(session, step, Branch::from_free_text(&text), |s, b| {
                s.fields.branch = Some(b);
            })
        }

        // ============================================================
        // Date and time
        // ============================================================
        (BookingStep::PickDate, Event::Action(BookingAction::DatePicked(value))) => {
            accept(session, step, BookingDate::from_picker(&value), |s, d| {
                s.fields.date = Some(d);
            })
        }
        (BookingStep::PickDate, Event::Text(text)) => {
            accept(session, step, BookingDate::parse_text(&text), |s, d| {
                s.fields.date = Some(d);
            })
        }
        (BookingStep::PickTime, Event::Action(BookingAction::TimePicked(value))) => {
            accept(session, step, BookingTime::from_picker(&value), |s, t| {
                s.fields.time = Some(t);
            })
        }
        (BookingStep::PickTime, Event::Text(text)) => {
            accept(session, step, BookingTime::parse_text(&text), |s, t| {
                s.fields.time = Some(t);
            })
        }

        // ============================================================
        // Free-text answers
        // ============================================================
        (BookingStep::PickService, Event::Text(text)) => {
            accept(session, step, non_empty(&text), |s, v| s.fields.service = Some(v))
        }
        (BookingStep::AskName, Event::Text(text)) => {
            accept(session, step, non_empty(&text), |s, v| s.fields.name = Some(v))
        }
        (BookingStep::AskPhone, Event::Text(text)) => {
            accept(session, step, PhoneNumber::parse(&text), |s, p| {
                s.fields.phone = Some(p);
            })
        }
        (BookingStep::AskDiscount, Event::Text(text)) => {
            let discount = Discount::parse(&text);
            advance(session, |s| s.fields.discount = Some(discount))
        }

        // ============================================================
        // Confirmation
        // ============================================================
        (BookingStep::Confirm, Event::Action(BookingAction::Confirm)) => {
            let mut completed = session.clone();
            completed.step = Some(BookingStep::Completed);
            let booking = ConfirmedBooking {
                user_id: context.user_id.clone(),
                language: completed.language_or_base(),
                fields: completed.fields.clone(),
            };
            let prompts = completion_prompts(&completed);
            TransitionResult::new(completed)
                .with_effect(Effect::PersistSession)
                .with_effects(Effect::replies(prompts))
                .with_effect(Effect::HandOff(booking))
        }
        (BookingStep::Confirm, Event::Action(BookingAction::Restart)) => restart(),

        // Anything else leaves the step unchanged and asks again
        (step, _) => reprompt(session, step),
    };

    Ok(result)
}

/// Brand-new session at language selection
fn restart() -> TransitionResult {
    let session = Session::begin();
    let prompts = step_prompts(BookingStep::PickLanguage, &session);
    TransitionResult::new(session)
        .with_effect(Effect::ResetSession)
        .with_effect(Effect::PersistSession)
        .with_effects(Effect::replies(prompts))
}

/// Apply `update`, move to the next step and ask for its input
fn advance(session: &Session, update: impl FnOnce(&mut Session)) -> TransitionResult {
    let mut next = session.clone();
    update(&mut next);
    next.step = next.step.and_then(BookingStep::next);
    let prompts = next
        .step
        .map(|step| step_prompts(step, &next))
        .unwrap_or_default();
    TransitionResult::new(next)
        .with_effect(Effect::PersistSession)
        .with_effects(Effect::replies(prompts))
}

/// Advance with a validated value, or re-prompt the same step
fn accept<T>(
    session: &Session,
    step: BookingStep,
    value: Option<T>,
    store: impl FnOnce(&mut Session, T),
) -> TransitionResult {
    match value {
        Some(value) => advance(session, |s| store(s, value)),
        None => reprompt(session, step),
    }
}

/// Stay put and emit the step's prompt again
fn reprompt(session: &Session, step: BookingStep) -> TransitionResult {
    TransitionResult::new(session.clone()).with_effects(Effect::replies(step_prompts(step, session)))
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
