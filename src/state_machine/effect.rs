//! Effects produced by booking transitions

use crate::prompt::Prompt;
use crate::state_machine::state::ConfirmedBooking;

/// Effects to be executed after a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Discard the stored session before persisting the new one
    ResetSession,

    /// Persist the new session
    PersistSession,

    /// Send a prompt to the user
    Reply(Prompt),

    /// Hand a confirmed booking to staff follow-up
    HandOff(ConfirmedBooking),
}

impl Effect {
    pub fn reply(prompt: Prompt) -> Self {
        Effect::Reply(prompt)
    }

    pub fn replies(prompts: impl IntoIterator<Item = Prompt>) -> impl Iterator<Item = Effect> {
        prompts.into_iter().map(Effect::Reply)
    }

    pub fn as_reply(&self) -> Option<&Prompt> {
        match self {
            Effect::Reply(prompt) => Some(prompt),
            _ => None,
        }
    }
}
