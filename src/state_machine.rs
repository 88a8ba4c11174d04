//! Booking dialog state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.

mod effect;
pub mod event;
pub mod prompts;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::{BookingAction, Event};
pub use state::{BookingStep, ConfirmedBooking, DialogContext, Session};
pub use transition::{transition, TransitionError, TransitionResult};
