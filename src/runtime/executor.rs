//! Dialog controller and per-user runtime loop

use super::traits::{BookingSink, SessionStore, StoreError};
use crate::config::NudgePolicy;
use crate::cooldown::{Clock, CooldownGuard, SystemClock, TriggerCategory};
use crate::dispatch::{Dispatch, TriggerTable};
use crate::i18n::HELP_NUDGE;
use crate::inbound::InboundEvent;
use crate::menu::MenuFlow;
use crate::prompt::Prompt;
use crate::state_machine::prompts::follow_prompts;
use crate::state_machine::{
    transition, BookingStep, DialogContext, Effect, Event, TransitionError, TransitionResult,
};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// How many recent event ids each user runtime remembers
pub const SEEN_EVENT_IDS: usize = 64;

/// Routes one inbound event to the owning sub-flow and executes the
/// resulting effects
pub struct DialogController<S, K, C = SystemClock>
where
    S: SessionStore,
    K: BookingSink,
    C: Clock,
{
    store: S,
    sink: K,
    triggers: TriggerTable,
    cooldown: CooldownGuard<C>,
    menu: MenuFlow,
    nudge: NudgePolicy,
}

impl<S, K, C> DialogController<S, K, C>
where
    S: SessionStore,
    K: BookingSink,
    C: Clock,
{
    pub fn new(
        store: S,
        sink: K,
        triggers: TriggerTable,
        cooldown: CooldownGuard<C>,
        menu: MenuFlow,
        nudge: NudgePolicy,
    ) -> Self {
        Self {
            store,
            sink,
            triggers,
            cooldown,
            menu,
            nudge,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn menu(&self) -> &MenuFlow {
        &self.menu
    }

    /// Handle one event to completion; the returned prompts are the reply
    pub async fn handle(&self, event: &InboundEvent) -> Vec<Prompt> {
        let user_id = event.user_id.as_str();
        let dispatch = self.triggers.classify(event);
        tracing::debug!(user_id, kind = event.kind_name(), ?dispatch, "Dispatching event");

        let replies = match dispatch {
            Dispatch::Follow => follow_prompts(),
            Dispatch::StartBooking { language } => {
                tracing::info!(user_id, trigger_language = language.code(), "Booking started");
                self.drive_booking(user_id, Event::Start, false).await
            }
            Dispatch::MenuTrigger => self.open_menu(user_id).await,
            Dispatch::MenuAction(action) => self.menu.on_action(&action),
            Dispatch::BookingAction(action) => {
                self.drive_booking(user_id, Event::Action(action), false)
                    .await
            }
            Dispatch::FreeText(text) => self.drive_booking(user_id, Event::Text(text), true).await,
        };

        tracing::debug!(
            user_id,
            replies = replies.len(),
            first = replies.first().map(Prompt::headline),
            "Event handled"
        );
        replies
    }

    async fn open_menu(&self, user_id: &str) -> Vec<Prompt> {
        if !self.cooldown.allow(user_id, TriggerCategory::Menu) {
            tracing::debug!(user_id, "Menu trigger within cooldown, ignoring");
            return vec![];
        }
        let known_branch = match self.store.get_or_create(user_id).await {
            Ok(session) => session.fields.branch,
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Could not read session for menu");
                None
            }
        };
        self.menu.on_trigger(known_branch)
    }

    async fn drive_booking(&self, user_id: &str, event: Event, nudge_if_idle: bool) -> Vec<Prompt> {
        let session = match self.store.get_or_create(user_id).await {
            Ok(session) => session,
            Err(e) => {
                tracing::error!(user_id, error = %e, "Failed to load session");
                return vec![];
            }
        };

        let context = DialogContext::new(user_id);
        match transition(&session, &context, event) {
            Ok(result) => {
                if result.new_session.step == session.step {
                    tracing::debug!(
                        user_id,
                        step = session.step.map(BookingStep::name),
                        prompts = result.replies().count(),
                        "Re-prompting current step"
                    );
                } else {
                    tracing::info!(
                        user_id,
                        from = session.step.map(BookingStep::name),
                        to = result.new_session.step.map(BookingStep::name),
                        "Booking step changed"
                    );
                }
                match self.execute_effects(user_id, result).await {
                    Ok(replies) => replies,
                    Err(e) => {
                        tracing::error!(user_id, error = %e, "Failed to apply session effects");
                        vec![]
                    }
                }
            }
            Err(TransitionError::NotStarted) if nudge_if_idle => match self.nudge {
                NudgePolicy::Always => vec![Prompt::text(HELP_NUDGE)],
                NudgePolicy::Silent => vec![],
            },
            Err(e) => {
                tracing::debug!(user_id, reason = %e, "Booking dialog ignored event");
                vec![]
            }
        }
    }

    /// Execute effects in order and collect replies
    async fn execute_effects(
        &self,
        user_id: &str,
        result: TransitionResult,
    ) -> Result<Vec<Prompt>, StoreError> {
        let TransitionResult {
            new_session,
            effects,
        } = result;
        let mut replies = Vec::new();

        for effect in effects {
            match effect {
                Effect::ResetSession => self.store.reset(user_id).await?,
                Effect::PersistSession => self.store.put(user_id, &new_session).await?,
                Effect::Reply(prompt) => replies.push(prompt),
                Effect::HandOff(booking) => {
                    if let Err(e) = self.sink.hand_off(&booking).await {
                        tracing::error!(user_id, error = %e, "Booking hand-off failed");
                    }
                }
            }
        }

        Ok(replies)
    }
}

/// Work queued on a user runtime
pub enum UserRequest {
    /// One event awaiting its reply
    Event {
        event: InboundEvent,
        reply_tx: oneshot::Sender<Vec<Prompt>>,
    },
    /// Delete the session and stop; requests queued behind it are dropped
    Forget {
        reply_tx: oneshot::Sender<Result<bool, StoreError>>,
    },
}

/// Serializes one user's events: each is fully handled, reply included,
/// before the next is taken off the channel
pub struct UserRuntime<S, K, C = SystemClock>
where
    S: SessionStore + 'static,
    K: BookingSink + 'static,
    C: Clock + 'static,
{
    user_id: String,
    controller: Arc<DialogController<S, K, C>>,
    request_rx: mpsc::Receiver<UserRequest>,
    seen_event_ids: VecDeque<String>,
}

impl<S, K, C> UserRuntime<S, K, C>
where
    S: SessionStore + 'static,
    K: BookingSink + 'static,
    C: Clock + 'static,
{
    pub fn new(
        user_id: impl Into<String>,
        controller: Arc<DialogController<S, K, C>>,
        request_rx: mpsc::Receiver<UserRequest>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            controller,
            request_rx,
            seen_event_ids: VecDeque::with_capacity(SEEN_EVENT_IDS),
        }
    }

    pub async fn run(mut self) {
        tracing::debug!(user_id = %self.user_id, "Starting user runtime");

        while let Some(request) = self.request_rx.recv().await {
            match request {
                UserRequest::Event { event, reply_tx } => {
                    let replies = if self.is_redelivery(&event) {
                        tracing::info!(
                            user_id = %self.user_id,
                            event_id = event.event_id.as_deref(),
                            "Dropping redelivered event"
                        );
                        vec![]
                    } else {
                        self.controller.handle(&event).await
                    };
                    if reply_tx.send(replies).is_err() {
                        tracing::debug!(user_id = %self.user_id, "Reply receiver dropped");
                    }
                }
                UserRequest::Forget { reply_tx } => {
                    // Closed before the delete so no sender sees an open channel afterwards
                    self.request_rx.close();
                    let deleted = self.controller.store().delete(&self.user_id).await;
                    if reply_tx.send(deleted).is_err() {
                        tracing::debug!(user_id = %self.user_id, "Forget receiver dropped");
                    }
                    self.drain().await;
                }
            }
        }

        tracing::debug!(user_id = %self.user_id, "User runtime stopped");
    }

    /// Drop whatever was queued after a forget; their callers see the
    /// reply sender go away
    async fn drain(&mut self) {
        let mut dropped = 0usize;
        while self.request_rx.recv().await.is_some() {
            dropped += 1;
        }
        if dropped > 0 {
            tracing::info!(user_id = %self.user_id, dropped, "Dropped requests queued after forget");
        }
    }

    /// Remember the event id; true if it was already seen
    fn is_redelivery(&mut self, event: &InboundEvent) -> bool {
        let Some(event_id) = &event.event_id else {
            return false;
        };
        if self.seen_event_ids.contains(event_id) {
            return true;
        }
        if self.seen_event_ids.len() == SEEN_EVENT_IDS {
            self.seen_event_ids.pop_front();
        }
        self.seen_event_ids.push_back(event_id.clone());
        false
    }
}
