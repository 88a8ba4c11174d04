//! Mock implementations for testing
//!
//! These mocks drive the full dialog stack without real I/O or wall-clock
//! time.

use super::traits::*;
use super::{DialogController, RuntimeManager};
use crate::config::NudgePolicy;
use crate::cooldown::{Clock, CooldownGuard, DEFAULT_WINDOW};
use crate::dispatch::TriggerTable;
use crate::inbound::{ActionParams, InboundEvent};
use crate::menu::{MenuFlow, MenuPricingTable, MenuResolver};
use crate::prompt::Prompt;
use crate::state_machine::{ConfirmedBooking, Session};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

// ============================================================================
// Manual Clock
// ============================================================================

/// Clock that only moves when told to
#[derive(Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap()
    }
}

// ============================================================================
// Mock Booking Sink
// ============================================================================

/// Sink that records every hand-off
#[derive(Default)]
pub struct RecordingSink {
    pub bookings: Mutex<Vec<ConfirmedBooking>>,
}

impl RecordingSink {
    pub fn recorded(&self) -> Vec<ConfirmedBooking> {
        self.bookings.lock().unwrap().clone()
    }
}

#[async_trait]
impl BookingSink for RecordingSink {
    async fn hand_off(&self, booking: &ConfirmedBooking) -> Result<(), String> {
        self.bookings.lock().unwrap().push(booking.clone());
        Ok(())
    }
}

// ============================================================================
// Failing Store
// ============================================================================

/// Store whose every operation fails
pub struct FailingStore;

#[async_trait]
impl SessionStore for FailingStore {
    async fn get_or_create(&self, _user_id: &str) -> Result<Session, StoreError> {
        Err(StoreError::Unavailable("disk on fire".to_string()))
    }

    async fn put(&self, _user_id: &str, _session: &Session) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("disk on fire".to_string()))
    }

    async fn reset(&self, _user_id: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("disk on fire".to_string()))
    }

    async fn delete(&self, _user_id: &str) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("disk on fire".to_string()))
    }
}

// ============================================================================
// Test Harness
// ============================================================================

pub fn bundled_menu() -> MenuFlow {
    let table = MenuPricingTable::from_json(include_str!("../../data/menu.json")).unwrap();
    MenuFlow::new(MenuResolver::new(Arc::new(table)))
}

/// Full stack over mocks
pub struct Harness {
    pub manager: RuntimeManager<Arc<InMemorySessionStore>, Arc<RecordingSink>, ManualClock>,
    pub store: Arc<InMemorySessionStore>,
    pub sink: Arc<RecordingSink>,
    pub clock: ManualClock,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_nudge(NudgePolicy::Always)
    }

    pub fn with_nudge(nudge: NudgePolicy) -> Self {
        let store = Arc::new(InMemorySessionStore::new());
        let sink = Arc::new(RecordingSink::default());
        let clock = ManualClock::new();
        let controller = DialogController::new(
            Arc::clone(&store),
            Arc::clone(&sink),
            TriggerTable::new().unwrap(),
            CooldownGuard::with_clock(DEFAULT_WINDOW, clock.clone()),
            bundled_menu(),
            nudge,
        );
        Self {
            manager: RuntimeManager::new(controller),
            store,
            sink,
            clock,
        }
    }

    pub async fn send(&self, event: InboundEvent) -> Vec<Prompt> {
        self.manager.dispatch(event).await.unwrap()
    }

    pub async fn say(&self, user_id: &str, text: &str) -> Vec<Prompt> {
        self.send(InboundEvent::text(user_id, text)).await
    }

    pub async fn press(&self, user_id: &str, data: &str) -> Vec<Prompt> {
        self.send(InboundEvent::action(user_id, data)).await
    }

    pub async fn session(&self, user_id: &str) -> Session {
        self.store.get_or_create(user_id).await.unwrap()
    }

    /// Walk a user through every step up to the confirmation prompt
    pub async fn fill_booking(&self, user_id: &str) -> Vec<Prompt> {
        self.say(user_id, "book").await;
        self.press(user_id, "lang=en").await;
        self.press(user_id, "branch=THONGLO").await;
        self.send(
            InboundEvent::action(user_id, "date=pick").with_params(ActionParams {
                date: Some("2025-03-05".to_string()),
                time: None,
            }),
        )
        .await;
        self.say(user_id, "09:00").await;
        self.say(user_id, "Full Color").await;
        self.say(user_id, "Jane Doe").await;
        self.say(user_id, "+66 81 234 5678").await;
        self.say(user_id, "no").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branch::Branch;
    use crate::i18n::{Language, HELP_NUDGE};
    use crate::state_machine::state::{BookingDate, BookingTime, Discount, PhoneNumber};
    use crate::runtime::UserRequest;
    use crate::state_machine::BookingStep;
    use tokio::sync::oneshot;

    const MENU_BRANCH_TITLE: &str = "Choose a branch / เลือกสาขา / 店舗を選択";

    fn headlines(prompts: &[Prompt]) -> Vec<&str> {
        prompts.iter().map(Prompt::headline).collect()
    }

    #[tokio::test]
    async fn test_full_booking_flow() {
        let h = Harness::new();
        let prompts = h.fill_booking("U1").await;
        assert!(matches!(prompts[0], Prompt::Confirmation { .. }));
        assert_eq!(h.session("U1").await.step, Some(BookingStep::Confirm));

        let prompts = h.press("U1", "confirm=yes").await;
        assert_eq!(prompts.len(), 4);
        assert!(prompts[0].headline().starts_with("Booking received"));

        let booked = h.sink.recorded();
        assert_eq!(booked.len(), 1);
        let fields = &booked[0].fields;
        assert_eq!(booked[0].user_id, "U1");
        assert_eq!(booked[0].language, Language::En);
        assert_eq!(fields.branch, Some(Branch::ThongLo));
        assert_eq!(fields.date, BookingDate::parse_text("2025-03-05"));
        assert_eq!(fields.time, BookingTime::parse_text("09:00"));
        assert_eq!(fields.service.as_deref(), Some("Full Color"));
        assert_eq!(fields.name.as_deref(), Some("Jane Doe"));
        assert_eq!(fields.phone, PhoneNumber::parse("+66812345678"));
        assert_eq!(fields.discount, Some(Discount::NoDiscount));
    }

    #[tokio::test]
    async fn test_completed_session_is_silent() {
        let h = Harness::new();
        h.fill_booking("U1").await;
        h.press("U1", "confirm=yes").await;

        assert!(h.say("U1", "hello?").await.is_empty());
        assert!(h.press("U1", "confirm=yes").await.is_empty());
        assert!(h.press("U1", "lang=th").await.is_empty());
        assert_eq!(h.sink.recorded().len(), 1, "no second hand-off");

        let prompts = h.say("U1", "book").await;
        assert_eq!(prompts.len(), 2);
        assert_eq!(h.session("U1").await, Session::begin());
    }

    #[tokio::test]
    async fn test_start_trigger_resets_mid_flow() {
        let h = Harness::new();
        h.say("U1", "book").await;
        h.press("U1", "lang=ja").await;
        h.press("U1", "branch=PHROMPHONG").await;
        assert_eq!(h.session("U1").await.step, Some(BookingStep::PickDate));

        let prompts = h.say("U1", "  予約 ").await;
        assert_eq!(headlines(&prompts)[1], "Choose your language");
        assert_eq!(h.session("U1").await, Session::begin());
    }

    #[tokio::test]
    async fn test_restart_from_confirmation() {
        let h = Harness::new();
        h.fill_booking("U1").await;
        let prompts = h.press("U1", "confirm=restart").await;
        assert_eq!(prompts.len(), 2);
        assert_eq!(h.session("U1").await, Session::begin());
        assert!(h.sink.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_phone_validation_reprompts() {
        let h = Harness::new();
        h.say("U1", "book").await;
        h.press("U1", "lang=en").await;
        h.press("U1", "branch=THONGLO").await;
        h.say("U1", "2025-03-05").await;
        h.say("U1", "13:00").await;
        h.say("U1", "Toner").await;
        h.say("U1", "Jane").await;

        let prompts = h.say("U1", "12-34").await;
        assert_eq!(headlines(&prompts), vec!["What is your contact phone number?"]);
        assert_eq!(h.session("U1").await.step, Some(BookingStep::AskPhone));

        h.say("U1", "+66812345678").await;
        let session = h.session("U1").await;
        assert_eq!(session.step, Some(BookingStep::AskDiscount));
        assert_eq!(session.fields.phone, PhoneNumber::parse("+66812345678"));
    }

    #[tokio::test]
    async fn test_date_validation_reprompts() {
        let h = Harness::new();
        h.say("U1", "book").await;
        h.press("U1", "lang=en").await;
        h.press("U1", "branch=THONGLO").await;

        let prompts = h.say("U1", "March 5").await;
        assert_eq!(headlines(&prompts), vec!["Pick your preferred DATE"]);
        assert_eq!(h.session("U1").await.step, Some(BookingStep::PickDate));

        h.say("U1", "2025-03-05").await;
        assert_eq!(h.session("U1").await.step, Some(BookingStep::PickTime));
    }

    #[tokio::test]
    async fn test_thai_negation_means_no_discount() {
        let h = Harness::new();
        h.say("U1", "จอง").await;
        h.press("U1", "lang=th").await;
        h.say("U1", "ทองหล่อ thonglo").await;
        h.say("U1", "2025-03-05").await;
        h.say("U1", "17:00").await;
        h.say("U1", "Treatment").await;
        h.say("U1", "Somchai").await;
        h.say("U1", "0812345678").await;
        let prompts = h.say("U1", " ไม่มี ").await;

        assert!(matches!(prompts[0], Prompt::Confirmation { .. }));
        assert_eq!(
            h.session("U1").await.fields.discount,
            Some(Discount::NoDiscount)
        );
    }

    #[tokio::test]
    async fn test_pre_start_nudge_policy() {
        let h = Harness::new();
        assert_eq!(headlines(&h.say("U1", "hello").await), vec![HELP_NUDGE]);
        assert!(h.press("U1", "confirm=yes").await.is_empty());

        let quiet = Harness::with_nudge(NudgePolicy::Silent);
        assert!(quiet.say("U1", "hello").await.is_empty());
    }

    #[tokio::test]
    async fn test_menu_cooldown() {
        let h = Harness::new();
        let prompts = h.say("U1", "menu").await;
        assert_eq!(headlines(&prompts), vec![MENU_BRANCH_TITLE]);

        h.clock.advance(Duration::from_secs(5));
        assert!(h.say("U1", "MENU").await.is_empty());

        // Another user is not affected
        assert_eq!(h.say("U2", "メニュー").await.len(), 1);

        h.clock.advance(Duration::from_secs(11));
        assert_eq!(headlines(&h.say("U1", "เมนู").await), vec![MENU_BRANCH_TITLE]);
    }

    #[tokio::test]
    async fn test_start_trigger_is_never_rate_limited() {
        let h = Harness::new();
        for _ in 0..3 {
            assert_eq!(h.say("U1", "book").await.len(), 2);
        }
    }

    #[tokio::test]
    async fn test_menu_during_booking_leaves_session_alone() {
        let h = Harness::new();
        h.say("U1", "book").await;
        h.press("U1", "lang=en").await;
        h.press("U1", "branch=PHROMPHONG").await;
        h.say("U1", "2025-03-05").await;
        h.say("U1", "13:00").await;
        let before = h.session("U1").await;
        assert_eq!(before.step, Some(BookingStep::PickService));

        // Branch is already known, so the flow jumps to categories
        let prompts = h.say("U1", "menu").await;
        let Prompt::Selector { choices, .. } = &prompts[0] else {
            panic!("expected selector, got {prompts:?}");
        };
        assert_eq!(choices.last().unwrap().label, "Show All");

        let prompts = h.press("U1", "menu|branch=PHROMPHONG|cat=treatment").await;
        assert!(matches!(prompts[0], Prompt::PriceListing { .. }));
        assert_eq!(h.session("U1").await, before);

        // The booking continues where it was
        h.say("U1", "Scalp Spa").await;
        assert_eq!(h.session("U1").await.step, Some(BookingStep::AskName));
    }

    #[tokio::test]
    async fn test_menu_listing_and_navigation() {
        let h = Harness::new();
        let prompts = h.press("U1", "menu|branch=THONGLO|cat=coloring|len=XL").await;
        let Prompt::PriceListing { lines } = &prompts[0] else {
            panic!("expected listing");
        };
        assert!(lines[0].starts_with("• Full Color — 4,200 THB"));
        assert_eq!(lines[2], "• Highlights — Not available at this branch");

        let prompts = h.press("U1", "menu|branch=THONGLO|cat=all").await;
        assert!(matches!(prompts[0], Prompt::Selector { .. }));
        assert_eq!(prompts.len(), 1);
    }

    #[tokio::test]
    async fn test_redelivered_event_is_dropped() {
        let h = Harness::new();
        h.say("U1", "book").await;
        let event = InboundEvent::action("U1", "lang=en").with_event_id("evt-1");
        assert_eq!(h.send(event.clone()).await.len(), 1);
        assert!(h.send(event).await.is_empty());
        assert_eq!(h.session("U1").await.step, Some(BookingStep::PickBranch));
    }

    #[tokio::test]
    async fn test_store_failure_answers_nothing() {
        let controller = DialogController::new(
            FailingStore,
            RecordingSink::default(),
            TriggerTable::new().unwrap(),
            CooldownGuard::with_clock(DEFAULT_WINDOW, ManualClock::new()),
            bundled_menu(),
            NudgePolicy::Always,
        );
        let manager = RuntimeManager::new(controller);
        let reply = manager.dispatch(InboundEvent::text("U1", "book")).await.unwrap();
        assert!(reply.is_empty());

        // The menu flow does not depend on the store
        let reply = manager.dispatch(InboundEvent::text("U1", "menu")).await.unwrap();
        assert_eq!(reply.len(), 1);
    }

    #[tokio::test]
    async fn test_batch_preserves_per_user_order() {
        let h = Harness::new();
        let results = h
            .manager
            .dispatch_batch(vec![
                InboundEvent::text("U1", "book"),
                InboundEvent::text("U2", "hello"),
                InboundEvent::action("U1", "lang=th"),
                InboundEvent::text("U2", "book"),
                InboundEvent::action("U1", "branch=THONGLO"),
            ])
            .await;

        assert_eq!(results.len(), 5);
        let replies: Vec<Vec<Prompt>> = results.into_iter().map(Result::unwrap).collect();
        assert_eq!(replies[0].len(), 2);
        assert_eq!(headlines(&replies[1]), vec![HELP_NUDGE]);
        assert_eq!(headlines(&replies[2]), vec!["ต้องการจองสาขาไหนคะ?"]);
        assert_eq!(replies[3].len(), 2);
        assert_eq!(h.session("U1").await.step, Some(BookingStep::PickDate));
        assert_eq!(h.session("U2").await.step, Some(BookingStep::PickLanguage));
    }

    #[tokio::test]
    async fn test_follow_greets() {
        let h = Harness::new();
        let prompts = h.send(InboundEvent::follow("U1")).await;
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].headline().starts_with("Welcome to fufu Hair Color Salon"));
    }

    #[tokio::test]
    async fn test_forget_drops_session() {
        let h = Harness::new();
        h.say("U1", "book").await;
        assert!(h.manager.forget("U1").await.unwrap());
        assert_eq!(headlines(&h.say("U1", "hello").await), vec![HELP_NUDGE]);
        assert!(!h.manager.forget("U9").await.unwrap());
    }

    #[tokio::test]
    async fn test_forget_stops_runtime_held_elsewhere() {
        let h = Harness::new();
        h.say("U1", "book").await;
        let old = h.manager.get_or_create("U1").await;

        assert!(h.manager.forget("U1").await.unwrap());
        assert!(old.request_tx.is_closed());

        let new = h.manager.get_or_create("U1").await;
        assert!(!new.request_tx.is_closed());
        assert!(!old.request_tx.same_channel(&new.request_tx));

        // The stale handle cannot reach a runtime or write the session back
        let (reply_tx, _reply_rx) = oneshot::channel();
        let stale = UserRequest::Event {
            event: InboundEvent::text("U1", "book"),
            reply_tx,
        };
        assert!(old.request_tx.send(stale).await.is_err());
        assert_eq!(h.session("U1").await.step, None);
    }

    #[tokio::test]
    async fn test_events_queued_before_forget_run_first() {
        let h = Harness::new();
        let handle = h.manager.get_or_create("U1").await;

        let (event_tx, event_rx) = oneshot::channel();
        handle
            .request_tx
            .send(UserRequest::Event {
                event: InboundEvent::text("U1", "book"),
                reply_tx: event_tx,
            })
            .await
            .unwrap();

        assert!(h.manager.forget("U1").await.unwrap());
        assert_eq!(event_rx.await.unwrap().len(), 2);
        assert_eq!(h.session("U1").await.step, None);
    }
}
