//! Trait abstractions for runtime I/O
//!
//! These traits let the dialog controller run against mock stores and sinks.

use crate::branch::Branch;
use crate::state_machine::state::PhoneNumber;
use crate::state_machine::{ConfirmedBooking, Session};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Session store unavailable: {0}")]
    Unavailable(String),
}

/// Per-user session storage
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Current session, inserting a blank one for unknown users
    async fn get_or_create(&self, user_id: &str) -> Result<Session, StoreError>;

    /// Replace the stored session wholesale
    async fn put(&self, user_id: &str, session: &Session) -> Result<(), StoreError>;

    /// Replace the stored session with a blank one
    async fn reset(&self, user_id: &str) -> Result<(), StoreError>;

    /// Forget the user entirely
    async fn delete(&self, user_id: &str) -> Result<bool, StoreError>;
}

/// Receives confirmed bookings for follow-up
#[async_trait]
pub trait BookingSink: Send + Sync {
    async fn hand_off(&self, booking: &ConfirmedBooking) -> Result<(), String>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    async fn get_or_create(&self, user_id: &str) -> Result<Session, StoreError> {
        (**self).get_or_create(user_id).await
    }

    async fn put(&self, user_id: &str, session: &Session) -> Result<(), StoreError> {
        (**self).put(user_id, session).await
    }

    async fn reset(&self, user_id: &str) -> Result<(), StoreError> {
        (**self).reset(user_id).await
    }

    async fn delete(&self, user_id: &str) -> Result<bool, StoreError> {
        (**self).delete(user_id).await
    }
}

#[async_trait]
impl<T: BookingSink + ?Sized> BookingSink for Arc<T> {
    async fn hand_off(&self, booking: &ConfirmedBooking) -> Result<(), String> {
        (**self).hand_off(booking).await
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

/// Process-lifetime session storage
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get_or_create(&self, user_id: &str) -> Result<Session, StoreError> {
        if let Some(session) = self.sessions.read().await.get(user_id) {
            return Ok(session.clone());
        }
        Ok(self
            .sessions
            .write()
            .await
            .entry(user_id.to_string())
            .or_default()
            .clone())
    }

    async fn put(&self, user_id: &str, session: &Session) -> Result<(), StoreError> {
        self.sessions
            .write()
            .await
            .insert(user_id.to_string(), session.clone());
        Ok(())
    }

    async fn reset(&self, user_id: &str) -> Result<(), StoreError> {
        self.sessions
            .write()
            .await
            .insert(user_id.to_string(), Session::default());
        Ok(())
    }

    async fn delete(&self, user_id: &str) -> Result<bool, StoreError> {
        Ok(self.sessions.write().await.remove(user_id).is_some())
    }
}

/// Hands bookings to staff through the structured log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingBookingSink;

#[async_trait]
impl BookingSink for TracingBookingSink {
    async fn hand_off(&self, booking: &ConfirmedBooking) -> Result<(), String> {
        let fields = &booking.fields;
        tracing::info!(
            user_id = %booking.user_id,
            language = booking.language.code(),
            branch = fields.branch.map(Branch::id),
            date = fields.date.map(|d| d.to_string()),
            time = fields.time.map(|t| t.to_string()),
            service = fields.service.as_deref(),
            name = fields.name.as_deref(),
            phone = fields.phone.as_ref().map(PhoneNumber::as_str),
            "Booking confirmed"
        );
        Ok(())
    }
}
