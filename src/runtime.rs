//! Runtime for per-user dialogs
//!
//! Events for one user are serialized through that user's runtime task;
//! different users run concurrently.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::{DialogController, UserRequest, UserRuntime};
pub use traits::*;

use crate::cooldown::{Clock, SystemClock};
use crate::inbound::InboundEvent;
use crate::prompt::Prompt;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, RwLock};

/// Type alias for the production manager
pub type ProductionManager = RuntimeManager<InMemorySessionStore, TracingBookingSink>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Runtime for user {user_id} is not accepting events")]
    ChannelClosed { user_id: String },
    #[error("Runtime for user {user_id} dropped the reply")]
    ReplyDropped { user_id: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Handle to interact with a running user runtime
#[derive(Clone)]
pub struct UserHandle {
    pub request_tx: mpsc::Sender<UserRequest>,
}

/// Manager for all user runtimes
///
/// Runtimes are never reaped; one idle task per distinct user stays
/// alive until `forget`.
pub struct RuntimeManager<S, K, C = SystemClock>
where
    S: SessionStore + 'static,
    K: BookingSink + 'static,
    C: Clock + 'static,
{
    controller: Arc<DialogController<S, K, C>>,
    runtimes: RwLock<HashMap<String, UserHandle>>,
}

impl<S, K, C> RuntimeManager<S, K, C>
where
    S: SessionStore + 'static,
    K: BookingSink + 'static,
    C: Clock + 'static,
{
    pub fn new(controller: DialogController<S, K, C>) -> Self {
        Self {
            controller: Arc::new(controller),
            runtimes: RwLock::new(HashMap::new()),
        }
    }

    pub fn controller(&self) -> &DialogController<S, K, C> {
        &self.controller
    }

    /// Get or create the runtime for a user
    pub async fn get_or_create(&self, user_id: &str) -> UserHandle {
        // Check if already running
        {
            let runtimes = self.runtimes.read().await;
            if let Some(handle) = runtimes.get(user_id) {
                if !handle.request_tx.is_closed() {
                    return handle.clone();
                }
            }
        }

        let mut runtimes = self.runtimes.write().await;
        // Another caller may have started it while we waited for the lock
        if let Some(handle) = runtimes.get(user_id) {
            if !handle.request_tx.is_closed() {
                return handle.clone();
            }
        }

        let (request_tx, request_rx) = mpsc::channel(32);
        let runtime = UserRuntime::new(user_id, Arc::clone(&self.controller), request_rx);
        tokio::spawn(runtime.run());

        let handle = UserHandle { request_tx };
        runtimes.insert(user_id.to_string(), handle.clone());
        handle
    }

    /// Send an event to its user's runtime and wait for the reply.
    /// A runtime that stopped between lookup and send is replaced once.
    pub async fn dispatch(&self, event: InboundEvent) -> Result<Vec<Prompt>, RuntimeError> {
        let user_id = event.user_id.clone();
        let (reply_tx, reply_rx) = oneshot::channel();
        let mut request = UserRequest::Event { event, reply_tx };

        for _ in 0..2 {
            let handle = self.get_or_create(&user_id).await;
            match handle.request_tx.send(request).await {
                Ok(()) => {
                    return reply_rx
                        .await
                        .map_err(|_| RuntimeError::ReplyDropped { user_id });
                }
                Err(mpsc::error::SendError(returned)) => request = returned,
            }
        }

        Err(RuntimeError::ChannelClosed { user_id })
    }

    /// Handle a batch: one user's events in batch order, users concurrently.
    /// Results line up with the input.
    pub async fn dispatch_batch(
        &self,
        events: Vec<InboundEvent>,
    ) -> Vec<Result<Vec<Prompt>, RuntimeError>> {
        let total = events.len();
        let mut per_user: Vec<(String, Vec<(usize, InboundEvent)>)> = Vec::new();
        for (index, event) in events.into_iter().enumerate() {
            match per_user.iter_mut().find(|(user, _)| *user == event.user_id) {
                Some((_, queue)) => queue.push((index, event)),
                None => per_user.push((event.user_id.clone(), vec![(index, event)])),
            }
        }

        let lanes = per_user.into_iter().map(|(_, queue)| async move {
            let mut results = Vec::with_capacity(queue.len());
            for (index, event) in queue {
                results.push((index, self.dispatch(event).await));
            }
            results
        });

        let mut ordered: Vec<Option<Result<Vec<Prompt>, RuntimeError>>> =
            (0..total).map(|_| None).collect();
        for (index, result) in join_all(lanes).await.into_iter().flatten() {
            ordered[index] = Some(result);
        }
        ordered.into_iter().flatten().collect()
    }

    /// Stop a user's runtime and forget their session.
    ///
    /// The delete runs inside the user's runtime, after everything already
    /// queued for them. The write lock is held until it finishes, so no
    /// second runtime for the user starts in the meantime.
    pub async fn forget(&self, user_id: &str) -> Result<bool, RuntimeError> {
        let mut runtimes = self.runtimes.write().await;
        let Some(handle) = runtimes.remove(user_id) else {
            return Ok(self.controller.store().delete(user_id).await?);
        };

        let (reply_tx, reply_rx) = oneshot::channel();
        if handle
            .request_tx
            .send(UserRequest::Forget { reply_tx })
            .await
            .is_err()
        {
            // Runtime already gone; nothing else can touch the session
            return Ok(self.controller.store().delete(user_id).await?);
        }

        let deleted = reply_rx.await.map_err(|_| RuntimeError::ReplyDropped {
            user_id: user_id.to_string(),
        })??;
        drop(runtimes);
        Ok(deleted)
    }
}
