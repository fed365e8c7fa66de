//! # Session Module
//!
//! Per-user conversation state. A [`Session`] records where a user currently
//! is in the navigation or form-filling flow and the fields captured so far;
//! the [`SessionStore`] serializes access per user while keeping distinct
//! users fully concurrent.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::catalog::Tier;

/// What kind of request a form collects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestPurpose {
    Purchase,
    LiveAgent,
}

/// Conversation state for one user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum ConversationState {
    #[default]
    Idle,
    /// A tier menu is displayed; only a selection at this tier advances
    AwaitingSelection(Tier),
    /// An item detail view with a "request this item" button is displayed
    ItemDetail,
    /// A form is collecting the field at `slot` of the purpose's slot list
    CollectingForm {
        purpose: RequestPurpose,
        slot: usize,
    },
    /// Admin respond flow: waiting for the request id
    AdminAwaitingRequestId,
    /// Admin respond flow: waiting for the response text
    AdminAwaitingResponseText,
}

/// The per-user conversation state tracked between inbound events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_id: i64,
    pub username: Option<String>,
    pub state: ConversationState,
    /// Field-name → captured value (`name`, `phone`, `address`,
    /// `additional_text`, `item_id`, `request_id`, `target_user_id`)
    pub fields: HashMap<String, String>,
}

impl Session {
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            username: None,
            state: ConversationState::Idle,
            fields: HashMap::new(),
        }
    }

    /// Return the session to idle, dropping all captured fields
    pub fn reset(&mut self) {
        self.state = ConversationState::Idle;
        self.fields.clear();
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<String>) {
        self.fields.insert(name.to_string(), value.into());
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Holds one conversation state per user, keyed by user identity.
///
/// Each session sits behind its own mutex; `acquire` hands out an owned
/// guard that the dispatcher holds for the whole of one event's handling,
/// so events for the same user are processed strictly one at a time while
/// events for different users proceed in parallel.
#[derive(Default)]
pub struct SessionStore {
    inner: RwLock<HashMap<i64, Arc<Mutex<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the session for `user_id`, creating it on first contact.
    pub async fn acquire(&self, user_id: i64) -> OwnedMutexGuard<Session> {
        let cell = {
            let mut sessions = self.inner.write().await;
            sessions
                .entry(user_id)
                .or_insert_with(|| Arc::new(Mutex::new(Session::new(user_id))))
                .clone()
        };
        cell.lock_owned().await
    }

    /// Drop the stored session for `user_id`, if any. Idle-session hygiene
    /// hook; the core never calls this on a user's behalf.
    pub async fn clear(&self, user_id: i64) {
        self.inner.write().await.remove(&user_id);
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
