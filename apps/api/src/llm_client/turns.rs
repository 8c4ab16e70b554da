//! Request tagging for conversational flows.
//!
//! Two messages sent in quick succession are independent pipeline runs that can
//! finish in either order. Every run is tagged with a request id, and the tracker
//! remembers the latest id issued per (student, conversation); a reply whose id is
//! no longer the latest comes back flagged `superseded` so the client can drop it
//! instead of overwriting the newer turn.
//!
//! An entry lives only while some turn for that conversation is in flight. Each
//! `TurnTicket` releases its hold when dropped, whether it was finished or the
//! handler future was cancelled by a client disconnect.

use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use uuid::Uuid;

type TurnKey = (Uuid, String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Turn {
    latest: Uuid,
    in_flight: usize,
}

#[derive(Clone, Default)]
pub struct TurnTracker {
    turns: Arc<DashMap<TurnKey, Turn>>,
}

/// One in-flight request. Dropping it releases the conversation entry.
pub struct TurnTicket {
    tracker: TurnTracker,
    key: Option<TurnKey>,
    pub request_id: Uuid,
}

impl TurnTicket {
    pub fn conversation_id(&self) -> Option<&str> {
        self.key.as_ref().map(|(_, conversation)| conversation.as_str())
    }
}

impl Drop for TurnTicket {
    fn drop(&mut self) {
        if let Some(key) = &self.key {
            self.tracker.release(key);
        }
    }
}

impl TurnTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new request for `student_id`. Without a conversation id the
    /// request is untracked and can never be superseded.
    pub fn begin(
        &self,
        student_id: Uuid,
        conversation_id: Option<String>,
        request_id: Option<Uuid>,
    ) -> TurnTicket {
        let request_id = request_id.unwrap_or_else(Uuid::new_v4);
        let key = conversation_id
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .map(|conversation| (student_id, conversation));
        if let Some(key) = &key {
            self.turns
                .entry(key.clone())
                .and_modify(|turn| {
                    turn.latest = request_id;
                    turn.in_flight += 1;
                })
                .or_insert(Turn {
                    latest: request_id,
                    in_flight: 1,
                });
        }
        TurnTicket {
            tracker: self.clone(),
            key,
            request_id,
        }
    }

    pub fn is_current(&self, ticket: &TurnTicket) -> bool {
        match &ticket.key {
            Some(key) => self
                .turns
                .get(key)
                .map(|turn| turn.latest == ticket.request_id)
                .unwrap_or(true),
            None => true,
        }
    }

    /// Wraps a finished reply with its ticket's identity and releases the ticket.
    pub fn finish<T>(&self, ticket: TurnTicket, body: T) -> Tagged<T> {
        Tagged {
            request_id: ticket.request_id,
            conversation_id: ticket.conversation_id().map(str::to_string),
            superseded: !self.is_current(&ticket),
            body,
        }
    }

    /// Conversations with at least one request still in flight.
    pub fn active_conversations(&self) -> usize {
        self.turns.len()
    }

    fn release(&self, key: &TurnKey) {
        if let Some(mut turn) = self.turns.get_mut(key) {
            turn.in_flight = turn.in_flight.saturating_sub(1);
        }
        self.turns.remove_if(key, |_, turn| turn.in_flight == 0);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Tagged<T> {
    pub request_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    pub superseded: bool,
    #[serde(flatten)]
    pub body: T,
}
