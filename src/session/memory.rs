use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::storage::{SessionSlot, SessionStore};
use crate::models::ConversationState;

/// Process-lifetime session map; nothing is written to disk or evicted.
#[derive(Default)]
pub struct MemorySessionStore {
    threads: Mutex<HashMap<String, SessionSlot>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn threads(&self) -> MutexGuard<'_, HashMap<String, SessionSlot>> {
        self.threads.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStore for MemorySessionStore {
    fn checkout(&self, thread_id: &str) -> SessionSlot {
        self.threads()
            .entry(thread_id.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(ConversationState::default())))
            .clone()
    }

    fn snapshot(&self, thread_id: &str) -> Option<ConversationState> {
        let slot = self.threads().get(thread_id).cloned()?;
        let state = slot.try_lock().ok()?;
        Some(state.clone())
    }

    fn thread_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.threads().keys().cloned().collect();
        ids.sort();
        ids
    }

    fn clear(&self, thread_id: &str) -> bool {
        self.threads().remove(thread_id).is_some()
    }

    fn clear_all_sessions(&self) {
        self.threads().clear();
    }
}
