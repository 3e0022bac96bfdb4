use std::sync::Arc;

use tokio::sync::Mutex;

use crate::models::ConversationState;

/// Exclusive handle on one thread's conversation.
pub type SessionSlot = Arc<Mutex<ConversationState>>;

/// Trait for session storage backends
pub trait SessionStore: Send + Sync {
    /// Slot for `thread_id`, created empty on first use.
    fn checkout(&self, thread_id: &str) -> SessionSlot;

    /// Copy of the stored conversation, if the thread exists and is not mid-run.
    fn snapshot(&self, thread_id: &str) -> Option<ConversationState>;

    fn thread_ids(&self) -> Vec<String>;

    /// Forget one thread. Returns whether it existed.
    fn clear(&self, thread_id: &str) -> bool;

    fn clear_all_sessions(&self);
}
