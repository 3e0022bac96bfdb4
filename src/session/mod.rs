mod memory;
mod storage;

pub use memory::MemorySessionStore;
pub use storage::{SessionSlot, SessionStore};
