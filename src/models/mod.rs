mod message;
mod state;
mod tool;

pub use message::Message;
pub use state::{ConversationState, Query, QUESTION_THREAD, TICKER_THREAD};
pub use tool::{FunctionCall, ToolCall};
