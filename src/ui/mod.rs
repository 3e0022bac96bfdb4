pub mod output;

pub use output::{
    capitalize, display_conversation, display_error, display_incomplete, display_tickers,
    display_tool_activity, render_message,
};
