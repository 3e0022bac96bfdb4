use super::message::Message;

/// Thread used by free-form questions.
pub const QUESTION_THREAD: &str = "1";
/// Thread used by ticker analysis, kept apart so the two histories never interleave.
pub const TICKER_THREAD: &str = "2";

/// What the user submitted for one run of the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Question(String),
    Ticker(String),
}

impl Query {
    pub fn question(text: impl Into<String>) -> Self {
        Query::Question(text.into())
    }

    pub fn ticker(symbol: &str) -> Self {
        Query::Ticker(symbol.trim().to_uppercase())
    }

    /// Text of the seed user message. Ticker runs are phrased as a sentence and the
    /// model is left to pick the symbol out of it.
    pub fn prompt(&self) -> String {
        match self {
            Query::Question(text) => text.clone(),
            Query::Ticker(symbol) => format!("Give detailed information about {} stock", symbol),
        }
    }

    pub fn ticker_symbol(&self) -> Option<&str> {
        match self {
            Query::Question(_) => None,
            Query::Ticker(symbol) => Some(symbol),
        }
    }

    pub fn thread_id(&self) -> &'static str {
        match self {
            Query::Question(_) => QUESTION_THREAD,
            Query::Ticker(_) => TICKER_THREAD,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Query::Question(text) | Query::Ticker(text) => text.trim().is_empty(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationState {
    pub messages: Vec<Message>,
    pub query: String,
    pub ticker: Option<String>,
}

impl ConversationState {
    /// Overwrites the scalar fields with the new input and appends its seed message.
    pub fn begin_turn(&mut self, query: &Query) {
        let prompt = query.prompt();
        self.query = prompt.clone();
        self.ticker = query.ticker_symbol().map(str::to_string);
        self.messages.push(Message::user(prompt));
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}
