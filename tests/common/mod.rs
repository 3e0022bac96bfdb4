#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use finsight::api::ChatModel;
use finsight::error::{FinsightError, Result};
use finsight::models::{Message, ToolCall};
use finsight::providers::{Article, DailyClose, EncyclopediaProvider, MarketDataProvider, Quote};
use finsight::tools::{CompanyLookupTool, MarketDataTool, ToolRegistry};
use serde_json::{json, Value};

/// Replays canned assistant messages in order and records what it was sent.
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Message>>,
    pub calls: AtomicUsize,
    pub history_lengths: Mutex<Vec<usize>>,
    pub tool_names: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<Message>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, messages: &[Message], tools: &[Value]) -> Result<Message> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.history_lengths.lock().unwrap().push(messages.len());
        *self.tool_names.lock().unwrap() = tools
            .iter()
            .filter_map(|t| t["function"]["name"].as_str().map(str::to_string))
            .collect();

        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| FinsightError::ApiError {
                status: 500,
                message: "script exhausted".to_string(),
            })
    }
}

/// Requests the market data tool on every call and never answers.
#[derive(Default)]
pub struct LoopingModel {
    pub calls: AtomicUsize,
}

#[async_trait]
impl ChatModel for LoopingModel {
    async fn complete(&self, _messages: &[Message], _tools: &[Value]) -> Result<Message> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Message::assistant_with_tool_calls(
            "",
            vec![ToolCall::function(
                format!("call_{}", n),
                "get_stock_info",
                r#"{"ticker":"AAPL"}"#,
            )],
        ))
    }
}

/// Answers every request after a pause, echoing the history length it saw.
#[derive(Default)]
pub struct SlowModel {
    pub delay_ms: u64,
    pub history_lengths: Mutex<Vec<usize>>,
}

impl SlowModel {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            ..Default::default()
        }
    }
}

#[async_trait]
impl ChatModel for SlowModel {
    async fn complete(&self, messages: &[Message], _tools: &[Value]) -> Result<Message> {
        self.history_lengths.lock().unwrap().push(messages.len());
        tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
        Ok(Message::assistant(format!("seen {}", messages.len())))
    }
}

pub struct StubMarket {
    pub quote: Option<Quote>,
    pub history: Vec<DailyClose>,
    pub requests: Mutex<Vec<(String, NaiveDate, NaiveDate)>>,
}

impl StubMarket {
    pub fn new(quote: Option<Quote>, history: Vec<DailyClose>) -> Self {
        Self {
            quote,
            history,
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl MarketDataProvider for StubMarket {
    async fn quote(&self, ticker: &str) -> Result<Quote> {
        self.quote.clone().ok_or_else(|| {
            FinsightError::ProviderError(format!(
                "no quote data found, symbol may be delisted: {}",
                ticker
            ))
        })
    }

    async fn history(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<DailyClose>> {
        self.requests
            .lock()
            .unwrap()
            .push((ticker.to_string(), start, end));
        Ok(self.history.clone())
    }
}

pub struct StubEncyclopedia {
    pub articles: Option<Vec<Article>>,
    pub queries: Mutex<Vec<(String, usize)>>,
}

impl StubEncyclopedia {
    pub fn new(articles: Option<Vec<Article>>) -> Self {
        Self {
            articles,
            queries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl EncyclopediaProvider for StubEncyclopedia {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Article>> {
        self.queries.lock().unwrap().push((query.to_string(), limit));
        self.articles
            .clone()
            .ok_or_else(|| FinsightError::ProviderError("encyclopedia unreachable".to_string()))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn apple_quote() -> Quote {
    Quote {
        name: Some("Apple Inc.".to_string()),
        price: Some(150.0),
        market_cap: Some(json!(2_500_000_000_000u64)),
        trailing_pe: Some(json!(28.5)),
        trailing_eps: Some(json!(6.1)),
    }
}

/// Five closes ending the day before 2024-01-10.
pub fn apple_history() -> Vec<DailyClose> {
    [
        (date(2024, 1, 3), 148.0),
        (date(2024, 1, 4), 149.0),
        (date(2024, 1, 5), 150.0),
        (date(2024, 1, 8), 151.0),
        (date(2024, 1, 9), 150.0),
    ]
    .into_iter()
    .map(|(date, close)| DailyClose {
        date,
        close: Some(close),
    })
    .collect()
}

pub fn apple_article() -> Article {
    Article {
        title: "Apple Inc.".to_string(),
        extract: "Apple Inc. is an American multinational technology company.".to_string(),
    }
}

pub fn registry(market: StubMarket, encyclopedia: StubEncyclopedia) -> ToolRegistry {
    ToolRegistry::new(
        MarketDataTool::new(Arc::new(market)),
        CompanyLookupTool::new(Arc::new(encyclopedia), 1, 800),
    )
}

pub fn default_registry() -> ToolRegistry {
    registry(
        StubMarket::new(Some(apple_quote()), apple_history()),
        StubEncyclopedia::new(Some(vec![apple_article()])),
    )
}
