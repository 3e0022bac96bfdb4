//! External data sources behind the two tools.

mod wikipedia;
mod yahoo;

pub use wikipedia::WikipediaClient;
pub use yahoo::YahooFinanceClient;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;

use crate::error::Result;

/// Current snapshot of a security as reported by the provider.
///
/// Valuation fields stay as raw JSON so they can be shown exactly as the
/// provider sent them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Quote {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub market_cap: Option<Value>,
    pub trailing_pe: Option<Value>,
    pub trailing_eps: Option<Value>,
}

/// One trading day; `close` is `None` when the provider has no data for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyClose {
    pub date: NaiveDate,
    pub close: Option<f64>,
}

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn quote(&self, ticker: &str) -> Result<Quote>;

    /// Daily closes in `[start, end)`, oldest first.
    async fn history(&self, ticker: &str, start: NaiveDate, end: NaiveDate)
        -> Result<Vec<DailyClose>>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub title: String,
    pub extract: String,
}

#[async_trait]
pub trait EncyclopediaProvider: Send + Sync {
    /// Top `limit` articles for a free-text title, best match first.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Article>>;
}
