use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::OnceCell;

use super::{DailyClose, MarketDataProvider, Quote};
use crate::error::{FinsightError, Result};

/// Sets the session cookie the crumb endpoint requires.
const COOKIE_URL: &str = "https://fc.yahoo.com";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) finsight/0.1";

pub struct YahooFinanceClient {
    client: reqwest::Client,
    base_url: String,
    crumb: OnceCell<String>,
}

#[derive(Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<YahooError>,
}

#[derive(Deserialize)]
struct YahooError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: Indicators,
}

#[derive(Deserialize, Default)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Deserialize, Default)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteIndicator>,
}

#[derive(Deserialize, Default)]
struct QuoteIndicator {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

impl YahooFinanceClient {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            crumb: OnceCell::new(),
        })
    }

    async fn crumb(&self) -> Result<&str> {
        let crumb = self
            .crumb
            .get_or_try_init(|| async {
                // The cookie endpoint answers 404 but still sets the cookie.
                self.client.get(COOKIE_URL).send().await?;

                let response = self
                    .client
                    .get(format!("{}/v1/test/getcrumb", self.base_url))
                    .send()
                    .await?;
                if !response.status().is_success() {
                    return Err(FinsightError::ProviderError(format!(
                        "crumb request failed with status {}",
                        response.status()
                    )));
                }

                let crumb = response.text().await?.trim().to_string();
                if crumb.is_empty() {
                    return Err(FinsightError::ProviderError(
                        "empty crumb returned by market data provider".to_string(),
                    ));
                }
                tracing::debug!("obtained market data crumb");
                Ok::<String, FinsightError>(crumb)
            })
            .await?;
        Ok(crumb.as_str())
    }
}

fn parse_quote(ticker: &str, body: &Value) -> Result<Quote> {
    let result = body
        .get("quoteResponse")
        .and_then(|r| r.get("result"))
        .and_then(|r| r.as_array())
        .and_then(|r| r.first())
        .ok_or_else(|| {
            FinsightError::ProviderError(format!(
                "no quote data found, symbol may be delisted: {}",
                ticker
            ))
        })?;

    let field = |key: &str| result.get(key).filter(|v| !v.is_null()).cloned();

    Ok(Quote {
        name: result
            .get("longName")
            .or_else(|| result.get("shortName"))
            .and_then(|n| n.as_str())
            .map(str::to_string),
        price: result.get("regularMarketPrice").and_then(|p| p.as_f64()),
        market_cap: field("marketCap"),
        trailing_pe: field("trailingPE"),
        trailing_eps: field("epsTrailingTwelveMonths"),
    })
}

fn parse_chart(ticker: &str, envelope: ChartEnvelope) -> Result<Vec<DailyClose>> {
    if let Some(error) = envelope.chart.error {
        return Err(FinsightError::ProviderError(format!(
            "{}: {} ({})",
            ticker, error.description, error.code
        )));
    }

    let result = envelope
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| {
            FinsightError::ProviderError(format!("no price history returned for {}", ticker))
        })?;

    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();

    let offset = result.meta.gmtoffset;
    let days = result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, ts)| {
            let date = DateTime::from_timestamp(ts + offset, 0)?.date_naive();
            Some(DailyClose {
                date,
                close: closes.get(i).copied().flatten(),
            })
        })
        .collect();

    Ok(days)
}

fn unix_midnight(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

#[async_trait]
impl MarketDataProvider for YahooFinanceClient {
    async fn quote(&self, ticker: &str) -> Result<Quote> {
        let crumb = self.crumb().await?;
        let response = self
            .client
            .get(format!("{}/v7/finance/quote", self.base_url))
            .query(&[("symbols", ticker), ("crumb", crumb)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FinsightError::ProviderError(format!(
                "quote request for {} failed with status {}",
                ticker,
                response.status()
            )));
        }

        let body: Value = response.json().await?;
        parse_quote(ticker, &body)
    }

    async fn history(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyClose>> {
        let period1 = unix_midnight(start).to_string();
        let period2 = unix_midnight(end).to_string();

        let response = self
            .client
            .get(format!("{}/v8/finance/chart/{}", self.base_url, ticker))
            .query(&[
                ("period1", period1.as_str()),
                ("period2", period2.as_str()),
                ("interval", "1d"),
                ("events", "history"),
            ])
            .send()
            .await?;

        // Unknown symbols come back as 404 with an error object worth reporting.
        let status = response.status();
        let text = response.text().await?;
        let envelope: ChartEnvelope = serde_json::from_str(&text).map_err(|e| {
            FinsightError::ProviderError(format!(
                "unreadable price history for {} (status {}): {}",
                ticker, status, e
            ))
        })?;

        let days = parse_chart(ticker, envelope)?;
        tracing::debug!(ticker, days = days.len(), "fetched price history");
        Ok(days)
    }
}
