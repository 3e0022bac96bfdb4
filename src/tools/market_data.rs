use std::fmt;
use std::sync::Arc;

use chrono::{Days, Local, NaiveDate};

use super::format::{format_large_number, format_raw, UNAVAILABLE};
use crate::error::{FinsightError, Result};
use crate::providers::{DailyClose, MarketDataProvider, Quote};

/// Calendar days of history requested before "today".
pub const HISTORY_DAYS: u64 = 7;
const RECENT_CLOSES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Rising,
    Falling,
}

impl Trend {
    /// Two-point comparison of the first and last close in the window; a flat
    /// window counts as rising.
    pub fn classify(oldest: f64, newest: f64) -> Self {
        if newest < oldest {
            Trend::Falling
        } else {
            Trend::Rising
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Rising => write!(f, "📈 Rising"),
            Trend::Falling => write!(f, "📉 Falling"),
        }
    }
}

/// Quote and recent price history for one ticker, rendered as markdown.
pub struct MarketDataTool {
    provider: Arc<dyn MarketDataProvider>,
}

impl MarketDataTool {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }

    /// Never fails: retrieval errors are returned as text for the model to relay.
    pub async fn fetch(&self, ticker: &str) -> String {
        self.fetch_as_of(ticker, Local::now().date_naive()).await
    }

    /// Tickers are case-insensitive; the provider always sees the trimmed, upper-cased symbol.
    pub async fn fetch_as_of(&self, ticker: &str, today: NaiveDate) -> String {
        let ticker = ticker.trim().to_uppercase();
        match self.try_fetch(&ticker, today).await {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(ticker = %ticker, error = %e, "market data retrieval failed");
                format!("❌ Failed to fetch data for {}: {}", ticker, e)
            }
        }
    }

    async fn try_fetch(&self, ticker: &str, today: NaiveDate) -> Result<String> {
        let quote = self.provider.quote(ticker).await?;

        let start = today
            .checked_sub_days(Days::new(HISTORY_DAYS))
            .ok_or_else(|| FinsightError::Other(format!("invalid history window before {}", today)))?;
        let history = self.provider.history(ticker, start, today).await?;

        render_report(ticker, &quote, &recent_closes(&history, RECENT_CLOSES))
    }
}

/// The last `count` days that have a close, oldest first.
pub fn recent_closes(history: &[DailyClose], count: usize) -> Vec<(NaiveDate, f64)> {
    let closes: Vec<(NaiveDate, f64)> = history
        .iter()
        .filter_map(|day| day.close.map(|close| (day.date, close)))
        .collect();
    let skip = closes.len().saturating_sub(count);
    closes.into_iter().skip(skip).collect()
}

pub fn render_report(ticker: &str, quote: &Quote, closes: &[(NaiveDate, f64)]) -> Result<String> {
    let price = quote.price.ok_or_else(|| {
        FinsightError::ProviderError(format!("no current price reported for {}", ticker))
    })?;

    let (oldest, newest) = match (closes.first(), closes.last()) {
        (Some(first), Some(last)) => (first.1, last.1),
        _ => {
            return Err(FinsightError::ProviderError(format!(
                "no closing prices found for {} in the last {} days",
                ticker, HISTORY_DAYS
            )))
        }
    };
    let trend = Trend::classify(oldest, newest);

    let name = quote.name.as_deref().unwrap_or(ticker);
    let market_cap = quote
        .market_cap
        .as_ref()
        .map(format_large_number)
        .unwrap_or_else(|| UNAVAILABLE.to_string());

    let price_trend = closes
        .iter()
        .map(|(date, close)| format!("{}: ${:.2}", date.format("%b %d"), close))
        .collect::<Vec<_>>()
        .join("\n");

    Ok(format!(
        "### 📊 {} ({})\n\n\
         **💵 Current Stats:**\n\
         - **Price:** ${:.2}\n\
         - **Market Cap:** {}\n\
         - **P/E Ratio:** {}\n\
         - **EPS:** {}\n\n\
         **📈 Recent Closing Prices (Last 5 Days):**\n\
         {}\n\n\
         **📉 Trend Analysis:** {}\n",
        name,
        ticker.to_uppercase(),
        price,
        market_cap,
        format_raw(quote.trailing_pe.as_ref()),
        format_raw(quote.trailing_eps.as_ref()),
        price_trend,
        trend,
    ))
}
