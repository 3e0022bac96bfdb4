use std::sync::Arc;

use crate::error::Result;
use crate::providers::{Article, EncyclopediaProvider};

/// Phrase that marks a disambiguation stub rather than an article.
pub const DISAMBIGUATION_MARKER: &str = "may refer to";

/// Encyclopedia summary for a company name or ticker.
///
/// Unlike [`super::MarketDataTool`], provider failures are returned as errors;
/// the dispatcher turns them into tool-result text.
pub struct CompanyLookupTool {
    provider: Arc<dyn EncyclopediaProvider>,
    top_k: usize,
    max_chars: usize,
}

impl CompanyLookupTool {
    pub fn new(provider: Arc<dyn EncyclopediaProvider>, top_k: usize, max_chars: usize) -> Self {
        Self {
            provider,
            top_k: top_k.max(1),
            max_chars,
        }
    }

    pub async fn lookup(&self, query: &str) -> Result<String> {
        let title = title_case(query.trim());
        let articles = self.provider.search(&title, self.top_k).await?;
        let summary = summarize(&articles, self.max_chars);

        if summary.trim().is_empty() || summary.to_lowercase().contains(DISAMBIGUATION_MARKER) {
            tracing::debug!(query, articles = articles.len(), "no reliable encyclopedia entry");
            return Ok(fallback_message(query));
        }

        Ok(summary)
    }
}

pub fn fallback_message(query: &str) -> String {
    format!(
        "Sorry, I couldn't find reliable information about '{}' on Wikipedia.",
        query
    )
}

/// Join articles as `Page:`/`Summary:` blocks and cut to `max_chars` characters.
pub fn summarize(articles: &[Article], max_chars: usize) -> String {
    let joined = articles
        .iter()
        .map(|article| format!("Page: {}\nSummary: {}", article.title, article.extract))
        .collect::<Vec<_>>()
        .join("\n\n");

    match joined.char_indices().nth(max_chars) {
        Some((cut, _)) => joined[..cut].to_string(),
        None => joined,
    }
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }

    out
}
