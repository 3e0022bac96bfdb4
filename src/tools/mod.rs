mod company_lookup;
mod format;
mod market_data;
mod registry;

pub use company_lookup::{
    fallback_message, summarize, title_case, CompanyLookupTool, DISAMBIGUATION_MARKER,
};
pub use format::{format_large_number, format_magnitude, format_raw, UNAVAILABLE};
pub use market_data::{recent_closes, render_report, MarketDataTool, Trend, HISTORY_DAYS};
pub use registry::{ToolKind, ToolRegistry};
