mod common;

use std::sync::Arc;

use common::*;
use finsight::error::FinsightError;
use finsight::models::ToolCall;
use finsight::providers::{Article, DailyClose, Quote};
use finsight::tools::{
    fallback_message, format_large_number, recent_closes, render_report, summarize, title_case,
    CompanyLookupTool, MarketDataTool, ToolKind, Trend,
};
use serde_json::json;

const APPLE_REPORT: &str = "### 📊 Apple Inc. (AAPL)\n\n\
**💵 Current Stats:**\n\
- **Price:** $150.00\n\
- **Market Cap:** ₹2.50T\n\
- **P/E Ratio:** 28.5\n\
- **EPS:** 6.1\n\n\
**📈 Recent Closing Prices (Last 5 Days):**\n\
Jan 03: $148.00\n\
Jan 04: $149.00\n\
Jan 05: $150.00\n\
Jan 08: $151.00\n\
Jan 09: $150.00\n\n\
**📉 Trend Analysis:** 📈 Rising\n";

#[test]
fn test_format_large_number_bands() {
    assert_eq!(format_large_number(&json!(1_000_000_000_000u64)), "₹1.00T");
    assert_eq!(format_large_number(&json!(2.5e12)), "₹2.50T");
    assert_eq!(format_large_number(&json!(999_999_999_999u64)), "₹1000.00B");
    assert_eq!(format_large_number(&json!(1_000_000_000u64)), "₹1.00B");
    assert_eq!(format_large_number(&json!(45_600_000)), "₹45.60M");
    assert_eq!(format_large_number(&json!(1_000_000)), "₹1.00M");
    assert_eq!(format_large_number(&json!(999_999.5)), "₹999,999.50");
    assert_eq!(format_large_number(&json!(1234.5)), "₹1,234.50");
    assert_eq!(format_large_number(&json!(12)), "₹12.00");
}

#[test]
fn test_format_large_number_numeric_string() {
    assert_eq!(format_large_number(&json!("3000000000")), "₹3.00B");
}

#[test]
fn test_format_large_number_unavailable() {
    assert_eq!(format_large_number(&json!("N/A")), "N/A");
    assert_eq!(format_large_number(&json!(null)), "N/A");
    assert_eq!(format_large_number(&json!({"raw": 1})), "N/A");
}

#[test]
fn test_trend_is_two_point_comparison() {
    assert_eq!(Trend::classify(100.0, 100.0), Trend::Rising);
    assert_eq!(Trend::classify(100.0, 99.99), Trend::Falling);
    assert_eq!(Trend::classify(148.0, 150.0), Trend::Rising);
    assert_eq!(Trend::Falling.to_string(), "📉 Falling");
}

#[test]
fn test_recent_closes_drops_missing_and_keeps_last_five() {
    let mut history = apple_history();
    history.insert(
        0,
        DailyClose {
            date: date(2024, 1, 2),
            close: Some(140.0),
        },
    );
    history.push(DailyClose {
        date: date(2024, 1, 10),
        close: None,
    });

    let closes = recent_closes(&history, 5);
    assert_eq!(closes.len(), 5);
    assert_eq!(closes[0], (date(2024, 1, 3), 148.0));
    assert_eq!(closes[4], (date(2024, 1, 9), 150.0));
}

#[test]
fn test_render_report_exact_output() {
    let closes = recent_closes(&apple_history(), 5);
    let report = render_report("aapl", &apple_quote(), &closes).unwrap();
    assert_eq!(report, APPLE_REPORT);
}

#[test]
fn test_render_report_missing_fields() {
    let quote = Quote {
        price: Some(10.0),
        ..Default::default()
    };
    let closes = vec![(date(2024, 1, 3), 12.0), (date(2024, 1, 4), 11.0)];

    let report = render_report("xyz", &quote, &closes).unwrap();
    assert!(report.starts_with("### 📊 xyz (XYZ)"));
    assert!(report.contains("- **Market Cap:** N/A\n"));
    assert!(report.contains("- **P/E Ratio:** N/A\n"));
    assert!(report.contains("**📉 Trend Analysis:** 📉 Falling"));
}

#[tokio::test]
async fn test_market_data_tool_end_to_end() {
    let market = Arc::new(StubMarket::new(Some(apple_quote()), apple_history()));
    let tool = MarketDataTool::new(market.clone());

    let report = tool.fetch_as_of("AAPL", date(2024, 1, 10)).await;
    assert_eq!(report, APPLE_REPORT);

    let requests = market.requests.lock().unwrap();
    assert_eq!(
        requests.as_slice(),
        &[("AAPL".to_string(), date(2024, 1, 3), date(2024, 1, 10))]
    );
}

#[tokio::test]
async fn test_market_data_tool_unknown_ticker_becomes_text() {
    let tool = MarketDataTool::new(Arc::new(StubMarket::new(None, Vec::new())));

    let report = tool.fetch_as_of("zzzz", date(2024, 1, 10)).await;
    assert_eq!(
        report,
        "❌ Failed to fetch data for ZZZZ: no quote data found, symbol may be delisted: ZZZZ"
    );
}

#[tokio::test]
async fn test_market_data_tool_normalizes_ticker() {
    let market = Arc::new(StubMarket::new(Some(apple_quote()), apple_history()));
    let tool = MarketDataTool::new(market.clone());

    let report = tool.fetch_as_of(" aapl ", date(2024, 1, 10)).await;
    assert_eq!(report, APPLE_REPORT);

    let requests = market.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0, "AAPL");
}

#[tokio::test]
async fn test_market_data_tool_empty_history_becomes_text() {
    let history = vec![DailyClose {
        date: date(2024, 1, 9),
        close: None,
    }];
    let tool = MarketDataTool::new(Arc::new(StubMarket::new(Some(apple_quote()), history)));

    let report = tool.fetch_as_of("AAPL", date(2024, 1, 10)).await;
    assert!(report.starts_with("❌ Failed to fetch data for AAPL:"));
    assert!(report.contains("no closing prices"));
}

#[test]
fn test_title_case() {
    assert_eq!(title_case("apple inc."), "Apple Inc.");
    assert_eq!(title_case("TESLA"), "Tesla");
    assert_eq!(title_case("3m company"), "3M Company");
    assert_eq!(title_case("o'neil"), "O'Neil");
}

#[test]
fn test_summarize_truncates_by_characters() {
    let article = Article {
        title: "Nestlé".to_string(),
        extract: "é".repeat(2000),
    };

    let summary = summarize(&[article], 800);
    assert_eq!(summary.chars().count(), 800);
    assert!(summary.starts_with("Page: Nestlé\nSummary: éé"));
}

#[tokio::test]
async fn test_lookup_returns_summary_for_title_cased_query() {
    let encyclopedia = Arc::new(StubEncyclopedia::new(Some(vec![apple_article()])));
    let tool = CompanyLookupTool::new(encyclopedia.clone(), 1, 800);

    let text = tool.lookup("  apple inc ").await.unwrap();
    assert_eq!(
        text,
        "Page: Apple Inc.\nSummary: Apple Inc. is an American multinational technology company."
    );
    assert_eq!(
        encyclopedia.queries.lock().unwrap().as_slice(),
        &[("Apple Inc".to_string(), 1)]
    );
}

#[tokio::test]
async fn test_lookup_empty_result_falls_back() {
    let tool = CompanyLookupTool::new(Arc::new(StubEncyclopedia::new(Some(Vec::new()))), 1, 800);

    let text = tool.lookup("xyzzy").await.unwrap();
    assert_eq!(text, fallback_message("xyzzy"));
    assert_eq!(
        text,
        "Sorry, I couldn't find reliable information about 'xyzzy' on Wikipedia."
    );
}

#[tokio::test]
async fn test_lookup_disambiguation_falls_back() {
    let stub = Article {
        title: "Mercury".to_string(),
        extract: "Mercury MAY REFER TO: a planet, an element, a company".to_string(),
    };
    let tool = CompanyLookupTool::new(Arc::new(StubEncyclopedia::new(Some(vec![stub]))), 1, 800);

    let text = tool.lookup("mercury").await.unwrap();
    assert_eq!(text, fallback_message("mercury"));
}

#[tokio::test]
async fn test_lookup_propagates_provider_errors() {
    let tool = CompanyLookupTool::new(Arc::new(StubEncyclopedia::new(None)), 1, 800);

    let err = tool.lookup("apple").await.unwrap_err();
    assert!(err.to_string().contains("encyclopedia unreachable"));
}

#[test]
fn test_tool_declarations() {
    let registry = default_registry();
    let specs = registry.format_tools_for_llm();

    assert_eq!(specs.len(), 2);
    assert_eq!(specs[0]["function"]["name"], "get_stock_info");
    assert_eq!(
        specs[0]["function"]["parameters"]["required"],
        json!(["ticker"])
    );
    assert_eq!(specs[1]["function"]["name"], "search_stock");
    assert_eq!(registry.get("search_stock"), Some(ToolKind::CompanyLookup));
    assert_eq!(registry.get("web_search"), None);
}

#[tokio::test]
async fn test_dispatch_unknown_tool() {
    let registry = default_registry();
    let call = ToolCall::function("call_1", "web_search", r#"{"query":"AAPL"}"#);

    assert_eq!(
        registry.dispatch(&call).await,
        "Error: Tool 'web_search' not found"
    );
}

#[tokio::test]
async fn test_dispatch_rejects_bad_arguments() {
    let registry = default_registry();

    let unparsable = ToolCall::function("call_1", "get_stock_info", "AAPL");
    assert!(registry
        .dispatch(&unparsable)
        .await
        .starts_with("Error: failed to parse arguments for tool 'get_stock_info'"));

    let wrong_key = ToolCall::function("call_2", "get_stock_info", r#"{"symbol":"AAPL"}"#);
    assert!(registry
        .dispatch(&wrong_key)
        .await
        .starts_with("Error: invalid arguments for tool 'get_stock_info'"));
}

#[tokio::test]
async fn test_dispatch_lookup_error_becomes_text() {
    let registry = registry(
        StubMarket::new(Some(apple_quote()), apple_history()),
        StubEncyclopedia::new(None),
    );
    let call = ToolCall::function("call_1", "search_stock", r#"{"stock_ticker":"apple"}"#);

    assert_eq!(
        registry.dispatch(&call).await,
        "Error: encyclopedia unreachable"
    );
}

#[tokio::test]
async fn test_dispatch_lookup_success() {
    let registry = default_registry();
    let call = ToolCall::function("call_1", "search_stock", r#"{"stock_ticker":"apple"}"#);

    assert!(registry
        .dispatch(&call)
        .await
        .starts_with("Page: Apple Inc.\nSummary:"));
}

#[test]
fn test_prepare_reports_tool_errors() {
    let registry = default_registry();

    let unknown = ToolCall::function("call_1", "web_search", "{}");
    match registry.prepare(&unknown) {
        Err(FinsightError::ToolError(msg)) => assert_eq!(msg, "Tool 'web_search' not found"),
        other => panic!("expected a tool error, got {:?}", other),
    }

    let missing = ToolCall::function("call_2", "search_stock", "{}");
    assert!(matches!(
        registry.prepare(&missing),
        Err(FinsightError::ToolError(_))
    ));

    let call = ToolCall::function("call_3", "search_stock", r#"{"stock_ticker":"tesla"}"#);
    let (tool, argument) = registry.prepare(&call).unwrap();
    assert_eq!(tool, ToolKind::CompanyLookup);
    assert_eq!(argument, "tesla");
}
