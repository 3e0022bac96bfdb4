/// Well-known symbols offered for ticker analysis. Any other symbol is accepted too.
pub const COMMON_TICKERS: &[(&str, &str)] = &[
    // US tech
    ("AAPL", "Apple Inc."),
    ("MSFT", "Microsoft"),
    ("GOOGL", "Alphabet (Class A)"),
    ("AMZN", "Amazon"),
    ("META", "Meta Platforms"),
    ("TSLA", "Tesla"),
    ("NFLX", "Netflix"),
    ("NVDA", "NVIDIA"),
    // US finance and retail
    ("JPM", "JPMorgan Chase"),
    ("BAC", "Bank of America"),
    ("WMT", "Walmart"),
    ("V", "Visa"),
    ("MA", "Mastercard"),
    ("DIS", "Walt Disney"),
    // India (NSE)
    ("RELIANCE.NS", "Reliance Industries"),
    ("TCS.NS", "Tata Consultancy Services"),
    ("INFY.NS", "Infosys"),
    ("HDFCBANK.NS", "HDFC Bank"),
    ("ICICIBANK.NS", "ICICI Bank"),
    ("SBIN.NS", "State Bank of India"),
    ("BAJAJ-AUTO.NS", "Bajaj Auto"),
    ("ITC.NS", "ITC Limited"),
    ("WIPRO.NS", "Wipro"),
    ("LT.NS", "Larsen & Toubro"),
    // Europe
    ("SAP.DE", "SAP"),
    ("SIE.DE", "Siemens"),
    ("AIR.PA", "Airbus"),
    ("NESN.SW", "Nestlé"),
    // ETFs
    ("QQQ", "NASDAQ-100 ETF"),
    ("SPY", "S&P 500 ETF"),
    ("VTI", "Total US Market ETF"),
];

pub fn company_name(symbol: &str) -> Option<&'static str> {
    COMMON_TICKERS
        .iter()
        .find(|(ticker, _)| ticker.eq_ignore_ascii_case(symbol.trim()))
        .map(|(_, name)| *name)
}
