use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(name = "finsight")]
#[command(about = "Ask questions about public companies and stocks", long_about = None)]
pub struct Args {
    #[arg(
        short = 't',
        long = "ticker",
        value_name = "SYMBOL",
        help = "Run a stock analysis for a ticker symbol (e.g. AAPL, RELIANCE.NS)"
    )]
    pub ticker: Option<String>,

    #[arg(
        short = 'i',
        long = "interactive",
        help = "Keep asking questions in one session until /quit"
    )]
    pub interactive: bool,

    #[arg(long = "list-tickers", help = "Show the list of well-known ticker symbols")]
    pub list_tickers: bool,

    #[arg(long = "model", help = "Model name to use for answers")]
    pub model: Option<String>,

    #[arg(
        long = "api-endpoint",
        help = "Custom API base URL (e.g., http://localhost:11434/v1)"
    )]
    pub api_endpoint: Option<String>,

    #[arg(
        long = "max-iterations",
        help = "Maximum model calls per question before giving up"
    )]
    pub max_iterations: Option<usize>,

    #[arg(short = 'v', long = "verbose", help = "Log model and tool activity to stderr")]
    pub verbose: bool,

    #[arg(help = "Question about a company")]
    pub question: Vec<String>,
}
