use clap::Parser;
use colored::*;
use std::io::{self, IsTerminal, Write};
use std::process;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{fmt, EnvFilter};

use finsight::api::GroqChatModel;
use finsight::cli::Args;
use finsight::config::{Config, API_KEY_ENV};
use finsight::error::Result;
use finsight::models::{Query, QUESTION_THREAD, TICKER_THREAD};
use finsight::orchestrator::{DialogueController, RunOutcome};
use finsight::providers::{WikipediaClient, YahooFinanceClient};
use finsight::session::{MemorySessionStore, SessionStore};
use finsight::tools::{CompanyLookupTool, MarketDataTool, ToolRegistry};
use finsight::{tickers, ui};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if args.list_tickers {
        ui::display_tickers();
        return;
    }

    let query = if let Some(ticker) = &args.ticker {
        Some(Query::ticker(ticker))
    } else if !args.question.is_empty() {
        Some(Query::question(args.question.join(" ")))
    } else {
        None
    };

    if query.as_ref().map_or(!args.interactive, Query::is_empty) {
        print_usage();
        process::exit(1);
    }

    let mut config = match Config::from_env_and_args(&args) {
        Ok(config) => config,
        Err(e) => {
            ui::display_error(&e.to_string());
            process::exit(1);
        }
    };

    init_tracing(config.verbose);

    if config.api_key.is_none() {
        match prompt_for_api_key() {
            Ok(key) => config.api_key = key,
            Err(e) => {
                ui::display_error(&e.to_string());
                process::exit(1);
            }
        }
    }

    let controller = match build_controller(&config) {
        Ok(controller) => controller,
        Err(e) => {
            ui::display_error(&e.to_string());
            process::exit(1);
        }
    };
    let store = MemorySessionStore::new();

    let result = match query {
        Some(query) => run_query(&controller, &store, &query, config.verbose, false).await,
        None => run_interactive(&controller, &store, config.verbose).await,
    };

    if let Err(e) = result {
        ui::display_error(&e.to_string());
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "finsight=debug" } else { "finsight=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn print_usage() {
    eprintln!("{}", "Usage: finsight [OPTIONS] <question>".red());
    eprintln!(
        "{}",
        "  -t, --ticker <SYMBOL>      Analyze a stock ticker instead of asking a question".dimmed()
    );
    eprintln!(
        "{}",
        "  -i, --interactive          Ask several questions in one session".dimmed()
    );
    eprintln!(
        "{}",
        "      --list-tickers         Show well-known ticker symbols".dimmed()
    );
    eprintln!(
        "{}",
        "      --max-iterations <N>   Maximum model calls per question".dimmed()
    );
    eprintln!(
        "{}",
        "  -v, --verbose              Show model and tool activity".dimmed()
    );
}

/// Ask for the credential once; it lives only in this process.
fn prompt_for_api_key() -> Result<Option<String>> {
    if !io::stdin().is_terminal() {
        return Ok(None);
    }

    eprint!("{}", format!("Enter your {}: ", API_KEY_ENV).yellow());
    io::stderr().flush()?;

    let mut key = String::new();
    io::stdin().read_line(&mut key)?;
    let key = key.trim().to_string();

    Ok(if key.is_empty() { None } else { Some(key) })
}

fn build_controller(config: &Config) -> Result<DialogueController> {
    let api_key = config.require_api_key()?;

    let mut model = GroqChatModel::new(
        api_key,
        &config.api_endpoint,
        &config.model,
        config.request_timeout,
    );
    if let Some(prompt) = &config.system_prompt {
        model = model.with_system_prompt(prompt.clone());
    }

    let market = YahooFinanceClient::new(&config.market.base_url, config.request_timeout)?;
    let encyclopedia =
        WikipediaClient::new(&config.encyclopedia.endpoint, config.request_timeout)?;

    let tools = ToolRegistry::new(
        MarketDataTool::new(Arc::new(market)),
        CompanyLookupTool::new(
            Arc::new(encyclopedia),
            config.encyclopedia.top_k,
            config.encyclopedia.max_chars,
        ),
    );

    tracing::debug!(
        model = %model.model(),
        endpoint = %config.api_endpoint,
        max_iterations = config.max_iterations,
        "controller ready"
    );

    Ok(DialogueController::new(Arc::new(model), tools).with_max_iterations(config.max_iterations))
}

async fn run_query(
    controller: &DialogueController,
    store: &dyn SessionStore,
    query: &Query,
    verbose: bool,
    only_new: bool,
) -> Result<()> {
    if let Some(name) = query.ticker_symbol().and_then(tickers::company_name) {
        println!("{}", format!("Analyzing {}...", name).dimmed());
    }

    let report = controller.invoke(store, query.thread_id(), query).await?;

    if verbose {
        ui::display_tool_activity(report.new_messages());
    }

    if only_new {
        ui::display_conversation(report.new_messages());
    } else {
        ui::display_conversation(&report.state.messages);
    }

    if let RunOutcome::Exhausted { .. } = report.outcome {
        ui::display_incomplete();
    }

    Ok(())
}

async fn run_interactive(
    controller: &DialogueController,
    store: &dyn SessionStore,
    verbose: bool,
) -> Result<()> {
    println!(
        "{}",
        "Ask about a company, or use /ticker <SYMBOL>, /tickers, /history, /clear, /quit".dimmed()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("{}", "> ".bold());
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();

        let query = match line.split_once(' ').unwrap_or((line, "")) {
            ("", _) => continue,
            ("/quit", _) | ("/exit", _) => break,
            ("/tickers", _) => {
                ui::display_tickers();
                continue;
            }
            ("/history", _) => {
                for thread_id in [QUESTION_THREAD, TICKER_THREAD] {
                    if let Some(state) = store.snapshot(thread_id) {
                        ui::display_conversation(&state.messages);
                    }
                }
                continue;
            }
            ("/clear", _) => {
                store.clear_all_sessions();
                println!("{}", "Conversation history cleared.".green());
                continue;
            }
            ("/ticker", symbol) if !symbol.trim().is_empty() => Query::ticker(symbol),
            ("/ticker", _) => {
                ui::display_error("Usage: /ticker <SYMBOL>");
                continue;
            }
            _ => Query::question(line),
        };

        if let Err(e) = run_query(controller, store, &query, verbose, true).await {
            ui::display_error(&e.to_string());
        }
    }

    Ok(())
}
