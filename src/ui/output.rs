use colored::*;
use terminal_size::{terminal_size, Width};

use crate::models::Message;
use crate::orchestrator::INCOMPLETE_MESSAGE;
use crate::tickers::COMMON_TICKERS;

fn rule_width() -> usize {
    terminal_size()
        .map(|(Width(w), _)| w as usize)
        .unwrap_or(80)
        .clamp(20, 100)
}

/// First character upper-cased, the rest lower-cased.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Chat bubble text for a message, or `None` for messages that are not shown
/// (system prompts, tool results, and assistant turns with no text).
pub fn render_message(message: &Message) -> Option<(&'static str, String)> {
    match message {
        Message::User { content } if !content.is_empty() => Some(("You", capitalize(content))),
        Message::Assistant { content, .. } if !content.is_empty() => {
            Some(("FinSight", content.clone()))
        }
        _ => None,
    }
}

pub fn display_conversation(messages: &[Message]) {
    let width = rule_width();
    for message in messages {
        if let Some((speaker, text)) = render_message(message) {
            let header = format!("┌─ {} ", speaker);
            let fill = "─".repeat(width.saturating_sub(header.chars().count()));
            let header = format!("{}{}", header, fill);
            match message {
                Message::User { .. } => println!("{}", header.cyan()),
                _ => println!("{}", header.green()),
            }
            println!("{}", text.trim_end());
            println!();
        }
    }
}

/// Boxed view of the tool calls and tool results in a run.
pub fn display_tool_activity(messages: &[Message]) {
    for message in messages {
        match message {
            Message::Assistant { tool_calls, .. } => {
                for call in tool_calls {
                    eprintln!(
                        "{}",
                        format!("Calling tool: {} {}", call.function.name, call.function.arguments)
                            .cyan()
                    );
                }
            }
            Message::Tool {
                content,
                tool_call_id,
            } => {
                eprintln!("{}", format!("┌─ TOOL RESULT {} ", tool_call_id).dimmed());
                for line in content.lines() {
                    eprintln!("{} {}", "│".dimmed(), line);
                }
                eprintln!("{}", "└─".dimmed());
            }
            _ => {}
        }
    }
}

pub fn display_incomplete() {
    println!("{}", INCOMPLETE_MESSAGE.yellow());
}

pub fn display_error(message: &str) {
    eprintln!("{} {}", "Error:".red(), message);
}

pub fn display_tickers() {
    for (symbol, name) in COMMON_TICKERS {
        println!("{} {}", format!("{:<14}", symbol).bold(), name.dimmed());
    }
}
