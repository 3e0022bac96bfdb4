use jsonschema::{Draft, JSONSchema};
use serde_json::{json, Value};
use std::collections::HashMap;

use super::company_lookup::CompanyLookupTool;
use super::market_data::MarketDataTool;
use crate::error::{FinsightError, Result};
use crate::models::ToolCall;

/// The closed set of tools the model may call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    MarketData,
    CompanyLookup,
}

impl ToolKind {
    pub const ALL: [ToolKind; 2] = [ToolKind::MarketData, ToolKind::CompanyLookup];

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::MarketData => "get_stock_info",
            ToolKind::CompanyLookup => "search_stock",
        }
    }

    /// The single string argument each tool takes.
    pub fn argument(&self) -> &'static str {
        match self {
            ToolKind::MarketData => "ticker",
            ToolKind::CompanyLookup => "stock_ticker",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolKind::MarketData => {
                "Get detailed stock info for a given ticker symbol (e.g., AAPL, TSLA). \
                 Includes current stats, recent historical data, and trend."
            }
            ToolKind::CompanyLookup => {
                "Search Wikipedia for a given company or stock ticker. \
                 Returns a detailed explanation of the company, such as its past, \
                 recent major news and controversies."
            }
        }
    }

    pub fn input_schema(&self) -> Value {
        let argument_description = match self {
            ToolKind::MarketData => "Ticker symbol, e.g. AAPL or RELIANCE.NS",
            ToolKind::CompanyLookup => "Company name or ticker symbol to look up",
        };

        json!({
            "type": "object",
            "properties": {
                self.argument(): {
                    "type": "string",
                    "description": argument_description
                }
            },
            "required": [self.argument()],
            "additionalProperties": false
        })
    }
}

pub struct ToolRegistry {
    tools: HashMap<&'static str, ToolKind>,
    market_data: MarketDataTool,
    company_lookup: CompanyLookupTool,
}

impl ToolRegistry {
    pub fn new(market_data: MarketDataTool, company_lookup: CompanyLookupTool) -> Self {
        let tools = ToolKind::ALL
            .iter()
            .map(|kind| (kind.name(), *kind))
            .collect();

        Self {
            tools,
            market_data,
            company_lookup,
        }
    }

    pub fn get(&self, name: &str) -> Option<ToolKind> {
        self.tools.get(name).copied()
    }

    /// Tools in declaration order.
    pub fn list(&self) -> Vec<ToolKind> {
        ToolKind::ALL
            .iter()
            .copied()
            .filter(|kind| self.tools.contains_key(kind.name()))
            .collect()
    }

    pub fn format_tools_for_llm(&self) -> Vec<Value> {
        self.list()
            .iter()
            .map(|tool| {
                json!({
                    "type": "function",
                    "function": {
                        "name": tool.name(),
                        "description": tool.description(),
                        "parameters": tool.input_schema(),
                    }
                })
            })
            .collect()
    }

    pub fn validate_arguments(
        &self,
        tool: ToolKind,
        arguments: &Value,
    ) -> std::result::Result<(), String> {
        let schema_json = tool.input_schema();
        let schema = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&schema_json)
            .map_err(|e| format!("Invalid tool schema: {}", e))?;

        if let Err(errors) = schema.validate(arguments) {
            let error_messages: Vec<String> = errors
                .map(|e| format!("{}: {}", e.instance_path, e))
                .collect();
            return Err(error_messages.join("; "));
        }

        Ok(())
    }

    /// Resolve a tool-call request to its tool and single string argument.
    pub fn prepare(&self, call: &ToolCall) -> Result<(ToolKind, String)> {
        let name = call.function.name.as_str();

        let tool = self
            .get(name)
            .ok_or_else(|| FinsightError::ToolError(format!("Tool '{}' not found", name)))?;

        let arguments: Value = serde_json::from_str(&call.function.arguments).map_err(|err| {
            FinsightError::ToolError(format!(
                "failed to parse arguments for tool '{}' : {}",
                name, err
            ))
        })?;

        self.validate_arguments(tool, &arguments).map_err(|err| {
            FinsightError::ToolError(format!("invalid arguments for tool '{}': {}", name, err))
        })?;

        let argument = arguments
            .get(tool.argument())
            .and_then(|a| a.as_str())
            .unwrap_or_default()
            .to_string();

        Ok((tool, argument))
    }

    /// Run one tool-call request and return the text of its tool result.
    ///
    /// Every request yields a result; malformed requests and tool errors come
    /// back as `Error: ...` text so the model can react to them.
    pub async fn dispatch(&self, call: &ToolCall) -> String {
        match self.execute(call).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    tool = %call.function.name,
                    call_id = %call.id,
                    error = %e,
                    "tool call failed"
                );
                format!("Error: {}", e)
            }
        }
    }

    async fn execute(&self, call: &ToolCall) -> Result<String> {
        let (tool, argument) = self.prepare(call)?;
        tracing::info!(tool = tool.name(), argument = %argument, call_id = %call.id, "calling tool");

        match tool {
            ToolKind::MarketData => Ok(self.market_data.fetch(&argument).await),
            ToolKind::CompanyLookup => self.company_lookup.lookup(&argument).await,
        }
    }
}
