use crate::error::{FinsightError, Result};
use crate::models::{Message, ToolCall};
use serde_json::Value;
use uuid::Uuid;

fn first_message(response_json: &Value) -> Result<&Value> {
    let choices = response_json
        .get("choices")
        .and_then(|c| c.as_array())
        .ok_or_else(|| FinsightError::Other("No choices in response".to_string()))?;

    let first_choice = choices
        .first()
        .ok_or_else(|| FinsightError::Other("Empty choices array".to_string()))?;

    first_choice
        .get("message")
        .ok_or_else(|| FinsightError::Other("No message in response".to_string()))
}

/// Parse a non-streaming API response and extract tool calls if present
pub fn parse_tool_calls(response_json: &Value) -> Result<Option<Vec<Value>>> {
    let message = first_message(response_json)?;

    if let Some(tool_calls) = message.get("tool_calls").and_then(|tc| tc.as_array()) {
        if !tool_calls.is_empty() {
            return Ok(Some(tool_calls.clone()));
        }
    }

    Ok(None)
}

/// Extract content from a non-streaming response
pub fn extract_content(response_json: &Value) -> Result<Option<String>> {
    let message = first_message(response_json)?;

    Ok(message
        .get("content")
        .and_then(|c| c.as_str())
        .map(|s| s.to_string()))
}

/// Convert one raw `tool_calls` entry into a typed call.
///
/// Entries without an id get a generated one so the tool result can still be
/// correlated; a missing argument string is treated as an empty object. A
/// missing function name is kept empty and rejected later by the dispatcher.
pub fn to_tool_call(raw: &Value) -> ToolCall {
    let id = raw
        .get("id")
        .and_then(|i| i.as_str())
        .filter(|i| !i.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("call_{}", Uuid::new_v4().simple()));

    let function = raw.get("function");
    let name = function
        .and_then(|f| f.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or_default();
    let arguments = match function.and_then(|f| f.get("arguments")) {
        Some(Value::String(s)) => s.clone(),
        // Some providers send the arguments as an object rather than a JSON string
        Some(Value::Object(map)) => Value::Object(map.clone()).to_string(),
        _ => "{}".to_string(),
    };

    ToolCall::function(id, name, arguments)
}

/// Build the assistant message carried by a non-streaming response.
pub fn parse_assistant_message(response_json: &Value) -> Result<Message> {
    let content = extract_content(response_json)?.unwrap_or_default();
    let tool_calls = parse_tool_calls(response_json)?
        .unwrap_or_default()
        .iter()
        .map(to_tool_call)
        .collect();

    Ok(Message::assistant_with_tool_calls(content, tool_calls))
}
