use std::sync::Arc;

use serde_json::Value;

use crate::api::ChatModel;
use crate::error::Result;
use crate::models::{ConversationState, Message, Query};
use crate::session::SessionStore;
use crate::tools::ToolRegistry;

/// Default bound on model invocations per run.
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// Shown when a run hits the iteration cap without a final answer.
pub const INCOMPLETE_MESSAGE: &str =
    "Sorry, I could not complete this request: the assistant kept calling tools without reaching an answer.";

/// Where the dialogue loop currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    AwaitingModel,
    ModelResponded,
    AwaitingTools,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The last assistant message is the final answer.
    Answered,
    /// The model was still requesting tools when the cap was reached.
    Exhausted { model_calls: usize },
}

/// Result of one controller run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub state: ConversationState,
    pub outcome: RunOutcome,
    /// Index of the first message appended by this run.
    pub first_new: usize,
    pub model_calls: usize,
}

impl RunReport {
    pub fn new_messages(&self) -> &[Message] {
        &self.state.messages[self.first_new..]
    }

    /// Content of the final assistant message, if the run produced one.
    pub fn answer(&self) -> Option<&str> {
        match self.outcome {
            RunOutcome::Answered => self.state.last_message().map(Message::content),
            RunOutcome::Exhausted { .. } => None,
        }
    }
}

/// Alternates between the language model and the tools until the model
/// answers without requesting a tool, or the iteration cap is reached.
pub struct DialogueController {
    model: Arc<dyn ChatModel>,
    tools: ToolRegistry,
    tool_specs: Vec<Value>,
    max_iterations: usize,
}

impl DialogueController {
    pub fn new(model: Arc<dyn ChatModel>, tools: ToolRegistry) -> Self {
        let tool_specs = tools.format_tools_for_llm();
        Self {
            model,
            tools,
            tool_specs,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Run one query against `state` and return the extended state.
    ///
    /// The input state is not modified; callers decide whether to keep the result.
    pub async fn run(&self, state: &ConversationState, query: &Query) -> Result<RunReport> {
        let mut state = state.clone();
        let first_new = state.messages.len();
        state.begin_turn(query);

        let mut model_calls = 0;
        let mut step = LoopState::AwaitingModel;

        loop {
            step = match step {
                LoopState::AwaitingModel => {
                    if model_calls >= self.max_iterations {
                        tracing::warn!(
                            model_calls,
                            "iteration cap reached while the model was still calling tools"
                        );
                        return Ok(RunReport {
                            state,
                            outcome: RunOutcome::Exhausted { model_calls },
                            first_new,
                            model_calls,
                        });
                    }

                    let reply = self.model.complete(&state.messages, &self.tool_specs).await?;
                    model_calls += 1;
                    tracing::debug!(
                        model_calls,
                        tool_calls = reply.tool_calls().len(),
                        "model responded"
                    );
                    state.messages.push(reply);
                    LoopState::ModelResponded
                }
                LoopState::ModelResponded => {
                    let wants_tools = state
                        .last_message()
                        .map(Message::has_tool_calls)
                        .unwrap_or(false);
                    if wants_tools {
                        LoopState::AwaitingTools
                    } else {
                        LoopState::Done
                    }
                }
                LoopState::AwaitingTools => {
                    let calls = state
                        .last_message()
                        .map(|m| m.tool_calls().to_vec())
                        .unwrap_or_default();

                    for call in &calls {
                        let content = self.tools.dispatch(call).await;
                        state.messages.push(Message::tool_result(&call.id, content));
                    }
                    LoopState::AwaitingModel
                }
                LoopState::Done => {
                    tracing::debug!(model_calls, "run finished with an answer");
                    return Ok(RunReport {
                        state,
                        outcome: RunOutcome::Answered,
                        first_new,
                        model_calls,
                    });
                }
            };
        }
    }

    /// Run a query on the conversation stored under `thread_id`.
    ///
    /// The thread stays locked for the whole run. The stored history is only
    /// replaced when the run returns `Ok`.
    pub async fn invoke(
        &self,
        store: &dyn SessionStore,
        thread_id: &str,
        query: &Query,
    ) -> Result<RunReport> {
        let slot = store.checkout(thread_id);
        let mut guard = slot.lock().await;

        tracing::debug!(thread_id, history = guard.messages.len(), "starting run");
        let report = self.run(&guard, query).await?;
        *guard = report.state.clone();

        Ok(report)
    }
}
