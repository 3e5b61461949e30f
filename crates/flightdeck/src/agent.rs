use anyhow::Result;
use indoc::indoc;
use tracing::{debug, warn};

use crate::errors::{AgentError, AgentResult};
use crate::models::message::Message;
use crate::models::tool::{InvalidToolCall, Tool, ToolCall};
use crate::providers::base::Provider;
use crate::systems::System;

/// Provider round-trips allowed per user turn.
const MAX_ITERATIONS: usize = 5;

/// Returned when the round budget runs out without a usable answer.
const FALLBACK_REPLY: &str =
    "I apologize, but I'm having trouble processing your request. Please try again.";

const BASE_PROMPT: &str = indoc! {"
    You are a friendly and helpful AI flight booking assistant.

    Provide clear, concise, and helpful responses.
"};

/// Agent integrates a chat completion provider with the systems whose
/// tools it can call.
pub struct Agent {
    systems: Vec<Box<dyn System>>,
    provider: Box<dyn Provider>,
    max_iterations: usize,
}

impl Agent {
    /// Create a new Agent with the specified provider
    pub fn new(provider: Box<dyn Provider>) -> Self {
        Self {
            systems: Vec::new(),
            provider,
            max_iterations: MAX_ITERATIONS,
        }
    }

    /// Add a system to the agent
    pub fn add_system(&mut self, system: Box<dyn System>) {
        self.systems.push(system);
    }

    /// All declared tools across systems, sent with every provider call
    fn get_tools(&self) -> Vec<Tool> {
        self.systems
            .iter()
            .flat_map(|system| system.tools().iter().cloned())
            .collect()
    }

    /// Find the system declaring a tool
    fn get_system_for_tool(&self, name: &str) -> Option<&dyn System> {
        self.systems
            .iter()
            .find(|system| system.tools().iter().any(|tool| tool.name == name))
            .map(|system| &**system)
    }

    fn get_system_prompt(&self) -> String {
        let mut sections = vec![BASE_PROMPT.trim().to_string()];
        for system in &self.systems {
            sections.push(system.instructions().trim().to_string());
        }
        sections.join("\n\n")
    }

    /// Dispatch a single tool call. Failures come back as Err and are
    /// relayed to the model as tool output text, never ending the turn.
    async fn dispatch_tool_call(
        &self,
        tool_call: Result<ToolCall, InvalidToolCall>,
    ) -> AgentResult<String> {
        let call = tool_call.map_err(|invalid| invalid.error)?;
        let system = self
            .get_system_for_tool(&call.name)
            .ok_or_else(|| AgentError::ToolNotFound(call.name.clone()))?;

        system.call(call).await
    }

    /// Run the conversation until the model answers in plain text or
    /// the round budget is exhausted, returning the final answer.
    ///
    /// The caller keeps ownership of the transcript; the working copy
    /// grown here (assistant and tool messages included) lives only
    /// for this turn.
    pub async fn reply(&self, messages: &[Message]) -> Result<String> {
        let mut messages = messages.to_vec();
        let tools = self.get_tools();
        let system_prompt = self.get_system_prompt();

        let mut last_content = String::new();
        let mut iteration = 0;

        while iteration < self.max_iterations {
            // Provider failure is fatal for the turn, no retry
            let (response, usage) = self
                .provider
                .complete(&system_prompt, &messages, &tools)
                .await?;
            debug!(
                input_tokens = ?usage.input_tokens,
                output_tokens = ?usage.output_tokens,
                "provider round complete"
            );

            // Keep the assistant message verbatim, ids and argument
            // text included, so the provider can validate pairing on
            // the next round
            messages.push(response.clone());
            last_content = response.text();

            let tool_requests = response.tool_requests();
            if tool_requests.is_empty() {
                return Ok(last_content);
            }

            // Strictly sequential and in emission order: a later call
            // may depend on an earlier result
            let mut tool_response = Message::user();
            for request in tool_requests {
                debug!(id = %request.id, "dispatching tool call");
                let output = self.dispatch_tool_call(request.tool_call.clone()).await;
                if let Err(ref e) = output {
                    warn!(id = %request.id, error = %e, "tool call failed, relaying error to the model");
                }
                tool_response = tool_response.with_tool_response(request.id.clone(), output);
            }
            messages.push(tool_response);

            iteration += 1;
        }

        debug!("reply budget exhausted after {} rounds", self.max_iterations);
        if last_content.is_empty() {
            Ok(FALLBACK_REPLY.to_string())
        } else {
            Ok(last_content)
        }
    }
}
