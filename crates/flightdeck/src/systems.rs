use async_trait::async_trait;

use crate::errors::AgentResult;
use crate::models::tool::{Tool, ToolCall};

/// A System provides tools the orchestration loop can dispatch during
/// a reply.
#[async_trait]
pub trait System: Send + Sync {
    /// The name of the system
    fn name(&self) -> &str;

    /// A brief description of what the system does
    fn description(&self) -> &str;

    /// Model-facing instructions, merged into the system prompt
    fn instructions(&self) -> &str;

    /// The tools this system declares; immutable for the process
    /// lifetime
    fn tools(&self) -> &[Tool];

    /// Execute one tool call. Tool-level failures belong in the Ok
    /// text or the AgentError; neither ends the turn.
    async fn call(&self, tool_call: ToolCall) -> AgentResult<String>;
}
