use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Extra request fields merged into the outgoing payload last-write-wins,
/// so a caller can override anything the engine sets, including `model`.
pub type Overrides = serde_json::Map<String, Value>;

/// Transport seam between a completion engine and the remote API.
///
/// Implementors encapsulate HTTP details, auth headers, and endpoint
/// resolution; engines see only "POST this payload to this path and give me
/// the raw response envelope".
#[async_trait]
pub trait Backend: Send + Sync {
    /// Send a JSON payload to an API path and return the raw response body.
    async fn execute(&self, path: &str, payload: &Value) -> Result<Value>;
}

/// The one capability both engine variants expose: continue a conversation
/// with new user input and produce a persona-typed reply.
///
/// How prior turns reach the backend is the implementor's business —
/// replaying an owned message history, or referencing a server-side thread
/// through a continuation token.
#[async_trait]
pub trait Conversation: Send {
    type Reply;

    async fn continue_conversation(
        &mut self,
        input: &str,
        overrides: Overrides,
    ) -> Result<Self::Reply>;
}

/// A fixed assistant behavior: one system prompt plus the rule for turning
/// a raw response envelope into the reply type surfaced to callers.
///
/// `handle_response` receives the raw envelope rather than pre-extracted
/// text, so a persona may return a richer structured reply.
pub trait Persona: Send + Sync {
    type Reply: Send;

    fn system_prompt(&self) -> &str;

    fn handle_response(&self, raw: &Value) -> Self::Reply;
}
