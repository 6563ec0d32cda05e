use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use charla_config::OllamaConfig;
use charla_core::{extract, Backend, CharlaError, ChatMessage, Conversation, Overrides, Persona};

use crate::http::HttpBackend;

/// History-replay completion engine.
///
/// Owns the full message sequence and resends it on every turn. The first
/// element is always the persona's system prompt, inserted once at
/// construction and never removed.
pub struct ChatCompletionsEngine<P: Persona> {
    backend: Arc<dyn Backend>,
    model: String,
    persona: P,
    messages: Vec<ChatMessage>,
}

impl<P: Persona> ChatCompletionsEngine<P> {
    pub fn new(config: &OllamaConfig, persona: P) -> Self {
        let backend = Arc::new(HttpBackend::new(config.base_url(), config.api_key()));
        Self::with_backend(config.model(), persona, backend)
    }

    /// Construct against an explicit transport (tests inject mocks here).
    pub fn with_backend(
        model: impl Into<String>,
        persona: P,
        backend: Arc<dyn Backend>,
    ) -> Self {
        let messages = vec![ChatMessage::system(persona.system_prompt())];
        Self {
            backend,
            model: model.into(),
            persona,
            messages,
        }
    }

    /// The conversation as it will be replayed on the next request.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    fn build_payload(&self, overrides: &Overrides) -> Value {
        let mut payload = json!({
            "model": &self.model,
            "messages": &self.messages,
        });
        if let Value::Object(map) = &mut payload {
            for (key, value) in overrides {
                map.insert(key.clone(), value.clone());
            }
        }
        payload
    }
}

#[async_trait]
impl<P: Persona> Conversation for ChatCompletionsEngine<P> {
    type Reply = P::Reply;

    async fn continue_conversation(
        &mut self,
        input: &str,
        overrides: Overrides,
    ) -> Result<Self::Reply> {
        if input.trim().is_empty() {
            return Err(CharlaError::EmptyInput.into());
        }

        // The user turn lands in history before the call, so it survives a
        // failed round-trip exactly like a failed conversion afterwards.
        self.messages.push(ChatMessage::user(input));

        let payload = self.build_payload(&overrides);
        let raw = self.backend.execute("/chat/completions", &payload).await?;

        if let Some(text) = extract::chat_message_text(&raw) {
            self.messages.push(ChatMessage::assistant(text));
        }

        Ok(self.persona.handle_response(&raw))
    }
}
