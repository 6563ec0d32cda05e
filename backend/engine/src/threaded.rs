use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use charla_config::OpenAiConfig;
use charla_core::{extract, Backend, Conversation, Overrides, Persona};

use crate::http::HttpBackend;

/// Server-threading completion engine.
///
/// Keeps no local history; prior turns live on the backend side and are
/// referenced through the continuation token from the last response. Once a
/// token has been issued every subsequent request carries it.
pub struct ResponsesEngine<P: Persona> {
    backend: Arc<dyn Backend>,
    model: String,
    persona: P,
    previous_response_id: Option<String>,
}

impl<P: Persona> ResponsesEngine<P> {
    pub fn new(config: &OpenAiConfig, persona: P) -> Self {
        let backend = Arc::new(HttpBackend::new(
            HttpBackend::OPENAI_BASE_URL,
            config.api_key(),
        ));
        Self::with_backend(config.model(), persona, backend)
    }

    /// Construct against an explicit transport (tests inject mocks here).
    pub fn with_backend(
        model: impl Into<String>,
        persona: P,
        backend: Arc<dyn Backend>,
    ) -> Self {
        Self {
            backend,
            model: model.into(),
            persona,
            previous_response_id: None,
        }
    }

    /// Continuation token carried on the next request, if any.
    pub fn previous_response_id(&self) -> Option<&str> {
        self.previous_response_id.as_deref()
    }

    fn build_payload(&self, input: &str, overrides: &Overrides) -> Value {
        let mut payload = json!({
            "model": &self.model,
            "input": input,
            "instructions": self.persona.system_prompt(),
        });
        if let Value::Object(map) = &mut payload {
            if let Some(id) = &self.previous_response_id {
                map.insert("previous_response_id".into(), json!(id));
            }
            for (key, value) in overrides {
                map.insert(key.clone(), value.clone());
            }
        }
        payload
    }
}

#[async_trait]
impl<P: Persona> Conversation for ResponsesEngine<P> {
    type Reply = P::Reply;

    async fn continue_conversation(
        &mut self,
        input: &str,
        overrides: Overrides,
    ) -> Result<Self::Reply> {
        let payload = self.build_payload(input, &overrides);
        let raw = self.backend.execute("/responses", &payload).await?;

        if let Some(id) = extract::response_id(&raw) {
            self.previous_response_id = Some(id.to_string());
        }

        Ok(self.persona.handle_response(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::{SpanishThreadTutor, TUTOR_PROMPT};
    use std::sync::Mutex;

    struct MockBackend {
        responses: Mutex<Vec<Value>>,
        seen: Mutex<Vec<Value>>,
    }

    impl MockBackend {
        /// Answers with the given envelopes in order.
        fn new(responses: Vec<Value>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Backend for MockBackend {
        async fn execute(&self, _path: &str, payload: &Value) -> Result<Value> {
            self.seen.lock().unwrap().push(payload.clone());
            Ok(self.responses.lock().unwrap().remove(0))
        }
    }

    #[tokio::test]
    async fn test_second_request_carries_token_from_first() {
        let backend = MockBackend::new(vec![
            json!({"id": "resp_1", "output_text": "¡Hola!"}),
            json!({"id": "resp_2", "output_text": "Bien, ¿y tú?"}),
        ]);
        let mut engine = ResponsesEngine::with_backend(
            "gpt-4o-mini",
            SpanishThreadTutor,
            backend.clone(),
        );

        engine
            .continue_conversation("hola", Overrides::new())
            .await
            .unwrap();
        engine
            .continue_conversation("¿cómo estás?", Overrides::new())
            .await
            .unwrap();

        let seen = backend.seen.lock().unwrap();
        assert!(seen[0].get("previous_response_id").is_none());
        assert_eq!(seen[1]["previous_response_id"], "resp_1");
        assert_eq!(engine.previous_response_id(), Some("resp_2"));
    }

    #[tokio::test]
    async fn test_request_shape() {
        let backend = MockBackend::new(vec![json!({"id": "resp_1", "output_text": "ok"})]);
        let mut engine = ResponsesEngine::with_backend(
            "gpt-4o-mini",
            SpanishThreadTutor,
            backend.clone(),
        );

        let reply = engine
            .continue_conversation("enséñame el subjuntivo", Overrides::new())
            .await
            .unwrap();

        assert_eq!(reply, "ok");
        let seen = backend.seen.lock().unwrap();
        assert_eq!(seen[0]["model"], "gpt-4o-mini");
        assert_eq!(seen[0]["input"], "enséñame el subjuntivo");
        assert_eq!(seen[0]["instructions"], TUTOR_PROMPT);
    }

    #[tokio::test]
    async fn test_missing_id_leaves_token_unchanged() {
        let backend = MockBackend::new(vec![
            json!({"id": "resp_1", "output_text": "hola"}),
            json!({"output_text": "sin id"}),
        ]);
        let mut engine = ResponsesEngine::with_backend(
            "gpt-4o-mini",
            SpanishThreadTutor,
            backend,
        );

        engine
            .continue_conversation("uno", Overrides::new())
            .await
            .unwrap();
        engine
            .continue_conversation("dos", Overrides::new())
            .await
            .unwrap();

        assert_eq!(engine.previous_response_id(), Some("resp_1"));
    }

    #[tokio::test]
    async fn test_overrides_merge_last_write_wins() {
        let backend = MockBackend::new(vec![json!({"id": "r", "output_text": "ok"})]);
        let mut engine = ResponsesEngine::with_backend(
            "gpt-4o-mini",
            SpanishThreadTutor,
            backend.clone(),
        );

        let mut overrides = Overrides::new();
        overrides.insert("model".into(), json!("o4-mini"));
        engine
            .continue_conversation("hola", overrides)
            .await
            .unwrap();

        assert_eq!(backend.seen.lock().unwrap()[0]["model"], "o4-mini");
    }
}
