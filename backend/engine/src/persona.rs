use serde_json::Value;

use charla_core::{extract, Persona};

/// Tutoring instructions shared by both engine variants.
pub const TUTOR_PROMPT: &str = "You are a patient, encouraging Spanish tutor. \
     Respond in Spanish, explain mistakes clearly, and provide brief examples.";

/// Spanish tutor over the history-replay API. Reads the nested
/// `choices[0].message.content` path; any shape mismatch degrades to an
/// empty reply.
pub struct SpanishTutor;

impl Persona for SpanishTutor {
    type Reply = String;

    fn system_prompt(&self) -> &str {
        TUTOR_PROMPT
    }

    fn handle_response(&self, raw: &Value) -> String {
        extract::chat_message_text(raw).unwrap_or_default().to_string()
    }
}

/// Spanish tutor over the server-threading API. Reads the top-level
/// aggregated `output_text` field.
pub struct SpanishThreadTutor;

impl Persona for SpanishThreadTutor {
    type Reply = String;

    fn system_prompt(&self) -> &str {
        TUTOR_PROMPT
    }

    fn handle_response(&self, raw: &Value) -> String {
        extract::aggregated_output_text(raw)
            .unwrap_or_default()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_persona_extracts_text() {
        let raw = json!({"choices": [{"message": {"content": "Muy bien."}}]});
        assert_eq!(SpanishTutor.handle_response(&raw), "Muy bien.");
    }

    #[test]
    fn test_chat_persona_degrades_to_empty() {
        assert_eq!(SpanishTutor.handle_response(&json!({"error": "boom"})), "");
    }

    #[test]
    fn test_thread_persona_reads_output_text() {
        let raw = json!({"id": "resp_1", "output_text": "Claro que sí."});
        assert_eq!(SpanishThreadTutor.handle_response(&raw), "Claro que sí.");
        assert_eq!(SpanishThreadTutor.handle_response(&json!({})), "");
    }
}
