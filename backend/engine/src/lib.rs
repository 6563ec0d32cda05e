pub mod chat;
pub mod http;
pub mod persona;
pub mod threaded;

pub use chat::ChatCompletionsEngine;
pub use http::HttpBackend;
pub use persona::{SpanishThreadTutor, SpanishTutor, TUTOR_PROMPT};
pub use threaded::ResponsesEngine;
