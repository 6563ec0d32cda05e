pub mod error;
pub mod extract;
pub mod message;
pub mod traits;

pub use error::CharlaError;
pub use message::{ChatMessage, Role};
pub use traits::{Backend, Conversation, Overrides, Persona};
