pub mod lock;
pub mod store;

pub use lock::PathLock;
pub use store::TranscriptStore;
