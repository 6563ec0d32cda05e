use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::warn;

use charla_core::ChatMessage;

use crate::lock::PathLock;

/// File-backed store for the visible chat transcript.
///
/// Every operation takes the exclusive advisory lock on a sibling `.lock`
/// marker for its own duration only; nothing spans a load and a later save,
/// so two processes may interleave between a turn's read and write. Saves
/// always rewrite the whole file, and a torn write is tolerated at the next
/// load as "no usable history".
pub struct TranscriptStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl TranscriptStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let lock_path = path.with_extension("lock");
        Self { path, lock_path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted transcript.
    ///
    /// A missing file, an unreadable file, unparseable content, or a parsed
    /// value that is not an array all yield an empty transcript. Entries
    /// with an unknown role or blank content are filtered out.
    pub fn load(&self) -> Vec<ChatMessage> {
        if !self.path.exists() {
            return Vec::new();
        }

        let _guard = match PathLock::acquire(&self.lock_path) {
            Ok(guard) => guard,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "transcript lock failed, treating as empty");
                return Vec::new();
            }
        };

        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "transcript unreadable, treating as empty");
                return Vec::new();
            }
        };

        let value: Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "transcript malformed, treating as empty");
                return Vec::new();
            }
        };

        let Some(entries) = value.as_array() else {
            warn!(path = %self.path.display(), "transcript is not a message list, treating as empty");
            return Vec::new();
        };

        entries.iter().filter_map(parse_entry).collect()
    }

    /// Rewrite the whole backing file with the given messages,
    /// pretty-printed UTF-8 with non-ASCII characters kept literal.
    pub fn save(&self, messages: &[ChatMessage]) -> Result<()> {
        let _guard = PathLock::acquire(&self.lock_path)?;
        let text = serde_json::to_string_pretty(messages)
            .context("failed to serialize transcript")?;
        fs::write(&self.path, text)
            .with_context(|| format!("failed to write transcript {}", self.path.display()))
    }

    /// Reset to an empty transcript. The only supported deletion.
    pub fn clear(&self) -> Result<()> {
        self.save(&[])
    }
}

/// Accept only entries with an allow-listed role and non-blank content.
fn parse_entry(entry: &Value) -> Option<ChatMessage> {
    let message: ChatMessage = serde_json::from_value(entry.clone()).ok()?;
    if message.content.trim().is_empty() {
        return None;
    }
    Some(message)
}
