use std::sync::Mutex;
use tracing::info;
use crate::error::{AppError, Result};

pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<()>;
}

/// Holds the last copied text for the client to pick up; the server has no
/// access to the user's system clipboard.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|c| c.clone())
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        let mut contents = self
            .contents
            .lock()
            .map_err(|e| AppError::StorageError(e.to_string()))?;
        *contents = Some(text.to_string());
        info!("Copied {} to clipboard", text);
        Ok(())
    }
}
