pub mod api;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod history;
pub mod models;
pub mod rapidapi;
pub mod session;
pub mod storage;
pub mod summarizer;
pub mod translator;

use std::sync::Arc;
use config::Config;
use session::Session;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub session: Session,
}

impl AppState {
    /// Wires the RapidAPI clients and file-backed history described by `config`.
    pub fn from_config(config: Config) -> error::Result<Self> {
        let summarizer = summarizer::RapidSummarizer::new(config.summarizer.clone())?;
        let translator = translator::RapidTranslator::new(config.translator.clone())?;
        let storage = storage::FileStorage::new(config.history_path.clone());

        let session = Session::new(
            Arc::new(summarizer),
            Arc::new(translator),
            history::HistoryStore::new(Arc::new(storage)),
            Arc::new(clipboard::MemoryClipboard::new()),
            config.summary_length,
        );

        Ok(Self { session })
    }
}
