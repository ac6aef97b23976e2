//! The interactive core: current article, display language, history and
//! the sequencing of summarization and translation requests.
//!
//! Every request takes a ticket from a monotonically increasing counter.
//! A response is applied only while its ticket is still the pending one;
//! any later submit, selection or language change replaces or clears it,
//! so the most recent action always decides the final display.

use std::sync::Arc;
use std::time::Duration;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;
use crate::clipboard::Clipboard;
use crate::error::{AppError, Result};
use crate::history::HistoryStore;
use crate::models::{ArticleRecord, Language};
use crate::summarizer::{Summarizer, STATUS_EXTRACTION_FAILED};
use crate::translator::Translator;

/// How long a copied URL stays marked as copied.
pub const COPY_MARKER_TTL: Duration = Duration::from_millis(3000);

pub const ERROR_HEADLINE: &str = "Something went wrong...";
pub const EXTRACTION_FAILED_DETAIL: &str = "Could not extract article text from the page";
pub const EMPTY_SUMMARY_DETAIL: &str = "No summary was produced for this page";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    Summarize,
    Translate,
}

/// A failure as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UiError {
    pub request: RequestKind,
    pub headline: String,
    pub detail: Option<String>,
    pub status: Option<u16>,
}

impl UiError {
    fn new(request: RequestKind, detail: Option<String>, status: Option<u16>) -> Self {
        Self {
            request,
            headline: ERROR_HEADLINE.to_string(),
            detail,
            status,
        }
    }

    /// Only the extraction failure gets a specific explanation.
    fn summarize(err: &AppError) -> Self {
        match err {
            AppError::UpstreamError { status, .. } if *status == STATUS_EXTRACTION_FAILED => Self::new(
                RequestKind::Summarize,
                Some(EXTRACTION_FAILED_DETAIL.to_string()),
                Some(*status),
            ),
            AppError::UpstreamError { status, .. } => Self::new(RequestKind::Summarize, None, Some(*status)),
            _ => Self::new(RequestKind::Summarize, None, None),
        }
    }

    fn empty_summary() -> Self {
        Self::new(RequestKind::Summarize, Some(EMPTY_SUMMARY_DETAIL.to_string()), None)
    }

    fn translate(err: &AppError) -> Self {
        match err {
            AppError::UpstreamError { status, message } => {
                Self::new(RequestKind::Translate, message.clone(), Some(*status))
            }
            AppError::UpstreamRejected { message } => {
                Self::new(RequestKind::Translate, message.clone(), None)
            }
            _ => Self::new(RequestKind::Translate, None, None),
        }
    }
}

/// State of the display region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Loading,
    Error(UiError),
    Ready,
}

#[derive(Debug, Clone, Serialize)]
pub struct LanguageOption {
    pub code: Language,
    pub label: &'static str,
}

/// Everything the client needs to render the page.
#[derive(Debug, Clone, Serialize)]
pub struct View {
    pub phase: Phase,
    pub article: Option<ArticleRecord>,
    pub language: Language,
    /// Text shown in the summary box.
    pub body: Option<String>,
    pub copied: Option<String>,
    pub history: Vec<ArticleRecord>,
    pub languages: Vec<LanguageOption>,
}

#[derive(Debug, Default)]
struct State {
    current: Option<ArticleRecord>,
    language: Language,
    translated: Option<String>,
    history: Vec<ArticleRecord>,
    /// Outcome of the last applied request; `Loading` is derived from `pending`.
    outcome: Option<std::result::Result<(), UiError>>,
    issued: u64,
    /// Ticket of the request the display is waiting on. Any later action
    /// replaces or clears it, so only the most recent request can land.
    pending: Option<u64>,
    copied: Option<String>,
    copy_generation: u64,
}

impl State {
    fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    fn phase(&self) -> Phase {
        if self.pending.is_some() {
            return Phase::Loading;
        }
        match &self.outcome {
            None => Phase::Idle,
            Some(Ok(())) => Phase::Ready,
            Some(Err(e)) => Phase::Error(e.clone()),
        }
    }

    fn body(&self, phase: &Phase) -> Option<String> {
        let article = self.current.as_ref()?;
        match phase {
            Phase::Idle | Phase::Loading => None,
            Phase::Error(e) if e.request == RequestKind::Summarize => None,
            // A failed translation falls back to the original summary.
            Phase::Error(_) => Some(article.summary.clone()),
            Phase::Ready => match (&self.translated, self.language.is_source()) {
                (Some(translated), false) => Some(translated.clone()),
                _ => Some(article.summary.clone()),
            },
        }
    }

    fn show(&mut self, record: ArticleRecord) {
        self.current = Some(record);
        self.language = Language::En;
        self.translated = None;
        self.outcome = Some(Ok(()));
    }

    /// Takes the pending slot back if `ticket` still owns it.
    fn settle(&mut self, ticket: u64) -> bool {
        if self.pending != Some(ticket) {
            return false;
        }
        self.pending = None;
        true
    }

    fn view(&self) -> View {
        let phase = self.phase();
        View {
            body: self.body(&phase),
            phase,
            article: self.current.clone(),
            language: self.language,
            copied: self.copied.clone(),
            history: self.history.clone(),
            languages: Language::ALL
                .into_iter()
                .map(|code| LanguageOption { code, label: code.label() })
                .collect(),
        }
    }
}

struct Inner {
    state: Mutex<State>,
    summarizer: Arc<dyn Summarizer>,
    translator: Arc<dyn Translator>,
    history: HistoryStore,
    clipboard: Arc<dyn Clipboard>,
    summary_length: u8,
}

#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

impl Session {
    /// Creates a session whose history is hydrated from `history`.
    pub fn new(
        summarizer: Arc<dyn Summarizer>,
        translator: Arc<dyn Translator>,
        history: HistoryStore,
        clipboard: Arc<dyn Clipboard>,
        summary_length: u8,
    ) -> Self {
        let state = State {
            history: history.load(),
            ..State::default()
        };
        info!("Loaded {} articles from history", state.history.len());

        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                summarizer,
                translator,
                history,
                clipboard,
                summary_length,
            }),
        }
    }

    pub async fn view(&self) -> View {
        self.inner.state.lock().await.view()
    }

    pub async fn submit_url(&self, url: &str) -> Result<View> {
        let url = validate_url(url)?;

        let ticket = {
            let mut state = self.inner.state.lock().await;
            let ticket = state.issue();
            state.pending = Some(ticket);
            ticket
        };

        info!("Summarizing {} (request {})", url, ticket);
        let result = self
            .inner
            .summarizer
            .summarize(&url, self.inner.summary_length)
            .await;

        let mut state = self.inner.state.lock().await;
        if !state.settle(ticket) {
            debug!("Discarding stale summary for {} (request {})", url, ticket);
            return Ok(state.view());
        }

        match result {
            Ok(summary) if !summary.trim().is_empty() => {
                let record = ArticleRecord::new(url, summary);
                state.history.insert(0, record.clone());
                state.show(record);
                self.persist(state.history.clone()).await;
            }
            Ok(_) => {
                warn!("Summarizer returned an empty summary for {}", url);
                state.outcome = Some(Err(UiError::empty_summary()));
            }
            Err(e) => {
                warn!("Summarization of {} failed: {}", url, e);
                state.outcome = Some(Err(UiError::summarize(&e)));
            }
        }

        Ok(state.view())
    }

    /// Shows the history entry at `index` without refetching it.
    pub async fn select_history_entry(&self, index: usize) -> Result<View> {
        let mut state = self.inner.state.lock().await;
        let record = state
            .history
            .get(index)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("No history entry at index {}", index)))?;

        state.pending = None;
        state.show(record);
        Ok(state.view())
    }

    pub async fn copy_url(&self, url: &str) -> Result<View> {
        self.inner.clipboard.write_text(url)?;

        let (generation, view) = {
            let mut state = self.inner.state.lock().await;
            state.copied = Some(url.to_string());
            state.copy_generation += 1;
            (state.copy_generation, state.view())
        };

        let session = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(COPY_MARKER_TTL).await;
            let mut state = session.inner.state.lock().await;
            // A newer copy owns the marker now.
            if state.copy_generation == generation {
                state.copied = None;
            }
        });

        Ok(view)
    }

    pub async fn clear_history(&self) -> View {
        let mut state = self.inner.state.lock().await;
        state.history.clear();
        self.persist(Vec::new()).await;
        info!("History cleared");
        state.view()
    }

    pub async fn change_language(&self, language: Language) -> Result<View> {
        let (ticket, text) = {
            let mut state = self.inner.state.lock().await;
            state.language = language;
            state.translated = None;

            // With nothing displayed there is nothing to supersede.
            let Some(text) = state.current.as_ref().map(|a| a.summary.clone()) else {
                return Ok(state.view());
            };

            state.pending = None;
            if language.is_source() {
                state.outcome = Some(Ok(()));
                return Ok(state.view());
            }

            let ticket = state.issue();
            state.pending = Some(ticket);
            (ticket, text)
        };

        info!("Translating summary to {} (request {})", language, ticket);
        let result = self.inner.translator.translate(&text, language).await;

        let mut state = self.inner.state.lock().await;
        if !state.settle(ticket) {
            debug!("Discarding stale {} translation (request {})", language, ticket);
            return Ok(state.view());
        }

        match result {
            Ok(translated) => {
                state.translated = Some(translated);
                state.outcome = Some(Ok(()));
            }
            Err(e) => {
                warn!("Translation to {} failed: {}", language, e);
                state.outcome = Some(Err(UiError::translate(&e)));
            }
        }

        Ok(state.view())
    }

    /// Best-effort write of `articles` to the history store. The caller keeps
    /// the state lock so writes land in the order the history changed.
    async fn persist(&self, articles: Vec<ArticleRecord>) {
        let history = self.inner.history.clone();
        match tokio::task::spawn_blocking(move || history.save(&articles)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Failed to persist history: {}", e),
            Err(e) => warn!("History write task failed: {}", e),
        }
    }
}

fn validate_url(raw: &str) -> Result<String> {
    let url = raw.trim();
    if url.is_empty() {
        return Err(AppError::ValidationError("URL must not be empty".to_string()));
    }
    Url::parse(url).map_err(|e| AppError::ValidationError(format!("Invalid URL {}: {}", url, e)))?;
    Ok(url.to_string())
}
