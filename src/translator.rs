use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use crate::config::RapidApiConfig;
use crate::error::{AppError, Result};
use crate::models::Language;
use crate::rapidapi::{build_client, upstream_error};

#[async_trait]
pub trait Translator: Send + Sync {
    /// Translates English `text` into `to`.
    async fn translate(&self, text: &str, to: Language) -> Result<String>;
}

#[derive(Deserialize)]
struct TranslationResponse {
    ok: bool,
    #[serde(default)]
    translated_text: String,
    #[serde(default)]
    message: Option<String>,
}

/// Translo on RapidAPI.
pub struct RapidTranslator {
    client: Client,
    config: RapidApiConfig,
}

impl RapidTranslator {
    pub fn new(config: RapidApiConfig) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            config,
        })
    }
}

#[async_trait]
impl Translator for RapidTranslator {
    async fn translate(&self, text: &str, to: Language) -> Result<String> {
        let endpoint = self.config.endpoint("/api/v3/translate");
        debug!("Requesting {} translation of {} chars", to, text.len());

        let response = self
            .client
            .post(&endpoint)
            .header("X-RapidAPI-Key", self.config.api_key.as_str())
            .header("X-RapidAPI-Host", self.config.host.as_str())
            .form(&[
                ("from", Language::En.code()),
                ("to", to.code()),
                ("text", text),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(upstream_error(response).await);
        }

        let body: TranslationResponse = response.json().await?;
        if !body.ok {
            return Err(AppError::UpstreamRejected { message: body.message });
        }

        Ok(body.translated_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rapidapi::mock;

    async fn translator() -> (RapidTranslator, mock::MockState) {
        let (addr, state) = mock::spawn().await;
        let config = RapidApiConfig::new("test-key", &format!("http://{}", addr)).unwrap();
        (RapidTranslator::new(config).unwrap(), state)
    }

    #[tokio::test]
    async fn posts_form_encoded_text() {
        let (translator, state) = translator().await;

        let translated = translator.translate("Tom & Jerry = fun", Language::Ru).await.unwrap();
        assert_eq!(translated, "[ru] Tom & Jerry = fun");

        let requests = state.requests.lock().unwrap();
        let seen = &requests[0];
        assert_eq!(seen.params["from"], "en");
        assert_eq!(seen.params["to"], "ru");
        assert_eq!(seen.params["text"], "Tom & Jerry = fun");
        assert_eq!(seen.content_type.as_deref(), Some("application/x-www-form-urlencoded"));
        assert_eq!(seen.api_key.as_deref(), Some("test-key"));
        assert_eq!(seen.host.as_deref(), Some("127.0.0.1"));
    }

    #[tokio::test]
    async fn provider_message_is_kept() {
        let (translator, _) = translator().await;

        match translator.translate("Hello", Language::De).await.unwrap_err() {
            AppError::UpstreamError { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message.as_deref(), Some("You have exceeded the rate limit"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn not_ok_body_is_an_error() {
        let (translator, _) = translator().await;

        match translator.translate("Hello", Language::Fr).await.unwrap_err() {
            AppError::UpstreamRejected { message } => assert_eq!(message, None),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
