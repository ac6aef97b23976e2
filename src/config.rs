use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;
use crate::error::{AppError, Result};

pub const DEFAULT_SUMMARIZER_BASE_URL: &str = "https://article-extractor-and-summarizer.p.rapidapi.com";
pub const DEFAULT_TRANSLATOR_BASE_URL: &str = "https://translo.p.rapidapi.com";
pub const DEFAULT_SUMMARY_LENGTH: u8 = 3;

/// Credentials and endpoint of one RapidAPI-hosted service.
#[derive(Clone, Debug)]
pub struct RapidApiConfig {
    pub api_key: String,
    pub base_url: Url,
    /// Value of the `X-RapidAPI-Host` header.
    pub host: String,
}

impl RapidApiConfig {
    pub fn new(api_key: impl Into<String>, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::ConfigError(format!("Invalid base URL {}: {}", base_url, e)))?;
        let host = base_url
            .host_str()
            .ok_or_else(|| AppError::ConfigError(format!("Base URL has no host: {}", base_url)))?
            .to_string();

        Ok(Self {
            api_key: api_key.into(),
            base_url,
            host,
        })
    }

    /// Joins `path` onto the base URL, keeping any path prefix the base carries.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub history_path: PathBuf,
    pub summary_length: u8,
    pub summarizer: RapidApiConfig,
    pub translator: RapidApiConfig,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        let rapid_api_key = env::var("RAPID_API_KEY")?;

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
        let port = port.parse::<u16>().map_err(|e| AppError::ConfigError(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;

        let history_path = env::var("HISTORY_PATH").unwrap_or_else(|_| "articles.json".to_string());

        let summary_length = match env::var("SUMMARY_LENGTH") {
            Ok(raw) => parse_summary_length(&raw)?,
            Err(_) => DEFAULT_SUMMARY_LENGTH,
        };

        let summarizer_base = env::var("SUMMARIZER_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_SUMMARIZER_BASE_URL.to_string());
        let translator_base = env::var("TRANSLATOR_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_TRANSLATOR_BASE_URL.to_string());

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            history_path: PathBuf::from(history_path),
            summary_length,
            summarizer: RapidApiConfig::new(rapid_api_key.clone(), &summarizer_base)?,
            translator: RapidApiConfig::new(rapid_api_key, &translator_base)?,
        })
    }
}

/// The summarizer accepts paragraph counts between 1 and 3.
pub fn parse_summary_length(raw: &str) -> Result<u8> {
    let length = raw
        .trim()
        .parse::<u8>()
        .map_err(|e| AppError::ConfigError(format!("Invalid summary length: {}", e)))?;

    if !(1..=3).contains(&length) {
        return Err(AppError::ConfigError(format!(
            "Summary length must be between 1 and 3, got {}",
            length
        )));
    }

    Ok(length)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_header_is_derived_from_base_url() {
        let config = RapidApiConfig::new("key", DEFAULT_TRANSLATOR_BASE_URL).unwrap();
        assert_eq!(config.host, "translo.p.rapidapi.com");
        assert_eq!(
            config.endpoint("/api/v3/translate"),
            "https://translo.p.rapidapi.com/api/v3/translate"
        );
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let config = RapidApiConfig::new("key", "http://127.0.0.1:8080/mock/").unwrap();
        assert_eq!(config.endpoint("summarize"), "http://127.0.0.1:8080/mock/summarize");
    }

    #[test]
    fn rejects_base_url_without_host() {
        assert!(matches!(
            RapidApiConfig::new("key", "not a url"),
            Err(AppError::ConfigError(_))
        ));
    }

    #[test]
    fn summary_length_is_bounded() {
        assert_eq!(parse_summary_length("1").unwrap(), 1);
        assert_eq!(parse_summary_length(" 3 ").unwrap(), 3);
        assert!(parse_summary_length("0").is_err());
        assert!(parse_summary_length("4").is_err());
        assert!(parse_summary_length("three").is_err());
    }
}
