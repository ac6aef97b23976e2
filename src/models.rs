use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::error::AppError;

/// A summarized article: the source URL and the summary produced for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub url: String,
    pub summary: String,
}

impl ArticleRecord {
    pub fn new(url: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            summary: summary.into(),
        }
    }
}

/// Languages a summary can be displayed in. English is the source language
/// of every summary and never goes through the translator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ru,
    Es,
    Fr,
    De,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::En,
        Language::Ru,
        Language::Es,
        Language::Fr,
        Language::De,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ru => "ru",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::De => "de",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ru => "Russian",
            Language::Es => "Spanish",
            Language::Fr => "French",
            Language::De => "German",
        }
    }

    pub fn is_source(self) -> bool {
        self == Language::En
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::ValidationError(format!("Unsupported language: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_codes_only() {
        assert_eq!("ru".parse::<Language>().unwrap(), Language::Ru);
        assert_eq!("DE".parse::<Language>().unwrap(), Language::De);
        assert!(matches!("it".parse::<Language>(), Err(AppError::ValidationError(_))));
    }

    #[test]
    fn serializes_as_lowercase_code() {
        assert_eq!(serde_json::to_string(&Language::Fr).unwrap(), "\"fr\"");
        assert_eq!(Language::default(), Language::En);
    }
}
