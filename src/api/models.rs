use serde::Deserialize;
use crate::models::Language;

#[derive(Deserialize)]
pub struct SummarizeRequest {
    pub url: String,
}

#[derive(Deserialize)]
pub struct SelectRequest {
    pub index: usize,
}

#[derive(Deserialize)]
pub struct CopyRequest {
    pub url: String,
}

#[derive(Deserialize)]
pub struct LanguageRequest {
    pub language: Language,
}
