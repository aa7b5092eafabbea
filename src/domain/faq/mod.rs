//! Frequently-asked-questions knowledge store models

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One question/answer pair from the FAQ source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqRecord {
    pub question: String,
    pub answer: String,
}

impl FaqRecord {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Text embedded for this record; question and answer both take part
    pub fn document_text(&self) -> String {
        format!("question: {}\nanswer: {}", self.question, self.answer)
    }
}

/// A FAQ document relevant to a query
#[derive(Debug, Clone, Serialize)]
pub struct FaqMatch {
    /// `1 - distance`; higher is more relevant
    pub similarity: f32,
    pub content: String,
}

/// Configuration for the FAQ store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqConfig {
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,

    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Documents further than this (squared L2) are dropped
    #[serde(default = "default_max_distance")]
    pub max_distance: f32,

    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("./vectorstore/qa_vectorstore")
}

fn default_top_k() -> usize {
    5
}

fn default_max_distance() -> f32 {
    0.5
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

impl Default for FaqConfig {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
            top_k: default_top_k(),
            max_distance: default_max_distance(),
            embedding_model: default_embedding_model(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_text() {
        let record = FaqRecord::new("Can I keep my number?", "Yes, number porting is free.");

        assert_eq!(
            record.document_text(),
            "question: Can I keep my number?\nanswer: Yes, number porting is free."
        );
    }

    #[test]
    fn test_default_config() {
        let config = FaqConfig::default();

        assert_eq!(config.top_k, 5);
        assert!((config.max_distance - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.storage_path, PathBuf::from("./vectorstore/qa_vectorstore"));
    }

    #[test]
    fn test_records_from_json() {
        let records: Vec<FaqRecord> =
            serde_json::from_str(r#"[{"question": "q1", "answer": "a1"}]"#).unwrap();

        assert_eq!(records, vec![FaqRecord::new("q1", "a1")]);
    }
}
