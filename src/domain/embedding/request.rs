//! Embedding request types

use serde::{Deserialize, Serialize};

/// Text(s) to embed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmbeddingInput {
    Single(String),
    Batch(Vec<String>),
}

impl EmbeddingInput {
    /// Borrow all inputs in request order
    pub fn as_vec(&self) -> Vec<&str> {
        match self {
            EmbeddingInput::Single(text) => vec![text.as_str()],
            EmbeddingInput::Batch(texts) => texts.iter().map(String::as_str).collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            EmbeddingInput::Single(_) => 1,
            EmbeddingInput::Batch(texts) => texts.len(),
        }
    }

    /// A batch with no texts is empty; a single input never is, even when blank
    pub fn is_empty(&self) -> bool {
        match self {
            EmbeddingInput::Single(_) => false,
            EmbeddingInput::Batch(texts) => texts.is_empty(),
        }
    }
}

/// Request to generate embeddings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    model: String,
    input: EmbeddingInput,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

impl EmbeddingRequest {
    pub fn new(model: impl Into<String>, input: EmbeddingInput) -> Self {
        Self {
            model: model.into(),
            input,
            dimensions: None,
        }
    }

    /// Request the embedding of one text
    pub fn single(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(model, EmbeddingInput::Single(text.into()))
    }

    /// Request embeddings for several texts in one round trip
    pub fn batch(model: impl Into<String>, texts: Vec<String>) -> Self {
        Self::new(model, EmbeddingInput::Batch(texts))
    }

    /// Ask the provider to shorten its output vectors (if supported)
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn input(&self) -> &EmbeddingInput {
        &self.input
    }

    pub fn inputs(&self) -> Vec<&str> {
        self.input.as_vec()
    }

    pub fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_request() {
        let request = EmbeddingRequest::single("text-embedding-3-small", "Is there a cancellation fee?");

        assert_eq!(request.model(), "text-embedding-3-small");
        assert_eq!(request.inputs(), vec!["Is there a cancellation fee?"]);
        assert_eq!(request.input().len(), 1);
        assert!(request.dimensions().is_none());
    }

    #[test]
    fn test_blank_single_input_is_not_empty() {
        let input = EmbeddingInput::Single("   ".into());

        assert!(!input.is_empty());
        assert_eq!(input.as_vec(), vec!["   "]);
    }

    #[test]
    fn test_batch_request() {
        let request = EmbeddingRequest::batch(
            "text-embedding-3-small",
            vec!["question: a\nanswer: b".into(), "question: c\nanswer: d".into()],
        )
        .with_dimensions(256);

        assert_eq!(request.input().len(), 2);
        assert_eq!(request.dimensions(), Some(256));
        assert!(EmbeddingInput::Batch(vec![]).is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let request = EmbeddingRequest::single("m", "hello");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json, serde_json::json!({"model": "m", "input": "hello"}));
    }
}
