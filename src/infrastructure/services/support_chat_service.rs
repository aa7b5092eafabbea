//! Turn handling for support conversations.
//!
//! Only the opening question of a conversation is context free, so only that
//! turn consults and populates the semantic cache.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, error, warn};

use super::SemanticCacheServiceTrait;
use crate::domain::{Conversation, DomainError};

/// The expensive answer pipeline (LLM, agent, ...)
#[async_trait]
pub trait AnswerGenerator: Send + Sync + std::fmt::Debug {
    /// Answer `question`; `conversation` already ends with it
    async fn generate(
        &self,
        conversation: &Conversation,
        question: &str,
    ) -> Result<String, DomainError>;
}

/// Where a reply came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerSource {
    Cache,
    Generated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnReply {
    pub answer: String,
    pub source: AnswerSource,
}

#[derive(Debug)]
pub struct SupportChatService {
    cache: Arc<dyn SemanticCacheServiceTrait>,
    generator: Arc<dyn AnswerGenerator>,
}

impl SupportChatService {
    pub fn new(
        cache: Arc<dyn SemanticCacheServiceTrait>,
        generator: Arc<dyn AnswerGenerator>,
    ) -> Self {
        Self { cache, generator }
    }

    /// Record `question`, answer it, and record the answer
    pub async fn handle_turn(
        &self,
        conversation: &mut Conversation,
        question: &str,
    ) -> Result<TurnReply, DomainError> {
        let first_question = conversation.is_first_question();
        conversation.push_user(question);

        if first_question {
            match self.cache.search(question).await {
                Ok(Some(answer)) => {
                    debug!("Answered conversation {} from cache", conversation.id());
                    conversation.push_assistant(answer.clone());
                    return Ok(TurnReply {
                        answer,
                        source: AnswerSource::Cache,
                    });
                }
                Ok(None) => {}
                Err(e) => warn!("Cache lookup failed, generating instead: {}", e),
            }
        }

        let answer = self.generator.generate(conversation, question).await?;
        conversation.push_assistant(answer.clone());

        if first_question {
            if let Err(e) = self.cache.save(question, &answer).await {
                error!(
                    "Failed to cache answer for conversation {}: {}",
                    conversation.id(),
                    e
                );
            }
        }

        Ok(TurnReply {
            answer,
            source: AnswerSource::Generated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::MockEmbeddingProvider;
    use crate::domain::ChatRole;
    use crate::infrastructure::services::SemanticCacheService;
    use crate::infrastructure::vector_index::InMemoryIndexStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct CountingGenerator {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl AnswerGenerator for CountingGenerator {
        async fn generate(
            &self,
            conversation: &Conversation,
            question: &str,
        ) -> Result<String, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if self.fail {
                return Err(DomainError::provider("llm", "unavailable"));
            }

            Ok(format!(
                "answer to '{}' after {} messages",
                question,
                conversation.messages().len()
            ))
        }
    }

    fn cache_with(store: Arc<InMemoryIndexStore>) -> Arc<SemanticCacheService> {
        Arc::new(SemanticCacheService::new(
            store,
            Arc::new(MockEmbeddingProvider::new(32)),
        ))
    }

    #[tokio::test]
    async fn test_first_question_is_generated_then_cached() {
        let store = Arc::new(InMemoryIndexStore::new());
        let generator = Arc::new(CountingGenerator::default());
        let service = SupportChatService::new(cache_with(store.clone()), generator.clone());

        let mut first = Conversation::with_welcome("Welcome!");
        let reply = service
            .handle_turn(&mut first, "Can I sign up as a company?")
            .await
            .unwrap();
        assert_eq!(reply.source, AnswerSource::Generated);
        assert_eq!(store.snapshot().await.unwrap().len(), 1);

        let mut second = Conversation::with_welcome("Welcome!");
        let cached = service
            .handle_turn(&mut second, "Can I sign up as a company?")
            .await
            .unwrap();

        assert_eq!(cached.source, AnswerSource::Cache);
        assert_eq!(cached.answer, reply.answer);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
        assert_eq!(second.messages().last().unwrap().role, ChatRole::Assistant);
    }

    #[tokio::test]
    async fn test_follow_up_turns_bypass_cache() {
        let store = Arc::new(InMemoryIndexStore::new());
        let generator = Arc::new(CountingGenerator::default());
        let service = SupportChatService::new(cache_with(store.clone()), generator.clone());
        let mut conversation = Conversation::new();

        service.handle_turn(&mut conversation, "first").await.unwrap();
        service.handle_turn(&mut conversation, "first").await.unwrap();

        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
        assert_eq!(store.snapshot().await.unwrap().len(), 1);
        assert_eq!(conversation.user_turns(), 2);
    }

    #[tokio::test]
    async fn test_broken_cache_does_not_block_reply() {
        let store = Arc::new(
            InMemoryIndexStore::new()
                .with_load_error("corrupted")
                .with_persist_error("read-only"),
        );
        let generator = Arc::new(CountingGenerator::default());
        let service = SupportChatService::new(cache_with(store), generator);
        let mut conversation = Conversation::new();

        let reply = service.handle_turn(&mut conversation, "hello").await.unwrap();

        assert_eq!(reply.source, AnswerSource::Generated);
        assert_eq!(conversation.messages().len(), 2);
    }

    #[tokio::test]
    async fn test_generation_failure_propagates_and_nothing_cached() {
        let store = Arc::new(InMemoryIndexStore::new());
        let generator = Arc::new(CountingGenerator {
            fail: true,
            ..Default::default()
        });
        let service = SupportChatService::new(cache_with(store.clone()), generator);
        let mut conversation = Conversation::new();

        let result = service.handle_turn(&mut conversation, "hello").await;

        assert!(result.is_err());
        assert!(store.snapshot().await.is_none());
    }
}
