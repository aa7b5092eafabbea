//! Infrastructure services

mod faq_service;
mod semantic_cache_service;
mod support_chat_service;

pub use faq_service::FaqService;
pub use semantic_cache_service::{SemanticCacheService, SemanticCacheServiceTrait};
pub use support_chat_service::{AnswerGenerator, AnswerSource, SupportChatService, TurnReply};
