//! Transcript - persistence seam for conversation turns
//!
//! The orchestrator appends the user message and the final assistant text of
//! a request when the request carries a conversation id. The durable store
//! lives outside this crate; [`MemoryTranscriptStore`] is for development and
//! tests.

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parley_llm::Role;
use serde::{Deserialize, Serialize};

/// Append-only transcript storage
#[async_trait]
pub trait TranscriptStore: Send + Sync {
    /// Append one line to a conversation
    async fn save(&self, conversation_id: &str, role: Role, content: &str) -> Result<()>;
}

/// One stored line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptLine {
    /// Speaker
    pub role: Role,
    /// Text
    pub content: String,
    /// When it was saved
    pub saved_at: DateTime<Utc>,
}

/// In-memory transcript store
#[derive(Debug, Default)]
pub struct MemoryTranscriptStore {
    conversations: DashMap<String, Vec<TranscriptLine>>,
}

impl MemoryTranscriptStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines of a conversation in save order
    #[must_use]
    pub fn history(&self, conversation_id: &str) -> Vec<TranscriptLine> {
        self.conversations
            .get(conversation_id)
            .map(|lines| lines.value().clone())
            .unwrap_or_default()
    }

    /// Number of conversations
    #[must_use]
    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    /// Check if nothing has been saved
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }
}

#[async_trait]
impl TranscriptStore for MemoryTranscriptStore {
    async fn save(&self, conversation_id: &str, role: Role, content: &str) -> Result<()> {
        self.conversations
            .entry(conversation_id.to_string())
            .or_default()
            .push(TranscriptLine {
                role,
                content: content.to_string(),
                saved_at: Utc::now(),
            });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lines_keep_order_per_conversation() {
        let store = MemoryTranscriptStore::new();
        store.save("c1", Role::User, "Hi").await.unwrap();
        store.save("c2", Role::User, "Other").await.unwrap();
        store.save("c1", Role::Assistant, "Hello!").await.unwrap();

        let lines = store.history("c1");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].role, Role::User);
        assert_eq!(lines[1].content, "Hello!");
        assert_eq!(store.len(), 2);
        assert!(store.history("missing").is_empty());
    }
}
