//! Chat orchestration
//!
//! One turn: load the session's history, retrieve knowledge-base context,
//! window the prompt, call the LLM, persist both sides of the exchange.
//! Retrieval failures degrade to an uncontextualized prompt; only the LLM
//! call itself can fail the turn.

use std::sync::Arc;

use serde::Serialize;

use vox_core::{
    ConversationHistory, Error, LanguageModel, Result, Turn, TurnRole,
};
use vox_config::ChatConfig;
use vox_persistence::SessionRepository;
use vox_rag::KnowledgeBase;

use crate::metrics;

#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub session_id: String,
    pub reply: String,
    pub context_chunks: usize,
    pub turn_count: usize,
    pub total_time_ms: u64,
}

pub struct ChatService {
    llm: Arc<dyn LanguageModel>,
    knowledge_base: Arc<KnowledgeBase>,
    sessions: Arc<dyn SessionRepository>,
    config: ChatConfig,
}

impl ChatService {
    pub fn new(
        llm: Arc<dyn LanguageModel>,
        knowledge_base: Arc<KnowledgeBase>,
        sessions: Arc<dyn SessionRepository>,
        config: ChatConfig,
    ) -> Self {
        Self {
            llm,
            knowledge_base,
            sessions,
            config,
        }
    }

    pub async fn chat(&self, session_id: &str, message: &str) -> Result<ChatReply> {
        let message = message.trim();
        if message.is_empty() {
            return Err(Error::Validation("message is empty".to_string()));
        }

        let session = self.sessions.get_session(session_id).await?;
        if !session.is_active() {
            return Err(Error::Conflict(format!(
                "session '{session_id}' has ended"
            )));
        }

        let mut history = self.load_history(session_id).await?;

        let context = self.retrieve_context(message).await;
        let system_prompt = self.build_system_prompt(&context);

        history.push(Turn::user(message));
        let messages = history.to_messages(&system_prompt, self.config.max_history_turns);

        let generation = self.llm.generate(&messages).await?;
        metrics::record_chat_turn();
        metrics::record_llm_latency(generation.total_time_ms);

        // Replies go to a TTS frontend downstream; strip what it can't speak.
        let reply = vox_text::clean(&generation.text).text;

        let user_turn = Turn::user(message);
        let assistant_turn = Turn::assistant(&reply);
        self.sessions.append_message(session_id, &user_turn).await?;
        self.sessions
            .append_message(session_id, &assistant_turn)
            .await?;

        Ok(ChatReply {
            session_id: session_id.to_string(),
            reply,
            context_chunks: context.len(),
            turn_count: history.turn_count() + 1,
            total_time_ms: generation.total_time_ms,
        })
    }

    async fn load_history(&self, session_id: &str) -> Result<ConversationHistory> {
        let stored = self.sessions.list_messages(session_id).await?;
        let mut history = ConversationHistory::new();
        for message in stored {
            let Some(role) = TurnRole::from_str(&message.role) else {
                tracing::warn!(role = %message.role, "skipping message with unknown role");
                continue;
            };
            history.push(Turn {
                role,
                content: message.content,
                timestamp: message.created_at,
            });
        }
        Ok(history)
    }

    /// Best-effort retrieval; a failing knowledge base yields no context.
    async fn retrieve_context(&self, query: &str) -> Vec<String> {
        match self
            .knowledge_base
            .search(
                query,
                self.config.rag_top_k,
                Some(self.config.rag_score_threshold),
            )
            .await
        {
            // Hits whose payload carried no usable text add nothing to the
            // prompt.
            Ok(chunks) => chunks
                .into_iter()
                .filter(|c| !c.text.is_empty() && c.text != vox_vector::NO_TEXT_PLACEHOLDER)
                .map(|c| c.text)
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "knowledge base lookup failed, continuing without context");
                Vec::new()
            }
        }
    }

    fn build_system_prompt(&self, context: &[String]) -> String {
        if context.is_empty() {
            return self.config.system_prompt.clone();
        }
        let mut prompt = self.config.system_prompt.clone();
        prompt.push_str("\n\nRelevant context:\n");
        for chunk in context {
            prompt.push_str("- ");
            prompt.push_str(chunk);
            prompt.push('\n');
        }
        prompt
    }
}
