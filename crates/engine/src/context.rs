use std::collections::HashMap;

use chrono::Utc;
use parking_lot::RwLock;
use tripmind_core::{ContextTurn, ExtractedEntities, Intent, UserContext};

/// Per-user short-term memory behind a single RwLock. The write lock
/// serializes same-user read-modify-write; different users' contexts
/// are independent entries in the map. The user count is unbounded,
/// which is acceptable for a chat-bot process that restarts often;
/// each context is itself bounded by `history_limit`.
pub struct ContextTracker {
    history_limit: usize,
    contexts: RwLock<HashMap<String, UserContext>>,
}

impl ContextTracker {
    pub fn new(history_limit: usize) -> Self {
        Self {
            history_limit: history_limit.max(1),
            contexts: RwLock::new(HashMap::new()),
        }
    }

    /// Clone of the user's context, or an empty one on first access.
    /// Never fails.
    pub fn snapshot(&self, user_id: &str) -> UserContext {
        self.contexts
            .read()
            .get(user_id)
            .cloned()
            .unwrap_or_else(|| UserContext::empty(user_id))
    }

    /// Appends a turn and merges any extracted trip slots. `intent`
    /// is None for deferred queries: the utterance is still worth
    /// remembering, but a low-confidence guess must not overwrite
    /// `last_intent`.
    pub fn record(
        &self,
        user_id: &str,
        text: &str,
        intent: Option<Intent>,
        entities: ExtractedEntities,
    ) {
        let mut contexts = self.contexts.write();
        let context = contexts
            .entry(user_id.to_string())
            .or_insert_with(|| UserContext::empty(user_id));

        if let Some(intent) = intent {
            context.last_intent = Some(intent);
        }
        if let Some(destination) = entities.destination {
            context.slots.destination = Some(destination);
        }
        if let Some(duration) = entities.duration {
            context.slots.duration = Some(duration);
        }
        if let Some(budget) = entities.budget {
            context.slots.budget = Some(budget);
        }

        context.turns.push(ContextTurn {
            at: Utc::now(),
            text: text.to_string(),
            intent,
        });
        if context.turns.len() > self.history_limit {
            let keep_from = context.turns.len() - self.history_limit;
            context.turns = context.turns.split_off(keep_from);
        }
    }

    pub fn user_count(&self) -> usize {
        self.contexts.read().len()
    }
}
