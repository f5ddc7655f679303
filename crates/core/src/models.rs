use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::intent::Intent;

/// One labeled utterance from the training corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingExample {
    pub text: String,
    pub intent: String,
}

/// Classifier verdict for a single utterance. `confidence` is the
/// probability mass of the predicted label; the full distribution
/// sums to 1 across all intents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub intent: Intent,
    pub confidence: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnowledgeCategory {
    PackingSuggestions,
    BudgetTips,
    TravelHacks,
}

impl KnowledgeCategory {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "packing_suggestions" | "packing" => Some(Self::PackingSuggestions),
            "budget_tips" | "budget" => Some(Self::BudgetTips),
            "travel_hacks" | "hacks" | "tips" => Some(Self::TravelHacks),
            _ => None,
        }
    }

    pub fn as_label(self) -> &'static str {
        match self {
            Self::PackingSuggestions => "packing_suggestions",
            Self::BudgetTips => "budget_tips",
            Self::TravelHacks => "travel_hacks",
        }
    }
}

/// A static reference snippet. An entry with no tags is the default
/// for its category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub category: KnowledgeCategory,
    #[serde(default)]
    pub tags: Vec<String>,
    pub items: Vec<String>,
}

impl KnowledgeEntry {
    pub fn is_default(&self) -> bool {
        self.tags.is_empty()
    }
}

/// One remembered exchange inside a user's short-term context.
/// `intent` is None when the turn was recorded on a deferred query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextTurn {
    pub at: DateTime<Utc>,
    pub text: String,
    pub intent: Option<Intent>,
}

/// Trip details opportunistically harvested from past utterances.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripSlots {
    pub destination: Option<String>,
    pub duration: Option<String>,
    pub budget: Option<String>,
}

/// Per-user short-term memory. Lives for the process lifetime only;
/// history is a bounded FIFO, oldest turns dropped first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserContext {
    pub user_id: String,
    pub last_intent: Option<Intent>,
    pub turns: Vec<ContextTurn>,
    pub slots: TripSlots,
}

impl UserContext {
    pub fn empty(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            last_intent: None,
            turns: Vec::new(),
            slots: TripSlots::default(),
        }
    }

    /// True when any remembered utterance contains the keyword,
    /// case-insensitively. Most recent turns are checked first.
    pub fn mentions(&self, keyword: &str) -> bool {
        let needle = keyword.to_lowercase();
        self.turns
            .iter()
            .rev()
            .any(|turn| turn.text.to_lowercase().contains(&needle))
    }
}

/// Result of one `evaluate` call: either a locally generated reply or
/// an explicit signal to escalate to the remote fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EngineOutcome {
    Handled {
        reply: String,
        intent: Intent,
        confidence: f32,
    },
    Deferred {
        confidence: f32,
    },
}

impl EngineOutcome {
    pub fn is_handled(&self) -> bool {
        matches!(self, Self::Handled { .. })
    }

    pub fn reply(&self) -> Option<&str> {
        match self {
            Self::Handled { reply, .. } => Some(reply),
            Self::Deferred { .. } => None,
        }
    }
}

/// Tunables with the production defaults. The threshold and history
/// bound are deliberate knobs, not constants baked into call sites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub confidence_threshold: f32,
    pub history_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.25,
            history_limit: 10,
        }
    }
}
