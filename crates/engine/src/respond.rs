use std::sync::Arc;

use tripmind_core::{detect_topic, Intent, KnowledgeCategory, KnowledgeError, UserContext};
use tripmind_knowledge::KnowledgeStore;

/// Deterministic reply generation. One generator per intent variant,
/// dispatched by an exhaustive match: a trained label without a
/// generator cannot exist once this compiles.
pub struct ResponseEngine {
    knowledge: Arc<KnowledgeStore>,
}

impl ResponseEngine {
    pub fn new(knowledge: Arc<KnowledgeStore>) -> Self {
        Self { knowledge }
    }

    /// Composes the reply for a recognized intent. `context` is the
    /// caller's pre-query snapshot with the current utterance's
    /// entities already merged in. Errors here signal a knowledge-base
    /// packaging defect; the orchestrator turns them into a deferral.
    pub fn respond(
        &self,
        intent: Intent,
        utterance: &str,
        context: &UserContext,
    ) -> Result<String, KnowledgeError> {
        let destination = context.slots.destination.as_deref();

        let reply = match intent {
            Intent::Greeting => match destination {
                Some(place) => format!(
                    "Hey! Still thinking about {place}? Ask me about packing, budgets, or travel hacks."
                ),
                None => "Hey! I'm here to help your group plan the trip. Ask me about packing, budgets, or travel hacks.".to_string(),
            },
            Intent::Farewell => "Safe travels! Ping me any time the group needs trip help. 👋".to_string(),
            Intent::BotIdentity => {
                "I'm Tripmind, your group-trip copilot. I answer packing, budget, and travel questions locally, and fetch outside help when I'm unsure.".to_string()
            }
            Intent::FoodSuggestion => match destination {
                Some(place) => format!(
                    "Street food is the fastest way to know {place}: look for the busiest local stalls and go where the queue is."
                ),
                None => "Try the local street food scene first: busy stalls, regional specialties, and one sit-down place the group votes on.".to_string(),
            },
            Intent::WeatherCheck => match destination {
                Some(place) => format!(
                    "I can't check real-time weather yet, but for {place} you should definitely pack layers! 🌤️"
                ),
                None => "I can't check real-time weather yet. Tell me where you're headed and I'll factor it into packing advice.".to_string(),
            },
            Intent::BudgetHelp => {
                let entry = self
                    .knowledge
                    .lookup(KnowledgeCategory::BudgetTips, &self.topic_tags(utterance, context))?;
                let tips = entry.items.join(" ");
                match destination {
                    Some(place) => format!("Planning a budget for {place}? Smart move! {tips}"),
                    None => format!("Here's how I'd keep the trip budget honest: {tips}"),
                }
            }
            Intent::PackingHelp => self.packing_reply(utterance, context)?,
            Intent::TravelTips => {
                let entry = self
                    .knowledge
                    .lookup(KnowledgeCategory::TravelHacks, &self.topic_tags(utterance, context))?;
                // First item, deterministically; the entry selection
                // already adapts to the topic.
                let hack = entry
                    .items
                    .first()
                    .cloned()
                    .unwrap_or_else(|| "Keep digital and paper copies of every document.".to_string());
                format!("💡 Travel hack: {hack}")
            }
        };

        Ok(reply)
    }

    fn packing_reply(
        &self,
        utterance: &str,
        context: &UserContext,
    ) -> Result<String, KnowledgeError> {
        let tags = self.topic_tags(utterance, context);
        let entry = self
            .knowledge
            .lookup(KnowledgeCategory::PackingSuggestions, &tags)?;

        let items = entry
            .items
            .iter()
            .take(5)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");

        let mut reply = if entry.is_default() {
            format!("Here's a solid packing baseline: {items}.")
        } else {
            // Entry was selected by topic; name it.
            let topic = entry.tags.first().map(String::as_str).unwrap_or("trip");
            format!("🎒 {} essentials: {items}.", capitalize(topic))
        };

        if entry.is_default() {
            if let Some(place) = context.slots.destination.as_deref() {
                reply.push_str(&format!(" For {place}, don't forget your travel documents!"));
            }
        }

        Ok(reply)
    }

    /// Topic hints for knowledge lookup: the current utterance first,
    /// then remembered turns, most recent first. This is what lets a
    /// "beach" mentioned two messages ago shape today's packing list.
    fn topic_tags(&self, utterance: &str, context: &UserContext) -> Vec<&'static str> {
        let topic = detect_topic(utterance).or_else(|| {
            context
                .turns
                .iter()
                .rev()
                .find_map(|turn| detect_topic(&turn.text))
        });
        topic.into_iter().collect()
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tripmind_core::{ContextTurn, KnowledgeEntry};

    fn knowledge() -> Arc<KnowledgeStore> {
        let entry = |category, tags: &[&str], items: &[&str]| KnowledgeEntry {
            category,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            items: items.iter().map(|i| i.to_string()).collect(),
        };
        Arc::new(KnowledgeStore::from_entries(vec![
            entry(
                KnowledgeCategory::PackingSuggestions,
                &[],
                &["passport", "phone charger", "first-aid kit"],
            ),
            entry(
                KnowledgeCategory::PackingSuggestions,
                &["beach"],
                &["sunscreen", "swimwear", "flip-flops"],
            ),
            entry(KnowledgeCategory::BudgetTips, &[], &["Track every expense."]),
            entry(KnowledgeCategory::TravelHacks, &[], &["Roll clothes, don't fold."]),
        ]))
    }

    fn turn(text: &str) -> ContextTurn {
        ContextTurn {
            at: Utc::now(),
            text: text.to_string(),
            intent: None,
        }
    }

    #[test]
    fn packing_without_topic_uses_default_entry() {
        let engine = ResponseEngine::new(knowledge());
        let reply = engine
            .respond(Intent::PackingHelp, "what should I pack", &UserContext::empty("u1"))
            .unwrap();
        assert!(reply.contains("passport"));
    }

    #[test]
    fn remembered_beach_biases_packing() {
        let engine = ResponseEngine::new(knowledge());
        let mut context = UserContext::empty("u1");
        context.turns.push(turn("I'm going to the beach"));

        let reply = engine
            .respond(Intent::PackingHelp, "what should I pack", &context)
            .unwrap();
        assert!(reply.contains("sunscreen"));
        assert!(!reply.contains("passport"));
    }

    #[test]
    fn destination_slot_enriches_weather_reply() {
        let engine = ResponseEngine::new(knowledge());
        let mut context = UserContext::empty("u1");
        context.slots.destination = Some("London".to_string());

        let reply = engine
            .respond(Intent::WeatherCheck, "what is the weather like", &context)
            .unwrap();
        assert!(reply.contains("London"));
    }

    #[test]
    fn every_intent_produces_a_non_empty_reply() {
        let engine = ResponseEngine::new(knowledge());
        let context = UserContext::empty("u1");
        for intent in Intent::ALL {
            let reply = engine.respond(intent, "tell me something", &context).unwrap();
            assert!(!reply.trim().is_empty(), "{:?}", intent);
        }
    }

    #[test]
    fn missing_category_surfaces_as_error() {
        let engine = ResponseEngine::new(Arc::new(KnowledgeStore::from_entries(Vec::new())));
        let result = engine.respond(Intent::PackingHelp, "what should I pack", &UserContext::empty("u1"));
        assert!(result.is_err());
    }
}
