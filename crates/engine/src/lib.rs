pub mod context;
pub mod respond;

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context as _, Result};
use tracing::{error, info};
use tripmind_core::{
    extract_entities, normalize_text, EngineConfig, EngineOutcome, ExtractedEntities, UserContext,
};
use tripmind_knowledge::KnowledgeStore;
use tripmind_ml::{load_training_corpus, IntentClassifier, TfidfIntentClassifier, TrainingConfig};
use tripmind_observability::EngineMetrics;

use context::ContextTracker;
use respond::ResponseEngine;

/// The local intelligence engine: classify, gate on confidence,
/// update context, reply or defer. One instance serves all users;
/// classification and reply generation are pure over shared read-only
/// state, the context tracker is the only mutable piece.
pub struct LocalEngine {
    classifier: Arc<dyn IntentClassifier>,
    responder: ResponseEngine,
    tracker: ContextTracker,
    config: EngineConfig,
    metrics: Arc<EngineMetrics>,
}

impl LocalEngine {
    pub fn new(
        classifier: Arc<dyn IntentClassifier>,
        knowledge: Arc<KnowledgeStore>,
        config: EngineConfig,
        metrics: Arc<EngineMetrics>,
    ) -> Self {
        Self {
            classifier,
            responder: ResponseEngine::new(knowledge),
            tracker: ContextTracker::new(config.history_limit),
            config,
            metrics,
        }
    }

    /// Trains the classifier from `<root>/training/*.jsonl` and loads
    /// `<root>/knowledge/knowledge_base.json`. Any failure here aborts
    /// startup: the engine must not serve queries half-initialized.
    pub fn from_data_dir(root: impl AsRef<Path>, config: EngineConfig) -> Result<Self> {
        let root = root.as_ref();

        let examples = load_training_corpus(root.join("training"))
            .with_context(|| format!("failed loading training corpus under {}", root.display()))?;
        let classifier = TfidfIntentClassifier::train(&examples, &TrainingConfig::default())
            .context("intent model training failed")?;

        let knowledge = KnowledgeStore::from_file(root.join("knowledge/knowledge_base.json"))
            .with_context(|| format!("failed loading knowledge base under {}", root.display()))?;

        Ok(Self::new(
            Arc::new(classifier),
            Arc::new(knowledge),
            config,
            EngineMetrics::shared(),
        ))
    }

    /// The single inbound call. Resolves every per-query condition
    /// into the two-outcome result; no error escapes for ordinary
    /// user input.
    pub fn evaluate(&self, user_id: &str, utterance: &str) -> EngineOutcome {
        let started = Instant::now();
        self.metrics.inc_query();

        let normalized = normalize_text(utterance);
        if normalized.is_empty() {
            self.metrics.inc_deferred();
            self.metrics.observe_latency(started.elapsed());
            return EngineOutcome::Deferred { confidence: 0.0 };
        }

        let classification = self.classifier.classify(&normalized);
        // Slots fill opportunistically on every turn, answered or not.
        let entities = extract_entities(&normalized);

        let outcome = if classification.confidence < self.config.confidence_threshold {
            // Remember the utterance, but never the low-confidence
            // guess: a wrong local answer costs more trust than a
            // visible escalation.
            self.tracker.record(user_id, &normalized, None, entities);
            self.metrics.inc_deferred();
            EngineOutcome::Deferred {
                confidence: classification.confidence,
            }
        } else {
            let mut view = self.tracker.snapshot(user_id);
            merge_entities(&mut view, &entities);

            match self
                .responder
                .respond(classification.intent, &normalized, &view)
            {
                Ok(reply) => {
                    self.tracker
                        .record(user_id, &normalized, Some(classification.intent), entities);
                    self.metrics.inc_handled();
                    EngineOutcome::Handled {
                        reply,
                        intent: classification.intent,
                        confidence: classification.confidence,
                    }
                }
                Err(defect) => {
                    // Knowledge-base packaging defect. Loud in the
                    // logs, silent deferral for the user.
                    error!(intent = ?classification.intent, %defect, "response generation failed");
                    self.tracker
                        .record(user_id, &normalized, None, entities);
                    self.metrics.inc_deferred();
                    EngineOutcome::Deferred {
                        confidence: classification.confidence,
                    }
                }
            }
        };

        self.metrics.observe_latency(started.elapsed());
        info!(
            user_id,
            intent = ?classification.intent,
            confidence = classification.confidence,
            handled = outcome.is_handled(),
            latency_micros = started.elapsed().as_micros() as u64,
            "query evaluated"
        );

        outcome
    }

    pub fn context(&self, user_id: &str) -> UserContext {
        self.tracker.snapshot(user_id)
    }

    pub fn metrics(&self) -> &EngineMetrics {
        &self.metrics
    }
}

fn merge_entities(context: &mut UserContext, entities: &ExtractedEntities) {
    if let Some(destination) = &entities.destination {
        context.slots.destination = Some(destination.clone());
    }
    if let Some(duration) = &entities.duration {
        context.slots.duration = Some(duration.clone());
    }
    if let Some(budget) = &entities.budget {
        context.slots.budget = Some(budget.clone());
    }
}
