use std::path::PathBuf;

use tripmind_core::{EngineConfig, EngineOutcome, Intent, KnowledgeCategory};
use tripmind_engine::LocalEngine;
use tripmind_knowledge::KnowledgeStore;
use tripmind_ml::{load_training_corpus, IntentClassifier, TfidfIntentClassifier, TrainingConfig};

fn data_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../kb")
}

fn engine() -> LocalEngine {
    LocalEngine::from_data_dir(data_root(), EngineConfig::default())
        .expect("engine should build from shipped data")
}

fn trained_classifier() -> TfidfIntentClassifier {
    let examples = load_training_corpus(data_root().join("training")).unwrap();
    TfidfIntentClassifier::train(&examples, &TrainingConfig::default()).unwrap()
}

#[test]
fn no_training_example_is_a_false_negative() {
    let examples = load_training_corpus(data_root().join("training")).unwrap();
    let classifier = trained_classifier();

    for example in &examples {
        let result = classifier.classify(&example.text);
        assert_eq!(
            result.intent.as_label(),
            example.intent,
            "misclassified: {}",
            example.text
        );
        assert!(
            result.confidence >= 0.25,
            "below threshold: {} ({:.3})",
            example.text,
            result.confidence
        );
    }
}

#[test]
fn probabilities_sum_to_one_on_the_full_corpus() {
    let classifier = trained_classifier();
    for text in [
        "What should I pack for Goa?",
        "asdkjfh random gibberish",
        "how much will this cost",
    ] {
        let sum: f32 = classifier.distribution(text).iter().map(|(_, p)| p).sum();
        assert!((sum - 1.0).abs() < 1e-4, "{text}");
    }
}

#[test]
fn empty_utterance_defers() {
    let engine = engine();
    let outcome = engine.evaluate("u1", "   ");
    assert!(!outcome.is_handled());
}

#[test]
fn goa_packing_without_context_gets_generic_essentials() {
    let engine = engine();

    let outcome = engine.evaluate("fresh-user", "What should I pack for Goa?");
    match outcome {
        EngineOutcome::Handled {
            reply,
            intent,
            confidence,
        } => {
            assert_eq!(intent, Intent::PackingHelp);
            assert!(confidence >= 0.25);
            // No beach keyword anywhere yet: category default applies.
            assert!(reply.contains("passport"), "{reply}");
        }
        EngineOutcome::Deferred { confidence } => {
            panic!("packing query deferred at {confidence}")
        }
    }
}

#[test]
fn remembered_beach_mention_prioritizes_beach_packing() {
    let engine = engine();
    let user = "beach-user";

    // First turn plants the topic; whether it is handled or deferred,
    // the utterance lands in history either way.
    engine.evaluate(user, "I'm going to the beach");

    let outcome = engine.evaluate(user, "what should I pack");
    match outcome {
        EngineOutcome::Handled { reply, intent, .. } => {
            assert_eq!(intent, Intent::PackingHelp);
            assert!(reply.contains("sunscreen"), "{reply}");
        }
        EngineOutcome::Deferred { confidence } => {
            panic!("packing query deferred at {confidence}")
        }
    }
}

#[test]
fn gibberish_defers_and_preserves_last_intent() {
    let engine = engine();
    let user = "gibberish-user";

    let first = engine.evaluate(user, "what should I pack");
    assert!(first.is_handled());
    assert_eq!(engine.context(user).last_intent, Some(Intent::PackingHelp));

    let second = engine.evaluate(user, "asdkjfh random gibberish");
    assert!(!second.is_handled());
    assert_eq!(engine.context(user).last_intent, Some(Intent::PackingHelp));
}

#[test]
fn consecutive_queries_share_context() {
    let engine = engine();
    let user = "context-user";

    engine.evaluate(user, "I'm going to the beach");
    engine.evaluate(user, "what should I pack");

    let context = engine.context(user);
    assert_eq!(context.turns.len(), 2);
    assert!(context.turns[0].text.contains("beach"));
    assert_eq!(context.turns[1].intent, Some(Intent::PackingHelp));
}

#[test]
fn history_stays_within_the_configured_bound() {
    let engine = LocalEngine::from_data_dir(
        data_root(),
        EngineConfig {
            history_limit: 4,
            ..EngineConfig::default()
        },
    )
    .unwrap();

    for n in 0..10 {
        engine.evaluate("chatty-user", &format!("any travel tips {n}"));
    }

    let context = engine.context("chatty-user");
    assert!(context.turns.len() <= 4);
    assert!(context.turns[0].text.ends_with('6'));
}

#[test]
fn shipped_knowledge_base_covers_every_category() {
    let store =
        KnowledgeStore::from_file(data_root().join("knowledge/knowledge_base.json")).unwrap();

    for category in [
        KnowledgeCategory::PackingSuggestions,
        KnowledgeCategory::BudgetTips,
        KnowledgeCategory::TravelHacks,
    ] {
        let entry = store.lookup(category, &[]).unwrap();
        assert!(!entry.items.is_empty());
    }
}

#[test]
fn weather_reply_names_the_remembered_destination() {
    let engine = engine();
    let user = "london-user";

    engine.evaluate(user, "plan a trip to London");
    let outcome = engine.evaluate(user, "what is the weather like");

    match outcome {
        EngineOutcome::Handled { reply, intent, .. } => {
            assert_eq!(intent, Intent::WeatherCheck);
            assert!(reply.contains("London"), "{reply}");
        }
        EngineOutcome::Deferred { confidence } => {
            panic!("weather query deferred at {confidence}")
        }
    }
}
