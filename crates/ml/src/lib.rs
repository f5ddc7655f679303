mod corpus;
mod softmax;
mod vectorizer;

use tracing::info;
use tripmind_core::{Classification, Intent, TrainingError, TrainingExample};

use softmax::SoftmaxModel;
use vectorizer::{tokenize, TfidfVectorizer};

pub use corpus::load_training_corpus;
pub use softmax::TrainingConfig;

pub trait IntentClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Classification;
}

/// TF-IDF bag-of-terms feeding a softmax regression. Built in two
/// phases: `train` consumes the corpus once at startup and returns a
/// ready-to-query instance; classification afterwards is a pure
/// function of the fitted state and the input text.
pub struct TfidfIntentClassifier {
    vectorizer: TfidfVectorizer,
    model: SoftmaxModel,
}

impl TfidfIntentClassifier {
    pub fn train(
        examples: &[TrainingExample],
        config: &TrainingConfig,
    ) -> Result<Self, TrainingError> {
        if examples.is_empty() {
            return Err(TrainingError::EmptyCorpus);
        }

        let mut intents = Vec::with_capacity(examples.len());
        for example in examples {
            let intent = Intent::parse(&example.intent)
                .ok_or_else(|| TrainingError::UnknownLabel(example.intent.clone()))?;
            intents.push(intent);
        }

        // Class order follows the enum declaration, not corpus order,
        // so the fitted model is independent of example shuffling.
        let classes = Intent::ALL
            .into_iter()
            .filter(|candidate| intents.contains(candidate))
            .collect::<Vec<_>>();
        if classes.len() < 2 {
            return Err(TrainingError::TooFewLabels(classes.len()));
        }

        let documents = examples
            .iter()
            .map(|example| tokenize(&example.text))
            .collect::<Vec<_>>();
        let vectorizer = TfidfVectorizer::fit(&documents);

        let features = documents
            .iter()
            .map(|tokens| vectorizer.transform(tokens))
            .collect::<Vec<_>>();
        let labels = intents
            .iter()
            .map(|intent| classes.iter().position(|c| c == intent).unwrap_or(0))
            .collect::<Vec<_>>();

        let dims = vectorizer.dims();
        let model = SoftmaxModel::train(classes, &features, &labels, dims, config);

        info!(
            examples = examples.len(),
            intents = model.classes().len(),
            vocabulary = dims,
            "intent model trained"
        );

        Ok(Self { vectorizer, model })
    }

    /// Full calibrated distribution over the trained label set.
    /// Empty or fully out-of-vocabulary input gets the uniform
    /// distribution: the honest "I have no signal" answer.
    pub fn distribution(&self, text: &str) -> Vec<(Intent, f32)> {
        let classes = self.model.classes();
        let vector = self.vectorizer.transform(&tokenize(text));
        if vector.is_empty() {
            let uniform = 1.0 / classes.len() as f32;
            return classes.iter().map(|&intent| (intent, uniform)).collect();
        }

        classes
            .iter()
            .copied()
            .zip(self.model.predict_proba(&vector))
            .collect()
    }
}

impl IntentClassifier for TfidfIntentClassifier {
    fn classify(&self, text: &str) -> Classification {
        let distribution = self.distribution(text);
        // Ties (uniform case) resolve to the first declared class.
        let (intent, confidence) = distribution
            .iter()
            .copied()
            .fold(distribution[0], |best, candidate| {
                if candidate.1 > best.1 {
                    candidate
                } else {
                    best
                }
            });

        Classification { intent, confidence }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example(text: &str, intent: &str) -> TrainingExample {
        TrainingExample {
            text: text.to_string(),
            intent: intent.to_string(),
        }
    }

    fn small_corpus() -> Vec<TrainingExample> {
        vec![
            example("hi", "greeting"),
            example("hello there", "greeting"),
            example("hey bot", "greeting"),
            example("what should I pack", "packing_help"),
            example("packing list for trip", "packing_help"),
            example("help me pack my bags", "packing_help"),
            example("how much money should I carry", "budget_help"),
            example("help me plan a budget", "budget_help"),
            example("what will this trip cost", "budget_help"),
        ]
    }

    #[test]
    fn training_examples_classify_to_their_label() {
        let classifier =
            TfidfIntentClassifier::train(&small_corpus(), &TrainingConfig::default()).unwrap();

        for example in small_corpus() {
            let result = classifier.classify(&example.text);
            assert_eq!(result.intent.as_label(), example.intent, "{}", example.text);
            assert!(result.confidence >= 0.25, "{}", example.text);
        }
    }

    #[test]
    fn distribution_sums_to_one() {
        let classifier =
            TfidfIntentClassifier::train(&small_corpus(), &TrainingConfig::default()).unwrap();

        for text in ["what should I pack for Goa?", "asdkjfh random gibberish", ""] {
            let sum: f32 = classifier.distribution(text).iter().map(|(_, p)| p).sum();
            assert!((sum - 1.0).abs() < 1e-4, "{text}");
        }
    }

    #[test]
    fn empty_input_is_uniform() {
        let classifier =
            TfidfIntentClassifier::train(&small_corpus(), &TrainingConfig::default()).unwrap();

        let result = classifier.classify("   ");
        assert!((result.confidence - 1.0 / 3.0).abs() < 1e-5);
    }

    #[test]
    fn classification_is_deterministic_across_retrains() {
        let first =
            TfidfIntentClassifier::train(&small_corpus(), &TrainingConfig::default()).unwrap();
        let second =
            TfidfIntentClassifier::train(&small_corpus(), &TrainingConfig::default()).unwrap();

        let query = "what should I pack for the beach";
        assert_eq!(first.distribution(query), second.distribution(query));
    }

    #[test]
    fn empty_corpus_is_fatal() {
        let result = TfidfIntentClassifier::train(&[], &TrainingConfig::default());
        assert!(matches!(result, Err(TrainingError::EmptyCorpus)));
    }

    #[test]
    fn unknown_label_is_fatal() {
        let corpus = vec![example("fly me to the moon", "space_travel")];
        let result = TfidfIntentClassifier::train(&corpus, &TrainingConfig::default());
        assert!(matches!(result, Err(TrainingError::UnknownLabel(_))));
    }

    #[test]
    fn single_label_corpus_is_fatal() {
        let corpus = vec![example("hi", "greeting"), example("hello", "greeting")];
        let result = TfidfIntentClassifier::train(&corpus, &TrainingConfig::default());
        assert!(matches!(result, Err(TrainingError::TooFewLabels(1))));
    }
}
