use std::collections::HashMap;

use unicode_segmentation::UnicodeSegmentation;

/// Filler words carrying no intent signal. Deliberately small: on
/// corpora this size, words like "what" or "you" still distinguish
/// intents and must survive tokenization.
const FILLER_WORDS: &[&str] = &[
    "a", "an", "the", "is", "am", "was", "were", "be", "been", "i", "im", "me", "my", "we",
    "our", "it", "its", "to", "for", "of", "in", "on", "at", "by", "with", "and", "or", "so",
    "do", "does", "did", "please",
];

pub(crate) fn tokenize(text: &str) -> Vec<String> {
    text.unicode_words()
        .map(str::to_lowercase)
        .filter(|token| !FILLER_WORDS.contains(&token.as_str()))
        .collect()
}

/// Term index paired with its weight. Indices are strictly increasing.
pub(crate) type SparseVector = Vec<(usize, f32)>;

/// Term-frequency / inverse-document-frequency weighting over the
/// training vocabulary. Rare terms separate intents better than common
/// ones, so each term frequency is scaled down by how many training
/// examples contain the term (smoothed, sklearn-style), then the
/// vector is L2-normalized.
#[derive(Debug, Clone)]
pub(crate) struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    pub(crate) fn fit(documents: &[Vec<String>]) -> Self {
        let mut vocabulary = HashMap::new();
        let mut document_frequency = Vec::new();

        for tokens in documents {
            let mut seen = std::collections::HashSet::new();
            for token in tokens {
                let next_index = vocabulary.len();
                let index = *vocabulary.entry(token.clone()).or_insert(next_index);
                if index == document_frequency.len() {
                    document_frequency.push(0usize);
                }
                if seen.insert(index) {
                    document_frequency[index] += 1;
                }
            }
        }

        let total = documents.len() as f32;
        let idf = document_frequency
            .iter()
            .map(|&df| ((1.0 + total) / (1.0 + df as f32)).ln() + 1.0)
            .collect();

        Self { vocabulary, idf }
    }

    pub(crate) fn dims(&self) -> usize {
        self.vocabulary.len()
    }

    /// Projects tokens onto the training vocabulary. Unknown terms are
    /// dropped; an utterance sharing no terms with the corpus yields an
    /// empty vector.
    pub(crate) fn transform(&self, tokens: &[String]) -> SparseVector {
        let mut counts: HashMap<usize, f32> = HashMap::new();
        for token in tokens {
            if let Some(&index) = self.vocabulary.get(token) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut weighted = counts
            .into_iter()
            .map(|(index, count)| (index, count * self.idf[index]))
            .collect::<Vec<_>>();
        weighted.sort_by_key(|(index, _)| *index);

        let norm = weighted
            .iter()
            .map(|(_, weight)| weight * weight)
            .sum::<f32>()
            .sqrt();
        if norm > 0.0 {
            for (_, weight) in &mut weighted {
                *weight /= norm;
            }
        }

        weighted
    }
}
