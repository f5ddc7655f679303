use once_cell::sync::Lazy;
use regex::Regex;

/// Trip details pulled from a single utterance by regex heuristics.
/// Ported behavior: "to/in/visit/at <Place>", "for 3 days", "$500".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedEntities {
    pub destination: Option<String>,
    pub duration: Option<String>,
    pub budget: Option<String>,
}

impl ExtractedEntities {
    pub fn is_empty(&self) -> bool {
        self.destination.is_none() && self.duration.is_none() && self.budget.is_none()
    }
}

static DESTINATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:to|in|visit|at)\s+([a-z][a-z ]*?)(?:\s+(?:for|with|on|from|at)\b|[?.!,]|$)")
        .expect("valid destination regex")
});

static DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:for\s+)?(\d+\s+(?:day|week|month)s?|weekend|fortnight)")
        .expect("valid duration regex")
});

static BUDGET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)([$₹€£]\s*\d+(?:,\d+)?|\d+(?:,\d+)?\s*(?:dollars|rupees|usd|inr))")
        .expect("valid budget regex")
});

pub fn extract_entities(text: &str) -> ExtractedEntities {
    ExtractedEntities {
        destination: extract_destination(text),
        duration: DURATION_RE
            .captures(text)
            .and_then(|captures| captures.get(1))
            .map(|value| value.as_str().to_string()),
        budget: BUDGET_RE
            .captures(text)
            .and_then(|captures| captures.get(1))
            .map(|value| value.as_str().to_string()),
    }
}

fn extract_destination(text: &str) -> Option<String> {
    if let Some(captures) = DESTINATION_RE.captures(text) {
        let raw = captures.get(1)?.as_str().trim();
        // Prepositions like "the" leak through; drop leading articles.
        let cleaned = raw
            .strip_prefix("the ")
            .or_else(|| raw.strip_prefix("The "))
            .unwrap_or(raw);
        if !cleaned.is_empty() {
            return Some(title_case(cleaned));
        }
    }

    // Bare proper noun ("Goa", "New Delhi") when the whole message is
    // short and already capitalized.
    let trimmed = text.trim();
    if trimmed.split_whitespace().count() <= 2
        && trimmed.chars().next().is_some_and(char::is_uppercase)
        && trimmed.chars().all(|ch| ch.is_alphabetic() || ch == ' ')
    {
        return Some(trimmed.to_string());
    }

    None
}

fn title_case(input: &str) -> String {
    input
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
