use serde::{Deserialize, Serialize};

/// Closed set of intents the engine can be trained on. Every variant
/// has exactly one response generator in the engine crate, so an
/// unhandled label cannot slip through at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    Farewell,
    PackingHelp,
    BudgetHelp,
    WeatherCheck,
    FoodSuggestion,
    TravelTips,
    BotIdentity,
}

impl Intent {
    pub const ALL: [Intent; 8] = [
        Intent::Greeting,
        Intent::Farewell,
        Intent::PackingHelp,
        Intent::BudgetHelp,
        Intent::WeatherCheck,
        Intent::FoodSuggestion,
        Intent::TravelTips,
        Intent::BotIdentity,
    ];

    /// Parses a corpus label. Unknown labels are a corpus defect and
    /// surface as a fatal training error upstream.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "greeting" => Some(Self::Greeting),
            "farewell" | "goodbye" => Some(Self::Farewell),
            "packing_help" => Some(Self::PackingHelp),
            "budget_help" => Some(Self::BudgetHelp),
            "weather_check" => Some(Self::WeatherCheck),
            "food_suggestion" => Some(Self::FoodSuggestion),
            "travel_tips" => Some(Self::TravelTips),
            "bot_identity" => Some(Self::BotIdentity),
            _ => None,
        }
    }

    pub fn as_label(self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::Farewell => "farewell",
            Self::PackingHelp => "packing_help",
            Self::BudgetHelp => "budget_help",
            Self::WeatherCheck => "weather_check",
            Self::FoodSuggestion => "food_suggestion",
            Self::TravelTips => "travel_tips",
            Self::BotIdentity => "bot_identity",
        }
    }
}

pub fn normalize_text(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// Destination-archetype hints keyed by knowledge-base tag. Scanned in
/// this order; first hit wins.
const TOPIC_KEYWORDS: &[(&str, &[&str])] = &[
    ("beach", &["beach", "coast", "coastal", "island", "seaside"]),
    ("mountain", &["mountain", "hike", "hiking", "trek", "trekking", "alpine"]),
    ("city", &["city", "urban", "museum", "sightseeing", "downtown"]),
    ("winter", &["winter", "snow", "ski", "skiing", "cold"]),
    ("camping", &["camp", "camping", "tent", "campsite"]),
];

/// Scans free text for a destination-archetype keyword and returns the
/// matching knowledge tag, if any.
pub fn detect_topic(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    for (tag, keywords) in TOPIC_KEYWORDS {
        if keywords.iter().any(|keyword| contains_word(&lower, keyword)) {
            return Some(tag);
        }
    }
    None
}

fn contains_word(haystack: &str, word: &str) -> bool {
    haystack
        .split(|ch: char| !ch.is_alphanumeric())
        .any(|token| token == word)
}
