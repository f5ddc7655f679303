pub mod entities;
pub mod error;
pub mod intent;
pub mod models;

pub use entities::{extract_entities, ExtractedEntities};
pub use error::{KnowledgeError, TrainingError};
pub use intent::{detect_topic, normalize_text, Intent};
pub use models::*;
