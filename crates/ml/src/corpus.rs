use std::path::Path;

use anyhow::{Context, Result};
use tripmind_core::TrainingExample;
use walkdir::WalkDir;

/// Reads every `.jsonl` file under the training root, one
/// `{"text": ..., "intent": ...}` object per line. Files are visited
/// in path order so the corpus is stable across platforms.
pub fn load_training_corpus(root: impl AsRef<Path>) -> Result<Vec<TrainingExample>> {
    let mut files = WalkDir::new(root.as_ref())
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry.path().extension().and_then(|ext| ext.to_str()) == Some("jsonl")
        })
        .map(|entry| entry.into_path())
        .collect::<Vec<_>>();
    files.sort();

    let mut examples = Vec::new();
    for path in files {
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("failed reading training file: {}", path.display()))?;

        for line in raw.lines().map(str::trim).filter(|line| !line.is_empty()) {
            let example: TrainingExample = serde_json::from_str(line)
                .with_context(|| format!("invalid training line in {}", path.display()))?;
            examples.push(example);
        }
    }

    Ok(examples)
}
