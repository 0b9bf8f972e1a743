//! FAQ dictionary loaded from a JSON object of question → answer

use super::knowledge::normalize;
use super::Responder;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FaqError {
    #[error("Failed to read FAQ file: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid FAQ file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Exact, case-insensitive question lookup
#[derive(Debug, Clone, Default)]
pub struct FaqTable {
    entries: HashMap<String, String>,
}

impl FaqTable {
    pub fn new(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut table = HashMap::new();
        for (question, answer) in entries {
            table.entry(normalize(&question)).or_insert(answer);
        }
        Self { entries: table }
    }

    pub fn from_json(json: &str) -> Result<Self, FaqError> {
        let raw: BTreeMap<String, String> = serde_json::from_str(json)?;
        Ok(Self::new(raw))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FaqError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Like [`FaqTable::load`], but a missing file yields an empty table.
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Result<Self, FaqError> {
        let path = path.as_ref();
        match Self::load(path) {
            Err(FaqError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "FAQ file not found, starting with an empty table");
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn answer(&self, question: &str) -> Option<&str> {
        self.entries.get(&normalize(question)).map(String::as_str)
    }
}

#[async_trait]
impl Responder for FaqTable {
    fn name(&self) -> &str {
        "faq"
    }

    async fn respond(&self, utterance: &str) -> Option<String> {
        self.answer(utterance).map(String::from)
    }
}
