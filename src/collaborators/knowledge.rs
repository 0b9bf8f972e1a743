//! Facts, implication rules and keyword answers about the facility

use super::Responder;
use async_trait::async_trait;
use std::sync::Arc;

/// Rule: when every premise is a known fact the conclusion holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub premises: Vec<String>,
    pub conclusion: String,
}

impl Rule {
    pub fn new(premises: &[&str], conclusion: &str) -> Self {
        Self {
            premises: premises.iter().map(|p| normalize(p)).collect(),
            conclusion: normalize(conclusion),
        }
    }
}

/// Keyword-triggered canned answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordAnswer {
    pub keyword: String,
    pub answer: String,
}

/// Read-only knowledge tables shared by the logic handler and keyword lookup
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    facts: Vec<String>,
    rules: Vec<Rule>,
    keywords: Vec<KeywordAnswer>,
}

const FACTS: &[&str] = &[
    "main entrance is connected to cafeteria",
    "cafeteria is connected to paper recycling",
    "paper recycling is connected to metal recycling",
    "reception is connected to loading dock",
    "plastic recycling is connected to compost area",
    "electronics recycling is connected to recycling zone",
];

const KEYWORDS: &[(&str, &str)] = &[("recycle", "You can recycle plastic, paper, and glass items.")];

impl KnowledgeBase {
    pub fn new(facts: Vec<String>, rules: Vec<Rule>, keywords: Vec<KeywordAnswer>) -> Self {
        Self {
            facts: facts.iter().map(|f| normalize(f)).collect(),
            rules,
            keywords: keywords
                .into_iter()
                .map(|k| KeywordAnswer {
                    keyword: k.keyword.to_lowercase(),
                    answer: k.answer,
                })
                .collect(),
        }
    }

    /// The facility's built-in knowledge
    pub fn standard() -> Self {
        let rules = vec![
            Rule::new(
                &[
                    "main entrance is connected to cafeteria",
                    "cafeteria is connected to paper recycling",
                ],
                "main entrance has access to paper recycling",
            ),
            Rule::new(
                &[
                    "reception is connected to loading dock",
                    "plastic recycling is connected to compost area",
                ],
                "reception is in recycling area",
            ),
        ];
        let keywords = KEYWORDS
            .iter()
            .map(|&(keyword, answer)| KeywordAnswer {
                keyword: keyword.to_string(),
                answer: answer.to_string(),
            })
            .collect();

        Self::new(FACTS.iter().map(|f| (*f).to_string()).collect(), rules, keywords)
    }

    /// Whether the statement is a known fact
    pub fn holds(&self, statement: &str) -> bool {
        let statement = normalize(statement);
        self.facts.iter().any(|f| *f == statement)
    }

    /// First rule whose conclusion is the statement and whose premises all hold
    pub fn infer(&self, statement: &str) -> Option<&Rule> {
        let statement = normalize(statement);
        self.rules
            .iter()
            .filter(|rule| rule.conclusion == statement)
            .find(|rule| rule.premises.iter().all(|p| self.holds(p)))
    }

    /// Canned answer for the first keyword contained in the utterance
    pub fn lookup(&self, utterance: &str) -> Option<&str> {
        let lower = utterance.to_lowercase();
        self.keywords
            .iter()
            .find(|k| lower.contains(&k.keyword))
            .map(|k| k.answer.as_str())
    }
}

/// Lowercase, trim, and collapse inner whitespace
pub(crate) fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Keyword lookup stage of the responder chain
pub struct KeywordResponder {
    knowledge: Arc<KnowledgeBase>,
}

impl KeywordResponder {
    pub fn new(knowledge: Arc<KnowledgeBase>) -> Self {
        Self { knowledge }
    }
}

#[async_trait]
impl Responder for KeywordResponder {
    fn name(&self) -> &str {
        "knowledge_base"
    }

    async fn respond(&self, utterance: &str) -> Option<String> {
        self.knowledge.lookup(utterance).map(String::from)
    }
}
