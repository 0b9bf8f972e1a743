//! Pulls (start, destination) phrases out of a free-text utterance

use regex::Regex;

/// Pattern sources, tried in this order. Each must capture exactly two groups.
const SPAN_PATTERNS: &[(&str, &str)] = &[
    (
        "from_to",
        r"\b(?:from|at)\s+(\S+(?:\s+\S+)*?)\s+(?:to|until|till|through)\s+(\S+(?:\s+\S+)*)",
    ),
    (
        "keyword_from_to",
        r"\b(?:how to get|path|route|directions)\s+(?:from|at)\s+(\S+(?:\s+\S+)*)\s+(?:to|until)\s+(\S+(?:\s+\S+)*)",
    ),
    ("bare_to", r"(\S+(?:\s+\S+)*)\s+to\s+(\S+(?:\s+\S+)*)"),
];

/// Phrases that mark an utterance as a pathfinding request
const TRIGGER_PATTERNS: &[&str] = &[
    r"\bpath\b",
    r"\broute\b",
    r"\bhow to get\b",
    r"from .* to",
    r"directions",
];

const REQUIRED_GROUPS: usize = 2;

/// One declarative extraction rule
#[derive(Debug, Clone)]
pub struct SpanPattern {
    pub name: &'static str,
    regex: Regex,
}

impl SpanPattern {
    fn new(name: &'static str, source: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            regex: Regex::new(source)?,
        })
    }

    /// Apply to already lower-cased text. Both groups must be non-empty.
    pub fn apply(&self, text: &str) -> Option<Spans> {
        let caps = self.regex.captures(text)?;
        if caps.len() < REQUIRED_GROUPS + 1 {
            return None;
        }
        let start = clean(caps.get(1)?.as_str());
        let destination = clean(caps.get(2)?.as_str());
        if start.is_empty() || destination.is_empty() {
            return None;
        }
        Some(Spans {
            start,
            destination,
        })
    }
}

/// A candidate start phrase and destination phrase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spans {
    pub start: String,
    pub destination: String,
}

/// Ordered span patterns plus the pathfinding trigger set
#[derive(Debug, Clone)]
pub struct SpanExtractor {
    patterns: Vec<SpanPattern>,
    triggers: Vec<Regex>,
}

impl SpanExtractor {
    pub fn new() -> Result<Self, regex::Error> {
        let patterns = SPAN_PATTERNS
            .iter()
            .map(|&(name, source)| SpanPattern::new(name, source))
            .collect::<Result<_, _>>()?;
        let triggers = TRIGGER_PATTERNS
            .iter()
            .map(|&source| Regex::new(source))
            .collect::<Result<_, _>>()?;
        Ok(Self { patterns, triggers })
    }

    /// Whether the utterance asks for a route at all
    pub fn is_path_request(&self, utterance: &str) -> bool {
        let lower = utterance.to_lowercase();
        self.triggers.iter().any(|t| t.is_match(&lower))
    }

    /// First pattern that yields two non-empty phrases wins
    pub fn extract(&self, utterance: &str) -> Option<Spans> {
        let text = utterance.trim().to_lowercase();
        self.patterns.iter().find_map(|p| {
            let spans = p.apply(&text)?;
            tracing::debug!(pattern = p.name, ?spans, "Extracted location spans");
            Some(spans)
        })
    }

    #[cfg(test)]
    pub fn patterns(&self) -> &[SpanPattern] {
        &self.patterns
    }
}

/// Trim whitespace and sentence punctuation from the ends of a span
fn clean(span: &str) -> String {
    span.trim_matches(|c: char| {
        c.is_whitespace() || matches!(c, '?' | '!' | '.' | ',' | ';' | ':' | '"' | '\'')
    })
    .to_string()
}
