//! Topic profile - context extracted from the interview topic and role.
//!
//! Built once at session start and reused by question prompts, heuristic
//! scoring, and dimension selection.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::Dimension;

/// Curated term sets for common interview topics.
static TOPIC_TERMS: Lazy<HashMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    let mut m: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
    m.insert(
        "algorithms",
        &[
            "complexity",
            "big-o",
            "recursion",
            "sorting",
            "searching",
            "graph",
            "tree",
            "dynamic",
            "greedy",
            "hash",
            "array",
            "invariant",
        ][..],
    );
    m.insert(
        "data structures",
        &[
            "array", "list", "stack", "queue", "tree", "heap", "hash", "trie", "graph",
            "complexity", "memory",
        ][..],
    );
    m.insert(
        "system design",
        &[
            "scalability",
            "latency",
            "throughput",
            "cache",
            "queue",
            "replication",
            "sharding",
            "consistency",
            "availability",
            "load",
            "partition",
        ][..],
    );
    m.insert(
        "databases",
        &[
            "index", "transaction", "query", "schema", "normalization", "join", "acid",
            "replication", "lock", "isolation",
        ][..],
    );
    m.insert(
        "networking",
        &[
            "tcp", "udp", "http", "dns", "latency", "packet", "socket", "tls", "routing",
            "protocol",
        ][..],
    );
    m.insert(
        "concurrency",
        &[
            "thread", "lock", "mutex", "race", "deadlock", "atomic", "async", "channel",
            "synchronization",
        ][..],
    );
    m
});

/// Keywords that mark a topic as engineering-flavored, which enables the
/// code quality scoring dimension.
const ENGINEERING_MARKERS: &[&str] = &[
    "algorithm",
    "code",
    "coding",
    "programming",
    "software",
    "engineering",
    "backend",
    "frontend",
    "data structure",
    "system design",
    "database",
    "concurrency",
    "rust",
    "python",
    "java",
    "javascript",
    "go",
];

/// Context derived from the interview topic and target role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicProfile {
    /// The interview topic as given by the caller.
    pub topic: String,
    /// Optional target role, used to flavor question prompts.
    pub target_role: Option<String>,
    /// Lowercase terms expected in on-topic answers.
    pub terms: Vec<String>,
    /// Whether the topic is engineering-flavored.
    pub engineering: bool,
}

impl TopicProfile {
    /// Derives a profile from the raw topic and optional role.
    pub fn derive(topic: &str, target_role: Option<&str>) -> Self {
        let lower = topic.to_lowercase();

        let mut terms: Vec<String> = Vec::new();
        for (key, set) in TOPIC_TERMS.iter() {
            if lower.contains(key) {
                terms.extend(set.iter().map(|t| t.to_string()));
            }
        }
        // The topic's own words are always expected vocabulary.
        for word in lower.split_whitespace() {
            let word = word.trim_matches(|c: char| !c.is_alphanumeric());
            if word.len() > 2 && !terms.iter().any(|t| t == word) {
                terms.push(word.to_string());
            }
        }

        let engineering = ENGINEERING_MARKERS.iter().any(|m| lower.contains(m));

        Self {
            topic: topic.to_string(),
            target_role: target_role.map(|r| r.to_string()),
            terms,
            engineering,
        }
    }

    /// Scoring dimensions that apply to this topic.
    pub fn dimensions(&self) -> Vec<Dimension> {
        let mut dims = vec![
            Dimension::TechnicalAccuracy,
            Dimension::Communication,
            Dimension::ProblemSolving,
        ];
        if self.engineering {
            dims.push(Dimension::CodeQuality);
        }
        dims
    }
}
