//! Heuristic answer scoring.
//!
//! A deterministic signal computed without any model call: answer length,
//! structural markers (lists, code, worked examples), and keyword overlap
//! with the topic's expected vocabulary. Range 0..=10.

use super::TopicProfile;

/// Words at or above which the length component maxes out.
const FULL_LENGTH_WORDS: usize = 150;

/// Phrases that indicate the answer walks through a concrete example.
const EXAMPLE_MARKERS: &[&str] = &["for example", "for instance", "e.g.", "such as", "consider"];

/// Deterministic scorer over answer text.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicScorer;

impl HeuristicScorer {
    pub fn new() -> Self {
        Self
    }

    /// Scores an answer in 0..=10.
    ///
    /// Components: length up to 4 points, structure up to 3, keyword
    /// overlap up to 3.
    pub fn score(&self, answer: &str, profile: &TopicProfile) -> f64 {
        let trimmed = answer.trim();
        if trimmed.is_empty() {
            return 0.0;
        }

        let length = Self::length_component(trimmed);
        let structure = Self::structure_component(trimmed);
        let keywords = Self::keyword_component(trimmed, profile);

        (length + structure + keywords).clamp(0.0, 10.0)
    }

    fn length_component(answer: &str) -> f64 {
        let words = answer.split_whitespace().count();
        (words as f64 / FULL_LENGTH_WORDS as f64).min(1.0) * 4.0
    }

    fn structure_component(answer: &str) -> f64 {
        let mut points = 0.0;

        let has_list = answer.lines().any(|line| {
            let line = line.trim_start();
            line.starts_with("- ")
                || line.starts_with("* ")
                || line.split_once(". ").is_some_and(|(prefix, _)| {
                    !prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_digit())
                })
        });
        if has_list {
            points += 1.0;
        }

        if answer.contains('`') {
            points += 1.0;
        }

        let lower = answer.to_lowercase();
        if EXAMPLE_MARKERS.iter().any(|m| lower.contains(m)) {
            points += 1.0;
        }

        points
    }

    fn keyword_component(answer: &str, profile: &TopicProfile) -> f64 {
        if profile.terms.is_empty() {
            return 0.0;
        }

        let lower = answer.to_lowercase();
        let matched = profile.terms.iter().filter(|t| lower.contains(t.as_str())).count();

        // A handful of on-topic terms is enough for full credit; requiring
        // the entire vocabulary would punish focused answers.
        (matched as f64 / 5.0).min(1.0) * 3.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> TopicProfile {
        TopicProfile::derive("algorithms", None)
    }

    #[test]
    fn empty_answer_scores_zero() {
        let scorer = HeuristicScorer::new();
        assert_eq!(scorer.score("", &profile()), 0.0);
        assert_eq!(scorer.score("   \n  ", &profile()), 0.0);
    }

    #[test]
    fn short_vague_answer_scores_low() {
        let scorer = HeuristicScorer::new();
        let score = scorer.score("I don't know, maybe yes?", &profile());
        assert!(score < 2.0, "got {}", score);
    }

    #[test]
    fn structured_on_topic_answer_scores_high() {
        let scorer = HeuristicScorer::new();
        let answer = "\
The time complexity depends on the traversal. For example, a breadth-first \
search over a graph visits every vertex and edge once:\n\
- build an adjacency hash map, which costs linear time\n\
- push each vertex into the queue at most once\n\
- relax every edge exactly once\n\
So the complexity is O(V + E). A recursion-based depth-first variant has the \
same bound but uses the call stack. Using `VecDeque` keeps pops amortized \
constant. Sorting the output afterwards would add an extra log factor, so we \
avoid it by tracking the visit order in an array while searching the tree. \
This keeps the invariant that every node is processed before its children \
and makes the dynamic part of the algorithm easy to reason about in practice.";
        let score = scorer.score(answer, &profile());
        assert!(score >= 7.0, "got {}", score);
    }

    #[test]
    fn keyword_overlap_rewards_on_topic_vocabulary() {
        let scorer = HeuristicScorer::new();
        let on_topic = "A hash table gives constant lookups; a tree gives ordered traversal; \
complexity analysis with big-o and recursion explains the tradeoff for sorting.";
        let off_topic = "My favorite dish is pasta with tomato sauce and plenty of basil on top.";

        let profile = profile();
        assert!(scorer.score(on_topic, &profile) > scorer.score(off_topic, &profile));
    }

    #[test]
    fn score_is_deterministic() {
        let scorer = HeuristicScorer::new();
        let answer = "Sorting with merge sort is O(n log n). For example, splitting the array.";
        let p = profile();
        assert_eq!(scorer.score(answer, &p), scorer.score(answer, &p));
    }

    #[test]
    fn score_never_exceeds_bounds() {
        let scorer = HeuristicScorer::new();
        let long = "complexity graph tree hash recursion sorting searching array ".repeat(100);
        let score = scorer.score(&long, &profile());
        assert!((0.0..=10.0).contains(&score));
    }
}
