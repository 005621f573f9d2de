//! Offline rule-based analyzer
//!
//! Produces the same [`AnalysisResult`] shape as the external analysis service
//! from pattern rules alone. Pure and deterministic: no cache, no I/O, and
//! identical input always yields an identical result.
//!
//! # Pipeline
//! 1. Contextual pattern groups (one canonical emotion per group)
//! 2. Emotion keyword sweep with negation/conditional filtering
//! 3. Topic keyword sweep
//! 4. Supplementary phrases, only while fewer than 2 emotions were found
//! 5. Cognitive distortion rules
//! 6. Tag backfill
//! 7. Narrative synthesis (from the findings before backfill)
//! 8. Sentiment split
//!
//! Steps 1-5 are independent classifiers; [`analyze_offline`] merges their
//! output in step order, dropping duplicates.

mod classifiers;
mod narrative;
mod patterns;
mod sentiment;

use crate::types::{AnalysisResult, MAX_SUGGESTED_TAGS};
use tracing::debug;

/// Below this many emotions the supplementary phrases are consulted
const SUPPLEMENTARY_THRESHOLD: usize = 2;

/// Below this many distinct tags the generic tags are appended
const MIN_TAGS: usize = 3;

/// Content longer than this is tagged "detailed" instead of "brief"
const DETAILED_CONTENT_CHARS: usize = 500;

const DEFAULT_EMOTION: &str = "reflective";
const DEFAULT_TOPIC: &str = "personal development";

/// Raw classifier output before backfill
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Findings {
    pub emotions: Vec<String>,
    pub topics: Vec<String>,
    pub distortions: Vec<String>,
    pub negative_content: bool,
}

/// Run every classifier over the entry and merge the results
pub fn classify(title: &str, content: &str) -> Findings {
    let text = prepare_text(title, content);
    let mut findings = Findings::default();

    for emotion in classifiers::contextual_emotions(&text) {
        push_unique(&mut findings.emotions, emotion);
    }
    for emotion in classifiers::keyword_emotions(&text) {
        push_unique(&mut findings.emotions, emotion);
    }
    for topic in classifiers::topics(&text) {
        push_unique(&mut findings.topics, topic);
    }
    if findings.emotions.len() < SUPPLEMENTARY_THRESHOLD {
        for emotion in classifiers::supplementary_emotions(&text) {
            push_unique(&mut findings.emotions, emotion);
        }
    }
    for distortion in classifiers::cognitive_distortions(&text) {
        push_unique(&mut findings.distortions, distortion);
    }
    findings.negative_content = classifiers::has_negative_content(&text);

    findings
}

/// Analyze a journal entry without any external service
pub fn analyze_offline(title: &str, content: &str) -> AnalysisResult {
    let findings = classify(title, content);
    let analysis = narrative::compose(&findings);

    let Findings {
        mut emotions,
        mut topics,
        distortions,
        negative_content,
    } = findings;

    let mut tags = Vec::new();
    for label in emotions.iter().chain(topics.iter()) {
        push_unique(&mut tags, label);
    }

    if tags.len() < MIN_TAGS {
        let length_tag = if content.chars().count() > DETAILED_CONTENT_CHARS {
            "detailed"
        } else {
            "brief"
        };
        for tag in ["journal", "reflection", length_tag] {
            push_unique(&mut tags, tag);
        }
    }
    if emotions.is_empty() {
        emotions.push(DEFAULT_EMOTION.to_string());
        push_unique(&mut tags, DEFAULT_EMOTION);
    }
    if topics.is_empty() {
        topics.push(DEFAULT_TOPIC.to_string());
        push_unique(&mut tags, DEFAULT_TOPIC);
    }
    tags.truncate(MAX_SUGGESTED_TAGS);

    let sentiment = sentiment::score(&emotions, negative_content);

    debug!(
        emotions = emotions.len(),
        topics = topics.len(),
        distortions = distortions.len(),
        negative_content,
        "Offline analysis complete"
    );

    AnalysisResult {
        suggested_tags: tags,
        analysis,
        emotions,
        topics,
        cognitive_distortions: distortions,
        sentiment,
    }
}

/// Lowercased "title content" with typographic apostrophes straightened
fn prepare_text(title: &str, content: &str) -> String {
    format!("{} {}", title, content)
        .to_lowercase()
        .replace(['\u{2019}', '\u{2018}'], "'")
}

fn push_unique(list: &mut Vec<String>, item: &str) {
    if !list.iter().any(|existing| existing == item) {
        list.push(item.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Sentiment;

    #[test]
    fn test_failed_exam_entry() {
        let result = analyze_offline(
            "Bad day",
            "I failed the exam and now I will never succeed at anything.",
        );

        assert_eq!(result.emotions, vec!["sad", "hopeless"]);
        assert_eq!(result.topics, vec!["education"]);
        assert!(result
            .cognitive_distortions
            .contains(&"Overgeneralization".to_string()));
        assert_eq!(result.sentiment, Sentiment::new(0, 85, 15));
        assert!(result.sentiment.negative > result.sentiment.positive);
        assert_eq!(result.suggested_tags, vec!["sad", "hopeless", "education"]);
        assert!(result.analysis.contains("overgeneralization"));
    }

    #[test]
    fn test_negated_emotion_is_dropped() {
        let result = analyze_offline("Status", "I am not anxious about this");

        assert!(!result.emotions.contains(&"anxious".to_string()));
        assert_eq!(result.emotions, vec!["reflective"]);
        assert_eq!(result.topics, vec!["personal development"]);
        assert_eq!(result.sentiment, Sentiment::neutral());
        assert_eq!(
            result.suggested_tags,
            vec!["journal", "reflection", "brief", "reflective", "personal development"]
        );
        assert!(result.analysis.starts_with("Thank you for taking time to reflect."));
    }

    #[test]
    fn test_detailed_backfill_tag() {
        let content = "Quiet afternoon by the window. ".repeat(20);
        let result = analyze_offline("Notes", &content);
        assert!(result.suggested_tags.contains(&"detailed".to_string()));
        assert!(!result.suggested_tags.contains(&"brief".to_string()));
    }

    #[test]
    fn test_positive_entry() {
        let result = analyze_offline(
            "Great news",
            "I got the promotion at work today and I feel so happy and proud.",
        );
        assert!(result.emotions.contains(&"happy".to_string()));
        assert!(result.emotions.contains(&"proud".to_string()));
        assert_eq!(result.topics, vec!["work"]);
        assert_eq!(result.sentiment, Sentiment::new(100, 0, 0));
        assert!(result.cognitive_distortions.is_empty());
    }

    #[test]
    fn test_supplementary_skipped_when_enough_emotions() {
        let result = analyze_offline("Evening", "I felt lonely and tired. I miss her.");
        assert!(!result.emotions.contains(&"longing".to_string()));

        let result = analyze_offline("Evening", "I miss her so much.");
        assert_eq!(result.emotions, vec!["longing"]);
    }

    #[test]
    fn test_tags_capped() {
        let result = analyze_offline(
            "Everything",
            "happy sad angry curious tired proud nervous bored grateful at work with family and friends",
        );
        assert_eq!(result.suggested_tags.len(), MAX_SUGGESTED_TAGS);
        assert!(result.emotions.len() > MAX_SUGGESTED_TAGS);
    }

    #[test]
    fn test_typographic_apostrophe() {
        let result = analyze_offline("Status", "I don\u{2019}t feel happy");
        assert!(!result.emotions.contains(&"happy".to_string()));
    }

    #[test]
    fn test_always_well_formed() {
        let samples = [
            ("", "x"),
            ("Title only", ""),
            ("Mixed", "Happy about the trip but anxious about money and my boss."),
            ("Spiral", "I always ruin everything. It's my fault. I'm such a failure."),
        ];
        for (title, content) in samples {
            let result = analyze_offline(title, content);
            assert!(result.is_well_formed(), "{:?}", result);
            assert!(!result.emotions.is_empty());
            assert!(!result.topics.is_empty());
            assert!(!result.analysis.is_empty());
        }
    }

    #[test]
    fn test_deterministic() {
        let a = analyze_offline("Work", "Deadline stress, boss is never happy with my work.");
        let b = analyze_offline("Work", "Deadline stress, boss is never happy with my work.");
        assert_eq!(a, b);
    }
}
