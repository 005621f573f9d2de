//! Independent classifiers over lowercased entry text
//!
//! Each function looks at the text on its own and reports what it found.
//! Merging, de-duplication and ordering happen in the combiner.

use super::patterns::{
    CALM_EXCLUSION, CONTEXT_GROUPS, DISTORTION_RULES, EMOTION_KEYWORDS, NEGATIVE_CONTENT,
    SUPPLEMENTARY_RULES, TOPIC_RULES, TRAILING_NEGATION,
};
use regex::Regex;
use tracing::trace;

/// Contextual groups: at most one canonical emotion per group
pub(crate) fn contextual_emotions(text: &str) -> Vec<&'static str> {
    CONTEXT_GROUPS
        .iter()
        .filter_map(|group| {
            group
                .patterns
                .iter()
                .find(|pattern| matches_unnegated(pattern, text))
                .map(|_| {
                    trace!(group = group.name, emotion = group.emotion, "Context group matched");
                    group.emotion
                })
        })
        .collect()
}

/// Single-keyword sweep with negation and conditional filtering
///
/// A keyword counts when at least one of its occurrences is not preceded,
/// within three tokens, by a negation or conditional marker.
pub(crate) fn keyword_emotions(text: &str) -> Vec<&'static str> {
    EMOTION_KEYWORDS
        .iter()
        .filter(|rule| {
            let occurrences = rule.matcher.find_iter(text).count();
            if occurrences == 0 {
                return false;
            }
            let guarded = rule.guard.find_iter(text).count();
            occurrences > guarded
        })
        .filter(|rule| rule.label != "calm" || !CALM_EXCLUSION.is_match(text))
        .map(|rule| rule.label)
        .collect()
}

/// Topic sweep, no negation filtering
pub(crate) fn topics(text: &str) -> Vec<&'static str> {
    TOPIC_RULES
        .iter()
        .filter(|(pattern, _)| pattern.is_match(text))
        .map(|(_, topic)| *topic)
        .collect()
}

/// Extra phrase patterns, consulted only while emotions are scarce
pub(crate) fn supplementary_emotions(text: &str) -> Vec<&'static str> {
    SUPPLEMENTARY_RULES
        .iter()
        .filter(|(pattern, _)| matches_unnegated(pattern, text))
        .filter(|(_, emotion)| *emotion != "calm" || !CALM_EXCLUSION.is_match(text))
        .map(|(_, emotion)| *emotion)
        .collect()
}

/// Every distortion rule that fires, in rule order
pub(crate) fn cognitive_distortions(text: &str) -> Vec<&'static str> {
    DISTORTION_RULES
        .iter()
        .filter(|(_, pattern)| pattern.is_match(text))
        .map(|(name, _)| *name)
        .collect()
}

/// True when the text carries explicitly negative statements
pub(crate) fn has_negative_content(text: &str) -> bool {
    NEGATIVE_CONTENT
        .iter()
        .any(|pattern| matches_unnegated(pattern, text))
}

/// First occurrence of `pattern` not directly preceded by a negation
fn matches_unnegated(pattern: &Regex, text: &str) -> bool {
    pattern
        .find_iter(text)
        .any(|m| !TRAILING_NEGATION.is_match(&text[..m.start()]))
}
