//! Narrative summary for offline results
//!
//! Template priority: distortion-specific, then emotion family, then
//! topic-only, then generic. Every template ends with one coaching
//! suggestion aimed at the dominant issue.

use super::patterns::{
    ALL_OR_NOTHING, CATASTROPHIZING, EMOTIONAL_REASONING, OVERGENERALIZATION, POSITIVE_EMOTIONS,
};
use super::Findings;

const ANXIETY_FAMILY: &[&str] = &[
    "anxious", "nervous", "worried", "scared", "afraid", "frightened", "terrified", "panicked",
    "stressed", "overwhelmed", "tense", "uneasy", "restless", "insecure",
];

const SADNESS_FAMILY: &[&str] = &[
    "sad", "unhappy", "depressed", "miserable", "gloomy", "heartbroken", "hopeless", "helpless",
    "worthless", "lonely", "isolated", "abandoned", "rejected", "empty", "numb", "hurt",
    "disappointed", "discouraged", "defeated", "devastated", "grieving",
];

const ANGER_FAMILY: &[&str] = &[
    "angry", "mad", "furious", "irritated", "annoyed", "frustrated", "resentful", "bitter",
    "jealous", "envious", "hostile", "betrayed",
];

const EXHAUSTION_FAMILY: &[&str] = &["exhausted", "tired", "drained", "burned out", "fatigued"];

/// Build the narrative from pre-backfill findings
pub(crate) fn compose(findings: &Findings) -> String {
    let mut parts = Vec::new();

    if !findings.emotions.is_empty() {
        parts.push(format!(
            "This entry reflects feelings of {}.",
            join_natural(&findings.emotions)
        ));
    }

    let body = distortion_template(&findings.distortions)
        .or_else(|| emotion_template(&findings.emotions))
        .or_else(|| topic_template(&findings.topics))
        .unwrap_or_else(|| {
            "Thank you for taking time to reflect. Regular journaling helps you notice patterns in your thoughts and feelings over time. Suggestion: try writing a few lines at the same time each day to build the habit.".to_string()
        });
    parts.push(body);

    parts.join(" ")
}

fn distortion_template(distortions: &[String]) -> Option<String> {
    let has = |name: &str| distortions.iter().any(|d| d == name);

    if distortions.is_empty() {
        return None;
    }
    let text = if has(ALL_OR_NOTHING) {
        "Some of your thoughts lean toward all-or-nothing thinking, where things feel either perfect or a complete failure. Suggestion: look for the middle ground and note one part of the situation that went partly right.".to_string()
    } else if has(OVERGENERALIZATION) {
        "Words like \"always\" and \"never\" suggest overgeneralization, drawing a sweeping conclusion from a single event. Suggestion: write down one counterexample from your own experience that breaks the pattern.".to_string()
    } else if has(CATASTROPHIZING) {
        "Your entry shows signs of catastrophizing, expecting the worst possible outcome. Suggestion: ask yourself what the most likely outcome is, and how you would cope if it happened.".to_string()
    } else if has(EMOTIONAL_REASONING) {
        "It sounds like a strong feeling is being taken as proof of how things are, a pattern called emotional reasoning. Suggestion: separate what you feel from what the evidence shows by listing facts for and against the thought.".to_string()
    } else {
        format!(
            "Some thinking patterns here are worth examining: {}. Suggestion: pick one thought and question whether the evidence fully supports it.",
            distortions.join(", ").to_lowercase()
        )
    };
    Some(text)
}

fn emotion_template(emotions: &[String]) -> Option<String> {
    let any_of = |family: &[&str]| {
        emotions
            .iter()
            .any(|e| family.iter().any(|member| *member == e.as_str()))
    };

    let text = if any_of(ANXIETY_FAMILY) {
        "Anxiety seems to be weighing on you. Suggestion: try a slow breathing exercise and write down which worries are within your control."
    } else if any_of(SADNESS_FAMILY) {
        "You seem to be going through a difficult time. Suggestion: be gentle with yourself and consider reaching out to someone you trust."
    } else if any_of(ANGER_FAMILY) {
        "Frustration comes through in this entry. Suggestion: name the need behind the anger and consider one small step toward meeting it."
    } else if any_of(EXHAUSTION_FAMILY) {
        "You sound worn down. Suggestion: protect some time for rest and notice which activities drain or restore your energy."
    } else if any_of(POSITIVE_EMOTIONS) {
        "There is a lot of positive energy here. Suggestion: note what contributed to these feelings so you can return to it on harder days."
    } else {
        return None;
    };
    Some(text.to_string())
}

fn topic_template(topics: &[String]) -> Option<String> {
    if topics.is_empty() {
        return None;
    }
    Some(format!(
        "You wrote about {}. Suggestion: notice how this area of your life affects your mood over the next few days.",
        join_natural(topics)
    ))
}

/// "a", "a and b", "a, b and c"
fn join_natural(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}
