//! Taxonomy behavior through the public API

use reverie_engine::taxonomy::NEUTRAL_COLOR;
use reverie_engine::{
    analyze_offline, categorize_emotion, emotion_color, related_emotions,
    related_emotions_for_label, resolve, CoreEmotion,
};

#[test]
fn test_resolve_is_case_and_whitespace_insensitive() {
    assert_eq!(resolve("happy"), Some(CoreEmotion::Joy));
    assert_eq!(resolve("  HAPPY "), Some(CoreEmotion::Joy));
    assert_eq!(resolve("Anxious"), Some(CoreEmotion::Fear));
    assert_eq!(resolve("furious"), Some(CoreEmotion::Anger));
}

#[test]
fn test_unknown_labels() {
    assert_eq!(resolve(""), None);
    assert_eq!(resolve("   "), None);
    assert_eq!(resolve("xyzzy"), None);
    assert!(related_emotions_for_label("xyzzy").is_empty());
    assert_eq!(emotion_color("xyzzy"), NEUTRAL_COLOR);
    assert_eq!(categorize_emotion("").core, None);
}

#[test]
fn test_core_names_resolve_to_themselves() {
    for core in CoreEmotion::ALL {
        assert_eq!(resolve(core.name()), Some(core));
        assert_eq!(categorize_emotion(core.name()).core, Some(core));
    }
}

#[test]
fn test_related_emotions_start_with_core_and_are_unique() {
    for core in CoreEmotion::ALL {
        let related = related_emotions(core);
        assert_eq!(related[0], core.name());
        let mut deduped = related.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), related.len(), "{} has duplicates", core);
    }
}

#[test]
fn test_related_for_label_matches_core() {
    assert_eq!(
        related_emotions_for_label("worried"),
        related_emotions(CoreEmotion::Fear)
    );
}

#[test]
fn test_categorized_secondary_agrees_with_core() {
    let category = categorize_emotion("lonely");
    let core = category.core.expect("lonely is in the taxonomy");
    if let Some(secondary) = category.secondary {
        assert!(related_emotions(core).iter().any(|label| label == secondary));
    }
}

#[test]
fn test_offline_emotions_resolve() {
    let result = analyze_offline(
        "Rough week",
        "I feel anxious about the exam and sad that my friend moved away.",
    );
    for expected in ["anxious", "sad"] {
        assert!(result.emotions.iter().any(|e| e == expected), "{:?}", result.emotions);
    }
    assert_eq!(resolve("anxious"), Some(CoreEmotion::Fear));
    assert_eq!(resolve("sad"), Some(CoreEmotion::Sadness));
}

#[test]
fn test_service_vocabulary_resolves_end_to_end() {
    let cases = [
        ("apprehensive", CoreEmotion::Fear),
        ("Hostility", CoreEmotion::Anger),
        ("indignant", CoreEmotion::Anger),
        ("despondent", CoreEmotion::Sadness),
        ("validated", CoreEmotion::Trust),
        ("burnt out", CoreEmotion::Sadness),
    ];
    for (label, core) in cases {
        assert_eq!(resolve(label), Some(core), "{}", label);
        assert_eq!(categorize_emotion(label).core, Some(core), "{}", label);
    }
    assert_eq!(emotion_color("hostility"), emotion_color("anger"));
}
