//! Label resolution against the emotion taxonomy
//!
//! [`resolve`] walks an ordered chain of matching tiers and returns the first
//! hit. Order is significant: an earlier tier always beats a later one, even if
//! the later tier would have matched "better".

use super::tables::{
    CATEGORY_OVERRIDES, CORE_VARIANTS, EXTERNAL_VOCABULARY, NEGATIVE_LEXICON, POSITIVE_LEXICON,
    SECONDARY_EMOTIONS,
};
use super::CoreEmotion;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// Minimum fuzzy score accepted by the similarity tier
const FUZZY_THRESHOLD: f64 = 0.6;

/// Labels shorter than this only take part in exact tiers
const MIN_CONTAINMENT_LEN: usize = 3;

/// Core, secondary and tertiary placement of a label; each level is optional
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EmotionCategory {
    pub core: Option<CoreEmotion>,
    pub secondary: Option<&'static str>,
    pub tertiary: Option<&'static str>,
}

struct SecondaryEntry {
    key: String,
    label: &'static str,
    core: CoreEmotion,
    tertiaries: Vec<(String, &'static str)>,
}

static SECONDARY_INDEX: Lazy<Vec<SecondaryEntry>> = Lazy::new(|| {
    SECONDARY_EMOTIONS
        .iter()
        .map(|(label, core, tertiaries)| SecondaryEntry {
            key: label.to_lowercase(),
            label,
            core: *core,
            tertiaries: tertiaries.iter().map(|t| (t.to_lowercase(), *t)).collect(),
        })
        .collect()
});

/// Exact variant lookup: variant/core name → core (first registration wins)
static VARIANT_LOOKUP: Lazy<HashMap<String, CoreEmotion>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for (core, variants) in CORE_VARIANTS {
        map.entry(core.name().to_lowercase()).or_insert(*core);
        for variant in variants.iter() {
            map.entry(variant.to_string()).or_insert(*core);
        }
    }
    map
});

type Tier = fn(&str) -> Option<CoreEmotion>;

/// Resolution chain in priority order
const TIERS: [(&str, Tier); 9] = [
    ("variant-exact", match_variant_exact),
    ("variant-contains", match_variant_contains),
    ("secondary-exact", match_secondary_exact),
    ("secondary-contains", match_secondary_contains),
    ("tertiary", match_tertiary),
    ("fuzzy", match_fuzzy),
    ("external-vocabulary", match_external_vocabulary),
    ("lexicon", match_lexicon),
    ("morphological", match_stripped_suffix),
];

/// Map a free-text emotion label to its core emotion
///
/// Returns `None` when no tier matches. Input is trimmed and lowercased.
pub fn resolve(label: &str) -> Option<CoreEmotion> {
    let needle = normalize(label);
    if needle.is_empty() {
        return None;
    }

    for (tier, matcher) in TIERS.iter() {
        if let Some(core) = matcher(&needle) {
            trace!(label = %needle, tier, core = %core, "Resolved emotion label");
            return Some(core);
        }
    }

    trace!(label = %needle, "Emotion label unresolved");
    None
}

fn normalize(label: &str) -> String {
    label.trim().to_lowercase()
}

fn allows_containment(needle: &str) -> bool {
    needle.chars().count() >= MIN_CONTAINMENT_LEN
}

fn contains_either(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

fn match_variant_exact(needle: &str) -> Option<CoreEmotion> {
    VARIANT_LOOKUP.get(needle).copied()
}

fn match_variant_contains(needle: &str) -> Option<CoreEmotion> {
    if !allows_containment(needle) {
        return None;
    }
    CORE_VARIANTS
        .iter()
        .find(|(_, variants)| variants.iter().any(|v| contains_either(needle, v)))
        .map(|(core, _)| *core)
}

fn match_secondary_exact(needle: &str) -> Option<CoreEmotion> {
    SECONDARY_INDEX
        .iter()
        .find(|entry| entry.key == needle)
        .map(|entry| entry.core)
}

fn match_secondary_contains(needle: &str) -> Option<CoreEmotion> {
    if !allows_containment(needle) {
        return None;
    }
    SECONDARY_INDEX
        .iter()
        .find(|entry| contains_either(needle, &entry.key))
        .map(|entry| entry.core)
}

fn match_tertiary(needle: &str) -> Option<CoreEmotion> {
    find_tertiary(needle).map(|(entry, _)| entry.core)
}

/// Exact pass over every tertiary first, then a containment pass
fn find_tertiary(needle: &str) -> Option<(&'static SecondaryEntry, &'static str)> {
    let index: &'static Vec<SecondaryEntry> = &SECONDARY_INDEX;

    let exact = index.iter().find_map(|entry| {
        entry
            .tertiaries
            .iter()
            .find(|(key, _)| key == needle)
            .map(|(_, label)| (entry, *label))
    });
    if exact.is_some() || !allows_containment(needle) {
        return exact;
    }

    index.iter().find_map(|entry| {
        entry
            .tertiaries
            .iter()
            .find(|(key, _)| contains_either(needle, key))
            .map(|(_, label)| (entry, *label))
    })
}

fn match_fuzzy(needle: &str) -> Option<CoreEmotion> {
    let mut best: Option<(f64, CoreEmotion)> = None;

    for (core, variants) in CORE_VARIANTS {
        let name = core.name().to_lowercase();
        let candidates = std::iter::once(name.as_str()).chain(variants.iter().copied());
        for candidate in candidates {
            let score = similarity(needle, candidate);
            if best.map_or(true, |(best_score, _)| score > best_score) {
                best = Some((score, *core));
            }
        }
    }

    best.filter(|(score, _)| *score > FUZZY_THRESHOLD)
        .map(|(_, core)| core)
}

fn match_external_vocabulary(needle: &str) -> Option<CoreEmotion> {
    EXTERNAL_VOCABULARY
        .iter()
        .find(|(word, _)| *word == needle)
        .or_else(|| {
            if !allows_containment(needle) {
                return None;
            }
            EXTERNAL_VOCABULARY.iter().find(|(word, _)| needle.contains(word))
        })
        .map(|(_, core)| *core)
}

fn match_lexicon(needle: &str) -> Option<CoreEmotion> {
    if POSITIVE_LEXICON.iter().any(|word| needle.contains(word)) {
        return Some(CoreEmotion::Joy);
    }
    if NEGATIVE_LEXICON.iter().any(|word| needle.contains(word)) {
        return Some(CoreEmotion::Sadness);
    }
    None
}

fn match_stripped_suffix(needle: &str) -> Option<CoreEmotion> {
    let root = needle
        .strip_suffix("ed")
        .or_else(|| needle.strip_suffix("ing"))?;
    match_variant_exact(root)
}

/// String similarity used by the fuzzy tier
///
/// If one string contains the other the score is `shorter / longer`.
/// Otherwise it is the number of distinct characters of `input` that occur
/// anywhere in `candidate`, divided by the longer length.
pub fn similarity(input: &str, candidate: &str) -> f64 {
    let input_len = input.chars().count();
    let candidate_len = candidate.chars().count();
    let longer = input_len.max(candidate_len);
    if input_len == 0 || candidate_len == 0 {
        return 0.0;
    }

    if contains_either(input, candidate) {
        return input_len.min(candidate_len) as f64 / longer as f64;
    }

    let distinct: HashSet<char> = input.chars().collect();
    let shared = distinct.iter().filter(|c| candidate.contains(**c)).count();
    shared as f64 / longer as f64
}

/// Place a label at every taxonomy level it can be matched to
///
/// Curated overrides first, then tertiary (all three levels), then secondary
/// (core + secondary + first registered tertiary), then core-only via
/// [`resolve`].
pub fn categorize_emotion(label: &str) -> EmotionCategory {
    let needle = normalize(label);
    if needle.is_empty() {
        return EmotionCategory::default();
    }

    if let Some((_, core, secondary, tertiary)) =
        CATEGORY_OVERRIDES.iter().find(|(key, ..)| *key == needle)
    {
        return EmotionCategory {
            core: Some(*core),
            secondary: Some(*secondary),
            tertiary: *tertiary,
        };
    }

    if let Some((entry, tertiary)) = find_tertiary(&needle) {
        return EmotionCategory {
            core: Some(entry.core),
            secondary: Some(entry.label),
            tertiary: Some(tertiary),
        };
    }

    let secondary = SECONDARY_INDEX
        .iter()
        .find(|entry| entry.key == needle)
        .or_else(|| {
            if !allows_containment(&needle) {
                return None;
            }
            SECONDARY_INDEX
                .iter()
                .find(|entry| contains_either(&needle, &entry.key))
        });
    if let Some(entry) = secondary {
        return EmotionCategory {
            core: Some(entry.core),
            secondary: Some(entry.label),
            tertiary: entry.tertiaries.first().map(|(_, label)| *label),
        };
    }

    EmotionCategory {
        core: resolve(&needle),
        secondary: None,
        tertiary: None,
    }
}

/// Every label nested under a core emotion
///
/// Order: core name, its variants (capitalized), its secondaries, then each
/// secondary's tertiaries. Duplicates are dropped, first occurrence kept.
pub fn related_emotions(core: CoreEmotion) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut related = Vec::new();
    let mut push = |label: String| {
        if seen.insert(label.clone()) {
            related.push(label);
        }
    };

    push(core.name().to_string());
    for variant in core.variants() {
        push(capitalize(variant));
    }

    let secondaries: Vec<&SecondaryEntry> =
        SECONDARY_INDEX.iter().filter(|e| e.core == core).collect();
    for entry in &secondaries {
        push(entry.label.to_string());
    }
    for entry in &secondaries {
        for (_, tertiary) in &entry.tertiaries {
            push(tertiary.to_string());
        }
    }

    related
}

/// [`related_emotions`] for an arbitrary label; empty when it does not resolve
pub fn related_emotions_for_label(label: &str) -> Vec<String> {
    resolve(label).map(related_emotions).unwrap_or_default()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_names_any_case() {
        for core in CoreEmotion::ALL {
            assert_eq!(resolve(core.name()), Some(core));
            assert_eq!(resolve(&core.name().to_uppercase()), Some(core));
            assert_eq!(resolve(&core.name().to_lowercase()), Some(core));
        }
    }

    #[test]
    fn test_known_labels() {
        assert_eq!(resolve("nervous"), Some(CoreEmotion::Fear));
        assert_eq!(resolve("ecstatic"), Some(CoreEmotion::Joy));
        assert_eq!(resolve("  Furious "), Some(CoreEmotion::Anger));
        assert_eq!(resolve("lonely"), Some(CoreEmotion::Sadness));
        assert_eq!(resolve("grateful"), Some(CoreEmotion::Joy));
    }

    #[test]
    fn test_unresolvable() {
        assert_eq!(resolve("xyzzy-not-an-emotion"), None);
        assert_eq!(resolve(""), None);
        assert_eq!(resolve("   "), None);
    }

    #[test]
    fn test_tier_order_variant_before_secondary() {
        // "panicked" is a Fear variant; the Panic secondary is never consulted
        assert_eq!(match_variant_exact("panicked"), Some(CoreEmotion::Fear));
        assert_eq!(resolve("panicked"), Some(CoreEmotion::Fear));
    }

    #[test]
    fn test_secondary_tiers() {
        assert_eq!(match_secondary_exact("gratitude"), Some(CoreEmotion::Joy));
        assert_eq!(match_secondary_contains("guilty"), Some(CoreEmotion::Sadness));
        assert_eq!(resolve("Guilt"), Some(CoreEmotion::Sadness));
    }

    #[test]
    fn test_tertiary_tier() {
        assert_eq!(match_tertiary("overwhelmed"), Some(CoreEmotion::Fear));
        assert_eq!(match_tertiary("calm"), Some(CoreEmotion::Joy));
        assert_eq!(resolve("bored"), Some(CoreEmotion::Disgust));
    }

    #[test]
    fn test_morphological_retry() {
        assert_eq!(match_stripped_suffix("worrying"), Some(CoreEmotion::Fear));
        assert_eq!(match_stripped_suffix("trusted"), Some(CoreEmotion::Trust));
        assert_eq!(match_stripped_suffix("zzz"), None);
    }

    #[test]
    fn test_lexicon_tier() {
        assert_eq!(match_lexicon("pretty good"), Some(CoreEmotion::Joy));
        assert_eq!(match_lexicon("awful"), Some(CoreEmotion::Sadness));
        assert_eq!(match_lexicon("plain"), None);
    }

    #[test]
    fn test_similarity_containment() {
        assert!((similarity("sad", "sadness") - 3.0 / 7.0).abs() < 1e-9);
        assert!((similarity("joy", "joy") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_similarity_character_overlap() {
        // "rage" vs "anger": all 4 characters occur in "anger", max len 5
        assert!((similarity("rage", "anger") - 0.8).abs() < 1e-9);
        assert_eq!(similarity("", "anger"), 0.0);
        assert_eq!(similarity("xyz", "joy"), 1.0 / 3.0);
    }

    #[test]
    fn test_similarity_counts_each_input_character_once() {
        // distinct "hostility" characters found in "surprise": s, i
        assert!((similarity("hostility", "surprise") - 2.0 / 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_curated_vocabulary_resolves_to_listed_core() {
        for (word, core) in EXTERNAL_VOCABULARY {
            assert_eq!(resolve(word), Some(*core), "{}", word);
        }
    }

    #[test]
    fn test_curated_vocabulary_not_claimed_by_fuzzy_tier() {
        for word in ["apprehensive", "hostility", "indignant", "despondent", "validated"] {
            assert_eq!(match_fuzzy(word), None, "{}", word);
            assert!(match_external_vocabulary(word).is_some(), "{}", word);
        }
    }

    #[test]
    fn test_service_vocabulary_tertiaries() {
        assert_eq!(resolve("lethargic"), Some(CoreEmotion::Sadness));
        assert_eq!(resolve("gratified"), Some(CoreEmotion::Joy));
        assert_eq!(resolve("distaste"), Some(CoreEmotion::Disgust));
        assert_eq!(resolve("repulsion"), Some(CoreEmotion::Disgust));

        let supported = categorize_emotion("supported");
        assert_eq!(supported.core, Some(CoreEmotion::Trust));
        assert_eq!(supported.secondary, Some("Acceptance"));
        assert_eq!(supported.tertiary, Some("Supported"));
    }

    #[test]
    fn test_fuzzy_tier() {
        assert_eq!(match_fuzzy("rage"), Some(CoreEmotion::Anger));
        assert_eq!(match_fuzzy("qqqqqqqq"), None);
    }

    #[test]
    fn test_resolve_is_deterministic() {
        for label in ["nervous", "hopeless", "unknown thing", "reflective", "mellow"] {
            assert_eq!(resolve(label), resolve(label));
        }
    }

    #[test]
    fn test_categorize_tertiary() {
        let category = categorize_emotion("Hopeless");
        assert_eq!(category.core, Some(CoreEmotion::Sadness));
        assert_eq!(category.secondary, Some("Despair"));
        assert_eq!(category.tertiary, Some("Hopeless"));
    }

    #[test]
    fn test_categorize_secondary_picks_first_tertiary() {
        let category = categorize_emotion("gratitude");
        assert_eq!(category.core, Some(CoreEmotion::Joy));
        assert_eq!(category.secondary, Some("Gratitude"));
        assert_eq!(category.tertiary, Some("Thankful"));
    }

    #[test]
    fn test_categorize_core_only() {
        let category = categorize_emotion("happy");
        assert_eq!(category.core, Some(CoreEmotion::Joy));
        assert_eq!(category.secondary, None);
        assert_eq!(category.tertiary, None);
    }

    #[test]
    fn test_categorize_overrides() {
        let empty = categorize_emotion("empty");
        assert_eq!(empty.core, Some(CoreEmotion::Sadness));
        assert_eq!(empty.secondary, Some("Despair"));

        let misunderstood = categorize_emotion("Misunderstood");
        assert_eq!(misunderstood.secondary, Some("Hurt"));
        assert_eq!(misunderstood.tertiary, Some("Misunderstood"));

        let insecure = categorize_emotion("insecure");
        assert_eq!(insecure.core, Some(CoreEmotion::Fear));
        assert_eq!(insecure.tertiary, None);
    }

    #[test]
    fn test_categorize_unknown() {
        assert_eq!(categorize_emotion("xyzzy-not-an-emotion"), EmotionCategory::default());
    }

    #[test]
    fn test_related_emotions_order_and_uniqueness() {
        let related = related_emotions(CoreEmotion::Joy);
        assert_eq!(related[0], "Joy");
        assert_eq!(related[1], "Happy");
        assert_eq!(related.iter().filter(|l| *l == "Joy").count(), 1);

        let contentment = related.iter().position(|l| l == "Contentment").unwrap();
        let satisfied = related.iter().position(|l| l == "Satisfied").unwrap();
        let relief = related.iter().position(|l| l == "Relief").unwrap();
        assert!(contentment < satisfied);
        assert!(relief < satisfied);

        let unique: HashSet<&String> = related.iter().collect();
        assert_eq!(unique.len(), related.len());
    }

    #[test]
    fn test_related_for_label() {
        let related = related_emotions_for_label("nervous");
        assert_eq!(related.first().map(String::as_str), Some("Fear"));
        assert!(related_emotions_for_label("xyzzy-not-an-emotion").is_empty());
    }
}
