//! Sentiment split from detected emotions
//!
//! **Algorithm:**
//! 1. Classify each emotion as positive, negative or neutral by lexicon
//! 2. Apply the fixed override splits for negative content
//! 3. Otherwise weight negative ×1.5 when negative content matched, take
//!    rounded percentages and give the rounding remainder to the largest bucket

use super::patterns::{NEGATIVE_EMOTIONS, NEUTRAL_EMOTIONS, POSITIVE_EMOTIONS};
use crate::types::Sentiment;

/// Extra weight on negative emotions when the text itself is negative
const NEGATIVE_CONTENT_WEIGHT: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Polarity {
    Positive,
    Negative,
    Neutral,
}

/// Lexicon polarity of one emotion label; `None` when unclassified
pub(crate) fn polarity(emotion: &str) -> Option<Polarity> {
    let emotion = emotion.trim().to_lowercase();
    let word = emotion.as_str();
    if POSITIVE_EMOTIONS.contains(&word) {
        Some(Polarity::Positive)
    } else if NEGATIVE_EMOTIONS.contains(&word) {
        Some(Polarity::Negative)
    } else if NEUTRAL_EMOTIONS.contains(&word) {
        Some(Polarity::Neutral)
    } else {
        None
    }
}

/// Compute the positive/negative/neutral split; always sums to 100
pub(crate) fn score(emotions: &[String], negative_content: bool) -> Sentiment {
    let (mut positive, mut negative, mut neutral) = (0u32, 0u32, 0u32);
    for emotion in emotions {
        match polarity(emotion) {
            Some(Polarity::Positive) => positive += 1,
            Some(Polarity::Negative) => negative += 1,
            Some(Polarity::Neutral) => neutral += 1,
            None => {}
        }
    }

    if positive + negative + neutral == 0 {
        return Sentiment::neutral();
    }

    if negative_content && positive == 0 {
        if negative == 0 {
            return Sentiment::new(0, 70, 30);
        }
        return Sentiment::new(0, 85, 15);
    }

    let weighted_negative = if negative_content {
        negative as f64 * NEGATIVE_CONTENT_WEIGHT
    } else {
        negative as f64
    };
    split([positive as f64, weighted_negative, neutral as f64])
}

/// Rounded percentages with the remainder assigned to the largest share
fn split(weights: [f64; 3]) -> Sentiment {
    let total: f64 = weights.iter().sum();
    let mut percents = weights.map(|w| (w / total * 100.0).round() as i64);

    let remainder = 100 - percents.iter().sum::<i64>();
    let largest = weights
        .iter()
        .enumerate()
        .fold(0, |best, (i, w)| if *w > weights[best] { i } else { best });
    percents[largest] += remainder;

    let [positive, negative, neutral] = percents.map(|p| p.max(0) as u32);
    Sentiment::new(positive, negative, neutral)
}
