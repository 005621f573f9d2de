//! Hierarchical Emotion Taxonomy
//!
//! Three levels: 8 core emotions → secondary emotions → tertiary emotions.
//! Tables are static and never mutated; every lookup is deterministic.
//!
//! # Operations
//! - [`resolve`]: free-text label → core emotion (ordered fallback chain)
//! - [`categorize_emotion`]: label → (core, secondary, tertiary)
//! - [`related_emotions`]: core → every label nested under it
//! - [`emotion_color`]: label → display color

mod colors;
mod resolver;
mod tables;

pub use colors::emotion_color;
pub use resolver::{
    categorize_emotion, related_emotions, related_emotions_for_label, resolve, similarity,
    EmotionCategory,
};
pub use tables::NEUTRAL_COLOR;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level emotion category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CoreEmotion {
    Joy,
    Sadness,
    Fear,
    Surprise,
    Anger,
    Love,
    Disgust,
    Trust,
}

impl CoreEmotion {
    /// All core emotions in canonical order
    pub const ALL: [CoreEmotion; 8] = [
        CoreEmotion::Joy,
        CoreEmotion::Sadness,
        CoreEmotion::Fear,
        CoreEmotion::Surprise,
        CoreEmotion::Anger,
        CoreEmotion::Love,
        CoreEmotion::Disgust,
        CoreEmotion::Trust,
    ];

    /// Canonical display name
    pub fn name(&self) -> &'static str {
        match self {
            CoreEmotion::Joy => "Joy",
            CoreEmotion::Sadness => "Sadness",
            CoreEmotion::Fear => "Fear",
            CoreEmotion::Surprise => "Surprise",
            CoreEmotion::Anger => "Anger",
            CoreEmotion::Love => "Love",
            CoreEmotion::Disgust => "Disgust",
            CoreEmotion::Trust => "Trust",
        }
    }

    /// Registered tier-1 variant words (lowercase)
    pub fn variants(&self) -> &'static [&'static str] {
        tables::CORE_VARIANTS
            .iter()
            .find(|(core, _)| core == self)
            .map(|(_, variants)| *variants)
            .unwrap_or(&[])
    }

    /// Secondary emotion labels registered under this core
    pub fn secondaries(&self) -> impl Iterator<Item = &'static str> + '_ {
        tables::SECONDARY_EMOTIONS
            .iter()
            .filter(move |(_, core, _)| core == self)
            .map(|(label, _, _)| *label)
    }
}

impl fmt::Display for CoreEmotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
