//! Emotion color lookup

use super::resolver::resolve;
use super::tables::{EMOTION_COLORS, NEUTRAL_COLOR};

/// Display color for an emotion label
///
/// Exact (case-insensitive) table hit first, then the color of the resolved
/// core emotion, then [`NEUTRAL_COLOR`].
pub fn emotion_color(label: &str) -> &'static str {
    let key = label.trim().to_lowercase();

    if let Some(color) = lookup(&key) {
        return color;
    }

    resolve(&key)
        .and_then(|core| lookup(&core.name().to_lowercase()))
        .unwrap_or(NEUTRAL_COLOR)
}

fn lookup(key: &str) -> Option<&'static str> {
    EMOTION_COLORS
        .iter()
        .find(|(label, _)| *label == key)
        .map(|(_, color)| *color)
}
