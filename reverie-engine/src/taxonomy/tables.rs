//! Static taxonomy tables
//!
//! Registration order matters: within each matching tier the first entry in
//! table order wins, so the resolver is deterministic without any sorting.

use super::CoreEmotion;
use super::CoreEmotion::*;

/// Tier-1 variant words per core emotion (lowercase)
pub(crate) const CORE_VARIANTS: &[(CoreEmotion, &[&str])] = &[
    (Joy, &[
        "joy", "happy", "happiness", "glad", "cheerful", "joyful", "delighted", "pleased",
        "elated", "content", "encouraged",
    ]),
    (Sadness, &[
        "sadness", "sad", "unhappy", "down", "blue", "depressed", "sorrowful", "miserable",
        "gloomy", "heartbroken", "discouraged",
    ]),
    (Fear, &[
        "fear", "afraid", "scared", "frightened", "terrified", "anxious", "nervous", "worried",
        "fearful", "panicked", "worry", "insecure",
    ]),
    (Surprise, &[
        "surprise", "surprised", "shocked", "amazed", "astonished", "startled", "stunned",
        "confused",
    ]),
    (Anger, &[
        "anger", "angry", "mad", "furious", "irritated", "annoyed", "enraged", "livid",
        "frustrated", "rage",
    ]),
    (Love, &[
        "love", "loving", "loved", "affection", "affectionate", "caring", "tender", "adoring",
        "fond",
    ]),
    (Disgust, &[
        "disgust", "disgusted", "revolted", "repulsed", "grossed out", "sickened", "appalled",
    ]),
    (Trust, &["trust", "trusting", "secure", "safe", "assured", "reliant"]),
];

/// Secondary emotions: (label, core, tertiaries)
pub(crate) const SECONDARY_EMOTIONS: &[(&str, CoreEmotion, &[&str])] = &[
    // Joy
    ("Contentment", Joy, &["Satisfied", "Fulfilled", "Relaxed", "Gratified"]),
    ("Serenity", Joy, &["Calm", "Peaceful", "Tranquil", "Serene"]),
    ("Pride", Joy, &["Accomplished", "Confident", "Successful", "Determined", "Proud", "Empowered"]),
    ("Optimism", Joy, &["Hopeful", "Eager", "Inspired", "Motivated", "Optimistic"]),
    ("Excitement", Joy, &["Ecstatic", "Thrilled", "Energized", "Excited", "Enthusiastic"]),
    ("Amusement", Joy, &["Playful", "Silly", "Entertained", "Amused"]),
    ("Gratitude", Joy, &["Thankful", "Appreciative", "Blessed", "Grateful"]),
    ("Relief", Joy, &["Reassured", "Unburdened", "Relieved"]),
    // Sadness
    ("Loneliness", Sadness, &["Isolated", "Abandoned", "Excluded", "Lonely"]),
    ("Grief", Sadness, &["Bereaved", "Mournful", "Heartache", "Devastated", "Grieving"]),
    ("Disappointment", Sadness, &["Let Down", "Defeated", "Disappointed"]),
    ("Despair", Sadness, &["Hopeless", "Powerless", "Empty", "Numb"]),
    ("Exhaustion", Sadness, &["Exhausted", "Drained", "Tired", "Burned Out", "Lethargic"]),
    ("Shame", Sadness, &["Embarrassed", "Humiliated", "Inadequate"]),
    ("Guilt", Sadness, &["Regretful", "Remorseful", "Apologetic"]),
    ("Melancholy", Sadness, &["Wistful", "Nostalgic", "Pensive"]),
    ("Hurt", Sadness, &["Wounded", "Misunderstood", "Rejected"]),
    // Fear
    ("Anxiety", Fear, &["Overwhelmed", "Stressed", "Tense", "Uneasy", "Panicky"]),
    ("Insecurity", Fear, &["Inferior", "Vulnerable", "Self-Conscious"]),
    ("Terror", Fear, &["Horrified", "Petrified", "Dread"]),
    ("Apprehension", Fear, &["Concerned", "Restless", "Jittery"]),
    ("Helplessness", Fear, &["Trapped", "Cornered", "Stuck"]),
    ("Panic", Fear, &["Frantic", "Hysterical"]),
    // Surprise
    ("Amazement", Surprise, &["Awestruck", "Astounded", "Wonder"]),
    ("Confusion", Surprise, &["Bewildered", "Puzzled", "Perplexed", "Disoriented", "Uncertain", "Ambivalent"]),
    ("Shock", Surprise, &["Dismayed", "Speechless"]),
    ("Curiosity", Surprise, &["Intrigued", "Inquisitive", "Interested", "Curious", "Reflective", "Thoughtful", "Contemplative"]),
    ("Disbelief", Surprise, &["Incredulous", "Skeptical"]),
    // Anger
    ("Frustration", Anger, &["Exasperated", "Fed Up", "Thwarted"]),
    ("Resentment", Anger, &["Bitter", "Jealous", "Envious", "Resentful"]),
    ("Fury", Anger, &["Hostile", "Outraged", "Vengeful"]),
    ("Irritation", Anger, &["Aggravated", "Agitated", "Grumpy", "Irritable"]),
    ("Betrayal", Anger, &["Betrayed", "Deceived", "Cheated"]),
    // Love
    ("Affection", Love, &["Warmth", "Fondness", "Adored"]),
    ("Longing", Love, &["Yearning", "Missing", "Pining"]),
    ("Compassion", Love, &["Empathetic", "Sympathetic", "Kindhearted"]),
    ("Desire", Love, &["Passionate", "Infatuated", "Attracted"]),
    ("Connection", Love, &["Belonging", "Intimate", "Bonded", "Connected"]),
    ("Tenderness", Love, &["Gentle", "Nurturing"]),
    // Disgust
    ("Contempt", Disgust, &["Scornful", "Disdainful", "Condescending"]),
    ("Aversion", Disgust, &["Repelled", "Loathing", "Distaste"]),
    ("Disapproval", Disgust, &["Judgmental", "Critical", "Disapproving"]),
    ("Revulsion", Disgust, &["Nauseated", "Queasy", "Repulsion"]),
    ("Self-Loathing", Disgust, &["Worthless", "Self-Hatred", "Useless"]),
    ("Boredom", Disgust, &["Bored", "Indifferent", "Apathetic"]),
    // Trust
    ("Acceptance", Trust, &["Accepted", "Valued", "Respected", "Appreciated", "Supported"]),
    ("Security", Trust, &["Protected", "Stable", "Grounded"]),
    ("Faith", Trust, &["Believing", "Devoted", "Loyal"]),
    ("Admiration", Trust, &["Respectful", "Impressed"]),
];

/// Vocabulary external analysis services tend to emit, mapped directly
pub(crate) const EXTERNAL_VOCABULARY: &[(&str, CoreEmotion)] = &[
    ("sorrow", Sadness),
    ("melancholic", Sadness),
    ("despondent", Sadness),
    ("burnout", Sadness),
    ("burnt out", Sadness),
    ("fatigue", Sadness),
    ("numbness", Sadness),
    ("apprehensive", Fear),
    ("vulnerability", Fear),
    ("on edge", Fear),
    ("overwhelm", Fear),
    ("unease", Fear),
    ("hopefulness", Joy),
    ("empowerment", Joy),
    ("motivation", Joy),
    ("determination", Joy),
    ("overjoyed", Joy),
    ("euphoric", Joy),
    ("indignant", Anger),
    ("hostility", Anger),
    ("anticipation", Surprise),
    ("ambivalence", Surprise),
    ("validated", Trust),
    ("resilient", Trust),
    ("resilience", Trust),
    ("reassurance", Trust),
    ("compassionate", Love),
    ("cherished", Love),
    ("romantic", Love),
];

/// Generic lexicon mapped to Joy when no tier above matched
pub(crate) const POSITIVE_LEXICON: &[&str] = &[
    "good", "great", "better", "wonderful", "awesome", "positive", "amazing", "fantastic",
    "nice", "pleasant",
];

/// Generic lexicon mapped to Sadness when no tier above matched
pub(crate) const NEGATIVE_LEXICON: &[&str] = &[
    "bad", "awful", "terrible", "horrible", "negative", "upset", "hurt", "pain", "worse",
    "worst",
];

/// Direct categorizations for inputs the general chain places poorly:
/// (label, core, secondary, tertiary)
pub(crate) const CATEGORY_OVERRIDES: &[(&str, CoreEmotion, &str, Option<&str>)] = &[
    ("nostalgic", Sadness, "Melancholy", Some("Nostalgic")),
    ("empty", Sadness, "Despair", Some("Empty")),
    ("misunderstood", Sadness, "Hurt", Some("Misunderstood")),
    ("numb", Sadness, "Despair", Some("Numb")),
    ("overwhelmed", Fear, "Anxiety", Some("Overwhelmed")),
    ("burnt out", Sadness, "Exhaustion", Some("Burned Out")),
    ("heartbroken", Sadness, "Grief", Some("Heartache")),
    ("insecure", Fear, "Insecurity", None),
];

/// Colors for core emotions and selected secondaries
pub(crate) const EMOTION_COLORS: &[(&str, &str)] = &[
    ("joy", "#FFD700"),
    ("sadness", "#4682B4"),
    ("fear", "#8E44AD"),
    ("surprise", "#FF8C00"),
    ("anger", "#DC143C"),
    ("love", "#FF69B4"),
    ("disgust", "#6B8E23"),
    ("trust", "#2E8B57"),
    ("contentment", "#F0E68C"),
    ("serenity", "#87CEEB"),
    ("pride", "#DAA520"),
    ("optimism", "#FFB347"),
    ("gratitude", "#F4C430"),
    ("loneliness", "#5D6D7E"),
    ("grief", "#34495E"),
    ("despair", "#2C3E50"),
    ("exhaustion", "#7F8C8D"),
    ("anxiety", "#9B59B6"),
    ("frustration", "#E74C3C"),
    ("confusion", "#E59866"),
    ("shame", "#A93226"),
];

/// Color used when a label cannot be resolved
pub const NEUTRAL_COLOR: &str = "#9E9E9E";
