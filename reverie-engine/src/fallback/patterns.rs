//! Rule tables for the offline analyzer
//!
//! Everything here is compiled once on first use. Patterns run against
//! lowercased text, so none of them carry a case-insensitive flag.

use once_cell::sync::Lazy;
use regex::Regex;

/// Words that cancel an emotion keyword a few tokens later
const NEGATION_MARKERS: &str = r"not|no|never|nor|don't|dont|didn't|didnt|doesn't|doesnt|can't|cant|cannot|couldn't|won't|wont|isn't|wasn't|aren't|weren't|haven't|hasn't|hardly|barely|without";

/// Words that make an emotion keyword hypothetical
const CONDITIONAL_MARKERS: &str = r"will|would|wish|wished|hope|hoping|if|might|could|should|may|going\s+to|want\s+to|wanna|\w+'ll";

/// Up to two intervening words between a marker and the guarded term
const GAP: &str = r"\s+(?:[\w']+\s+){0,2}";

// ============================================================================
// Emotion keywords
// ============================================================================

pub(crate) const POSITIVE_EMOTIONS: &[&str] = &[
    "happy", "joyful", "glad", "cheerful", "excited", "thrilled", "ecstatic", "elated",
    "delighted", "satisfied", "fulfilled", "calm", "peaceful", "relaxed", "serene", "relieved",
    "grateful", "thankful", "blessed", "proud", "accomplished", "confident", "hopeful",
    "optimistic", "inspired", "motivated", "energized", "enthusiastic", "eager", "loved",
    "loving", "cared for", "appreciated", "valued", "supported", "connected", "safe", "secure",
    "amused", "playful", "refreshed", "rested", "encouraged", "empowered", "determined",
    "comfortable", "uplifted",
];

pub(crate) const NEGATIVE_EMOTIONS: &[&str] = &[
    "sad", "unhappy", "depressed", "miserable", "gloomy", "heartbroken", "hopeless",
    "helpless", "worthless", "lonely", "isolated", "abandoned", "rejected", "empty", "numb",
    "anxious", "nervous", "worried", "scared", "afraid", "frightened", "terrified", "panicked",
    "stressed", "overwhelmed", "tense", "uneasy", "restless", "insecure", "angry", "mad",
    "furious", "irritated", "annoyed", "frustrated", "resentful", "bitter", "jealous", "envious",
    "hurt", "betrayed", "disappointed", "discouraged", "defeated", "ashamed", "embarrassed",
    "guilty", "regretful", "exhausted", "tired", "drained", "burned out", "fatigued", "bored",
    "disgusted", "hostile", "upset", "devastated", "grieving", "inadequate", "stuck", "trapped",
];

pub(crate) const NEUTRAL_EMOTIONS: &[&str] = &[
    "surprised", "curious", "confused", "uncertain", "unsure", "ambivalent", "reflective",
    "thoughtful", "pensive", "contemplative", "nostalgic", "wistful", "indifferent", "puzzled",
    "bewildered", "shocked", "amazed", "intrigued", "interested", "longing", "distracted",
    "introspective",
];

/// Compiled keyword matchers in sweep order
pub(crate) struct KeywordRule {
    pub label: &'static str,
    pub matcher: Regex,
    pub guard: Regex,
}

pub(crate) static EMOTION_KEYWORDS: Lazy<Vec<KeywordRule>> = Lazy::new(|| {
    POSITIVE_EMOTIONS
        .iter()
        .chain(NEGATIVE_EMOTIONS)
        .chain(NEUTRAL_EMOTIONS)
        .map(|label| {
            let term = phrase_pattern(label);
            KeywordRule {
                label: *label,
                matcher: compile(&format!(r"\b{}\b", term)),
                guard: compile(&format!(
                    r"\b(?:{}|{}){}{}\b",
                    NEGATION_MARKERS, CONDITIONAL_MARKERS, GAP, term
                )),
            }
        })
        .collect()
});

/// "calm" is only kept when nothing frames it as a goal or wish
pub(crate) static CALM_EXCLUSION: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"\b(?:want|wants|wanted|need|needs|needed|try|trying|tried|wish|hope|hoping|stay|keep|be|to\s+be){}(?:calm(?:er)?|at\s+peace)\b",
        GAP
    ))
});

/// Negation marker within the last three words of a prefix
pub(crate) static TRAILING_NEGATION: Lazy<Regex> =
    Lazy::new(|| compile(&format!(r"\b(?:{})\s+(?:[\w']+\s+){{0,2}}$", NEGATION_MARKERS)));

// ============================================================================
// Contextual groups
// ============================================================================

const FEEL: &str = r"\b(?:feel|feels|feeling|felt)\s+(?:so\s+|really\s+|very\s+|pretty\s+|quite\s+|completely\s+|totally\s+)?";

/// One group: canonical emotion plus ordered patterns
pub(crate) struct ContextGroup {
    pub name: &'static str,
    pub emotion: &'static str,
    pub patterns: Vec<Regex>,
}

pub(crate) static CONTEXT_GROUPS: Lazy<Vec<ContextGroup>> = Lazy::new(|| {
    vec![
        group(
            "sadness",
            "sad",
            &[
                format!(r"{}(?:sad|down|low|blue|depressed|miserable)\b", FEEL).as_str(),
                r"\b(?:bad|awful|terrible|rough|horrible)\s+day\b",
                r"\bfailed\s+(?:the\s+|my\s+|an?\s+)?(?:exam|test|class|course|interview)\b",
                r"\b(?:cried|crying|in\s+tears)\b",
                r"\bbroke\s+up\b",
                r"\b(?:lost|losing)\s+my\s+(?:job|friend|mother|father|mom|dad|grandmother|grandfather|pet|dog|cat)\b",
            ],
        ),
        group(
            "anxiety",
            "anxious",
            &[
                format!(r"{}(?:anxious|nervous|on\s+edge|jittery|panicky)\b", FEEL).as_str(),
                r"\bpanic\s+attacks?\b",
                r"\b(?:can't|couldn't|cannot)\s+stop\s+(?:worrying|overthinking)\b",
                r"\bheart\s+(?:was\s+|is\s+)?(?:racing|pounding)\b",
                r"\bworried\s+sick\b",
            ],
        ),
        group(
            "emptiness",
            "empty",
            &[
                format!(r"{}(?:empty|numb|hollow)\b", FEEL).as_str(),
                r"\bdon't\s+feel\s+anything\b",
                r"\bgoing\s+through\s+the\s+motions\b",
            ],
        ),
        group(
            "isolation",
            "lonely",
            &[
                format!(r"{}(?:alone|lonely|isolated|left\s+out)\b", FEEL).as_str(),
                r"\b(?:no\s*one|nobody)\s+(?:understands|cares|listens)\b",
                r"\b(?:all|completely)\s+alone\b",
            ],
        ),
        group(
            "exhaustion",
            "exhausted",
            &[
                format!(
                    r"{}(?:exhausted|drained|tired|burned\s+out|burnt\s+out|worn\s+out)\b",
                    FEEL
                )
                .as_str(),
                r"\b(?:no|zero)\s+energy\b",
                r"\b(?:couldn't|can't|didn't)\s+sleep\b",
                r"\bcan\s+barely\s+(?:function|get\s+up|keep\s+my\s+eyes\s+open)\b",
            ],
        ),
        group(
            "fear",
            "afraid",
            &[
                format!(r"{}(?:scared|afraid|frightened|terrified|unsafe)\b", FEEL).as_str(),
                r"\b(?:scared|afraid|terrified)\s+(?:of|that)\b",
            ],
        ),
    ]
});

// ============================================================================
// Topics
// ============================================================================

/// (word alternation, topic label) in discovery order
const TOPIC_KEYWORDS: &[(&str, &str)] = &[
    (r"work|working|job|boss|office|meetings?|deadlines?|career|coworkers?|colleagues?|promotion", "work"),
    (r"exams?|school|class|classes|study|studying|homework|university|college|grades?|lectures?", "education"),
    (r"family|mom|dad|mother|father|parents?|sister|brother|kids|children", "family"),
    (r"partner|boyfriend|girlfriend|husband|wife|relationship|dating", "relationships"),
    (r"friends?|friendship", "friendship"),
    (r"health|doctor|sick|illness|therapy|therapist|medication", "health"),
    (r"sleep|slept|insomnia|nightmares?", "sleep"),
    (r"exercise|workout|gym|run|running|walk|walked|walking|yoga", "fitness"),
    (r"money|bills|rent|debt|budget|finances", "finances"),
    (r"goals?|plans?|progress|habits?", "goals"),
    (r"party|social|hang\s+out|hanging\s+out", "social life"),
    (r"home|house|apartment", "home"),
    (r"writing|art|music|painting|drawing", "creativity"),
    (r"meditation|meditate|meditating|mindfulness|breathing", "mindfulness"),
];

pub(crate) static TOPIC_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    TOPIC_KEYWORDS
        .iter()
        .map(|(words, topic)| (compile(&format!(r"\b(?:{})\b", words)), *topic))
        .collect()
});

// ============================================================================
// Supplementary phrases
// ============================================================================

const SUPPLEMENTARY_PHRASES: &[(&str, &str)] = &[
    (r"\bnever\s+(?:[\w']+\s+){0,2}(?:succeed|get\s+better|be\s+good\s+enough|be\s+happy|change|make\s+it)\b", "hopeless"),
    (r"\b(?:what's|what\s+is)\s+the\s+point\b", "hopeless"),
    (r"\bon\s+edge\b", "anxious"),
    (r"\bwhat\s+if\b", "worried"),
    (r"\b(?:fed\s+up|sick\s+of)\b", "frustrated"),
    (r"\bat\s+peace\b", "calm"),
    (r"\b(?:grateful|thankful)\s+for\b", "grateful"),
    (r"\blet\s+(?:me\s+)?down\b", "disappointed"),
    (r"\bmiss(?:ing)?\s+(?:him|her|them|you|my)\b", "longing"),
    (r"\bin\s+tears\b", "sad"),
    (r"\bno\s+energy\b", "exhausted"),
    (r"\b(?:out\s+of\s+control|too\s+much\s+to\s+handle)\b", "overwhelmed"),
    (r"\bproud\s+of\s+myself\b", "proud"),
    (r"\b(?:good|great|lovely)\s+day\b", "happy"),
];

pub(crate) static SUPPLEMENTARY_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    SUPPLEMENTARY_PHRASES
        .iter()
        .map(|(pattern, emotion)| (compile(pattern), *emotion))
        .collect()
});

// ============================================================================
// Cognitive distortions
// ============================================================================

pub(crate) const ALL_OR_NOTHING: &str = "All-or-Nothing Thinking";
pub(crate) const OVERGENERALIZATION: &str = "Overgeneralization";
pub(crate) const MENTAL_FILTERING: &str = "Mental Filtering";
pub(crate) const DISQUALIFYING_POSITIVE: &str = "Disqualifying the Positive";
pub(crate) const JUMPING_TO_CONCLUSIONS: &str = "Jumping to Conclusions";
pub(crate) const CATASTROPHIZING: &str = "Catastrophizing";
pub(crate) const EMOTIONAL_REASONING: &str = "Emotional Reasoning";
pub(crate) const SHOULD_STATEMENTS: &str = "Should Statements";
pub(crate) const LABELING: &str = "Labeling";
pub(crate) const PERSONALIZATION: &str = "Personalization";

const DISTORTION_PATTERNS: &[(&str, &str)] = &[
    (ALL_OR_NOTHING, r"\b(?:complete|total|utter)\s+(?:failure|disaster|mess|waste)\b|\b(?:everything|nothing)\s+(?:is|was|goes|went)\s+(?:wrong|right|ruined|perfect)\b|\beither\s+(?:[\w']+\s+){1,4}or\s+(?:[\w']+\s+){0,2}(?:nothing|failure)\b|\bif\s+it's\s+not\s+perfect\b"),
    (OVERGENERALIZATION, r"\b(?:always|never|every\s+time|everyone|everybody|no\s*one|nobody|nothing\s+ever)\b"),
    (MENTAL_FILTERING, r"\b(?:all|only)\s+i\s+(?:can\s+|could\s+)?(?:think|thought|focus|focused|remember|see)\s+(?:about|on|is|was)\b|\bthe\s+only\s+thing\s+that\s+(?:matters|mattered)\b|\bruined\s+the\s+(?:whole|entire)\b"),
    (DISQUALIFYING_POSITIVE, r"\b(?:doesn't|didn't|does\s+not|did\s+not)\s+(?:really\s+)?count\b|\b(?:just|only)\s+(?:got\s+)?(?:luck|lucky)\b|\banyone\s+could\s+have\b|\b(?:just|only)\s+being\s+(?:nice|polite)\b"),
    (JUMPING_TO_CONCLUSIONS, r"\b(?:they|he|she|everyone|people)\s+(?:must|probably)\s+(?:think|thinks|hate|hates)\b|\bi\s+just\s+know\b|\b(?:it's|it\s+is)\s+going\s+to\s+(?:go\s+)?(?:wrong|badly|fail)\b"),
    (CATASTROPHIZING, r"\b(?:disaster|catastrophe|catastrophic|end\s+of\s+the\s+world|worst\s+(?:thing|case)|never\s+recover|can't\s+handle|ruin\s+everything|ruined\s+everything)\b"),
    (EMOTIONAL_REASONING, r"\bi\s+feel\s+(?:like\s+)?(?:an?\s+|so\s+)?(?:failure|stupid|worthless|useless|fraud|burden|idiot)\b|\bfeel\s+(?:[\w']+\s+){1,4}so\s+it\s+must\b"),
    (SHOULD_STATEMENTS, r"\b(?:i|you|they|he|she|we)\s+(?:should|shouldn't|must|ought\s+to)\b"),
    (LABELING, r"\b(?:i'm|i\s+am)\s+(?:such\s+an?\s+|an?\s+|so\s+|just\s+an?\s+)?(?:failure|loser|idiot|stupid|worthless|useless|disappointment|fraud|pathetic)\b"),
    (PERSONALIZATION, r"\b(?:my\s+fault|i\s+caused|because\s+of\s+me|i'm\s+to\s+blame|i\s+am\s+to\s+blame|all\s+on\s+me|i\s+should\s+have\s+prevented)\b"),
];

pub(crate) static DISTORTION_RULES: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    DISTORTION_PATTERNS
        .iter()
        .map(|(name, pattern)| (*name, compile(pattern)))
        .collect()
});

// ============================================================================
// Negative content
// ============================================================================

pub(crate) static NEGATIVE_CONTENT: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\b(?:fail|failed|failing|failure)\b",
        r"\bnever\s+(?:[\w']+\s+){0,2}succeed\b",
        r"\bhate\s+(?:myself|my\s+life|everything)\b",
        r"\b(?:give|gave|giving)\s+up\b",
        r"\b(?:worst|terrible|awful|horrible|miserable)\b",
        r"\bnothing\s+(?:ever\s+)?works\b",
        r"\b(?:cried|crying)\b",
        r"\b(?:ruined|disaster)\b",
    ]
    .iter()
    .map(|pattern| compile(pattern))
    .collect()
});

fn group(name: &'static str, emotion: &'static str, patterns: &[&str]) -> ContextGroup {
    ContextGroup {
        name,
        emotion,
        patterns: patterns.iter().map(|p| compile(p)).collect(),
    }
}

/// Multi-word keywords match across any whitespace run
fn phrase_pattern(label: &str) -> String {
    label
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+")
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {:?}: {}", pattern, e))
}
