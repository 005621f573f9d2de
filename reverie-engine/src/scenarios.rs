//! CBT practice sessions
//!
//! A practice session is three short scenarios, each asking which thinking
//! pattern a thought shows, with four options of which exactly one is correct.
//! Sessions come from an external [`ScenarioGenerator`] when one is available;
//! otherwise, or when the generator fails or returns a malformed set, an
//! offline session is built from fixed templates.
//!
//! # Architecture
//! [`ScenarioOrchestrator`] mirrors the analysis orchestrator: cache lookup,
//! per-key in-flight lock, generator call, validation, cache write. Offline
//! sessions are returned directly and never cached.

use crate::cache::ScenarioCache;
use crate::orchestrator::InFlight;
use crate::taxonomy::{self, CoreEmotion};
use crate::types::{EngineError, EngineResult, ScenarioGenerator};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Scenarios in one session
pub const SCENARIOS_PER_SESSION: usize = 3;

/// Answer options per scenario
pub const OPTIONS_PER_SCENARIO: usize = 4;

// ============================================================================
// Data Model
// ============================================================================

/// Input for one practice session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioRequest {
    /// The automatic thought being practiced on
    pub thought: String,
    /// Distortion names the thought was tagged with
    #[serde(default)]
    pub distortions: Vec<String>,
    /// Free-text emotion label
    #[serde(default)]
    pub emotion: Option<String>,
    /// Extra guidance for the generator
    #[serde(default)]
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioOption {
    pub text: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub situation: String,
    pub thought: String,
    pub options: Vec<ScenarioOption>,
    pub explanation: String,
}

impl Scenario {
    /// Check option count, correct-answer count and non-empty text
    pub fn validate(&self, index: usize) -> Result<(), ValidationError> {
        if self.situation.trim().is_empty() || self.thought.trim().is_empty() {
            return Err(ValidationError::EmptyText(index));
        }
        if self.options.len() != OPTIONS_PER_SCENARIO {
            return Err(ValidationError::OptionCount {
                scenario: index,
                found: self.options.len(),
            });
        }
        if self.options.iter().any(|o| o.text.trim().is_empty()) {
            return Err(ValidationError::EmptyText(index));
        }
        let correct = self.options.iter().filter(|o| o.is_correct).count();
        if correct != 1 {
            return Err(ValidationError::CorrectCount {
                scenario: index,
                found: correct,
            });
        }
        Ok(())
    }
}

/// A complete practice session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeSession {
    pub id: Uuid,
    pub thought: String,
    pub distortions: Vec<String>,
    /// Core emotion resolved from the request's emotion label
    pub emotion_core: Option<CoreEmotion>,
    pub scenarios: Vec<Scenario>,
    /// True when built from offline templates
    #[serde(default)]
    pub offline: bool,
}

impl PracticeSession {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_scenarios(&self.scenarios)
    }
}

/// Structural problems in a scenario set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Expected 3 scenarios, found {0}")]
    ScenarioCount(usize),

    #[error("Scenario {scenario}: expected 4 options, found {found}")]
    OptionCount { scenario: usize, found: usize },

    #[error("Scenario {scenario}: expected exactly 1 correct option, found {found}")]
    CorrectCount { scenario: usize, found: usize },

    #[error("Scenario {0}: empty text")]
    EmptyText(usize),
}

/// Enforce the 3 scenarios × 4 options × 1 correct shape
pub fn validate_scenarios(scenarios: &[Scenario]) -> Result<(), ValidationError> {
    if scenarios.len() != SCENARIOS_PER_SESSION {
        return Err(ValidationError::ScenarioCount(scenarios.len()));
    }
    scenarios
        .iter()
        .enumerate()
        .try_for_each(|(i, scenario)| scenario.validate(i))
}

// ============================================================================
// Offline Templates
// ============================================================================

struct DistortionTemplate {
    name: &'static str,
    /// Lowercase fragments that identify this distortion in free text
    aliases: &'static [&'static str],
    explanation: &'static str,
    /// (situation, thought)
    examples: [(&'static str, &'static str); 3],
}

const TEMPLATES: &[DistortionTemplate] = &[
    DistortionTemplate {
        name: "All-or-Nothing Thinking",
        aliases: &["all-or-nothing", "all or nothing", "black-and-white", "black and white"],
        explanation: "The thought allows only two outcomes, perfect or total failure, with nothing in between.",
        examples: [
            ("You get one question wrong on a quiz.", "If I didn't get everything right, I failed."),
            ("Your diet slips at one meal.", "I've completely ruined the whole week."),
            ("A presentation has one awkward pause.", "The whole talk was a disaster."),
        ],
    },
    DistortionTemplate {
        name: "Overgeneralization",
        aliases: &["overgeneral"],
        explanation: "A single event is treated as a never-ending pattern.",
        examples: [
            ("A friend cancels lunch plans.", "People always let me down."),
            ("You miss the bus this morning.", "Nothing ever goes my way."),
            ("A job application is rejected.", "I'll never get hired anywhere."),
        ],
    },
    DistortionTemplate {
        name: "Mental Filtering",
        aliases: &["mental filter", "filtering"],
        explanation: "One negative detail is dwelt on until it colors everything else.",
        examples: [
            ("Your review is glowing apart from one suggestion.", "All I can think about is that criticism."),
            ("A party went well except for one awkward moment.", "That moment ruined the entire evening."),
            ("You finish most of your to-do list.", "I only see the tasks I didn't do."),
        ],
    },
    DistortionTemplate {
        name: "Disqualifying the Positive",
        aliases: &["disqualif", "discounting the positive"],
        explanation: "Positive experiences are dismissed as not counting.",
        examples: [
            ("A coworker praises your report.", "They're just being nice."),
            ("You pass a difficult exam.", "I just got lucky."),
            ("A friend thanks you for your help.", "Anyone could have done that."),
        ],
    },
    DistortionTemplate {
        name: "Jumping to Conclusions",
        aliases: &["jumping", "mind reading", "mind-reading", "fortune telling", "fortune-telling"],
        explanation: "A negative conclusion is drawn without evidence, by guessing others' thoughts or the future.",
        examples: [
            ("Your manager asks to meet tomorrow.", "I'm definitely getting fired."),
            ("A friend hasn't replied for a few hours.", "She must be angry with me."),
            ("You are about to start a new class.", "I just know I'll be the worst one there."),
        ],
    },
    DistortionTemplate {
        name: "Catastrophizing",
        aliases: &["catastroph", "magnif"],
        explanation: "The worst possible outcome is assumed and treated as unbearable.",
        examples: [
            ("You feel a headache coming on.", "This must be something terrible."),
            ("You make a typo in an email to a client.", "My career is over."),
            ("Your flight is delayed.", "The whole trip is going to be a disaster."),
        ],
    },
    DistortionTemplate {
        name: "Emotional Reasoning",
        aliases: &["emotional reasoning"],
        explanation: "A feeling is taken as proof of a fact.",
        examples: [
            ("You feel nervous before a meeting.", "I feel anxious, so something bad will happen."),
            ("You feel guilty after saying no to a request.", "I feel guilty, so I must have done something wrong."),
            ("You feel out of place at a gathering.", "I feel like an outsider, so nobody wants me here."),
        ],
    },
    DistortionTemplate {
        name: "Should Statements",
        aliases: &["should", "must statements"],
        explanation: "Rigid rules about how things ought to be create guilt or frustration.",
        examples: [
            ("You take a rest day from exercise.", "I should be working out every single day."),
            ("You feel sad after a loss.", "I shouldn't feel this way anymore."),
            ("A colleague is late to a meeting.", "People must always be on time."),
        ],
    },
    DistortionTemplate {
        name: "Labeling",
        aliases: &["label"],
        explanation: "A single mistake is turned into a global judgment about a person.",
        examples: [
            ("You forget a friend's birthday.", "I'm a terrible friend."),
            ("You stumble over your words.", "I'm such an idiot."),
            ("A project doesn't go to plan.", "I'm a failure."),
        ],
    },
    DistortionTemplate {
        name: "Personalization",
        aliases: &["personaliz", "personalis", "blame"],
        explanation: "Responsibility is taken for events outside one's control.",
        examples: [
            ("Your team misses a deadline.", "It's all my fault."),
            ("A friend seems quiet at dinner.", "I must have upset them."),
            ("Your child gets a poor grade.", "I'm a bad parent."),
        ],
    },
];

/// Used when the request names no recognizable distortion
const DEFAULT_TEMPLATE_ORDER: [usize; SCENARIOS_PER_SESSION] = [1, 5, 0];

fn template_index(distortion: &str) -> Option<usize> {
    let needle = distortion.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    TEMPLATES.iter().position(|t| {
        t.name.to_lowercase() == needle || t.aliases.iter().any(|alias| needle.contains(alias))
    })
}

/// Build a deterministic practice session from the offline templates
///
/// Recognized distortions from the request are cycled across the three
/// scenarios; each scenario offers its distortion plus the next three
/// template names as distractors. Only the session id varies between calls.
pub fn build_offline_session(request: &ScenarioRequest) -> PracticeSession {
    let mut chosen: Vec<usize> = Vec::new();
    for distortion in &request.distortions {
        if let Some(index) = template_index(distortion) {
            if !chosen.contains(&index) {
                chosen.push(index);
            }
        }
    }
    if chosen.is_empty() {
        chosen.extend(DEFAULT_TEMPLATE_ORDER);
    }

    let scenarios = (0..SCENARIOS_PER_SESSION)
        .map(|i| {
            let template_idx = chosen[i % chosen.len()];
            let template = &TEMPLATES[template_idx];
            let (situation, thought) = template.examples[(i / chosen.len()) % template.examples.len()];
            Scenario {
                situation: situation.to_string(),
                thought: thought.to_string(),
                options: offline_options(template_idx, i),
                explanation: template.explanation.to_string(),
            }
        })
        .collect();

    let emotion_core = request.emotion.as_deref().and_then(taxonomy::resolve);

    PracticeSession {
        id: Uuid::new_v4(),
        thought: request.thought.clone(),
        distortions: request.distortions.clone(),
        emotion_core,
        scenarios,
        offline: true,
    }
}

/// Correct answer plus three distractors, correct slot rotating per scenario
fn offline_options(correct: usize, scenario_index: usize) -> Vec<ScenarioOption> {
    let mut options: Vec<ScenarioOption> = (1..OPTIONS_PER_SCENARIO)
        .map(|offset| ScenarioOption {
            text: TEMPLATES[(correct + offset) % TEMPLATES.len()].name.to_string(),
            is_correct: false,
        })
        .collect();
    let slot = (correct + scenario_index) % OPTIONS_PER_SCENARIO;
    options.insert(
        slot,
        ScenarioOption {
            text: TEMPLATES[correct].name.to_string(),
            is_correct: true,
        },
    );
    options
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Cache → generator → offline templates
pub struct ScenarioOrchestrator {
    generator: Option<Arc<dyn ScenarioGenerator>>,
    cache: Mutex<ScenarioCache>,
    in_flight: InFlight,
}

impl ScenarioOrchestrator {
    pub fn new(generator: Option<Arc<dyn ScenarioGenerator>>, cache: ScenarioCache) -> Self {
        Self {
            generator,
            cache: Mutex::new(cache),
            in_flight: InFlight::default(),
        }
    }

    /// Practice session for a thought
    ///
    /// Never fails on generator problems; only a blank thought is an error.
    pub async fn practice_session(&self, request: &ScenarioRequest) -> EngineResult<PracticeSession> {
        if request.thought.trim().is_empty() {
            return Err(EngineError::InvalidInput(
                "automatic thought must not be blank".to_string(),
            ));
        }

        let key = ScenarioCache::key_for(request);
        if let Some(session) = self.cache.lock().await.get(&key) {
            return Ok(session);
        }

        let Some(generator) = self.generator.as_ref() else {
            debug!("No scenario generator configured, using offline templates");
            return offline_session(request);
        };

        let _guard = self.in_flight.acquire(&key).await;
        if let Some(session) = self.cache.lock().await.get(&key) {
            return Ok(session);
        }

        match generator.generate(request).await {
            Ok(scenarios) => match validate_scenarios(&scenarios) {
                Ok(()) => {
                    let session = PracticeSession {
                        id: Uuid::new_v4(),
                        thought: request.thought.clone(),
                        distortions: request.distortions.clone(),
                        emotion_core: request.emotion.as_deref().and_then(taxonomy::resolve),
                        scenarios,
                        offline: false,
                    };
                    let mut cache = self.cache.lock().await;
                    let purged = cache.purge_expired();
                    if purged > 0 {
                        debug!(purged, "Dropped expired practice sessions");
                    }
                    cache.set(key, session.clone());
                    drop(cache);
                    info!(generator = generator.name(), "Generated practice session");
                    Ok(session)
                }
                Err(e) => {
                    warn!(generator = generator.name(), error = %e, "Generated scenarios rejected, using offline templates");
                    offline_session(request)
                }
            },
            Err(e) => {
                warn!(generator = generator.name(), error = %e, "Scenario generation failed, using offline templates");
                offline_session(request)
            }
        }
    }

    pub async fn cached_sessions(&self) -> usize {
        self.cache.lock().await.len()
    }
}

/// Offline session, checked against the structure generated sessions must have
fn offline_session(request: &ScenarioRequest) -> EngineResult<PracticeSession> {
    let session = build_offline_session(request);
    session
        .validate()
        .map_err(|e| EngineError::Internal(format!("offline practice session invalid: {}", e)))?;
    Ok(session)
}
