//! reverie-engine: journal analysis engine
//!
//! - [`taxonomy`]: hierarchical emotion taxonomy and label resolution
//! - [`cache`]: analysis and practice-session caches
//! - [`fallback`]: offline rule-based analyzer
//! - [`orchestrator`]: cache → external analyzer → offline fallback
//! - [`scenarios`]: CBT practice sessions
//! - [`services`]: HTTP client for the external analysis service

pub mod cache;
pub mod fallback;
pub mod orchestrator;
pub mod scenarios;
pub mod services;
pub mod taxonomy;
pub mod types;

pub use cache::{AnalysisCache, CacheStats, ScenarioCache};
pub use fallback::analyze_offline;
pub use orchestrator::{AnalysisOrchestrator, AnalysisSource};
pub use scenarios::{
    build_offline_session, PracticeSession, Scenario, ScenarioOption, ScenarioOrchestrator,
    ScenarioRequest,
};
pub use services::HttpAnalysisClient;
pub use taxonomy::{
    categorize_emotion, emotion_color, related_emotions, related_emotions_for_label, resolve,
    CoreEmotion, EmotionCategory,
};
pub use types::{
    AnalysisResult, AnalyzerError, EngineError, EngineResult, ScenarioGenerator, Sentiment,
    TextAnalyzer,
};
