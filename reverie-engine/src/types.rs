//! Core Types and Trait Definitions for the analysis engine
//!
//! Defines the result shape shared by the external analysis service and the
//! offline fallback, plus the collaborator traits the orchestrators call out to.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of suggested tags in a result
pub const MAX_SUGGESTED_TAGS: usize = 8;

// ============================================================================
// Analysis Result
// ============================================================================

/// Structured analysis of one journal entry
///
/// Field names serialize in camelCase to match the external service's JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Suggested tags in insertion order (at most [`MAX_SUGGESTED_TAGS`])
    pub suggested_tags: Vec<String>,
    /// Short narrative summary with a coaching suggestion
    pub analysis: String,
    /// Detected emotion labels
    pub emotions: Vec<String>,
    /// Detected topics
    pub topics: Vec<String>,
    /// Detected cognitive distortions (possibly empty)
    #[serde(default)]
    pub cognitive_distortions: Vec<String>,
    /// Positive/negative/neutral split summing to 100
    pub sentiment: Sentiment,
}

impl AnalysisResult {
    /// Check the structural invariants the rest of the engine relies on
    pub fn is_well_formed(&self) -> bool {
        self.suggested_tags.len() <= MAX_SUGGESTED_TAGS && self.sentiment.is_normalized()
    }
}

/// Sentiment split in whole percentages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sentiment {
    pub positive: u32,
    pub negative: u32,
    pub neutral: u32,
}

impl Sentiment {
    pub fn new(positive: u32, negative: u32, neutral: u32) -> Self {
        Self {
            positive,
            negative,
            neutral,
        }
    }

    /// All-neutral split
    pub fn neutral() -> Self {
        Self::new(0, 0, 100)
    }

    /// True when the three buckets sum to exactly 100
    pub fn is_normalized(&self) -> bool {
        u64::from(self.positive) + u64::from(self.negative) + u64::from(self.neutral) == 100
    }
}

// ============================================================================
// Collaborator Errors
// ============================================================================

/// Failure reported by an external analysis or generation service
///
/// The orchestrators treat every variant the same way (fall back), but the
/// distinction is kept for logging and statistics.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Provider quota or rate limit exhausted
    #[error("Quota exhausted: {0}")]
    QuotaExhausted(String),

    /// Network/transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// Provider returned an error response
    #[error("API error: {0}")]
    Api(String),

    /// Response could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Response parsed but violates the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl AnalyzerError {
    pub fn is_quota_exhausted(&self) -> bool {
        matches!(self, AnalyzerError::QuotaExhausted(_))
    }
}

/// Engine-level error
///
/// Analysis-quality failures never surface here; they are absorbed by the
/// fallback path. Only bad caller input and internal faults do.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Caller passed input the engine cannot analyze
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unexpected internal fault
    #[error("Internal error: {0}")]
    Internal(String),

    /// reverie-common error
    #[error("Common error: {0}")]
    Common(#[from] reverie_common::Error),
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

// ============================================================================
// Collaborator Traits
// ============================================================================

/// External text-analysis service
///
/// # Example
/// ```rust,ignore
/// struct Canned;
///
/// #[async_trait::async_trait]
/// impl TextAnalyzer for Canned {
///     fn name(&self) -> &'static str { "canned" }
///     async fn analyze(&self, title: &str, content: &str) -> Result<AnalysisResult, AnalyzerError> {
///         Ok(reverie_engine::fallback::analyze_offline(title, content))
///     }
/// }
/// ```
#[async_trait::async_trait]
pub trait TextAnalyzer: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Analyze one journal entry
    async fn analyze(&self, title: &str, content: &str) -> Result<AnalysisResult, AnalyzerError>;
}

/// External generator of CBT practice scenarios
#[async_trait::async_trait]
pub trait ScenarioGenerator: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Generate the scenarios for one practice session
    async fn generate(
        &self,
        request: &crate::scenarios::ScenarioRequest,
    ) -> Result<Vec<crate::scenarios::Scenario>, AnalyzerError>;
}
