//! Practice-session orchestration tests

use reverie_common::ManualClock;
use reverie_engine::{
    build_offline_session, resolve, AnalyzerError, EngineError, Scenario, ScenarioCache,
    ScenarioGenerator, ScenarioOption, ScenarioOrchestrator, ScenarioRequest,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Clone, Copy)]
enum Reply {
    Valid,
    TwoCorrect,
    TooFew,
    Fail,
}

struct MockGenerator {
    reply: Reply,
    calls: AtomicUsize,
}

impl MockGenerator {
    fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn scenario(n: usize, correct_slots: &[usize]) -> Scenario {
    Scenario {
        situation: format!("Situation {}", n),
        thought: format!("Thought {}", n),
        options: (0..4)
            .map(|i| ScenarioOption {
                text: format!("Option {}", i),
                is_correct: correct_slots.contains(&i),
            })
            .collect(),
        explanation: "Because".to_string(),
    }
}

#[async_trait::async_trait]
impl ScenarioGenerator for MockGenerator {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn generate(&self, _request: &ScenarioRequest) -> Result<Vec<Scenario>, AnalyzerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.reply {
            Reply::Valid => Ok((0..3).map(|n| scenario(n, &[n])).collect()),
            Reply::TwoCorrect => Ok((0..3).map(|n| scenario(n, &[0, 1])).collect()),
            Reply::TooFew => Ok(vec![scenario(0, &[0])]),
            Reply::Fail => Err(AnalyzerError::QuotaExhausted("429".to_string())),
        }
    }
}

fn orchestrator(mock: &Arc<MockGenerator>) -> ScenarioOrchestrator {
    let generator: Arc<dyn ScenarioGenerator> = mock.clone();
    let cache = ScenarioCache::new(Arc::new(ManualClock::default()));
    ScenarioOrchestrator::new(Some(generator), cache)
}

fn request() -> ScenarioRequest {
    ScenarioRequest {
        thought: "Everyone at work thinks I'm useless".to_string(),
        distortions: vec!["Mind Reading".to_string()],
        emotion: Some("anxious".to_string()),
        instructions: None,
    }
}

#[tokio::test]
async fn test_generated_session_is_cached() {
    let mock = MockGenerator::new(Reply::Valid);
    let orchestrator = orchestrator(&mock);

    let first = orchestrator.practice_session(&request()).await.unwrap();
    assert!(!first.offline);
    assert_eq!(first.scenarios.len(), 3);
    assert_eq!(first.emotion_core, resolve("anxious"));

    let second = orchestrator.practice_session(&request()).await.unwrap();
    assert_eq!(second, first);
    assert_eq!(mock.calls(), 1);
    assert_eq!(orchestrator.cached_sessions().await, 1);
}

#[tokio::test]
async fn test_distortion_order_shares_cache_entry() {
    let mock = MockGenerator::new(Reply::Valid);
    let orchestrator = orchestrator(&mock);

    let mut a = request();
    a.distortions = vec!["Labeling".to_string(), "Mind Reading".to_string()];
    let mut b = request();
    b.distortions = vec!["mind reading".to_string(), "labeling".to_string()];

    orchestrator.practice_session(&a).await.unwrap();
    orchestrator.practice_session(&b).await.unwrap();
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn test_invalid_scenarios_fall_back() {
    for reply in [Reply::TwoCorrect, Reply::TooFew] {
        let mock = MockGenerator::new(reply);
        let orchestrator = orchestrator(&mock);

        let session = orchestrator.practice_session(&request()).await.unwrap();
        assert!(session.offline);
        assert!(session.validate().is_ok());
        assert_eq!(orchestrator.cached_sessions().await, 0);
    }
}

#[tokio::test]
async fn test_generator_failure_falls_back() {
    let mock = MockGenerator::new(Reply::Fail);
    let orchestrator = orchestrator(&mock);

    let session = orchestrator.practice_session(&request()).await.unwrap();
    let offline = build_offline_session(&request());
    assert!(session.offline);
    assert_eq!(session.scenarios, offline.scenarios);

    orchestrator.practice_session(&request()).await.unwrap();
    assert_eq!(mock.calls(), 2);
}

#[tokio::test]
async fn test_blank_thought_is_rejected() {
    let mock = MockGenerator::new(Reply::Valid);
    let orchestrator = orchestrator(&mock);

    let mut blank = request();
    blank.thought = "   ".to_string();
    let err = orchestrator.practice_session(&blank).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn test_without_generator_uses_templates() {
    let orchestrator =
        ScenarioOrchestrator::new(None, ScenarioCache::new(Arc::new(ManualClock::default())));

    let session = orchestrator.practice_session(&request()).await.unwrap();
    assert!(session.offline);
    assert!(session.validate().is_ok());
    assert!(session
        .scenarios
        .iter()
        .all(|s| s.options.iter().any(|o| o.is_correct && o.text == "Jumping to Conclusions")));
}

#[tokio::test]
async fn test_expired_sessions_purged_on_insert() {
    let mock = MockGenerator::new(Reply::Valid);
    let clock = Arc::new(ManualClock::default());
    let generator: Arc<dyn ScenarioGenerator> = mock.clone();
    let orchestrator =
        ScenarioOrchestrator::new(Some(generator), ScenarioCache::new(clock.clone()));

    orchestrator.practice_session(&request()).await.unwrap();
    clock.advance(chrono::Duration::hours(25));

    let mut other = request();
    other.thought = "Nobody ever listens to me".to_string();
    orchestrator.practice_session(&other).await.unwrap();

    assert_eq!(mock.calls(), 2);
    assert_eq!(orchestrator.cached_sessions().await, 1);
}
