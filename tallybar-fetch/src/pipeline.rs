//! Fetch pipeline: the cascading-fallback combinator.
//!
//! The pipeline holds a provider's strategies and tries them in priority
//! order. A stage failure is swallowed locally (recorded, logged, then on
//! to the next stage); only a terminal error or exhaustion of the chain
//! surfaces as the pipeline's own failure.

use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use crate::context::FetchContext;
use crate::error::FetchError;
use crate::strategy::{FetchKind, FetchResult, FetchStrategy, StrategyInfo};

// ============================================================================
// Fetch Attempt
// ============================================================================

/// Record of a single fetch attempt.
#[derive(Debug, Clone)]
pub struct FetchAttempt {
    /// The strategy ID that was attempted.
    pub strategy_id: String,
    /// The kind of fetch used.
    pub kind: FetchKind,
    /// Whether the attempt succeeded.
    pub success: bool,
    /// Error if the attempt failed.
    pub error: Option<String>,
    /// How long the attempt took.
    pub duration: Duration,
}

impl FetchAttempt {
    fn success(strategy_id: impl Into<String>, kind: FetchKind, duration: Duration) -> Self {
        Self {
            strategy_id: strategy_id.into(),
            kind,
            success: true,
            error: None,
            duration,
        }
    }

    fn failure(
        strategy_id: impl Into<String>,
        kind: FetchKind,
        error: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            strategy_id: strategy_id.into(),
            kind,
            success: false,
            error: Some(error.into()),
            duration,
        }
    }
}

// ============================================================================
// Fetch Outcome
// ============================================================================

/// The outcome of a pipeline execution.
#[derive(Debug)]
pub struct FetchOutcome {
    /// The result (success or final error).
    pub result: Result<FetchResult, FetchError>,
    /// All attempts made, in execution order.
    pub attempts: Vec<FetchAttempt>,
    /// Total duration of all attempts.
    pub duration: Duration,
}

impl FetchOutcome {
    /// Returns true if the fetch succeeded.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Returns the number of strategies that were tried.
    pub fn attempts_count(&self) -> usize {
        self.attempts.len()
    }

    /// Returns the successful strategy ID, if any.
    pub fn successful_strategy(&self) -> Option<&str> {
        self.result.as_ref().ok().map(|r| r.strategy_id.as_str())
    }

    /// Returns all errors that occurred.
    pub fn errors(&self) -> Vec<&str> {
        self.attempts
            .iter()
            .filter_map(|a| a.error.as_deref())
            .collect()
    }
}

// ============================================================================
// Fetch Pipeline
// ============================================================================

/// A pipeline of fetch strategies tried in order.
pub struct FetchPipeline {
    strategies: Vec<Box<dyn FetchStrategy>>,
}

impl FetchPipeline {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Creates a pipeline with the given strategies, ordered by priority.
    pub fn with_strategies(strategies: Vec<Box<dyn FetchStrategy>>) -> Self {
        let mut pipeline = Self { strategies };
        pipeline
            .strategies
            .sort_by(|a, b| b.priority().cmp(&a.priority()));
        pipeline
    }

    /// Returns the number of strategies in the pipeline.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Returns true if the pipeline is empty.
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Returns information about all strategies.
    pub async fn strategy_info(&self, ctx: &FetchContext) -> Vec<StrategyInfo> {
        let mut info = Vec::with_capacity(self.strategies.len());
        for strategy in &self.strategies {
            info.push(StrategyInfo::from_strategy(strategy.as_ref(), ctx).await);
        }
        info
    }

    /// Execute the pipeline, trying strategies in order until one succeeds.
    ///
    /// No stage begins before the prior one has definitively failed.
    #[instrument(skip(self, ctx), fields(strategies = self.strategies.len()))]
    pub async fn execute(&self, ctx: &FetchContext) -> FetchOutcome {
        let start = Instant::now();
        let mut attempts = Vec::new();

        if self.strategies.is_empty() {
            return FetchOutcome {
                result: Err(FetchError::StrategyNotAvailable(
                    "No strategies configured".to_string(),
                )),
                attempts,
                duration: start.elapsed(),
            };
        }

        info!(count = self.strategies.len(), "Executing fetch pipeline");

        for strategy in &self.strategies {
            let strategy_id = strategy.id();
            let kind = strategy.kind();

            if !strategy.is_available(ctx).await {
                debug!(strategy = %strategy_id, "Strategy not available, skipping");
                attempts.push(FetchAttempt::failure(
                    strategy_id,
                    kind,
                    "Not available",
                    Duration::ZERO,
                ));
                continue;
            }

            let attempt_start = Instant::now();
            debug!(strategy = %strategy_id, "Executing strategy");

            match strategy.fetch(ctx).await {
                Ok(result) => {
                    let duration = attempt_start.elapsed();
                    info!(strategy = %strategy_id, duration = ?duration, "Strategy succeeded");
                    attempts.push(FetchAttempt::success(strategy_id, kind, duration));

                    return FetchOutcome {
                        result: Ok(result),
                        attempts,
                        duration: start.elapsed(),
                    };
                }
                Err(error) => {
                    let duration = attempt_start.elapsed();
                    warn!(
                        strategy = %strategy_id,
                        error = %error,
                        duration = ?duration,
                        "Strategy failed"
                    );
                    attempts.push(FetchAttempt::failure(
                        strategy_id,
                        kind,
                        error.to_string(),
                        duration,
                    ));

                    if !strategy.should_fallback(&error) {
                        debug!(strategy = %strategy_id, "Terminal failure, stopping cascade");
                        return FetchOutcome {
                            result: Err(error),
                            attempts,
                            duration: start.elapsed(),
                        };
                    }
                }
            }
        }

        warn!("All strategies failed");
        FetchOutcome {
            result: Err(FetchError::AllStrategiesFailed),
            attempts,
            duration: start.elapsed(),
        }
    }
}

impl Default for FetchPipeline {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tallybar_core::{RateWindow, UsageReport};

    struct SucceedingStrategy {
        id: String,
        available: bool,
        priority: u32,
        used_percent: f64,
    }

    impl SucceedingStrategy {
        fn new(id: &str, priority: u32, used_percent: f64) -> Self {
            Self {
                id: id.to_string(),
                available: true,
                priority,
                used_percent,
            }
        }

        fn unavailable(mut self) -> Self {
            self.available = false;
            self
        }
    }

    #[async_trait]
    impl FetchStrategy for SucceedingStrategy {
        fn id(&self) -> &str {
            &self.id
        }

        fn kind(&self) -> FetchKind {
            FetchKind::StatusJson
        }

        async fn is_available(&self, _ctx: &FetchContext) -> bool {
            self.available
        }

        async fn fetch(&self, _ctx: &FetchContext) -> Result<FetchResult, FetchError> {
            let report = UsageReport {
                primary: Some(RateWindow::new(self.used_percent)),
                ..UsageReport::default()
            };
            Ok(FetchResult::new(report, self.id.clone(), self.kind()))
        }

        fn priority(&self) -> u32 {
            self.priority
        }
    }

    struct FailingStrategy {
        id: String,
        priority: u32,
        terminal: bool,
    }

    impl FailingStrategy {
        fn new(id: &str, priority: u32) -> Self {
            Self {
                id: id.to_string(),
                priority,
                terminal: false,
            }
        }

        fn terminal(mut self) -> Self {
            self.terminal = true;
            self
        }
    }

    #[async_trait]
    impl FetchStrategy for FailingStrategy {
        fn id(&self) -> &str {
            &self.id
        }

        fn kind(&self) -> FetchKind {
            FetchKind::Rpc
        }

        async fn is_available(&self, _ctx: &FetchContext) -> bool {
            true
        }

        async fn fetch(&self, _ctx: &FetchContext) -> Result<FetchResult, FetchError> {
            if self.terminal {
                Err(FetchError::LoginRequired("not logged in".to_string()))
            } else {
                Err(FetchError::InvalidResponse("garbled".to_string()))
            }
        }

        fn priority(&self) -> u32 {
            self.priority
        }
    }

    #[tokio::test]
    async fn test_empty_pipeline() {
        let pipeline = FetchPipeline::new();
        let ctx = FetchContext::new();
        let outcome = pipeline.execute(&ctx).await;

        assert!(!outcome.is_success());
        assert!(matches!(
            outcome.result,
            Err(FetchError::StrategyNotAvailable(_))
        ));
    }

    #[tokio::test]
    async fn test_single_success() {
        let pipeline = FetchPipeline::with_strategies(vec![Box::new(SucceedingStrategy::new(
            "test.json",
            100,
            42.0,
        ))]);

        let ctx = FetchContext::new();
        let outcome = pipeline.execute(&ctx).await;

        assert!(outcome.is_success());
        assert_eq!(outcome.attempts_count(), 1);
        assert_eq!(outcome.successful_strategy(), Some("test.json"));
    }

    #[tokio::test]
    async fn test_stage_failure_falls_through_in_order() {
        let pipeline = FetchPipeline::with_strategies(vec![
            Box::new(SucceedingStrategy::new("test.text", 80, 7.0)),
            Box::new(FailingStrategy::new("test.json", 100)),
            Box::new(SucceedingStrategy::new("test.rpc", 90, 28.5)),
        ]);

        let ctx = FetchContext::new();
        let outcome = pipeline.execute(&ctx).await;

        // The failing highest-priority stage hands over to the next
        // richest stage, not to the lowest one
        assert!(outcome.is_success());
        assert_eq!(outcome.attempts_count(), 2);
        assert_eq!(outcome.successful_strategy(), Some("test.rpc"));

        let result = outcome.result.unwrap();
        assert_eq!(result.report.primary.unwrap().used_percent, 28.5);
    }

    #[tokio::test]
    async fn test_terminal_failure_stops_cascade() {
        let pipeline = FetchPipeline::with_strategies(vec![
            Box::new(FailingStrategy::new("test.json", 100).terminal()),
            Box::new(SucceedingStrategy::new("test.rpc", 90, 1.0)),
        ]);

        let ctx = FetchContext::new();
        let outcome = pipeline.execute(&ctx).await;

        assert!(!outcome.is_success());
        assert_eq!(outcome.attempts_count(), 1);
        assert!(matches!(outcome.result, Err(FetchError::LoginRequired(_))));
    }

    #[tokio::test]
    async fn test_skip_unavailable() {
        let pipeline = FetchPipeline::with_strategies(vec![
            Box::new(SucceedingStrategy::new("test.first", 100, 1.0).unavailable()),
            Box::new(SucceedingStrategy::new("test.second", 90, 2.0)),
        ]);

        let ctx = FetchContext::new();
        let outcome = pipeline.execute(&ctx).await;

        assert!(outcome.is_success());
        assert_eq!(outcome.successful_strategy(), Some("test.second"));
        // The skipped strategy still shows up in the attempt log
        assert_eq!(outcome.attempts_count(), 2);
        assert_eq!(outcome.errors(), vec!["Not available"]);
    }

    #[tokio::test]
    async fn test_all_failed() {
        let pipeline = FetchPipeline::with_strategies(vec![
            Box::new(FailingStrategy::new("test.json", 100)),
            Box::new(FailingStrategy::new("test.rpc", 90)),
        ]);

        let ctx = FetchContext::new();
        let outcome = pipeline.execute(&ctx).await;

        assert!(!outcome.is_success());
        assert!(matches!(outcome.result, Err(FetchError::AllStrategiesFailed)));
        assert_eq!(outcome.attempts_count(), 2);
    }
}
