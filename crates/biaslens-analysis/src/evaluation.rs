use std::path::Path;

use biaslens_config::{BiaslensConfig, ConfigError, load_workspace_config};
use biaslens_core::{
    Baseline, EvaluationId, Finding, HeuristicType, Recommendation, TrendPoint, ZoneStatus,
    aggregate_score, calculate_zone,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const EVALUATION_SCHEMA_VERSION: &str = "1.0";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("iteration count {actual} outside allowed range {min}..={max}")]
    InvalidIterationCount { actual: u32, min: u32, max: u32 },
    #[error("no heuristic types requested")]
    NoHeuristicTypes,
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub heuristic_types: Vec<HeuristicType>,
    pub iteration_count: u32,
}

/// Everything one evaluation run hands to the caller: findings and
/// recommendations for persistence, plus the aggregate score and zone for the
/// parent evaluation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationOutcome {
    pub schema_version: String,
    pub findings: Vec<Finding>,
    pub recommendations: Vec<Recommendation>,
    pub overall_score: f64,
    pub zone_status: ZoneStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    pub schema_version: String,
    pub evaluation_id: EvaluationId,
    pub data_points: Vec<TrendPoint>,
    pub current_zone: ZoneStatus,
    pub drift_alert: bool,
    pub drift_message: Option<String>,
}

/// Drives one evaluation end to end: detection, aggregation, zone
/// classification, and recommendation ranking. Pure given the injected
/// generator; concurrent runs for different evaluation ids share nothing.
#[derive(Debug, Clone)]
pub struct EvaluationRunner {
    config: BiaslensConfig,
}

impl EvaluationRunner {
    pub fn new(config: BiaslensConfig) -> Self {
        Self { config }
    }

    pub fn from_workspace(workspace: impl AsRef<Path>) -> Result<Self, AnalysisError> {
        let config = load_workspace_config(workspace)?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &BiaslensConfig {
        &self.config
    }

    /// Run detection and the downstream scoring pipeline. The iteration
    /// bounds are enforced here, not in the detector, so the detector stays a
    /// pure function of its inputs.
    pub fn run<R: Rng>(
        &self,
        request: &EvaluationRequest,
        rng: &mut R,
    ) -> Result<EvaluationOutcome, AnalysisError> {
        if request.heuristic_types.is_empty() {
            return Err(AnalysisError::NoHeuristicTypes);
        }

        let bounds = self.config.detection;
        if request.iteration_count < bounds.min_iterations
            || request.iteration_count > bounds.max_iterations
        {
            return Err(AnalysisError::InvalidIterationCount {
                actual: request.iteration_count,
                min: bounds.min_iterations,
                max: bounds.max_iterations,
            });
        }

        let mut detector = crate::HeuristicDetector::new(&mut *rng);
        let findings = detector.run_detection(&request.heuristic_types, request.iteration_count);

        let overall_score = aggregate_score(&findings);
        let baseline = Baseline::default();
        let zone_status = calculate_zone(overall_score, &baseline);

        let recommendations =
            crate::RecommendationGenerator::new(self.config.recommendations).generate(&findings);

        Ok(EvaluationOutcome {
            schema_version: EVALUATION_SCHEMA_VERSION.to_owned(),
            findings,
            recommendations,
            overall_score,
            zone_status,
        })
    }

    /// Synthesize the longitudinal view for a completed evaluation and run
    /// the drift check over it.
    pub fn trend_report<R: Rng>(
        &self,
        rng: &mut R,
        evaluation_id: impl Into<EvaluationId>,
        current_score: f64,
        baseline: &Baseline,
    ) -> TrendReport {
        let analyzer = crate::TrendAnalyzer::new(self.config.trend);
        let data_points = analyzer.historical_trend(rng, current_score, baseline);
        let drift = analyzer.detect_drift(&data_points);

        TrendReport {
            schema_version: EVALUATION_SCHEMA_VERSION.to_owned(),
            evaluation_id: evaluation_id.into(),
            current_zone: calculate_zone(current_score, baseline),
            data_points,
            drift_alert: drift.drift_alert,
            drift_message: drift.drift_message,
        }
    }
}
