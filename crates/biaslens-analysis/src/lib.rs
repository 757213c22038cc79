mod detector;
mod evaluation;
mod recommend;
mod stats;

pub use detector::HeuristicDetector;
pub use evaluation::{
    AnalysisError, EVALUATION_SCHEMA_VERSION, EvaluationOutcome, EvaluationRequest,
    EvaluationRunner, TrendReport,
};
pub use recommend::{RecommendationGenerator, RecommendationTemplate, templates_for};
pub use stats::{DriftOutcome, TrendAnalyzer};
