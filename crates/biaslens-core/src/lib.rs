use serde::{Deserialize, Serialize};

mod scoring;

pub use scoring::{
    SeverityThresholds, aggregate_score, calculate_baseline, calculate_confidence,
    calculate_priority, calculate_severity, calculate_zone, severity_thresholds,
};

pub type EvaluationId = String;

/// The closed set of cognitive-bias heuristics the pipeline evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicType {
    Anchoring,
    LossAversion,
    SunkCost,
    ConfirmationBias,
    AvailabilityHeuristic,
}

impl HeuristicType {
    pub const ALL: [HeuristicType; 5] = [
        Self::Anchoring,
        Self::LossAversion,
        Self::SunkCost,
        Self::ConfirmationBias,
        Self::AvailabilityHeuristic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Anchoring => "anchoring",
            Self::LossAversion => "loss_aversion",
            Self::SunkCost => "sunk_cost",
            Self::ConfirmationBias => "confirmation_bias",
            Self::AvailabilityHeuristic => "availability_heuristic",
        }
    }
}

impl std::str::FromStr for HeuristicType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "anchoring" => Ok(Self::Anchoring),
            "loss_aversion" => Ok(Self::LossAversion),
            "sunk_cost" => Ok(Self::SunkCost),
            "confirmation_bias" => Ok(Self::ConfirmationBias),
            "availability_heuristic" => Ok(Self::AvailabilityHeuristic),
            other => Err(format!(
                "invalid heuristic type '{other}', expected one of: anchoring, loss_aversion, sunk_cost, confirmation_bias, availability_heuristic"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl SeverityLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// Traffic-light zone for an aggregate score. Ordering is by severity:
/// green < yellow < red.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ZoneStatus {
    Green,
    Yellow,
    Red,
}

impl ZoneStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
}

impl ImpactLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Weight this impact contributes to recommendation priority.
    pub fn priority_weight(self) -> f64 {
        match self {
            Self::Low => 5.0,
            Self::Medium => 10.0,
            Self::High => 15.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyLevel {
    Easy,
    Moderate,
    Complex,
}

impl DifficultyLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Moderate => "moderate",
            Self::Complex => "complex",
        }
    }
}

/// Which recommendation description a caller surfaces. The generator always
/// fills both fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DescriptionMode {
    #[default]
    Technical,
    Simplified,
}

impl std::str::FromStr for DescriptionMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "technical" => Ok(Self::Technical),
            "simplified" => Ok(Self::Simplified),
            other => Err(format!(
                "invalid description mode '{other}', expected technical or simplified"
            )),
        }
    }
}

/// One heuristic's detection result for a single evaluation run. Immutable
/// once produced; persistence belongs to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub heuristic_type: HeuristicType,
    pub detection_count: u32,
    /// In [0, 0.99].
    pub confidence_level: f64,
    /// In [0, 100].
    pub severity_score: f64,
    /// Derived from the raw detection metric, not recomputed from the score.
    pub severity: SeverityLevel,
    pub example_instances: Vec<String>,
    pub pattern_description: String,
}

/// Zone thresholds derived from historical scores, or the fixed default for
/// a freshly baselined system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub mean: f64,
    pub std_dev: f64,
    pub green_zone_max: f64,
    pub yellow_zone_max: f64,
    pub sample_size: u32,
}

impl Default for Baseline {
    fn default() -> Self {
        Self {
            mean: 75.0,
            std_dev: 10.0,
            green_zone_max: 80.0,
            yellow_zone_max: 90.0,
            sample_size: 0,
        }
    }
}

impl Baseline {
    /// Apply explicit post-hoc zone threshold overrides. The caller owns the
    /// green < yellow invariant when overriding.
    pub fn with_zone_overrides(
        mut self,
        green_zone_max: Option<f64>,
        yellow_zone_max: Option<f64>,
    ) -> Self {
        if let Some(green) = green_zone_max {
            self.green_zone_max = green;
        }
        if let Some(yellow) = yellow_zone_max {
            self.yellow_zone_max = yellow;
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub heuristic_type: HeuristicType,
    /// 1..=10, higher first.
    pub priority: u8,
    pub action_title: String,
    pub technical_description: String,
    pub simplified_description: String,
    pub estimated_impact: ImpactLevel,
    pub implementation_difficulty: DifficultyLevel,
}

impl Recommendation {
    pub fn description(&self, mode: DescriptionMode) -> &str {
        match mode {
            DescriptionMode::Technical => &self.technical_description,
            DescriptionMode::Simplified => &self.simplified_description,
        }
    }
}

/// One day of the synthetic score history. Timestamp is epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub timestamp: i64,
    pub score: f64,
    pub zone: ZoneStatus,
}
