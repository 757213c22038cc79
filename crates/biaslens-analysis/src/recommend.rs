use biaslens_config::RecommendationConfig;
use biaslens_core::{
    DifficultyLevel, Finding, HeuristicType, ImpactLevel, Recommendation, calculate_priority,
};

/// One catalog entry. Every heuristic type owns exactly three templates, and
/// each finding expands all of them regardless of detection count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendationTemplate {
    pub action_title: &'static str,
    pub technical_description: &'static str,
    pub simplified_description: &'static str,
    pub estimated_impact: ImpactLevel,
    pub implementation_difficulty: DifficultyLevel,
}

const ANCHORING_TEMPLATES: [RecommendationTemplate; 3] = [
    RecommendationTemplate {
        action_title: "Implement multi-perspective prompting",
        technical_description: "Restructure prompts to present multiple baseline values before eliciting response. Use randomized anchor values across test scenarios to reduce single-anchor dependency.",
        simplified_description: "Present multiple starting points to prevent over-reliance on first value shown",
        estimated_impact: ImpactLevel::High,
        implementation_difficulty: DifficultyLevel::Easy,
    },
    RecommendationTemplate {
        action_title: "Add anchor-blind evaluation phase",
        technical_description: "Implement two-stage evaluation: initial assessment without context, followed by contextualized refinement. Compare outputs to measure anchor influence.",
        simplified_description: "Make initial decisions without reference points, then add context separately",
        estimated_impact: ImpactLevel::Medium,
        implementation_difficulty: DifficultyLevel::Moderate,
    },
    RecommendationTemplate {
        action_title: "Randomize information presentation order",
        technical_description: "Dynamically shuffle the order in which data points are presented to the model. Track variance across different orderings to identify order-dependency.",
        simplified_description: "Change the order information is shown to reduce first-impression bias",
        estimated_impact: ImpactLevel::Medium,
        implementation_difficulty: DifficultyLevel::Easy,
    },
];

const LOSS_AVERSION_TEMPLATES: [RecommendationTemplate; 3] = [
    RecommendationTemplate {
        action_title: "Normalize gain/loss framing",
        technical_description: "Present scenarios in both gain-framed and loss-framed versions. Calibrate model weights to ensure equivalent scenarios receive equivalent treatment regardless of framing.",
        simplified_description: "Ensure positive and negative outcomes are weighted equally",
        estimated_impact: ImpactLevel::High,
        implementation_difficulty: DifficultyLevel::Moderate,
    },
    RecommendationTemplate {
        action_title: "Implement risk-neutral scoring",
        technical_description: "Apply risk-neutral transformation to model outputs. Use expected value calculations rather than prospect-theory based evaluations.",
        simplified_description: "Focus on actual probability and impact rather than emotional response to risk",
        estimated_impact: ImpactLevel::High,
        implementation_difficulty: DifficultyLevel::Complex,
    },
    RecommendationTemplate {
        action_title: "Add loss aversion detection layer",
        technical_description: "Monitor model outputs for asymmetric gain/loss responses. Flag and reprocess decisions showing >1.5x sensitivity differential.",
        simplified_description: "Automatically detect and correct when system over-reacts to potential losses",
        estimated_impact: ImpactLevel::Medium,
        implementation_difficulty: DifficultyLevel::Moderate,
    },
];

const SUNK_COST_TEMPLATES: [RecommendationTemplate; 3] = [
    RecommendationTemplate {
        action_title: "Implement forward-looking decision framework",
        technical_description: "Structure prompts to focus exclusively on future costs and benefits. Explicitly exclude historical investment data from decision-relevant context.",
        simplified_description: "Make decisions based only on future outcomes, ignoring past investments",
        estimated_impact: ImpactLevel::High,
        implementation_difficulty: DifficultyLevel::Easy,
    },
    RecommendationTemplate {
        action_title: "Add sunk cost filter",
        technical_description: "Detect when historical cost information appears in reasoning chain. Automatically strip or flag sunk cost references before final decision.",
        simplified_description: "Remove information about past investments from decision-making process",
        estimated_impact: ImpactLevel::Medium,
        implementation_difficulty: DifficultyLevel::Moderate,
    },
    RecommendationTemplate {
        action_title: "Use incremental value analysis",
        technical_description: "Evaluate each decision as if starting fresh. Compare 'continue current path' vs 'switch to alternative' using only prospective analysis.",
        simplified_description: "Evaluate each choice as if it's the first decision being made",
        estimated_impact: ImpactLevel::High,
        implementation_difficulty: DifficultyLevel::Moderate,
    },
];

const CONFIRMATION_BIAS_TEMPLATES: [RecommendationTemplate; 3] = [
    RecommendationTemplate {
        action_title: "Implement adversarial evidence search",
        technical_description: "For each hypothesis, automatically generate and evaluate counter-arguments. Require model to engage with strongest contradictory evidence before finalizing position.",
        simplified_description: "Actively search for and consider evidence that contradicts initial thinking",
        estimated_impact: ImpactLevel::High,
        implementation_difficulty: DifficultyLevel::Moderate,
    },
    RecommendationTemplate {
        action_title: "Add belief revision tracking",
        technical_description: "Monitor whether and how the model updates beliefs when presented with contradictory evidence. Score based on Bayesian updating rather than position consistency.",
        simplified_description: "Track and reward changing opinions when new evidence appears",
        estimated_impact: ImpactLevel::Medium,
        implementation_difficulty: DifficultyLevel::Complex,
    },
    RecommendationTemplate {
        action_title: "Use blind evidence evaluation",
        technical_description: "Present evidence without labels indicating whether it supports or contradicts current hypothesis. Measure evidence weight assignment before revealing relevance.",
        simplified_description: "Evaluate evidence quality before knowing if it supports current position",
        estimated_impact: ImpactLevel::High,
        implementation_difficulty: DifficultyLevel::Moderate,
    },
];

const AVAILABILITY_HEURISTIC_TEMPLATES: [RecommendationTemplate; 3] = [
    RecommendationTemplate {
        action_title: "Incorporate base rate priming",
        technical_description: "Explicitly provide statistical base rates and frequency data before eliciting probability judgments. Weight base rates higher than anecdotal examples.",
        simplified_description: "Start with actual statistics before considering individual examples",
        estimated_impact: ImpactLevel::High,
        implementation_difficulty: DifficultyLevel::Easy,
    },
    RecommendationTemplate {
        action_title: "Implement recency weighting correction",
        technical_description: "Apply inverse recency weights to training data and examples. Normalize for vividness and memorability to prevent availability bias.",
        simplified_description: "Reduce influence of recent or memorable events in predictions",
        estimated_impact: ImpactLevel::Medium,
        implementation_difficulty: DifficultyLevel::Complex,
    },
    RecommendationTemplate {
        action_title: "Use frequency-based sampling",
        technical_description: "When retrieving examples, sample proportionally to true frequency rather than availability. Implement representative sampling over convenient sampling.",
        simplified_description: "Choose examples based on how common they actually are, not how easy to recall",
        estimated_impact: ImpactLevel::High,
        implementation_difficulty: DifficultyLevel::Moderate,
    },
];

pub fn templates_for(kind: HeuristicType) -> &'static [RecommendationTemplate] {
    match kind {
        HeuristicType::Anchoring => &ANCHORING_TEMPLATES,
        HeuristicType::LossAversion => &LOSS_AVERSION_TEMPLATES,
        HeuristicType::SunkCost => &SUNK_COST_TEMPLATES,
        HeuristicType::ConfirmationBias => &CONFIRMATION_BIAS_TEMPLATES,
        HeuristicType::AvailabilityHeuristic => &AVAILABILITY_HEURISTIC_TEMPLATES,
    }
}

/// Expands the template catalog for each finding and returns the
/// highest-priority candidates, capped at the configured maximum.
#[derive(Debug, Clone)]
pub struct RecommendationGenerator {
    max_results: usize,
}

impl Default for RecommendationGenerator {
    fn default() -> Self {
        Self::new(RecommendationConfig::default())
    }
}

impl RecommendationGenerator {
    pub fn new(config: RecommendationConfig) -> Self {
        Self {
            max_results: config.max_results,
        }
    }

    /// Both description fields are always populated; which one a caller
    /// surfaces is selected later via [`biaslens_core::DescriptionMode`].
    pub fn generate(&self, findings: &[Finding]) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();

        for finding in findings {
            for template in templates_for(finding.heuristic_type) {
                let priority = calculate_priority(
                    finding.severity_score,
                    finding.confidence_level,
                    template.estimated_impact,
                );
                recommendations.push(Recommendation {
                    heuristic_type: finding.heuristic_type,
                    priority,
                    action_title: template.action_title.to_owned(),
                    technical_description: template.technical_description.to_owned(),
                    simplified_description: template.simplified_description.to_owned(),
                    estimated_impact: template.estimated_impact,
                    implementation_difficulty: template.implementation_difficulty,
                });
            }
        }

        // Stable sort keeps generation order (finding order, then template
        // order) for equal priorities.
        recommendations.sort_by(|a, b| b.priority.cmp(&a.priority));
        recommendations.truncate(self.max_results);
        recommendations
    }
}
