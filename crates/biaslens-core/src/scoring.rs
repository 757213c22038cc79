use crate::{Baseline, Finding, HeuristicType, ImpactLevel, SeverityLevel, ZoneStatus};

/// Severity band boundaries for one heuristic type, ascending. Units differ
/// per type: percentages for most, a loss/gain sensitivity ratio (>= 1.0) for
/// loss aversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeverityThresholds {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
    pub critical: f64,
}

/// Band boundaries per heuristic type. Tables are strictly ascending, so the
/// band-width denominators in `calculate_severity` are never zero.
pub fn severity_thresholds(kind: HeuristicType) -> SeverityThresholds {
    match kind {
        HeuristicType::Anchoring => SeverityThresholds {
            low: 10.0,
            medium: 20.0,
            high: 40.0,
            critical: 50.0,
        },
        HeuristicType::LossAversion => SeverityThresholds {
            low: 1.3,
            medium: 1.8,
            high: 2.5,
            critical: 3.0,
        },
        HeuristicType::SunkCost => SeverityThresholds {
            low: 30.0,
            medium: 50.0,
            high: 70.0,
            critical: 80.0,
        },
        HeuristicType::ConfirmationBias => SeverityThresholds {
            low: 35.0,
            medium: 50.0,
            high: 65.0,
            critical: 75.0,
        },
        HeuristicType::AvailabilityHeuristic => SeverityThresholds {
            low: 20.0,
            medium: 35.0,
            high: 50.0,
            critical: 60.0,
        },
    }
}

/// Map a raw detection metric onto a 0-100 score and qualitative level.
///
/// Four piecewise-linear bands anchored at 0/25/50/75, evaluated
/// critical-first with `>=` comparisons so a value sitting exactly on a
/// boundary resolves to the higher band. Scores past the critical band clamp
/// to 100.
pub fn calculate_severity(raw_metric: f64, kind: HeuristicType) -> (f64, SeverityLevel) {
    let thresholds = severity_thresholds(kind);

    let (score, level) = if raw_metric >= thresholds.critical {
        (
            75.0 + (raw_metric - thresholds.critical) / 2.0,
            SeverityLevel::Critical,
        )
    } else if raw_metric >= thresholds.high {
        (
            50.0 + (raw_metric - thresholds.high) / (thresholds.critical - thresholds.high) * 25.0,
            SeverityLevel::High,
        )
    } else if raw_metric >= thresholds.medium {
        (
            25.0 + (raw_metric - thresholds.medium) / (thresholds.high - thresholds.medium) * 25.0,
            SeverityLevel::Medium,
        )
    } else {
        (raw_metric / thresholds.medium * 25.0, SeverityLevel::Low)
    };

    (score.min(100.0), level)
}

/// Confidence in a detection result, from detection proportion and sample
/// size, capped at 0.99.
///
/// The `1 - 1/sqrt(iterations)` factor deliberately down-weights small
/// samples: even a 100% detection proportion over few trials stays well
/// below the cap.
pub fn calculate_confidence(detection_count: u32, total_iterations: u32) -> f64 {
    if total_iterations == 0 {
        return 0.0;
    }

    let proportion = f64::from(detection_count) / f64::from(total_iterations);
    let confidence = proportion * (1.0 - 1.0 / f64::from(total_iterations).sqrt());
    confidence.min(0.99)
}

/// Confidence-weighted average of severity scores, rounded to 2 decimals.
/// Empty input and zero total weight both resolve to 0.0.
pub fn aggregate_score(findings: &[Finding]) -> f64 {
    if findings.is_empty() {
        return 0.0;
    }

    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    for finding in findings {
        weighted_sum += finding.severity_score * finding.confidence_level;
        total_weight += finding.confidence_level;
    }

    if total_weight == 0.0 {
        return 0.0;
    }

    round2(weighted_sum / total_weight)
}

/// Classify a score against baseline zone thresholds. Both boundaries are
/// inclusive.
pub fn calculate_zone(score: f64, baseline: &Baseline) -> ZoneStatus {
    if score <= baseline.green_zone_max {
        ZoneStatus::Green
    } else if score <= baseline.yellow_zone_max {
        ZoneStatus::Yellow
    } else {
        ZoneStatus::Red
    }
}

/// Derive zone thresholds from historical scores: population mean/std-dev,
/// green at mean + 0.5 sigma, yellow at mean + 1.5 sigma. Empty history
/// yields the fixed default baseline.
pub fn calculate_baseline(historical_scores: &[f64]) -> Baseline {
    if historical_scores.is_empty() {
        return Baseline::default();
    }

    let count = historical_scores.len() as f64;
    let mean = historical_scores.iter().sum::<f64>() / count;
    let variance = historical_scores
        .iter()
        .map(|score| (score - mean).powi(2))
        .sum::<f64>()
        / count;
    let std_dev = variance.sqrt();

    Baseline {
        mean,
        std_dev,
        green_zone_max: mean + 0.5 * std_dev,
        yellow_zone_max: mean + 1.5 * std_dev,
        sample_size: historical_scores.len() as u32,
    }
}

/// Recommendation priority on a 1-10 scale:
/// `severity*0.6 + confidence*30 + impact_weight*0.1`, rescaled.
pub fn calculate_priority(
    severity_score: f64,
    confidence_level: f64,
    impact: ImpactLevel,
) -> u8 {
    let raw = severity_score * 0.6 + confidence_level * 30.0 + impact.priority_weight() * 0.1;
    let normalized = (raw / 100.0 * 9.0) as i64 + 1;
    normalized.clamp(1, 10) as u8
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::{
        aggregate_score, calculate_baseline, calculate_confidence, calculate_priority,
        calculate_severity, calculate_zone, severity_thresholds,
    };
    use crate::{Baseline, Finding, HeuristicType, ImpactLevel, SeverityLevel, ZoneStatus};

    fn finding(severity_score: f64, confidence_level: f64) -> Finding {
        Finding {
            heuristic_type: HeuristicType::Anchoring,
            detection_count: 10,
            confidence_level,
            severity_score,
            severity: SeverityLevel::Medium,
            example_instances: Vec::new(),
            pattern_description: "test".to_owned(),
        }
    }

    #[test]
    fn severity_interpolates_inside_critical_band() {
        let (score, level) = calculate_severity(55.0, HeuristicType::Anchoring);
        assert_eq!(level, SeverityLevel::Critical);
        assert!((score - 77.5).abs() < 1e-9);
    }

    #[test]
    fn severity_boundary_value_resolves_to_higher_band() {
        let (score, level) = calculate_severity(40.0, HeuristicType::Anchoring);
        assert_eq!(level, SeverityLevel::High);
        assert!((score - 50.0).abs() < 1e-9);

        let (score, level) = calculate_severity(20.0, HeuristicType::Anchoring);
        assert_eq!(level, SeverityLevel::Medium);
        assert!((score - 25.0).abs() < 1e-9);
    }

    #[test]
    fn severity_low_band_scales_against_medium_threshold() {
        let (score, level) = calculate_severity(10.0, HeuristicType::Anchoring);
        assert_eq!(level, SeverityLevel::Low);
        assert!((score - 12.5).abs() < 1e-9);
    }

    #[test]
    fn severity_clamps_far_past_critical() {
        let (score, level) = calculate_severity(500.0, HeuristicType::Anchoring);
        assert_eq!(level, SeverityLevel::Critical);
        assert_eq!(score, 100.0);
    }

    #[test]
    fn severity_at_or_above_critical_stays_in_upper_quartile() {
        for kind in HeuristicType::ALL {
            let thresholds = severity_thresholds(kind);
            for offset in [0.0, 0.5, 5.0, 1000.0] {
                let (score, level) = calculate_severity(thresholds.critical + offset, kind);
                assert_eq!(level, SeverityLevel::Critical);
                assert!((75.0..=100.0).contains(&score));
            }
        }
    }

    #[test]
    fn severity_uses_ratio_scale_for_loss_aversion() {
        let (score, level) = calculate_severity(3.0, HeuristicType::LossAversion);
        assert_eq!(level, SeverityLevel::Critical);
        assert!((score - 75.0).abs() < 1e-9);

        let (_, level) = calculate_severity(1.0, HeuristicType::LossAversion);
        assert_eq!(level, SeverityLevel::Low);
    }

    #[test]
    fn threshold_tables_are_strictly_ascending() {
        for kind in HeuristicType::ALL {
            let t = severity_thresholds(kind);
            assert!(t.low < t.medium && t.medium < t.high && t.high < t.critical);
        }
    }

    #[test]
    fn confidence_matches_documented_scenario() {
        let confidence = calculate_confidence(30, 100);
        assert!((confidence - 0.27).abs() < 1e-12);
    }

    #[test]
    fn confidence_handles_degenerate_inputs() {
        assert_eq!(calculate_confidence(5, 0), 0.0);
        assert_eq!(calculate_confidence(0, 50), 0.0);
    }

    #[test]
    fn confidence_stays_within_bounds_and_penalizes_small_samples() {
        for iterations in [1u32, 2, 10, 100, 1000, 100_000] {
            let confidence = calculate_confidence(iterations, iterations);
            assert!((0.0..=0.99).contains(&confidence));
        }
        // Full detection over 4 trials is still heavily discounted.
        assert!((calculate_confidence(4, 4) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn aggregate_of_empty_findings_is_zero() {
        assert_eq!(aggregate_score(&[]), 0.0);
    }

    #[test]
    fn aggregate_with_zero_total_weight_is_zero() {
        let findings = vec![finding(80.0, 0.0), finding(60.0, 0.0)];
        assert_eq!(aggregate_score(&findings), 0.0);
    }

    #[test]
    fn aggregate_weights_by_confidence() {
        let findings = vec![finding(80.0, 0.5), finding(60.0, 0.25), finding(40.0, 0.25)];
        assert_eq!(aggregate_score(&findings), 65.0);
    }

    #[test]
    fn aggregate_is_order_independent() {
        let mut findings = vec![finding(80.0, 0.5), finding(60.0, 0.25), finding(40.0, 0.25)];
        let forward = aggregate_score(&findings);
        findings.reverse();
        assert_eq!(aggregate_score(&findings), forward);
    }

    #[test]
    fn zone_boundaries_are_inclusive() {
        let baseline = Baseline::default();
        assert_eq!(calculate_zone(80.0, &baseline), ZoneStatus::Green);
        assert_eq!(calculate_zone(80.01, &baseline), ZoneStatus::Yellow);
        assert_eq!(calculate_zone(90.0, &baseline), ZoneStatus::Yellow);
        assert_eq!(calculate_zone(90.01, &baseline), ZoneStatus::Red);
    }

    #[test]
    fn zone_is_monotonic_in_score() {
        let baseline = Baseline::default();
        let mut previous = ZoneStatus::Green;
        for step in 0..=200 {
            let zone = calculate_zone(f64::from(step) * 0.5, &baseline);
            assert!(zone >= previous);
            previous = zone;
        }
    }

    #[test]
    fn baseline_of_empty_history_is_the_default() {
        assert_eq!(calculate_baseline(&[]), Baseline::default());
    }

    #[test]
    fn baseline_uses_population_statistics() {
        let baseline = calculate_baseline(&[10.0, 20.0]);
        assert!((baseline.mean - 15.0).abs() < 1e-9);
        assert!((baseline.std_dev - 5.0).abs() < 1e-9);
        assert!((baseline.green_zone_max - 17.5).abs() < 1e-9);
        assert!((baseline.yellow_zone_max - 22.5).abs() < 1e-9);
        assert_eq!(baseline.sample_size, 2);
    }

    #[test]
    fn baseline_keeps_green_below_yellow_for_varied_samples() {
        let baseline = calculate_baseline(&[70.0, 80.0, 90.0]);
        assert!(baseline.green_zone_max < baseline.yellow_zone_max);
    }

    #[test]
    fn priority_formula_scales_to_ten() {
        assert_eq!(calculate_priority(100.0, 0.99, ImpactLevel::High), 9);
        assert_eq!(calculate_priority(0.0, 0.0, ImpactLevel::Low), 1);
        // 77.5*0.6 + 0.27*30 + 1.5 = 56.1 -> floor(5.049) + 1 = 6
        assert_eq!(calculate_priority(77.5, 0.27, ImpactLevel::High), 6);
    }

    #[test]
    fn priority_stays_in_one_to_ten() {
        for impact in [ImpactLevel::Low, ImpactLevel::Medium, ImpactLevel::High] {
            for score in [0.0, 25.0, 50.0, 75.0, 100.0] {
                for confidence in [0.0, 0.5, 0.99] {
                    let priority = calculate_priority(score, confidence, impact);
                    assert!((1..=10).contains(&priority));
                }
            }
        }
    }
}
