use std::time::{SystemTime, UNIX_EPOCH};

use biaslens_config::TrendConfig;
use biaslens_core::{Baseline, TrendPoint, calculate_zone};
use rand::Rng;

/// Fixed starting score the synthetic history ramps from.
const TREND_BASE_SCORE: f64 = 70.0;
/// Per-point uniform noise, drawn from [-amplitude, amplitude].
const TREND_NOISE_AMPLITUDE: f64 = 3.0;
const MILLIS_PER_DAY: i64 = 86_400_000;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DriftOutcome {
    pub drift_alert: bool,
    pub drift_message: Option<String>,
}

/// Longitudinal tracking over an evaluation's score history.
///
/// The history itself is synthesized: a linear ramp from a fixed base score
/// toward the current score plus noise. A placeholder for a real time-series
/// store; the drift check downstream only sees points and does not care.
#[derive(Debug, Clone)]
pub struct TrendAnalyzer {
    config: TrendConfig,
}

impl Default for TrendAnalyzer {
    fn default() -> Self {
        Self::new(TrendConfig::default())
    }
}

impl TrendAnalyzer {
    pub fn new(config: TrendConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrendConfig {
        &self.config
    }

    /// Generate one point per day, oldest first, from `history_days` ago
    /// through yesterday. Scores are clamped to [0, 100] and rounded to 2
    /// decimals; each point's zone comes from the supplied baseline.
    pub fn historical_trend<R: Rng>(
        &self,
        rng: &mut R,
        current_score: f64,
        baseline: &Baseline,
    ) -> Vec<TrendPoint> {
        let days = self.config.history_days;
        let now = now_millis();

        let mut points = Vec::with_capacity(days as usize);
        for days_ago in (1..=days).rev() {
            let progress = f64::from(days - days_ago) / f64::from(days);
            let mut score = TREND_BASE_SCORE + (current_score - TREND_BASE_SCORE) * progress;
            score += rng.random_range(-TREND_NOISE_AMPLITUDE..=TREND_NOISE_AMPLITUDE);
            let score = round2(score.clamp(0.0, 100.0));

            points.push(TrendPoint {
                timestamp: now - i64::from(days_ago) * MILLIS_PER_DAY,
                score,
                zone: calculate_zone(score, baseline),
            });
        }

        points
    }

    /// Compare the mean of the trailing window against the window before it.
    /// Needs two full windows of points; a flat-zero previous window cannot
    /// express relative change and resolves to no drift.
    pub fn detect_drift(&self, points: &[TrendPoint]) -> DriftOutcome {
        let window = self.config.drift_window_days as usize;
        if window == 0 || points.len() < window * 2 {
            return DriftOutcome::default();
        }

        let recent = &points[points.len() - window..];
        let previous = &points[points.len() - window * 2..points.len() - window];
        let recent_avg = mean_score(recent);
        let previous_avg = mean_score(previous);

        if previous_avg == 0.0 {
            return DriftOutcome::default();
        }

        let drift_percent = (recent_avg - previous_avg) / previous_avg * 100.0;
        if drift_percent.abs() > self.config.drift_threshold_percent {
            let direction = if drift_percent > 0.0 {
                "increasing"
            } else {
                "decreasing"
            };
            return DriftOutcome {
                drift_alert: true,
                drift_message: Some(format!(
                    "Bias metrics {direction} by {:.1}% over last {window} days",
                    drift_percent.abs()
                )),
            };
        }

        DriftOutcome::default()
    }
}

fn mean_score(points: &[TrendPoint]) -> f64 {
    points.iter().map(|point| point.score).sum::<f64>() / points.len() as f64
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use biaslens_config::TrendConfig;
    use biaslens_core::{Baseline, TrendPoint, ZoneStatus, calculate_zone};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::{MILLIS_PER_DAY, TrendAnalyzer, now_millis};

    fn point(score: f64) -> TrendPoint {
        TrendPoint {
            timestamp: 0,
            score,
            zone: ZoneStatus::Green,
        }
    }

    fn series(previous: f64, recent: f64) -> Vec<TrendPoint> {
        let mut points = vec![point(previous); 7];
        points.extend(vec![point(recent); 7]);
        points
    }

    #[test]
    fn trend_covers_the_window_oldest_first() {
        let analyzer = TrendAnalyzer::default();
        let mut rng = StdRng::seed_from_u64(9);
        let points = analyzer.historical_trend(&mut rng, 85.0, &Baseline::default());

        assert_eq!(points.len(), 30);
        for pair in points.windows(2) {
            assert_eq!(pair[1].timestamp - pair[0].timestamp, MILLIS_PER_DAY);
        }
        // Last point is yesterday, never today.
        assert!(points.last().expect("non-empty").timestamp <= now_millis() - MILLIS_PER_DAY);
    }

    #[test]
    fn trend_scores_stay_in_range_with_coherent_zones() {
        let analyzer = TrendAnalyzer::default();
        let baseline = Baseline::default();
        let mut rng = StdRng::seed_from_u64(21);
        for current_score in [0.0, 45.0, 99.5] {
            for trend_point in analyzer.historical_trend(&mut rng, current_score, &baseline) {
                assert!((0.0..=100.0).contains(&trend_point.score));
                assert_eq!(trend_point.zone, calculate_zone(trend_point.score, &baseline));
            }
        }
    }

    #[test]
    fn trend_ramps_from_base_toward_current_score() {
        let analyzer = TrendAnalyzer::default();
        let mut rng = StdRng::seed_from_u64(33);
        let points = analyzer.historical_trend(&mut rng, 100.0, &Baseline::default());
        // First point sits near the base score, last near the target, within
        // the noise band.
        assert!((points[0].score - 70.0).abs() <= 3.0 + 1e-9);
        assert!(points.last().expect("non-empty").score >= 90.0);
    }

    #[test]
    fn same_seed_reproduces_the_series() {
        let analyzer = TrendAnalyzer::default();
        let baseline = Baseline::default();
        let first = {
            let mut rng = StdRng::seed_from_u64(4);
            analyzer.historical_trend(&mut rng, 80.0, &baseline)
        };
        let second = {
            let mut rng = StdRng::seed_from_u64(4);
            analyzer.historical_trend(&mut rng, 80.0, &baseline)
        };
        let strip = |points: Vec<TrendPoint>| {
            points
                .into_iter()
                .map(|p| (p.score, p.zone))
                .collect::<Vec<_>>()
        };
        assert_eq!(strip(first), strip(second));
    }

    #[test]
    fn ten_percent_change_is_not_drift() {
        let outcome = TrendAnalyzer::default().detect_drift(&series(50.0, 55.0));
        assert!(!outcome.drift_alert);
        assert!(outcome.drift_message.is_none());
    }

    #[test]
    fn twelve_percent_increase_flags_drift() {
        let outcome = TrendAnalyzer::default().detect_drift(&series(50.0, 56.0));
        assert!(outcome.drift_alert);
        assert_eq!(
            outcome.drift_message.as_deref(),
            Some("Bias metrics increasing by 12.0% over last 7 days")
        );
    }

    #[test]
    fn falling_scores_flag_decreasing_drift() {
        let outcome = TrendAnalyzer::default().detect_drift(&series(50.0, 40.0));
        assert!(outcome.drift_alert);
        assert_eq!(
            outcome.drift_message.as_deref(),
            Some("Bias metrics decreasing by 20.0% over last 7 days")
        );
    }

    #[test]
    fn short_series_never_drifts() {
        let mut points = vec![point(50.0); 13];
        let outcome = TrendAnalyzer::default().detect_drift(&points);
        assert!(!outcome.drift_alert);

        points.clear();
        assert!(!TrendAnalyzer::default().detect_drift(&points).drift_alert);
    }

    #[test]
    fn zero_previous_window_resolves_to_no_drift() {
        let outcome = TrendAnalyzer::default().detect_drift(&series(0.0, 10.0));
        assert!(!outcome.drift_alert);
        assert!(outcome.drift_message.is_none());
    }

    #[test]
    fn drift_window_follows_config() {
        let analyzer = TrendAnalyzer::new(TrendConfig {
            drift_window_days: 3,
            ..TrendConfig::default()
        });
        let mut points = vec![point(50.0); 3];
        points.extend(vec![point(60.0); 3]);
        let outcome = analyzer.detect_drift(&points);
        assert!(outcome.drift_alert);
        assert_eq!(
            outcome.drift_message.as_deref(),
            Some("Bias metrics increasing by 20.0% over last 3 days")
        );
    }
}
