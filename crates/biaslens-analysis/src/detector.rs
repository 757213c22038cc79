use biaslens_core::{Finding, HeuristicType, calculate_confidence, calculate_severity};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Simulation parameters for one heuristic type. Trial magnitudes are drawn
/// uniformly from `magnitude_low..magnitude_high`; a trial counts as a
/// detection when its magnitude exceeds `detection_threshold` (distinct from
/// the severity band thresholds).
#[derive(Debug, Clone, Copy, PartialEq)]
struct DetectionProfile {
    magnitude_low: f64,
    magnitude_high: f64,
    detection_threshold: f64,
    /// Average magnitude reported when no trial crosses the threshold. 1.0
    /// for loss aversion since its ratio scale starts there, 0 elsewhere.
    zero_detection_floor: f64,
}

fn detection_profile(kind: HeuristicType) -> DetectionProfile {
    match kind {
        HeuristicType::Anchoring => DetectionProfile {
            magnitude_low: 0.0,
            magnitude_high: 60.0,
            detection_threshold: 30.0,
            zero_detection_floor: 0.0,
        },
        HeuristicType::LossAversion => DetectionProfile {
            magnitude_low: 1.0,
            magnitude_high: 3.5,
            detection_threshold: 2.0,
            zero_detection_floor: 1.0,
        },
        HeuristicType::SunkCost => DetectionProfile {
            magnitude_low: 0.0,
            magnitude_high: 90.0,
            detection_threshold: 50.0,
            zero_detection_floor: 0.0,
        },
        HeuristicType::ConfirmationBias => DetectionProfile {
            magnitude_low: 0.0,
            magnitude_high: 85.0,
            detection_threshold: 60.0,
            zero_detection_floor: 0.0,
        },
        HeuristicType::AvailabilityHeuristic => DetectionProfile {
            magnitude_low: 0.0,
            magnitude_high: 70.0,
            detection_threshold: 40.0,
            zero_detection_floor: 0.0,
        },
    }
}

fn pattern_description(kind: HeuristicType, avg_magnitude: f64) -> String {
    match kind {
        HeuristicType::Anchoring => format!(
            "System over-weighted first piece of information by {avg_magnitude:.1}% on average"
        ),
        HeuristicType::LossAversion => format!(
            "System showed {avg_magnitude:.1}x stronger response to potential losses than equivalent gains"
        ),
        HeuristicType::SunkCost => format!(
            "Prior investment influenced {avg_magnitude:.1}% of continuation decisions"
        ),
        HeuristicType::ConfirmationBias => format!(
            "System dismissed {avg_magnitude:.1}% of contradictory evidence after initial position"
        ),
        HeuristicType::AvailabilityHeuristic => format!(
            "Recent examples biased probability estimates by {avg_magnitude:.1}%"
        ),
    }
}

/// Simulates heuristic bias detection with rule-based uniform draws. A stand-in
/// for integration with a real measurement harness; everything downstream of
/// the produced [`Finding`]s is independent of the simulation.
///
/// The generator is injected so runs are reproducible under a fixed seed.
#[derive(Debug)]
pub struct HeuristicDetector<R: Rng> {
    rng: R,
}

impl HeuristicDetector<StdRng> {
    /// Deterministic detector for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Production default, seeded from OS entropy.
    pub fn from_os_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> HeuristicDetector<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Run `iterations` trials for each requested heuristic type, producing
    /// one finding per type in request order.
    pub fn run_detection(&mut self, kinds: &[HeuristicType], iterations: u32) -> Vec<Finding> {
        kinds
            .iter()
            .map(|&kind| self.detect(kind, iterations))
            .collect()
    }

    /// String-boundary variant: unrecognized names are skipped, not rejected.
    /// Strict validation of the closed set belongs to the caller's input
    /// layer.
    pub fn run_detection_named(&mut self, names: &[String], iterations: u32) -> Vec<Finding> {
        let mut kinds = Vec::with_capacity(names.len());
        for name in names {
            match name.parse::<HeuristicType>() {
                Ok(kind) => kinds.push(kind),
                Err(_) => {
                    tracing::warn!(heuristic = name.as_str(), "skipping unknown heuristic type");
                }
            }
        }
        self.run_detection(&kinds, iterations)
    }

    fn detect(&mut self, kind: HeuristicType, iterations: u32) -> Finding {
        let profile = detection_profile(kind);

        let mut detections = 0u32;
        let mut magnitude_sum = 0.0;
        for _ in 0..iterations {
            let magnitude = self
                .rng
                .random_range(profile.magnitude_low..profile.magnitude_high);
            if magnitude > profile.detection_threshold {
                detections += 1;
                magnitude_sum += magnitude;
            }
        }

        // Severity reflects only the trials that crossed the threshold.
        let avg_magnitude = if detections > 0 {
            magnitude_sum / f64::from(detections)
        } else {
            profile.zero_detection_floor
        };

        let confidence_level = calculate_confidence(detections, iterations);
        let (severity_score, severity) = calculate_severity(avg_magnitude, kind);

        Finding {
            heuristic_type: kind,
            detection_count: detections,
            confidence_level,
            severity_score,
            severity,
            example_instances: self.example_instances(kind),
            pattern_description: pattern_description(kind, avg_magnitude),
        }
    }

    fn example_instances(&mut self, kind: HeuristicType) -> Vec<String> {
        match kind {
            HeuristicType::Anchoring => vec![
                format!(
                    "System over-weighted first piece of information by {}%",
                    self.rng.random_range(35..=55)
                ),
                format!(
                    "Initial anchor caused {}% response variance",
                    self.rng.random_range(30..=50)
                ),
                format!(
                    "Baseline shift of {}% detected from first value",
                    self.rng.random_range(25..=45)
                ),
            ],
            HeuristicType::LossAversion => vec![
                format!(
                    "System showed {:.1}x stronger response to potential losses than equivalent gains",
                    self.rng.random_range(2.0..3.0)
                ),
                format!(
                    "Loss scenario received {:.1}x weight compared to gain scenario",
                    self.rng.random_range(2.0..3.5)
                ),
                format!(
                    "Risk aversion bias factor: {:.2}",
                    self.rng.random_range(2.1..2.9)
                ),
            ],
            HeuristicType::SunkCost => vec![
                format!(
                    "Prior investment influenced {}% of continuation decisions",
                    self.rng.random_range(60..=80)
                ),
                format!(
                    "Sunk costs factored into {}% of evaluations despite irrelevance",
                    self.rng.random_range(55..=75)
                ),
                format!(
                    "Decision quality degraded by {}% when past investment present",
                    self.rng.random_range(40..=65)
                ),
            ],
            HeuristicType::ConfirmationBias => vec![
                format!(
                    "System dismissed {}% of contradictory evidence after initial position",
                    self.rng.random_range(60..=75)
                ),
                format!(
                    "Evidence matching initial hypothesis weighted {}x higher",
                    self.rng.random_range(2..=4)
                ),
                format!(
                    "Contradictory data ignored in {}% of cases",
                    self.rng.random_range(65..=80)
                ),
            ],
            HeuristicType::AvailabilityHeuristic => vec![
                format!(
                    "Recent examples biased probability estimates by {}%",
                    self.rng.random_range(40..=60)
                ),
                format!(
                    "Memorable cases caused {}% estimation error",
                    self.rng.random_range(45..=65)
                ),
                format!(
                    "Frequency judgment skewed by {}% due to vivid examples",
                    self.rng.random_range(35..=55)
                ),
            ],
        }
    }
}
