//! Estimator output: per-phase probabilities with confidence labels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Half-width of the heuristic band placed around every probability.
pub const CONFIDENCE_HALF_WIDTH: f64 = 0.15;

/// Probability at or above which a phase is reported with high confidence.
pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Probability at or above which a phase is reported with medium confidence.
pub const MEDIUM_CONFIDENCE_THRESHOLD: f64 = 0.4;

/// Probability assigned to every phase when there is nothing to infer from.
pub const UNIFORM_PROBABILITY: f64 = 0.25;

/// The four mutually exclusive cycle phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Menstrual,
    Follicular,
    Ovulation,
    Luteal,
}

impl Phase {
    /// All phases in reporting order.
    pub const ALL: [Phase; 4] = [
        Phase::Menstrual,
        Phase::Follicular,
        Phase::Ovulation,
        Phase::Luteal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Menstrual => "menstrual",
            Phase::Follicular => "follicular",
            Phase::Ovulation => "ovulation",
            Phase::Luteal => "luteal",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative confidence derived from a probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Maps a probability onto a label.
    ///
    /// # Examples
    ///
    /// ```
    /// use cycle_engine::models::Confidence;
    ///
    /// assert_eq!(Confidence::from_probability(0.7), Confidence::High);
    /// assert_eq!(Confidence::from_probability(0.4), Confidence::Medium);
    /// assert_eq!(Confidence::from_probability(0.39), Confidence::Low);
    /// ```
    pub fn from_probability(probability: f64) -> Self {
        if probability >= HIGH_CONFIDENCE_THRESHOLD {
            Confidence::High
        } else if probability >= MEDIUM_CONFIDENCE_THRESHOLD {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        };
        f.write_str(label)
    }
}

/// Probability of one phase for one query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseProbability {
    pub phase: Phase,
    pub probability: f64,
    pub confidence: Confidence,
    /// `(lower, upper)`, both within `[0, 1]`.
    pub confidence_interval: (f64, f64),
}

impl PhaseProbability {
    /// Attaches the confidence label and the clamped ±0.15 band to `probability`.
    pub fn from_probability(phase: Phase, probability: f64) -> Self {
        let lower = (probability - CONFIDENCE_HALF_WIDTH).max(0.0);
        let upper = (probability + CONFIDENCE_HALF_WIDTH).min(1.0);
        Self {
            phase,
            probability,
            confidence: Confidence::from_probability(probability),
            confidence_interval: (lower, upper),
        }
    }

    /// The fallback entry used when no usable history exists.
    pub fn uniform(phase: Phase) -> Self {
        Self {
            phase,
            probability: UNIFORM_PROBABILITY,
            confidence: Confidence::Low,
            confidence_interval: (0.0, 0.5),
        }
    }
}

/// The four phase probabilities returned for a single target date.
///
/// Serialized as a JSON list in [`Phase::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhaseDistribution {
    phases: [PhaseProbability; 4],
}

impl PhaseDistribution {
    /// Builds a distribution from probabilities given in [`Phase::ALL`] order.
    pub fn from_probabilities(probabilities: [f64; 4]) -> Self {
        let phases = Phase::ALL.map(|phase| {
            PhaseProbability::from_probability(phase, probabilities[phase.index()])
        });
        Self { phases }
    }

    /// Maximally uncertain distribution: 0.25 everywhere, low confidence, `[0, 0.5]`.
    pub fn uniform() -> Self {
        Self {
            phases: Phase::ALL.map(PhaseProbability::uniform),
        }
    }

    pub fn get(&self, phase: Phase) -> &PhaseProbability {
        &self.phases[phase.index()]
    }

    pub fn probability(&self, phase: Phase) -> f64 {
        self.get(phase).probability
    }

    pub fn iter(&self) -> impl Iterator<Item = &PhaseProbability> {
        self.phases.iter()
    }

    /// Sum of the four probabilities.
    pub fn total(&self) -> f64 {
        self.phases.iter().map(|p| p.probability).sum()
    }

    /// The phase with the highest probability; ties go to the earlier phase.
    pub fn most_likely(&self) -> &PhaseProbability {
        let mut best = &self.phases[0];
        for candidate in &self.phases[1..] {
            if candidate.probability > best.probability {
                best = candidate;
            }
        }
        best
    }

    pub fn is_uniform(&self) -> bool {
        *self == Self::uniform()
    }

    pub fn into_vec(self) -> Vec<PhaseProbability> {
        self.phases.to_vec()
    }
}

impl<'a> IntoIterator for &'a PhaseDistribution {
    type Item = &'a PhaseProbability;
    type IntoIter = std::slice::Iter<'a, PhaseProbability>;

    fn into_iter(self) -> Self::IntoIter {
        self.phases.iter()
    }
}
