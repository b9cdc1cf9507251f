//! Turns refined raw scores into a probability distribution.

use crate::models::PhaseDistribution;

use super::base_curve::PhaseScores;

/// Divides every score by the total.
///
/// A total of exactly zero yields [`PhaseDistribution::uniform`].
pub fn normalize(scores: &PhaseScores) -> PhaseDistribution {
    let total = scores.sum();
    if total == 0.0 {
        return PhaseDistribution::uniform();
    }
    PhaseDistribution::from_probabilities(scores.to_array().map(|score| score / total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Confidence, Phase};

    #[test]
    fn test_normalize_sums_to_one() {
        let scores = PhaseScores {
            menstrual: 0.6,
            follicular: 0.2,
            ovulation: 0.0,
            luteal: 0.0,
        };
        let dist = normalize(&scores);
        assert!((dist.total() - 1.0).abs() < 1e-12);
        assert!((dist.probability(Phase::Menstrual) - 0.75).abs() < 1e-12);
        assert_eq!(dist.get(Phase::Menstrual).confidence, Confidence::High);
        assert_eq!(dist.get(Phase::Follicular).confidence, Confidence::Low);
        assert_eq!(dist.get(Phase::Ovulation).confidence_interval, (0.0, 0.15));
    }

    #[test]
    fn test_zero_total_falls_back_to_uniform() {
        let dist = normalize(&PhaseScores::default());
        assert!(dist.is_uniform());
    }
}
