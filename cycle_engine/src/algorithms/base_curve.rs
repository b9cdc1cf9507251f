//! Piecewise-linear phase scores as a function of cycle day.
//!
//! The scores are unnormalized. Evidence refinement adds to them and a single
//! normalization pass turns them into probabilities afterwards.

use serde::{Deserialize, Serialize};

use crate::models::Phase;
use crate::time::normalize_cycle_day;

/// Upper bound for a raw score after an evidence increment.
pub const MAX_RAW_SCORE: f64 = 1.0;

/// Unnormalized per-phase scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseScores {
    pub menstrual: f64,
    pub follicular: f64,
    pub ovulation: f64,
    pub luteal: f64,
}

impl PhaseScores {
    pub fn get(&self, phase: Phase) -> f64 {
        match phase {
            Phase::Menstrual => self.menstrual,
            Phase::Follicular => self.follicular,
            Phase::Ovulation => self.ovulation,
            Phase::Luteal => self.luteal,
        }
    }

    fn slot(&mut self, phase: Phase) -> &mut f64 {
        match phase {
            Phase::Menstrual => &mut self.menstrual,
            Phase::Follicular => &mut self.follicular,
            Phase::Ovulation => &mut self.ovulation,
            Phase::Luteal => &mut self.luteal,
        }
    }

    /// Adds `increment` to one phase and caps the result at [`MAX_RAW_SCORE`].
    pub fn boost(&mut self, phase: Phase, increment: f64) {
        let slot = self.slot(phase);
        *slot = (*slot + increment).min(MAX_RAW_SCORE);
    }

    pub fn sum(&self) -> f64 {
        self.menstrual + self.follicular + self.ovulation + self.luteal
    }

    /// Scores in [`Phase::ALL`] order.
    pub fn to_array(&self) -> [f64; 4] {
        [self.menstrual, self.follicular, self.ovulation, self.luteal]
    }
}

/// Raw scores for `cycle_day` in a cycle of `cycle_length` days.
///
/// The day is first folded into the cycle with
/// [`normalize_cycle_day`](crate::time::normalize_cycle_day).
pub fn base_probabilities(cycle_day: i64, cycle_length: i64) -> PhaseScores {
    scores_for_day(normalize_cycle_day(cycle_day, cycle_length))
}

/// Raw scores for an already-normalized cycle day `d`.
pub fn scores_for_day(d: i64) -> PhaseScores {
    let day = d as f64;

    let menstrual = if d <= 5 {
        (1.0 - (day - 1.0) * 0.2).max(0.0)
    } else {
        0.0
    };

    let follicular = if d > 5 && d <= 13 {
        0.8 - (day - 6.0) * 0.1
    } else if d <= 5 {
        0.2
    } else {
        0.0
    };

    let ovulation = if (13..=15).contains(&d) {
        0.9 - (day - 14.0).abs() * 0.3
    } else {
        0.0
    };

    let luteal = if d > 15 {
        0.9 - (day - 16.0) * 0.05
    } else {
        0.0
    };

    PhaseScores {
        menstrual,
        follicular,
        ovulation,
        luteal,
    }
}
