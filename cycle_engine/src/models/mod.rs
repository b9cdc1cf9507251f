//! Domain models for cycle history and phase estimates.
//!
//! - [`record`]: historical entries ([`CycleRecord`]) and symptoms
//! - [`phase`]: estimator output ([`PhaseDistribution`], [`PhaseProbability`])

pub mod phase;
pub mod record;

pub use phase::*;
pub use record::*;
