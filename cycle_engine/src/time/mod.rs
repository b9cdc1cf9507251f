//! Calendar arithmetic for cycle histories.

pub mod cycle;

pub use cycle::{
    average_cycle_length, cycle_day, cycle_lengths, is_valid_cycle_length, last_period,
    normalize_cycle_day, period_starts, shift_days, valid_cycle_lengths, DEFAULT_CYCLE_LENGTH,
    MAX_VALID_CYCLE_DAYS, MIN_VALID_CYCLE_DAYS,
};
