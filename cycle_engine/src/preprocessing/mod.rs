//! Pre-forecast checks on cycle history.

pub mod validator;

pub use validator::{validate_history, HistoryValidator, ValidationResult, ValidationStats};
