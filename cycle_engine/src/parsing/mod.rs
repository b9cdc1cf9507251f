//! Parsers for cycle history documents.
//!
//! - [`json_parser`]: JSON history and symptom lists
//!
//! # Example
//!
//! ```no_run
//! use cycle_engine::parsing::json_parser::parse_history_json;
//! use std::path::Path;
//!
//! let records = parse_history_json(Path::new("history.json"))
//!     .expect("Failed to parse history");
//! ```

pub mod json_parser;


pub use json_parser::{
    history_to_json, parse_history_json, parse_history_json_str, parse_symptoms_json_str,
};
