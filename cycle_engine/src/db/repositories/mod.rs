//! Repository implementations module.
//!
//! This module contains the implementations of the `KeyValueRepository` trait:
//! - `local`: In-memory implementation for unit testing and local development
//! - `file`: JSON-file implementation for single-process persistence

pub mod file;
pub mod local;

pub use file::FileRepository;
pub use local::LocalRepository;
