//! Repository trait definitions for cycle data storage.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`store`]: The namespaced key-value trait ([`KeyValueRepository`])
//!
//! Services take the trait as a generic bound or as `Arc<dyn KeyValueRepository>`:
//!
//! ```ignore
//! async fn my_service<R: KeyValueRepository + ?Sized>(repo: &R) -> RepositoryResult<()> {
//!     repo.set(Namespace::NonSensitive, "last_opened", "2024-01-01").await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod store;

pub use error::{RepositoryError, RepositoryResult};
pub use store::{KeyValueRepository, Namespace};
