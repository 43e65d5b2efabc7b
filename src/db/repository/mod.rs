//! Repository abstraction for the survey response store.
//!
//! The trait in [`responses`] is the only seam between the analytics
//! services and a concrete backend; everything above it is backend-agnostic.

pub mod error;
pub mod responses;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use responses::{Projection, ResponseQuery, ResponseRepository, SortOrder};
