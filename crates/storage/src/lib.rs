//! Durable storage for warnings and region boundaries.
//!
//! The [`WarningStore`] trait is the narrow seam the ingestion and query
//! sides share; [`WarningCatalog`] backs it with PostgreSQL, and
//! [`MemoryStore`] mirrors the semantics in memory for tests and
//! ephemeral runs.

pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::MemoryStore;
pub use postgres::{RegionRow, WarningCatalog};
pub use store::{UpsertOutcome, WarningStore};
