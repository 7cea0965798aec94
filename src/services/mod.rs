//! Service layer
//!
//! `Reflector` ties discovery to the snapshot cache and is the only type the
//! HTTP layer talks to.

pub mod cache;
pub mod reflector;

pub use cache::SnapshotCache;
pub use reflector::{HealthError, RefreshError, Reflector};
