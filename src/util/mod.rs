//! Utility types and helpers shared across the runtime.

pub mod cache_padded;
pub mod ids;
pub mod serde_helpers;

pub use cache_padded::CachePadded;
pub use ids::ActorId;
pub use serde_helpers::duration_serde;
