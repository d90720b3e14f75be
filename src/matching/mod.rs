//! Query matching over loaded menu entries.

pub mod enablement;
pub mod engine;
pub mod normalize;

pub use enablement::EnablementCache;
pub use engine::{MatchEngine, MatchKind, QueryMatch};
