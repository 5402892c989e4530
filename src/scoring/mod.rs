//! Generic scoring primitives shared by every retail module.
//!
//! The domain modules under `crate::modules` only supply band tables, context
//! weights, and value extractors; everything that has an invariant worth
//! testing (boundary semantics, clamping, aggregation, proposal gating) lives
//! here.

pub mod bands;
pub mod context;
pub mod money;
pub mod proposal;
pub mod rollup;

pub use bands::{Band, BandTable, BandTableError, BoundDirection};
pub use context::{AdditiveModel, ScoreAdjustment};
pub use money::{Money, MoneyParseError};
pub use proposal::ActionProposal;
pub use rollup::{rollup, TierRollup};
