//! Retail domain modules wired onto the generic scoring engine.

pub mod churn;
pub mod crowd;
pub mod freshflow;
pub mod staffing;
pub mod suppliers;
