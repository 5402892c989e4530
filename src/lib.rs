//! Rule-based operational scoring engine for retail store automation.
//!
//! The engine classifies domain records (expiring batches, inactive
//! customers, supplier delivery history, roster context) into discrete tiers,
//! rolls the classified sets up into decision metrics, and computes action
//! proposals that an external collaborator applies after confirmation. All
//! persistence, auth, and rendering live outside this crate.

pub mod config;
pub mod error;
pub mod modules;
pub mod scoring;
pub mod telemetry;
