//! Tracker module containing group management, expense recording and the
//! orchestrator that feeds stored snapshots to the settlement engine

pub mod core;
pub mod expense;
pub mod group;

pub use self::core::*;
pub use expense::*;
pub use group::*;
