//! # Settlement Core
//!
//! Shared-expense tracking for groups: members log expenses paid by one
//! person and split among several, and the settlement engine works out who
//! owes whom.
//!
//! ## Features
//!
//! - **Balance aggregation**: equal and custom splits folded into a net balance per member
//! - **Debt minimization**: greedy largest-creditor/largest-debtor matching into pairwise transfers
//! - **Summaries**: per-member totals owed and to receive, plus group totals
//! - **Settlement ledger**: record confirmed payments and page through history
//! - **Storage abstraction**: backend-agnostic design with trait-based storage and a fallback composer
//!
//! ## Quick Start
//!
//! ```rust
//! use settlement_core::{Member, SettlementEngine, Split, Expense};
//! use bigdecimal::BigDecimal;
//!
//! let members = vec![Member::new("a", "Ana"), Member::new("b", "Ben")];
//! let dinner = Expense::new(
//!     "e1".to_string(),
//!     "g1".to_string(),
//!     "Dinner".to_string(),
//!     BigDecimal::from(80),
//!     "a".to_string(),
//!     Split::Equal { participants: vec!["a".into(), "b".into()] },
//! );
//!
//! let report = SettlementEngine::new().settle(&members, &[dinner]).unwrap();
//! assert_eq!(report.settlements.len(), 1);
//! assert_eq!(report.settlements[0].from, "b");
//! ```

pub mod config;
pub mod engine;
pub mod tracker;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use engine::{
    compute_balances, compute_settlements, BalanceAggregator, DebtMinimizer, SettlementEngine,
};
pub use tracker::*;
pub use traits::*;
pub use types::*;

// Re-export expense patterns for convenience
pub use tracker::expense::patterns;
