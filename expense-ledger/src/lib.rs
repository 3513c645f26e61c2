//! Expense Ledger
//!
//! Accounting core for shared expenses: the expense data model, write-path
//! validation, and the balance fold that turns a snapshot of expenses into
//! per-person net positions.
//!
//! # Architecture
//!
//! - **Stateless**: every computation works on a caller-supplied snapshot
//! - **Exact arithmetic**: all money is `Decimal`, never `f64`
//! - **Validate on write**: the balance fold assumes validated input
//!
//! # Invariants
//!
//! - Money conservation: Σ(balances) == 0 whenever every expense is fully allocated
//! - Deterministic: same expenses in the same order → same balance map, same key order
//!
//! # Example
//!
//! ```
//! use expense_ledger::{compute_balances, ExpenseRecord, ParticipantShare, PersonId, SplitType};
//! use rust_decimal::Decimal;
//!
//! let expense = ExpenseRecord::new("Dinner", Decimal::from(90), "A").with_participants(vec![
//!     ParticipantShare::new("B", SplitType::Units, Decimal::from(1)),
//!     ParticipantShare::new("C", SplitType::Units, Decimal::from(2)),
//! ]);
//!
//! let balances = compute_balances(&[expense]);
//! assert_eq!(balances.get(&PersonId::new("C")), Decimal::from(-60));
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod types;
pub mod validation;
pub mod balance;
pub mod update;
pub mod error;
pub mod config;

// Re-exports
pub use error::{Error, RejectionReason, Result};
pub use types::{BalanceMap, ExpenseRecord, ParticipantShare, PersonId, SplitType};
pub use validation::{
    parse_expense, parse_participants, validate_expense, validate_shares, MAX_AMOUNT, MAX_UNITS,
};
pub use balance::{compute_balances, people, BalanceEngine};
pub use update::ExpenseUpdate;
pub use config::{BalanceConfig, MixedSplitPolicy};
