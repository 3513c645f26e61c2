//! Settlement Engine
//!
//! Turns a snapshot of shared expenses into who-owes-whom payments.
//!
//! # Architecture
//!
//! Two stages, evaluated in sequence:
//!
//! 1. **Balances**: fold expenses into net positions (`expense-ledger`)
//! 2. **Netting**: reduce positions to at most n - 1 payments
//!
//! Both stages are pure and synchronous. Nothing is cached between calls, so
//! the engine can be shared across threads.
//!
//! # Example
//!
//! ```
//! use settlement::{ExpenseRecord, SettlementEngine};
//! use rust_decimal::Decimal;
//!
//! let engine = SettlementEngine::default();
//! let expenses = vec![
//!     ExpenseRecord::new("Groceries", Decimal::from(90), "A"),
//!     ExpenseRecord::new("Fuel", Decimal::from(30), "B"),
//! ];
//!
//! let plan = engine.compute_settlements(&expenses);
//! for payment in &plan {
//!     println!("{} pays {} {}", payment.from, payment.to, payment.amount);
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod types;
pub mod netting;
pub mod error;
pub mod config;
pub mod engine;

// Re-exports
pub use error::{Error, Result};
pub use types::*;
pub use config::{Config, NettingConfig};
pub use engine::SettlementEngine;
pub use netting::NettingEngine;
pub use expense_ledger::{
    compute_balances, validate_shares, BalanceMap, ExpenseRecord, ParticipantShare, PersonId,
    RejectionReason, SplitType,
};

/// Payments that settle the expenses, with the default configuration
pub fn compute_settlements(expenses: &[ExpenseRecord]) -> SettlementPlan {
    SettlementEngine::default().compute_settlements(expenses)
}
