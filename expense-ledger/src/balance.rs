//! Balance engine
//!
//! Folds a snapshot of expenses into per-person net positions.
//!
//! # Algorithm
//!
//! 1. Derive the set of everyone mentioned (payers and participants)
//! 2. For each expense in input order:
//!    - credit the payer with the full amount
//!    - debit each participant their share, or
//!    - with no participants, debit everyone an equal part
//!
//! # Example
//!
//! ```text
//! Expenses:
//!   A paid 90, split 1:2 by units between B and C
//!   B paid 30, no participants (everyone: A, B, C)
//!
//! Balances:
//!   A: +90 - 10 = +80
//!   B: -30 + 30 - 10 = -10
//!   C: -60 - 10 = -70
//! ```

use crate::{
    config::{BalanceConfig, MixedSplitPolicy},
    types::{BalanceMap, ExpenseRecord, PersonId, SplitType},
};
use indexmap::IndexSet;
use rust_decimal::Decimal;

/// Everyone mentioned in the expenses, in first-seen order
///
/// Payer first, then participants, expense by expense.
pub fn people(expenses: &[ExpenseRecord]) -> Vec<PersonId> {
    let mut everyone: IndexSet<&PersonId> = IndexSet::new();

    for expense in expenses {
        everyone.insert(&expense.paid_by);
        for participant in &expense.participants {
            everyone.insert(&participant.name);
        }
    }

    everyone.into_iter().cloned().collect()
}

/// Compute balances with the default configuration
pub fn compute_balances(expenses: &[ExpenseRecord]) -> BalanceMap {
    BalanceEngine::new(&BalanceConfig::default()).compute_balances(expenses)
}

/// Balance engine
#[derive(Debug, Clone)]
pub struct BalanceEngine {
    /// Zero threshold used for diagnostics
    epsilon: Decimal,

    /// Units pricing in mixed expenses
    policy: MixedSplitPolicy,
}

impl BalanceEngine {
    /// Create new balance engine
    pub fn new(config: &BalanceConfig) -> Self {
        Self {
            epsilon: config.epsilon,
            policy: config.mixed_split_policy,
        }
    }

    /// Fold expenses into a balance map
    ///
    /// Input must already have passed [`crate::validate_expense`]. An empty
    /// slice yields an empty map.
    pub fn compute_balances(&self, expenses: &[ExpenseRecord]) -> BalanceMap {
        let everyone = people(expenses);
        let mut balances = BalanceMap::new();

        for expense in expenses {
            self.apply_expense(&mut balances, expense, &everyone);
        }

        let total = balances.total();
        if total.abs() >= self.epsilon {
            // Legitimate when an expense is only partly allocated
            tracing::debug!(%total, "Balances do not sum to zero");
        }

        tracing::debug!(
            expenses = expenses.len(),
            people = balances.len(),
            "Balances computed"
        );

        balances
    }

    /// Amount each participant owes for one expense, in participant order
    ///
    /// Empty when the expense has no participants (equal split applies).
    pub fn share_amounts<'a>(&self, expense: &'a ExpenseRecord) -> Vec<(&'a PersonId, Decimal)> {
        let amount = expense.amount;
        let units_total = expense.share_total(SplitType::Units);
        let units_pool = self.units_pool(expense);

        expense
            .participants
            .iter()
            .map(|participant| {
                let owed = match participant.split_type {
                    SplitType::Percentage => amount * participant.share / Decimal::ONE_HUNDRED,
                    SplitType::Exact => participant.share,
                    SplitType::Units => (units_pool * participant.share)
                        .checked_div(units_total)
                        .unwrap_or(Decimal::ZERO),
                };
                (&participant.name, owed)
            })
            .collect()
    }

    /// Amount shared out among Units participants
    fn units_pool(&self, expense: &ExpenseRecord) -> Decimal {
        match self.policy {
            MixedSplitPolicy::Independent => expense.amount,
            MixedSplitPolicy::RemainderToUnits => {
                let exact = expense.share_total(SplitType::Exact);
                let percentage =
                    expense.amount * expense.share_total(SplitType::Percentage) / Decimal::ONE_HUNDRED;
                let remainder = expense.amount - exact - percentage;

                if remainder < Decimal::ZERO {
                    tracing::warn!(
                        description = %expense.description,
                        %remainder,
                        "Exact and percentage shares exceed amount, units owe nothing"
                    );
                    Decimal::ZERO
                } else {
                    remainder
                }
            }
        }
    }

    fn apply_expense(&self, balances: &mut BalanceMap, expense: &ExpenseRecord, everyone: &[PersonId]) {
        balances.credit(&expense.paid_by, expense.amount);

        if !expense.participants.is_empty() {
            for (person, owed) in self.share_amounts(expense) {
                balances.debit(person, owed);
            }
            return;
        }

        // Equal split across everyone in the snapshot, payer included
        let Some(per_person) = expense.amount.checked_div(Decimal::from(everyone.len())) else {
            return;
        };
        for person in everyone {
            balances.debit(person, per_person);
        }
    }
}

impl Default for BalanceEngine {
    fn default() -> Self {
        Self::new(&BalanceConfig::default())
    }
}
