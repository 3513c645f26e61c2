//! Debt simplification
//!
//! Greedy largest-pair matching over net balances.
//!
//! # Algorithm
//!
//! 1. Split people into creditors (balance > ε) and debtors (balance < -ε)
//! 2. Sort both by magnitude, largest first (ties keep balance-map order)
//! 3. Match the head creditor with the head debtor for the smaller of the two
//! 4. Retire whichever side is no longer above ε, repeat until one side is empty
//!
//! Every step retires at least one party, so the plan has at most n - 1
//! payments for n people with a nonzero balance. Not always the global
//! minimum (that problem is NP-hard), but O(n log n).
//!
//! # Example
//!
//! ```text
//! Net positions:
//!   A: +50 (creditor)
//!   B: -20 (debtor)
//!   C: -30 (debtor)
//!
//! Payments:
//!   C pays A: 30
//!   B pays A: 20
//! ```

use crate::{config::NettingConfig, types::*, Result};
use expense_ledger::{BalanceMap, PersonId};
use rust_decimal::{Decimal, RoundingStrategy};

/// Open position during matching
#[derive(Debug, Clone)]
struct Position {
    person: PersonId,
    remaining: Decimal,
}

/// Netting engine
#[derive(Debug, Clone)]
pub struct NettingEngine {
    /// Zero threshold for positions and payments
    epsilon: Decimal,

    /// Decimal places of emitted amounts
    amount_scale: u32,
}

impl NettingEngine {
    /// Create new netting engine
    pub fn new(config: &NettingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            epsilon: config.epsilon,
            amount_scale: config.amount_scale,
        })
    }

    /// Zero threshold in use
    pub fn epsilon(&self) -> Decimal {
        self.epsilon
    }

    /// Compute payments that settle `balances`
    pub fn compute_plan(&self, balances: &BalanceMap) -> SettlementReport {
        let (mut creditors, mut debtors) = self.partition(balances);

        // Stable sorts: equal magnitudes keep balance-map order
        creditors.sort_by(|a, b| b.remaining.cmp(&a.remaining));
        debtors.sort_by(|a, b| b.remaining.cmp(&a.remaining));

        let mut plan = SettlementPlan::new();
        let mut dust = Decimal::ZERO;
        let (mut c, mut d) = (0, 0);

        while c < creditors.len() && d < debtors.len() {
            let creditor = &mut creditors[c];
            let debtor = &mut debtors[d];

            let transfer = self.round(creditor.remaining.min(debtor.remaining));

            if transfer > self.epsilon {
                plan.push(Settlement {
                    from: debtor.person.clone(),
                    to: creditor.person.clone(),
                    amount: transfer,
                });
            } else {
                tracing::debug!(
                    from = %debtor.person,
                    to = %creditor.person,
                    %transfer,
                    "Skipping payment below threshold"
                );
                dust += transfer;
            }

            creditor.remaining -= transfer;
            debtor.remaining -= transfer;

            // Same threshold as partitioning: a party stays only while it would qualify
            if creditor.remaining <= self.epsilon {
                c += 1;
            }
            if debtor.remaining <= self.epsilon {
                d += 1;
            }
        }

        let residuals: Vec<Residual> = creditors[c..]
            .iter()
            .map(|pos| Residual {
                person: pos.person.clone(),
                amount: pos.remaining,
            })
            .chain(debtors[d..].iter().map(|pos| Residual {
                person: pos.person.clone(),
                amount: -pos.remaining,
            }))
            .collect();

        if !residuals.is_empty() {
            let open: Decimal = residuals.iter().map(|r| r.amount).sum();
            tracing::warn!(
                count = residuals.len(),
                %open,
                "Balances do not net to zero, positions left open"
            );
        }

        tracing::debug!(
            creditors = creditors.len(),
            debtors = debtors.len(),
            payments = plan.len(),
            "Netting complete"
        );

        SettlementReport {
            plan,
            residuals,
            dust,
        }
    }

    /// Split balances into creditor and debtor magnitudes
    fn partition(&self, balances: &BalanceMap) -> (Vec<Position>, Vec<Position>) {
        let mut creditors = Vec::new();
        let mut debtors = Vec::new();

        for (person, balance) in balances.iter() {
            if balance > self.epsilon {
                creditors.push(Position {
                    person: person.clone(),
                    remaining: balance,
                });
            } else if balance < -self.epsilon {
                debtors.push(Position {
                    person: person.clone(),
                    remaining: balance.abs(),
                });
            }
        }

        (creditors, debtors)
    }

    fn round(&self, amount: Decimal) -> Decimal {
        amount.round_dp_with_strategy(self.amount_scale, RoundingStrategy::MidpointAwayFromZero)
    }
}

impl Default for NettingEngine {
    fn default() -> Self {
        let config = NettingConfig::default();
        Self {
            epsilon: config.epsilon,
            amount_scale: config.amount_scale,
        }
    }
}
