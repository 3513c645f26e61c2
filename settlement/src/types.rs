//! Core types for settlement engine

use expense_ledger::{BalanceMap, PersonId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single payment instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Debtor (pays)
    pub from: PersonId,

    /// Creditor (receives)
    pub to: PersonId,

    /// Amount to pay, rounded to the configured scale
    pub amount: Decimal,
}

/// Ordered payment instructions that zero out a balance map
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettlementPlan(Vec<Settlement>);

impl SettlementPlan {
    /// Create empty plan
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a payment
    pub fn push(&mut self, settlement: Settlement) {
        self.0.push(settlement);
    }

    /// Number of payments
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nobody needs to pay
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Payments in order
    pub fn iter(&self) -> std::slice::Iter<'_, Settlement> {
        self.0.iter()
    }

    /// Payments as a slice
    pub fn as_slice(&self) -> &[Settlement] {
        &self.0
    }

    /// Sum of all payment amounts
    pub fn total(&self) -> Decimal {
        self.0.iter().map(|s| s.amount).sum()
    }

    /// Balances after every payment in the plan is made
    ///
    /// Paying raises the payer's balance and lowers the payee's, so a plan
    /// derived from `balances` leaves every entry near zero.
    pub fn net_against(&self, balances: &BalanceMap) -> BalanceMap {
        let mut netted = balances.clone();
        for settlement in &self.0 {
            netted.credit(&settlement.from, settlement.amount);
            netted.debit(&settlement.to, settlement.amount);
        }
        netted
    }
}

impl<'a> IntoIterator for &'a SettlementPlan {
    type Item = &'a Settlement;
    type IntoIter = std::slice::Iter<'a, Settlement>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for SettlementPlan {
    type Item = Settlement;
    type IntoIter = std::vec::IntoIter<Settlement>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<Settlement> for SettlementPlan {
    fn from_iter<I: IntoIterator<Item = Settlement>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Position left open when netting stopped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Residual {
    /// Who is left over
    pub person: PersonId,

    /// Signed remaining balance (positive = still owed, negative = still owes)
    pub amount: Decimal,
}

/// Netting result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementReport {
    /// Payments to make
    pub plan: SettlementPlan,

    /// Positions no payment could close (empty when balances sum to zero)
    pub residuals: Vec<Residual>,

    /// Total of matched amounts too small to emit as payments
    pub dust: Decimal,
}

impl SettlementReport {
    /// True if netting closed every position
    pub fn is_balanced(&self) -> bool {
        self.residuals.is_empty()
    }

    /// Turn residual positions into an error
    pub fn ensure_balanced(&self) -> crate::Result<()> {
        if self.is_balanced() {
            return Ok(());
        }
        let open: Vec<String> = self
            .residuals
            .iter()
            .map(|r| format!("{} {}", r.person, r.amount))
            .collect();
        Err(crate::Error::InvariantViolation(format!(
            "Balances do not net to zero, open positions: {}",
            open.join(", ")
        )))
    }
}

/// Settlement statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementStats {
    /// Number of people with a balance entry
    pub people_count: usize,

    /// Number of people owed money
    pub creditor_count: usize,

    /// Number of people owing money
    pub debtor_count: usize,

    /// Number of payments in the plan
    pub transfer_count: usize,

    /// Sum of all positive balances
    pub total_outstanding: Decimal,

    /// Sum of all payments
    pub total_transferred: Decimal,
}

impl SettlementStats {
    /// Summarize balances and the plan computed from them
    pub fn new(balances: &BalanceMap, report: &SettlementReport, epsilon: Decimal) -> Self {
        let creditor_count = balances.iter().filter(|(_, b)| *b > epsilon).count();
        let debtor_count = balances.iter().filter(|(_, b)| *b < -epsilon).count();
        let total_outstanding = balances
            .iter()
            .map(|(_, b)| b)
            .filter(|b| *b > epsilon)
            .sum();

        Self {
            people_count: balances.len(),
            creditor_count,
            debtor_count,
            transfer_count: report.plan.len(),
            total_outstanding,
            total_transferred: report.plan.total(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn p(name: &str) -> PersonId {
        PersonId::new(name)
    }

    fn pay(from: &str, to: &str, amount: Decimal) -> Settlement {
        Settlement {
            from: p(from),
            to: p(to),
            amount,
        }
    }

    #[test]
    fn test_net_against_zeroes_balances() {
        let balances: BalanceMap = [(p("A"), dec!(50)), (p("B"), dec!(-20)), (p("C"), dec!(-30))]
            .into_iter()
            .collect();
        let plan: SettlementPlan = vec![pay("C", "A", dec!(30)), pay("B", "A", dec!(20))]
            .into_iter()
            .collect();

        let netted = plan.net_against(&balances);
        assert!(netted.is_settled(dec!(0.01)));
        assert_eq!(plan.total(), dec!(50));
        // Input untouched
        assert_eq!(balances.get(&p("A")), dec!(50));
    }

    #[test]
    fn test_plan_serializes_as_array() {
        let plan: SettlementPlan = vec![pay("B", "A", dec!(20.5))].into_iter().collect();

        let value = serde_json::to_value(&plan).unwrap();
        assert_eq!(value, serde_json::json!([{"from": "B", "to": "A", "amount": 20.5}]));
    }

    #[test]
    fn test_report_ensure_balanced() {
        let report = SettlementReport::default();
        assert!(report.ensure_balanced().is_ok());

        let report = SettlementReport {
            residuals: vec![Residual {
                person: p("A"),
                amount: dec!(5),
            }],
            ..Default::default()
        };
        assert!(!report.is_balanced());
        assert!(matches!(
            report.ensure_balanced(),
            Err(crate::Error::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_settlement_stats() {
        let balances: BalanceMap = [
            (p("A"), dec!(50)),
            (p("B"), dec!(-20)),
            (p("C"), dec!(-30)),
            (p("D"), dec!(0.001)),
        ]
        .into_iter()
        .collect();
        let report = SettlementReport {
            plan: vec![pay("C", "A", dec!(30)), pay("B", "A", dec!(20))]
                .into_iter()
                .collect(),
            ..Default::default()
        };

        let stats = SettlementStats::new(&balances, &report, dec!(0.01));
        assert_eq!(stats.people_count, 4);
        assert_eq!(stats.creditor_count, 1);
        assert_eq!(stats.debtor_count, 2);
        assert_eq!(stats.transfer_count, 2);
        assert_eq!(stats.total_outstanding, dec!(50));
        assert_eq!(stats.total_transferred, dec!(50));
    }
}
