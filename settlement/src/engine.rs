//! Main settlement engine
//!
//! Orchestrates the balance fold and netting over a snapshot of expenses.

use crate::{config::Config, netting::NettingEngine, types::*, Result};
use expense_ledger::{people, BalanceEngine, BalanceMap, ExpenseRecord, PersonId};

/// Settlement engine
///
/// Holds configuration only, so one engine can serve concurrent callers as
/// long as each passes its own snapshot.
#[derive(Debug, Clone)]
pub struct SettlementEngine {
    /// Balance engine
    balances: BalanceEngine,

    /// Netting engine
    netting: NettingEngine,

    /// Configuration
    config: Config,
}

impl SettlementEngine {
    /// Create new settlement engine
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let balances = BalanceEngine::new(&config.balance);
        let netting = NettingEngine::new(&config.netting)?;

        tracing::debug!(
            service = %config.service_name,
            version = %config.service_version,
            "Settlement engine ready"
        );

        Ok(Self {
            balances,
            netting,
            config,
        })
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Everyone mentioned in the expenses
    pub fn people(&self, expenses: &[ExpenseRecord]) -> Vec<PersonId> {
        people(expenses)
    }

    /// Net balance per person
    pub fn compute_balances(&self, expenses: &[ExpenseRecord]) -> BalanceMap {
        self.balances.compute_balances(expenses)
    }

    /// Payments that settle the expenses
    pub fn compute_settlements(&self, expenses: &[ExpenseRecord]) -> SettlementPlan {
        self.settle(expenses).plan
    }

    /// Payments plus netting diagnostics
    pub fn settle(&self, expenses: &[ExpenseRecord]) -> SettlementReport {
        let balances = self.compute_balances(expenses);
        let report = self.settle_balances(&balances);

        tracing::info!(
            expenses = expenses.len(),
            people = balances.len(),
            payments = report.plan.len(),
            total = %report.plan.total(),
            "Settlement computed"
        );

        report
    }

    /// Payments that settle precomputed balances
    pub fn settle_balances(&self, balances: &BalanceMap) -> SettlementReport {
        self.netting.compute_plan(balances)
    }

    /// Summary of balances and the report computed from them
    pub fn statistics(&self, balances: &BalanceMap, report: &SettlementReport) -> SettlementStats {
        SettlementStats::new(balances, report, self.netting.epsilon())
    }
}

impl Default for SettlementEngine {
    fn default() -> Self {
        let config = Config::default();
        Self {
            balances: BalanceEngine::new(&config.balance),
            netting: NettingEngine::default(),
            config,
        }
    }
}
