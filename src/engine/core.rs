//! Settlement engine tying aggregation and minimization together

use bigdecimal::BigDecimal;

use crate::config::EngineConfig;
use crate::engine::{BalanceAggregator, DebtMinimizer};
use crate::types::*;

/// Pure, stateless settlement engine over a snapshot of expenses
#[derive(Debug, Clone)]
pub struct SettlementEngine {
    config: EngineConfig,
    aggregator: BalanceAggregator,
    minimizer: DebtMinimizer,
}

impl Default for SettlementEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SettlementEngine {
    /// Create an engine with the default configuration
    pub fn new() -> Self {
        Self::build(EngineConfig::default())
    }

    /// Create an engine with a custom configuration
    pub fn with_config(config: EngineConfig) -> SettlementResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        Self {
            aggregator: BalanceAggregator::new(config.tolerance.clone()),
            minimizer: DebtMinimizer::new(&config),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Net position of every member over `expenses`
    pub fn compute_balances(
        &self,
        members: &[Member],
        expenses: &[Expense],
    ) -> SettlementResult<NetBalance> {
        self.aggregator.aggregate(members, expenses)
    }

    /// Transfers that settle `net_balance`
    pub fn compute_settlements(&self, net_balance: &NetBalance) -> SettlementResult<Vec<Settlement>> {
        self.minimizer.minimize(net_balance)
    }

    /// Aggregate and minimize in one pass.
    ///
    /// The zero-sum check allows for the combined residue of the custom
    /// splits in `expenses`.
    pub fn settle(
        &self,
        members: &[Member],
        expenses: &[Expense],
    ) -> SettlementResult<SettlementReport> {
        let net_balance = self.compute_balances(members, expenses)?;
        let allowed_drift = expenses
            .iter()
            .map(Expense::split_residue)
            .fold(self.config.tolerance.clone(), |drift, residue| drift + residue);
        let settlements = self.minimizer.minimize_within(&net_balance, &allowed_drift)?;
        Ok(SettlementReport {
            net_balance,
            settlements,
        })
    }

    /// Per-member totals accumulated from a settlement list.
    ///
    /// Settlements naming someone outside `members` are skipped.
    pub fn summarize(&self, members: &[Member], settlements: &[Settlement]) -> Vec<MemberBalance> {
        let mut summary: Vec<MemberBalance> = members
            .iter()
            .map(|member| MemberBalance {
                member: member.clone(),
                total_owed: BigDecimal::from(0),
                total_to_receive: BigDecimal::from(0),
                net_balance: BigDecimal::from(0),
            })
            .collect();

        for settlement in settlements {
            let from = summary.iter().position(|b| b.member.id == settlement.from);
            let to = summary.iter().position(|b| b.member.id == settlement.to);

            let (Some(from), Some(to)) = (from, to) else {
                tracing::warn!(
                    from = %settlement.from,
                    to = %settlement.to,
                    "Skipping settlement for a member outside the group"
                );
                continue;
            };

            summary[from].total_owed += &settlement.amount;
            summary[from].net_balance -= &settlement.amount;
            summary[to].total_to_receive += &settlement.amount;
            summary[to].net_balance += &settlement.amount;
        }

        summary
    }
}

/// Net balances with the default configuration
pub fn compute_balances(members: &[Member], expenses: &[Expense]) -> SettlementResult<NetBalance> {
    SettlementEngine::new().compute_balances(members, expenses)
}

/// Settlements with the default configuration
pub fn compute_settlements(net_balance: &NetBalance) -> SettlementResult<Vec<Settlement>> {
    SettlementEngine::new().compute_settlements(net_balance)
}
