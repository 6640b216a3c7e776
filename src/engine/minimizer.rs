//! Greedy debt minimization
//!
//! Creditors and debtors are each sorted largest first and matched with a
//! two-pointer scan. Every step settles at least one side completely, so the
//! number of transfers is at most `creditors + debtors - 1`. This is the usual
//! expense-splitting heuristic, not an optimal solver.

use bigdecimal::{BigDecimal, RoundingMode};

use crate::config::EngineConfig;
use crate::types::*;

/// A member's outstanding magnitude during matching
#[derive(Debug)]
struct Position<'a> {
    member_id: &'a str,
    remaining: BigDecimal,
}

/// Reduces a [`NetBalance`] to a list of directed payments
#[derive(Debug, Clone)]
pub struct DebtMinimizer {
    tolerance: BigDecimal,
    scale: i64,
    rounding: RoundingMode,
}

impl DebtMinimizer {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            tolerance: config.tolerance.clone(),
            scale: config.scale,
            rounding: config.rounding.mode(),
        }
    }

    /// Produce transfers that bring every balance back within tolerance.
    ///
    /// Fails with [`SettlementError::InvariantViolation`] when the balances
    /// do not sum to zero, which means the input was not produced from a
    /// closed set of expenses.
    pub fn minimize(&self, net_balance: &NetBalance) -> SettlementResult<Vec<Settlement>> {
        self.minimize_within(net_balance, &self.tolerance)
    }

    /// Like [`minimize`](Self::minimize), but accepts balances summing to at
    /// most `allowed_drift` away from zero.
    ///
    /// Custom splits may each miss their amount by up to the tolerance, so a
    /// snapshot of such expenses carries their combined residue.
    pub fn minimize_within(
        &self,
        net_balance: &NetBalance,
        allowed_drift: &BigDecimal,
    ) -> SettlementResult<Vec<Settlement>> {
        self.check_conservation(net_balance, allowed_drift)?;

        let floor = -self.tolerance.clone();
        let mut creditors: Vec<Position> = Vec::new();
        let mut debtors: Vec<Position> = Vec::new();

        for entry in net_balance.iter() {
            if entry.amount > self.tolerance {
                creditors.push(Position {
                    member_id: &entry.member_id,
                    remaining: entry.amount.clone(),
                });
            } else if entry.amount < floor {
                debtors.push(Position {
                    member_id: &entry.member_id,
                    remaining: entry.amount.abs(),
                });
            }
        }

        // Stable: equal magnitudes keep the balance order
        creditors.sort_by(|a, b| b.remaining.cmp(&a.remaining));
        debtors.sort_by(|a, b| b.remaining.cmp(&a.remaining));

        let mut settlements = Vec::new();
        let mut creditor_idx = 0;
        let mut debtor_idx = 0;

        while creditor_idx < creditors.len() && debtor_idx < debtors.len() {
            let creditor = &mut creditors[creditor_idx];
            let debtor = &mut debtors[debtor_idx];

            let amount = if creditor.remaining < debtor.remaining {
                creditor.remaining.clone()
            } else {
                debtor.remaining.clone()
            };

            if amount > self.tolerance {
                settlements.push(Settlement {
                    from: debtor.member_id.to_string(),
                    to: creditor.member_id.to_string(),
                    amount: amount.with_scale_round(self.scale, self.rounding),
                });
            }

            // Remainders stay unrounded so rounding never compounds
            creditor.remaining -= &amount;
            debtor.remaining -= &amount;

            if creditor.remaining <= self.tolerance {
                creditor_idx += 1;
            }
            if debtor.remaining <= self.tolerance {
                debtor_idx += 1;
            }
        }

        tracing::debug!(
            creditor_count = creditors.len(),
            debtor_count = debtors.len(),
            transfer_count = settlements.len(),
            "Debt minimization finished"
        );

        Ok(settlements)
    }

    fn check_conservation(
        &self,
        net_balance: &NetBalance,
        allowed_drift: &BigDecimal,
    ) -> SettlementResult<()> {
        let sum = net_balance.total();
        if sum.abs() > *allowed_drift {
            tracing::error!(
                member_count = net_balance.len(),
                sum = %sum,
                allowed_drift = %allowed_drift,
                "Net balances are not conserved; refusing to settle"
            );
            return Err(SettlementError::InvariantViolation { sum });
        }
        Ok(())
    }
}
