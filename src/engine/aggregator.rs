//! Folding expenses into per-member net balances

use bigdecimal::BigDecimal;
use std::collections::HashMap;

use crate::types::*;

/// Computes each member's net position over a snapshot of expenses
#[derive(Debug, Clone)]
pub struct BalanceAggregator {
    tolerance: BigDecimal,
}

impl BalanceAggregator {
    /// Create an aggregator that accepts custom splits off by at most `tolerance`
    pub fn new(tolerance: BigDecimal) -> Self {
        Self { tolerance }
    }

    /// Produce one balance per member, zero entries included.
    ///
    /// The payer is credited the full amount and every participant is debited
    /// their share. Expenses referencing someone outside `members` are rejected
    /// with [`SettlementError::InvalidParticipant`], and expenses whose split is
    /// inconsistent with their amount with [`SettlementError::MalformedExpense`].
    /// The result does not depend on the order of `expenses`.
    pub fn aggregate(
        &self,
        members: &[Member],
        expenses: &[Expense],
    ) -> SettlementResult<NetBalance> {
        let mut order: Vec<&str> = Vec::with_capacity(members.len());
        let mut slots: HashMap<&str, usize> = HashMap::with_capacity(members.len());
        for member in members {
            if !slots.contains_key(member.id.as_str()) {
                slots.insert(member.id.as_str(), order.len());
                order.push(member.id.as_str());
            }
        }

        let mut balances = vec![BigDecimal::from(0); order.len()];

        for expense in expenses {
            expense.validate_split(&self.tolerance)?;

            let payer = Self::slot(&slots, expense, &expense.paid_by)?;
            balances[payer] += &expense.amount;

            match &expense.split {
                Split::Equal { participants } => {
                    let share = &expense.amount / BigDecimal::from(participants.len() as u64);
                    for participant in participants {
                        let slot = Self::slot(&slots, expense, participant)?;
                        balances[slot] -= &share;
                    }
                }
                Split::Custom { shares } => {
                    for share in shares {
                        let slot = Self::slot(&slots, expense, &share.member_id)?;
                        balances[slot] -= &share.amount;
                    }
                }
            }
        }

        tracing::debug!(
            member_count = order.len(),
            expense_count = expenses.len(),
            "Balance aggregation finished"
        );

        Ok(order
            .into_iter()
            .zip(balances)
            .map(|(member_id, amount)| (member_id.to_string(), amount))
            .collect())
    }

    fn slot(
        slots: &HashMap<&str, usize>,
        expense: &Expense,
        member_id: &str,
    ) -> SettlementResult<usize> {
        slots
            .get(member_id)
            .copied()
            .ok_or_else(|| SettlementError::InvalidParticipant {
                expense_id: expense.id.clone(),
                member_id: member_id.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_tolerance;
    use std::str::FromStr;

    fn members(ids: &[&str]) -> Vec<Member> {
        ids.iter().map(|id| Member::new(*id, id.to_uppercase())).collect()
    }

    fn equal(id: &str, amount: i64, paid_by: &str, participants: &[&str]) -> Expense {
        Expense::new(
            id.to_string(),
            "g1".to_string(),
            "Dinner".to_string(),
            BigDecimal::from(amount),
            paid_by.to_string(),
            Split::Equal {
                participants: participants.iter().map(|p| p.to_string()).collect(),
            },
        )
    }

    fn custom(id: &str, amount: i64, paid_by: &str, shares: &[(&str, i64)]) -> Expense {
        Expense::new(
            id.to_string(),
            "g1".to_string(),
            "Groceries".to_string(),
            BigDecimal::from(amount),
            paid_by.to_string(),
            Split::Custom {
                shares: shares
                    .iter()
                    .map(|(m, a)| CustomShare::new(*m, BigDecimal::from(*a)))
                    .collect(),
            },
        )
    }

    #[test]
    fn test_equal_split() {
        let aggregator = BalanceAggregator::new(default_tolerance());
        let balance = aggregator
            .aggregate(
                &members(&["a", "b", "c"]),
                &[equal("e1", 300, "a", &["a", "b", "c"])],
            )
            .unwrap();

        assert_eq!(balance.get("a"), Some(&BigDecimal::from(200)));
        assert_eq!(balance.get("b"), Some(&BigDecimal::from(-100)));
        assert_eq!(balance.get("c"), Some(&BigDecimal::from(-100)));
    }

    #[test]
    fn test_custom_split() {
        let aggregator = BalanceAggregator::new(default_tolerance());
        let balance = aggregator
            .aggregate(
                &members(&["a", "b", "c"]),
                &[custom("e1", 100, "a", &[("a", 20), ("b", 30), ("c", 50)])],
            )
            .unwrap();

        assert_eq!(balance.get("a"), Some(&BigDecimal::from(80)));
        assert_eq!(balance.get("b"), Some(&BigDecimal::from(-30)));
        assert_eq!(balance.get("c"), Some(&BigDecimal::from(-50)));
    }

    #[test]
    fn test_every_member_has_an_entry() {
        let aggregator = BalanceAggregator::new(default_tolerance());
        let balance = aggregator
            .aggregate(
                &members(&["a", "b", "idle"]),
                &[equal("e1", 50, "a", &["a", "b"])],
            )
            .unwrap();

        assert_eq!(balance.len(), 3);
        assert_eq!(balance.get("idle"), Some(&BigDecimal::from(0)));
        let ids: Vec<&str> = balance.iter().map(|e| e.member_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "idle"]);
    }

    #[test]
    fn test_no_expenses() {
        let aggregator = BalanceAggregator::new(default_tolerance());
        let balance = aggregator.aggregate(&members(&["a", "b"]), &[]).unwrap();

        assert_eq!(balance.len(), 2);
        assert!(balance.iter().all(|e| e.amount == BigDecimal::from(0)));
    }

    #[test]
    fn test_uneven_equal_split_stays_within_tolerance() {
        let aggregator = BalanceAggregator::new(default_tolerance());
        let balance = aggregator
            .aggregate(
                &members(&["a", "b", "c"]),
                &[equal("e1", 100, "a", &["a", "b", "c"])],
            )
            .unwrap();

        assert!(balance.total().abs() <= default_tolerance());
        let expected_b = BigDecimal::from_str("-33.33").unwrap();
        assert!((balance.get("b").unwrap() - &expected_b).abs() <= default_tolerance());
    }

    #[test]
    fn test_payer_outside_split() {
        let aggregator = BalanceAggregator::new(default_tolerance());
        let balance = aggregator
            .aggregate(
                &members(&["a", "b", "c"]),
                &[equal("e1", 90, "a", &["b", "c"])],
            )
            .unwrap();

        assert_eq!(balance.get("a"), Some(&BigDecimal::from(90)));
        assert_eq!(balance.get("b"), Some(&BigDecimal::from(-45)));
        assert_eq!(balance.get("c"), Some(&BigDecimal::from(-45)));
    }

    #[test]
    fn test_unknown_participant_is_rejected() {
        let aggregator = BalanceAggregator::new(default_tolerance());
        let result = aggregator.aggregate(
            &members(&["a", "b"]),
            &[equal("e1", 90, "a", &["b", "stranger"])],
        );

        match result {
            Err(SettlementError::InvalidParticipant {
                expense_id,
                member_id,
            }) => {
                assert_eq!(expense_id, "e1");
                assert_eq!(member_id, "stranger");
            }
            other => panic!("expected InvalidParticipant, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_payer_is_rejected() {
        let aggregator = BalanceAggregator::new(default_tolerance());
        let result = aggregator.aggregate(
            &members(&["a", "b"]),
            &[equal("e1", 90, "stranger", &["a", "b"])],
        );

        assert!(matches!(
            result,
            Err(SettlementError::InvalidParticipant { .. })
        ));
    }

    #[test]
    fn test_malformed_custom_split_is_rejected() {
        let aggregator = BalanceAggregator::new(default_tolerance());
        let result = aggregator.aggregate(
            &members(&["a", "b"]),
            &[custom("e1", 100, "a", &[("a", 20), ("b", 30)])],
        );

        assert!(matches!(result, Err(SettlementError::MalformedExpense(_))));
    }

    #[test]
    fn test_empty_equal_split_is_rejected() {
        let aggregator = BalanceAggregator::new(default_tolerance());
        let result = aggregator.aggregate(&members(&["a"]), &[equal("e1", 10, "a", &[])]);

        assert!(matches!(result, Err(SettlementError::MalformedExpense(_))));
    }

    #[test]
    fn test_duplicate_members_collapse() {
        let aggregator = BalanceAggregator::new(default_tolerance());
        let mut list = members(&["a", "b"]);
        list.push(Member::new("a", "Again"));

        let balance = aggregator
            .aggregate(&list, &[equal("e1", 10, "a", &["a", "b"])])
            .unwrap();

        assert_eq!(balance.len(), 2);
        assert_eq!(balance.get("a"), Some(&BigDecimal::from(5)));
    }
}
