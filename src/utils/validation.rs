//! Validation utilities

use crate::traits::*;
use crate::types::*;
use bigdecimal::BigDecimal;
use std::collections::HashSet;

/// Validate that an amount is positive
pub fn validate_positive_amount(amount: &BigDecimal) -> SettlementResult<()> {
    if *amount <= BigDecimal::from(0) {
        Err(SettlementError::Validation(
            "Amount must be positive".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Validate that a group, member or expense ID is valid
pub fn validate_id(kind: &str, id: &str) -> SettlementResult<()> {
    if id.trim().is_empty() {
        return Err(SettlementError::Validation(format!(
            "{} ID cannot be empty",
            kind
        )));
    }

    if id.chars().count() > 64 {
        return Err(SettlementError::Validation(format!(
            "{} ID cannot exceed 64 characters",
            kind
        )));
    }

    // Alphanumeric, dashes and underscores only
    if !id
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(SettlementError::Validation(format!(
            "{} ID can only contain alphanumeric characters, dashes, and underscores",
            kind
        )));
    }

    Ok(())
}

/// Validate that a group name is valid
pub fn validate_group_name(name: &str) -> SettlementResult<()> {
    if name.trim().is_empty() {
        return Err(SettlementError::Validation(
            "Group name cannot be empty".to_string(),
        ));
    }

    if name.chars().count() > 100 {
        return Err(SettlementError::Validation(
            "Group name cannot exceed 100 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate that an expense description is valid
pub fn validate_expense_description(description: &str) -> SettlementResult<()> {
    if description.trim().is_empty() {
        return Err(SettlementError::Validation(
            "Expense description cannot be empty".to_string(),
        ));
    }

    if description.chars().count() > 200 {
        return Err(SettlementError::Validation(
            "Expense description cannot exceed 200 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate free-form notes against a length limit
pub fn validate_notes(notes: Option<&str>, max_len: usize) -> SettlementResult<()> {
    match notes {
        Some(notes) if notes.chars().count() > max_len => Err(SettlementError::Validation(format!(
            "Notes cannot exceed {} characters",
            max_len
        ))),
        _ => Ok(()),
    }
}

/// Enhanced expense validator with detailed checks
pub struct EnhancedExpenseValidator;

impl ExpenseValidator for EnhancedExpenseValidator {
    fn validate_expense(&self, expense: &Expense, group: &Group) -> SettlementResult<()> {
        // Basic validation
        DefaultExpenseValidator.validate_expense(expense, group)?;

        // Enhanced validations
        validate_id("Expense", &expense.id)?;

        // A member may only appear once in a split
        let mut seen = HashSet::new();
        for participant in expense.split.participant_ids() {
            if !seen.insert(participant) {
                return Err(SettlementError::Validation(format!(
                    "Member '{}' appears multiple times in the split of expense '{}'",
                    participant, expense.id
                )));
            }
        }

        Ok(())
    }
}

/// Enhanced group validator with detailed checks
pub struct EnhancedGroupValidator;

impl GroupValidator for EnhancedGroupValidator {
    fn validate_group(&self, group: &Group) -> SettlementResult<()> {
        // Basic validation, including unique member ids
        DefaultGroupValidator.validate_group(group)?;

        validate_id("Group", &group.id)?;
        validate_group_name(&group.name)?;
        for member in &group.members {
            self.validate_member(member)?;
        }

        Ok(())
    }

    fn validate_member(&self, member: &Member) -> SettlementResult<()> {
        validate_id("Member", &member.id)?;

        if member.name.trim().is_empty() {
            return Err(SettlementError::Validation(
                "Member name cannot be empty".to_string(),
            ));
        }

        if let Some(email) = &member.email {
            if !email.contains('@') {
                return Err(SettlementError::Validation(format!(
                    "Invalid email address for member '{}'",
                    member.id
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flatmates() -> Group {
        Group::new(
            "flat".to_string(),
            "Flat".to_string(),
            Currency::Eur,
            vec![Member::new("a", "Ana"), Member::new("b", "Ben")],
        )
    }

    fn lunch(description: &str) -> Expense {
        Expense::new(
            "lunch".to_string(),
            "flat".to_string(),
            description.to_string(),
            BigDecimal::from(24),
            "a".to_string(),
            Split::Equal {
                participants: vec!["a".to_string(), "b".to_string()],
            },
        )
    }

    #[test]
    fn test_limits_count_characters() {
        let description = "ü".repeat(150);
        assert!(validate_expense_description(&description).is_ok());
        assert!(validate_expense_description(&"ü".repeat(201)).is_err());

        assert!(validate_group_name(&"日".repeat(100)).is_ok());
        assert!(validate_notes(Some("é".repeat(1000).as_str()), 1000).is_ok());
        assert!(validate_id("Member", &"ß".repeat(64)).is_ok());
    }

    #[test]
    fn test_default_validator_checks_descriptive_fields() {
        let group = flatmates();

        assert!(DefaultExpenseValidator
            .validate_expense(&lunch("Lunch"), &group)
            .is_ok());
        assert!(DefaultExpenseValidator
            .validate_expense(&lunch("   "), &group)
            .is_err());

        let mut chatty = lunch("Lunch");
        chatty.notes = Some("x".repeat(5000));
        assert!(DefaultExpenseValidator
            .validate_expense(&chatty, &group)
            .is_err());
    }

    #[test]
    fn test_default_group_validator_rejects_duplicate_members() {
        let mut group = flatmates();
        assert!(DefaultGroupValidator.validate_group(&group).is_ok());

        group.members.push(Member::new("a", "Again"));
        assert!(matches!(
            DefaultGroupValidator.validate_group(&group),
            Err(SettlementError::Validation(_))
        ));
        assert!(EnhancedGroupValidator.validate_group(&group).is_err());
    }

    #[test]
    fn test_enhanced_validator_rejects_repeated_participants() {
        let group = flatmates();
        let mut doubled = lunch("Lunch");
        doubled.split = Split::Equal {
            participants: vec!["b".to_string(), "b".to_string()],
        };

        assert!(DefaultExpenseValidator
            .validate_expense(&doubled, &group)
            .is_ok());
        assert!(EnhancedExpenseValidator
            .validate_expense(&doubled, &group)
            .is_err());
    }
}
