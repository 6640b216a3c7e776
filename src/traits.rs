//! Traits for storage abstraction and extensibility

use async_trait::async_trait;

use std::collections::HashSet;

use crate::config::default_tolerance;
use crate::types::*;
use crate::utils::validation::{validate_expense_description, validate_notes};

/// Storage abstraction for groups, expenses and recorded settlements
///
/// The settlement engine never touches storage; this trait supplies its
/// inputs (group members, expenses) and keeps the ledger of confirmed
/// payments. Any backend (remote API, document store, SQL, in-memory) can
/// implement it, and [`crate::utils::FallbackStorage`] composes two of them.
#[async_trait]
pub trait ExpenseStorage: Send + Sync {
    /// Save a group to storage
    async fn save_group(&mut self, group: &Group) -> SettlementResult<()>;

    /// Get a group by ID
    async fn get_group(&self, group_id: &str) -> SettlementResult<Option<Group>>;

    /// List all groups
    async fn list_groups(&self) -> SettlementResult<Vec<Group>>;

    /// Update a group
    async fn update_group(&mut self, group: &Group) -> SettlementResult<()>;

    /// Delete a group together with its expenses and settlement records
    async fn delete_group(&mut self, group_id: &str) -> SettlementResult<()>;

    /// Save an expense to storage
    async fn save_expense(&mut self, expense: &Expense) -> SettlementResult<()>;

    /// Get an expense by ID
    async fn get_expense(&self, expense_id: &str) -> SettlementResult<Option<Expense>>;

    /// List a group's expenses matching `filter`, newest first
    async fn list_expenses(
        &self,
        group_id: &str,
        filter: &ExpenseFilter,
    ) -> SettlementResult<Vec<Expense>>;

    /// Update an expense
    async fn update_expense(&mut self, expense: &Expense) -> SettlementResult<()>;

    /// Delete an expense
    async fn delete_expense(&mut self, expense_id: &str) -> SettlementResult<()>;

    /// Append a confirmed payment to the settlement ledger
    async fn save_settlement(&mut self, record: &SettlementRecord) -> SettlementResult<()>;

    /// List a group's recorded settlements, newest first
    async fn list_settlements(&self, group_id: &str) -> SettlementResult<Vec<SettlementRecord>>;
}

/// Trait for implementing custom group validation rules
pub trait GroupValidator: Send + Sync {
    /// Validate a group before saving
    fn validate_group(&self, group: &Group) -> SettlementResult<()>;

    /// Validate a member before adding them to a group
    fn validate_member(&self, member: &Member) -> SettlementResult<()>;
}

/// Trait for implementing custom expense validation rules
pub trait ExpenseValidator: Send + Sync {
    /// Validate an expense against the group it is recorded in
    fn validate_expense(&self, expense: &Expense, group: &Group) -> SettlementResult<()>;
}

/// Default group validator with basic rules
pub struct DefaultGroupValidator;

impl GroupValidator for DefaultGroupValidator {
    fn validate_group(&self, group: &Group) -> SettlementResult<()> {
        if group.id.trim().is_empty() {
            return Err(SettlementError::Validation(
                "Group ID cannot be empty".to_string(),
            ));
        }

        if group.name.trim().is_empty() {
            return Err(SettlementError::Validation(
                "Group name cannot be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for member in &group.members {
            self.validate_member(member)?;
            if !seen.insert(member.id.as_str()) {
                return Err(SettlementError::Validation(format!(
                    "Member '{}' appears multiple times in group '{}'",
                    member.id, group.id
                )));
            }
        }

        Ok(())
    }

    fn validate_member(&self, member: &Member) -> SettlementResult<()> {
        if member.id.trim().is_empty() {
            return Err(SettlementError::Validation(
                "Member ID cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Default expense validator: descriptive fields, split consistency and
/// group membership
pub struct DefaultExpenseValidator;

impl ExpenseValidator for DefaultExpenseValidator {
    fn validate_expense(&self, expense: &Expense, group: &Group) -> SettlementResult<()> {
        if expense.group_id != group.id {
            return Err(SettlementError::Validation(format!(
                "Expense '{}' belongs to group '{}', not '{}'",
                expense.id, expense.group_id, group.id
            )));
        }

        validate_expense_description(&expense.description)?;
        validate_notes(expense.notes.as_deref(), 1000)?;
        expense.validate_split(&default_tolerance())?;

        if !group.has_member(&expense.paid_by) {
            return Err(SettlementError::InvalidParticipant {
                expense_id: expense.id.clone(),
                member_id: expense.paid_by.clone(),
            });
        }

        for participant in expense.split.participant_ids() {
            if !group.has_member(participant) {
                return Err(SettlementError::InvalidParticipant {
                    expense_id: expense.id.clone(),
                    member_id: participant.to_string(),
                });
            }
        }

        Ok(())
    }
}
