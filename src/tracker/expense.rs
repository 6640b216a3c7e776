//! Expense recording and management

use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use crate::config::default_tolerance;
use crate::traits::*;
use crate::types::*;

/// Expense manager for handling expense operations
pub struct ExpenseManager<S: ExpenseStorage> {
    storage: S,
    validator: Box<dyn ExpenseValidator>,
}

impl<S: ExpenseStorage> ExpenseManager<S> {
    /// Create a new expense manager
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            validator: Box::new(DefaultExpenseValidator),
        }
    }

    /// Create a new expense manager with custom validator
    pub fn with_validator(storage: S, validator: Box<dyn ExpenseValidator>) -> Self {
        Self { storage, validator }
    }

    async fn group_of(&self, expense: &Expense) -> SettlementResult<Group> {
        self.storage
            .get_group(&expense.group_id)
            .await?
            .ok_or_else(|| SettlementError::GroupNotFound(expense.group_id.clone()))
    }

    /// Record a new expense
    pub async fn add_expense(&mut self, expense: Expense) -> SettlementResult<Expense> {
        let group = self.group_of(&expense).await?;
        self.validator.validate_expense(&expense, &group)?;

        if self.storage.get_expense(&expense.id).await?.is_some() {
            return Err(SettlementError::Validation(format!(
                "Expense with ID '{}' already exists",
                expense.id
            )));
        }

        self.storage.save_expense(&expense).await?;

        tracing::debug!(
            expense_id = %expense.id,
            group_id = %expense.group_id,
            amount = %expense.amount,
            split_type = ?expense.split_type(),
            "Expense recorded"
        );

        Ok(expense)
    }

    /// Get an expense by ID
    pub async fn get_expense(&self, expense_id: &str) -> SettlementResult<Option<Expense>> {
        self.storage.get_expense(expense_id).await
    }

    /// Get an expense by ID, returning an error if not found
    pub async fn get_expense_required(&self, expense_id: &str) -> SettlementResult<Expense> {
        self.storage
            .get_expense(expense_id)
            .await?
            .ok_or_else(|| SettlementError::ExpenseNotFound(expense_id.to_string()))
    }

    /// List a group's expenses, newest first
    pub async fn list_expenses(
        &self,
        group_id: &str,
        filter: &ExpenseFilter,
    ) -> SettlementResult<Vec<Expense>> {
        self.storage.list_expenses(group_id, filter).await
    }

    /// Replace an existing expense
    pub async fn update_expense(&mut self, expense: &Expense) -> SettlementResult<()> {
        let existing = self.get_expense_required(&expense.id).await?;
        if existing.group_id != expense.group_id {
            return Err(SettlementError::Validation(format!(
                "Expense '{}' cannot move between groups",
                expense.id
            )));
        }

        let group = self.group_of(expense).await?;
        self.validator.validate_expense(expense, &group)?;

        self.storage.update_expense(expense).await
    }

    /// Delete an expense
    pub async fn delete_expense(&mut self, expense_id: &str) -> SettlementResult<()> {
        // Ensure the expense exists
        self.get_expense_required(expense_id).await?;
        self.storage.delete_expense(expense_id).await
    }
}

/// Expense builder for creating expenses with either split rule
#[derive(Debug)]
pub struct ExpenseBuilder {
    expense: Expense,
}

impl ExpenseBuilder {
    /// Start an expense with an empty equal split
    pub fn new(
        id: String,
        group_id: String,
        description: String,
        amount: BigDecimal,
        paid_by: MemberId,
    ) -> Self {
        Self {
            expense: Expense::new(
                id,
                group_id,
                description,
                amount,
                paid_by,
                Split::Equal {
                    participants: Vec::new(),
                },
            ),
        }
    }

    /// Split equally among `participants`, replacing any previous split
    pub fn split_equally<I, M>(mut self, participants: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<MemberId>,
    {
        self.expense.split = Split::Equal {
            participants: participants.into_iter().map(Into::into).collect(),
        };
        self
    }

    /// Add an explicit share, switching the split to custom
    pub fn custom_share(mut self, member_id: impl Into<MemberId>, amount: BigDecimal) -> Self {
        let share = CustomShare::new(member_id, amount);
        match &mut self.expense.split {
            Split::Custom { shares } => shares.push(share),
            split => {
                *split = Split::Custom {
                    shares: vec![share],
                }
            }
        }
        self
    }

    pub fn category(mut self, category: ExpenseCategory) -> Self {
        self.expense.category = category;
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.expense.date = date;
        self
    }

    pub fn notes(mut self, notes: String) -> Self {
        self.expense.notes = Some(notes);
        self
    }

    /// Build the expense, checking the split against the amount
    pub fn build(self) -> SettlementResult<Expense> {
        self.expense.validate_split(&default_tolerance())?;
        Ok(self.expense)
    }
}

/// Common expense patterns
pub mod patterns {
    use super::*;

    /// Split an expense equally across every member of the group
    pub fn split_with_everyone(
        id: String,
        group: &Group,
        description: String,
        amount: BigDecimal,
        paid_by: MemberId,
    ) -> SettlementResult<Expense> {
        ExpenseBuilder::new(id, group.id.clone(), description, amount, paid_by)
            .split_equally(group.members.iter().map(|m| m.id.clone()))
            .build()
    }

    /// One member paid on behalf of another, who owes the full amount
    pub fn paid_on_behalf(
        id: String,
        group_id: String,
        description: String,
        amount: BigDecimal,
        paid_by: MemberId,
        on_behalf_of: MemberId,
    ) -> SettlementResult<Expense> {
        ExpenseBuilder::new(id, group_id, description, amount.clone(), paid_by)
            .custom_share(on_behalf_of, amount)
            .build()
    }
}
