//! Main tracker orchestrator that coordinates groups, expenses and settlements

use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::engine::SettlementEngine;
use crate::tracker::{ExpenseManager, GroupManager};
use crate::traits::*;
use crate::types::*;
use crate::utils::validation::{validate_notes, validate_positive_amount};

/// Parameters for recording a confirmed payment
pub struct RecordSettlementParams {
    pub group_id: String,
    pub from: MemberId,
    pub to: MemberId,
    pub amount: BigDecimal,
    /// Member confirming the payment
    pub settled_by: MemberId,
    pub notes: Option<String>,
}

/// Main tracker that loads group snapshots and runs the settlement engine
pub struct ExpenseTracker<S: ExpenseStorage> {
    group_manager: GroupManager<S>,
    expense_manager: ExpenseManager<S>,
    engine: SettlementEngine,
}

impl<S: ExpenseStorage + Clone> ExpenseTracker<S> {
    /// Create a new tracker with the given storage backend
    pub fn new(storage: S) -> Self {
        Self {
            group_manager: GroupManager::new(storage.clone()),
            expense_manager: ExpenseManager::new(storage),
            engine: SettlementEngine::new(),
        }
    }

    /// Create a new tracker with custom validators
    pub fn with_validators(
        storage: S,
        group_validator: Box<dyn GroupValidator>,
        expense_validator: Box<dyn ExpenseValidator>,
    ) -> Self {
        Self {
            group_manager: GroupManager::with_validator(storage.clone(), group_validator),
            expense_manager: ExpenseManager::with_validator(storage, expense_validator),
            engine: SettlementEngine::new(),
        }
    }

    /// Replace the settlement engine (e.g. one built with a custom configuration)
    pub fn with_engine(mut self, engine: SettlementEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn engine(&self) -> &SettlementEngine {
        &self.engine
    }

    // Group operations
    /// Create a new group
    pub async fn create_group(
        &mut self,
        id: String,
        name: String,
        currency: Currency,
        members: Vec<Member>,
    ) -> SettlementResult<Group> {
        self.group_manager
            .create_group(id, name, currency, members)
            .await
    }

    /// Get a group by ID
    pub async fn get_group(&self, group_id: &str) -> SettlementResult<Option<Group>> {
        self.group_manager.get_group(group_id).await
    }

    /// List all groups
    pub async fn list_groups(&self) -> SettlementResult<Vec<Group>> {
        self.group_manager.list_groups().await
    }

    /// Rename a group
    pub async fn rename_group(&mut self, group_id: &str, name: String) -> SettlementResult<Group> {
        self.group_manager.rename_group(group_id, name).await
    }

    /// Delete a group
    pub async fn delete_group(&mut self, group_id: &str) -> SettlementResult<()> {
        self.group_manager.delete_group(group_id).await
    }

    /// Add a member to a group
    pub async fn add_member(&mut self, group_id: &str, member: Member) -> SettlementResult<Group> {
        self.group_manager.add_member(group_id, member).await
    }

    /// Remove a member from a group
    pub async fn remove_member(
        &mut self,
        group_id: &str,
        member_id: &str,
    ) -> SettlementResult<Group> {
        self.group_manager.remove_member(group_id, member_id).await
    }

    // Expense operations
    /// Record a new expense
    pub async fn add_expense(&mut self, expense: Expense) -> SettlementResult<Expense> {
        self.expense_manager.add_expense(expense).await
    }

    /// Get an expense by ID
    pub async fn get_expense(&self, expense_id: &str) -> SettlementResult<Option<Expense>> {
        self.expense_manager.get_expense(expense_id).await
    }

    /// List a group's expenses, newest first
    pub async fn list_expenses(
        &self,
        group_id: &str,
        filter: &ExpenseFilter,
    ) -> SettlementResult<Vec<Expense>> {
        self.expense_manager.list_expenses(group_id, filter).await
    }

    /// Update an expense
    pub async fn update_expense(&mut self, expense: &Expense) -> SettlementResult<()> {
        self.expense_manager.update_expense(expense).await
    }

    /// Delete an expense
    pub async fn delete_expense(&mut self, expense_id: &str) -> SettlementResult<()> {
        self.expense_manager.delete_expense(expense_id).await
    }

    // Settlement operations
    /// Net balances and suggested transfers for the group's current expenses
    pub async fn compute_report(&self, group_id: &str) -> SettlementResult<SettlementReport> {
        let group = self.group_manager.get_group_required(group_id).await?;
        let expenses = self
            .expense_manager
            .list_expenses(group_id, &ExpenseFilter::default())
            .await?;

        self.engine.settle(&group.members, &expenses)
    }

    /// Group summary: suggested transfers plus per-member and overall totals
    pub async fn group_summary(&self, group_id: &str) -> SettlementResult<GroupSummary> {
        let group = self.group_manager.get_group_required(group_id).await?;
        let expenses = self
            .expense_manager
            .list_expenses(group_id, &ExpenseFilter::default())
            .await?;

        let report = self.engine.settle(&group.members, &expenses)?;
        let member_balances = self.engine.summarize(&group.members, &report.settlements);
        let total_amount: BigDecimal = expenses.iter().map(|e| &e.amount).sum();

        tracing::debug!(
            group_id = %group.id,
            expense_count = expenses.len(),
            transfer_count = report.settlements.len(),
            "Group summary computed"
        );

        Ok(GroupSummary {
            group_id: group.id,
            total_expenses: expenses.len(),
            total_amount,
            currency: group.currency,
            member_count: group.members.len(),
            settlements: report.settlements,
            member_balances,
        })
    }

    /// Record a confirmed payment in the settlement ledger.
    ///
    /// Recorded payments do not feed back into the balance computation.
    pub async fn record_settlement(
        &mut self,
        params: RecordSettlementParams,
    ) -> SettlementResult<SettlementRecord> {
        let group = self.group_manager.get_group_required(&params.group_id).await?;

        validate_positive_amount(&params.amount)?;
        validate_notes(params.notes.as_deref(), 500)?;

        if params.from == params.to {
            return Err(SettlementError::Validation(
                "A settlement needs two different members".to_string(),
            ));
        }

        for member_id in [&params.from, &params.to, &params.settled_by] {
            if !group.has_member(member_id) {
                return Err(SettlementError::MemberNotFound(member_id.clone()));
            }
        }

        let now = chrono::Utc::now().naive_utc();
        let record = SettlementRecord {
            id: Uuid::new_v4(),
            group_id: group.id,
            from: params.from,
            to: params.to,
            amount: params.amount,
            currency: group.currency,
            status: SettlementStatus::Settled,
            settled_at: Some(now),
            settled_by: Some(params.settled_by),
            notes: params.notes,
            created_at: now,
        };

        self.group_manager.storage.save_settlement(&record).await?;

        tracing::debug!(
            settlement_id = %record.id,
            group_id = %record.group_id,
            amount = %record.amount,
            "Settlement recorded"
        );

        Ok(record)
    }

    /// One page of the group's settlement history, newest first
    pub async fn settlement_history(
        &self,
        group_id: &str,
        page: usize,
        limit: usize,
    ) -> SettlementResult<Page<SettlementRecord>> {
        if page == 0 || limit == 0 {
            return Err(SettlementError::Validation(
                "Page and limit must be at least 1".to_string(),
            ));
        }

        // Ensure the group exists
        self.group_manager.get_group_required(group_id).await?;

        let records = self.group_manager.storage.list_settlements(group_id).await?;
        let total = records.len();
        let items = records
            .into_iter()
            .skip((page - 1).saturating_mul(limit))
            .take(limit)
            .collect();

        Ok(Page {
            items,
            page,
            limit,
            total,
            pages: total.div_ceil(limit),
        })
    }
}
