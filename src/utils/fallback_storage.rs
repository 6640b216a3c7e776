//! Storage composed of a primary backend and a secondary fallback

use async_trait::async_trait;

use crate::traits::*;
use crate::types::*;

/// Routes every call to `primary` and retries on `secondary` when the
/// primary reports [`SettlementError::Storage`].
///
/// Successful writes on the primary are mirrored to the secondary so that it
/// stays usable as a read fallback; mirror failures are logged and ignored.
/// Any other error kind (not found, validation) is returned as is.
#[derive(Debug, Clone)]
pub struct FallbackStorage<P, S> {
    primary: P,
    secondary: S,
}

impl<P: ExpenseStorage, S: ExpenseStorage> FallbackStorage<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn secondary(&self) -> &S {
        &self.secondary
    }
}

fn falls_back(err: &SettlementError) -> bool {
    matches!(err, SettlementError::Storage(_))
}

/// Read from the primary, retrying on the secondary after a storage failure
macro_rules! read_with_fallback {
    ($self:ident, $op:literal, $call:ident($($arg:expr),*)) => {
        match $self.primary.$call($($arg),*).await {
            Err(err) if falls_back(&err) => {
                tracing::warn!(operation = $op, error = %err, "Primary storage failed, using fallback");
                $self.secondary.$call($($arg),*).await
            }
            result => result,
        }
    };
}

/// Write to the primary and mirror to the secondary; write to the secondary
/// alone when the primary is unavailable
macro_rules! write_with_fallback {
    ($self:ident, $op:literal, $call:ident($($arg:expr),*)) => {
        match $self.primary.$call($($arg),*).await {
            Ok(()) => {
                if let Err(err) = $self.secondary.$call($($arg),*).await {
                    tracing::warn!(operation = $op, error = %err, "Mirroring to fallback storage failed");
                }
                Ok(())
            }
            Err(err) if falls_back(&err) => {
                tracing::warn!(operation = $op, error = %err, "Primary storage failed, writing to fallback");
                $self.secondary.$call($($arg),*).await
            }
            Err(err) => Err(err),
        }
    };
}

#[async_trait]
impl<P: ExpenseStorage, S: ExpenseStorage> ExpenseStorage for FallbackStorage<P, S> {
    async fn save_group(&mut self, group: &Group) -> SettlementResult<()> {
        write_with_fallback!(self, "save_group", save_group(group))
    }

    async fn get_group(&self, group_id: &str) -> SettlementResult<Option<Group>> {
        read_with_fallback!(self, "get_group", get_group(group_id))
    }

    async fn list_groups(&self) -> SettlementResult<Vec<Group>> {
        read_with_fallback!(self, "list_groups", list_groups())
    }

    async fn update_group(&mut self, group: &Group) -> SettlementResult<()> {
        write_with_fallback!(self, "update_group", update_group(group))
    }

    async fn delete_group(&mut self, group_id: &str) -> SettlementResult<()> {
        write_with_fallback!(self, "delete_group", delete_group(group_id))
    }

    async fn save_expense(&mut self, expense: &Expense) -> SettlementResult<()> {
        write_with_fallback!(self, "save_expense", save_expense(expense))
    }

    async fn get_expense(&self, expense_id: &str) -> SettlementResult<Option<Expense>> {
        read_with_fallback!(self, "get_expense", get_expense(expense_id))
    }

    async fn list_expenses(
        &self,
        group_id: &str,
        filter: &ExpenseFilter,
    ) -> SettlementResult<Vec<Expense>> {
        read_with_fallback!(self, "list_expenses", list_expenses(group_id, filter))
    }

    async fn update_expense(&mut self, expense: &Expense) -> SettlementResult<()> {
        write_with_fallback!(self, "update_expense", update_expense(expense))
    }

    async fn delete_expense(&mut self, expense_id: &str) -> SettlementResult<()> {
        write_with_fallback!(self, "delete_expense", delete_expense(expense_id))
    }

    async fn save_settlement(&mut self, record: &SettlementRecord) -> SettlementResult<()> {
        write_with_fallback!(self, "save_settlement", save_settlement(record))
    }

    async fn list_settlements(&self, group_id: &str) -> SettlementResult<Vec<SettlementRecord>> {
        read_with_fallback!(self, "list_settlements", list_settlements(group_id))
    }
}
