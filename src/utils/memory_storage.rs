//! In-memory storage implementation for testing and local-only use

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::traits::*;
use crate::types::*;

/// In-memory storage; clones share the same underlying maps
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    groups: Arc<RwLock<HashMap<String, Group>>>,
    expenses: Arc<RwLock<HashMap<String, Expense>>>,
    settlements: Arc<RwLock<Vec<SettlementRecord>>>,
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self {
            groups: Arc::new(RwLock::new(HashMap::new())),
            expenses: Arc::new(RwLock::new(HashMap::new())),
            settlements: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) -> SettlementResult<()> {
        write(&self.groups)?.clear();
        write(&self.expenses)?.clear();
        write(&self.settlements)?.clear();
        Ok(())
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn read<T>(lock: &RwLock<T>) -> SettlementResult<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|_| SettlementError::Storage("memory storage lock poisoned".to_string()))
}

fn write<T>(lock: &RwLock<T>) -> SettlementResult<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|_| SettlementError::Storage("memory storage lock poisoned".to_string()))
}

#[async_trait]
impl ExpenseStorage for MemoryStorage {
    async fn save_group(&mut self, group: &Group) -> SettlementResult<()> {
        write(&self.groups)?.insert(group.id.clone(), group.clone());
        Ok(())
    }

    async fn get_group(&self, group_id: &str) -> SettlementResult<Option<Group>> {
        Ok(read(&self.groups)?.get(group_id).cloned())
    }

    async fn list_groups(&self) -> SettlementResult<Vec<Group>> {
        let mut groups: Vec<Group> = read(&self.groups)?.values().cloned().collect();
        groups.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(groups)
    }

    async fn update_group(&mut self, group: &Group) -> SettlementResult<()> {
        let mut groups = write(&self.groups)?;
        match groups.get_mut(&group.id) {
            Some(existing) => {
                *existing = group.clone();
                Ok(())
            }
            None => Err(SettlementError::GroupNotFound(group.id.clone())),
        }
    }

    async fn delete_group(&mut self, group_id: &str) -> SettlementResult<()> {
        if write(&self.groups)?.remove(group_id).is_none() {
            return Err(SettlementError::GroupNotFound(group_id.to_string()));
        }
        write(&self.expenses)?.retain(|_, expense| expense.group_id != group_id);
        write(&self.settlements)?.retain(|record| record.group_id != group_id);
        Ok(())
    }

    async fn save_expense(&mut self, expense: &Expense) -> SettlementResult<()> {
        write(&self.expenses)?.insert(expense.id.clone(), expense.clone());
        Ok(())
    }

    async fn get_expense(&self, expense_id: &str) -> SettlementResult<Option<Expense>> {
        Ok(read(&self.expenses)?.get(expense_id).cloned())
    }

    async fn list_expenses(
        &self,
        group_id: &str,
        filter: &ExpenseFilter,
    ) -> SettlementResult<Vec<Expense>> {
        let mut expenses: Vec<Expense> = read(&self.expenses)?
            .values()
            .filter(|expense| expense.group_id == group_id && filter.matches(expense))
            .cloned()
            .collect();

        expenses.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(expenses)
    }

    async fn update_expense(&mut self, expense: &Expense) -> SettlementResult<()> {
        let mut expenses = write(&self.expenses)?;
        match expenses.get_mut(&expense.id) {
            Some(existing) => {
                *existing = expense.clone();
                Ok(())
            }
            None => Err(SettlementError::ExpenseNotFound(expense.id.clone())),
        }
    }

    async fn delete_expense(&mut self, expense_id: &str) -> SettlementResult<()> {
        if write(&self.expenses)?.remove(expense_id).is_some() {
            Ok(())
        } else {
            Err(SettlementError::ExpenseNotFound(expense_id.to_string()))
        }
    }

    async fn save_settlement(&mut self, record: &SettlementRecord) -> SettlementResult<()> {
        write(&self.settlements)?.push(record.clone());
        Ok(())
    }

    async fn list_settlements(&self, group_id: &str) -> SettlementResult<Vec<SettlementRecord>> {
        // Ties keep reverse insertion order
        let mut records: Vec<SettlementRecord> = read(&self.settlements)?
            .iter()
            .rev()
            .filter(|record| record.group_id == group_id)
            .cloned()
            .collect();

        records.sort_by(|a, b| {
            let a_at = a.settled_at.unwrap_or(a.created_at);
            let b_at = b.settled_at.unwrap_or(b.created_at);
            b_at.cmp(&a_at)
        });
        Ok(records)
    }
}
