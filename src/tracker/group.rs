//! Group and membership management

use crate::traits::*;
use crate::types::*;

/// Group manager for handling group and membership operations
pub struct GroupManager<S: ExpenseStorage> {
    pub(crate) storage: S,
    validator: Box<dyn GroupValidator>,
}

impl<S: ExpenseStorage> GroupManager<S> {
    /// Create a new group manager
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            validator: Box::new(DefaultGroupValidator),
        }
    }

    /// Create a new group manager with custom validator
    pub fn with_validator(storage: S, validator: Box<dyn GroupValidator>) -> Self {
        Self { storage, validator }
    }

    /// Create a new group
    pub async fn create_group(
        &mut self,
        id: String,
        name: String,
        currency: Currency,
        members: Vec<Member>,
    ) -> SettlementResult<Group> {
        let group = Group::new(id, name, currency, members);

        // Validate the group
        self.validator.validate_group(&group)?;

        // Check if group already exists
        if self.storage.get_group(&group.id).await?.is_some() {
            return Err(SettlementError::Validation(format!(
                "Group with ID '{}' already exists",
                group.id
            )));
        }

        self.storage.save_group(&group).await?;

        tracing::debug!(
            group_id = %group.id,
            member_count = group.members.len(),
            "Group created"
        );

        Ok(group)
    }

    /// Get a group by ID
    pub async fn get_group(&self, group_id: &str) -> SettlementResult<Option<Group>> {
        self.storage.get_group(group_id).await
    }

    /// Get a group by ID, returning an error if not found
    pub async fn get_group_required(&self, group_id: &str) -> SettlementResult<Group> {
        self.storage
            .get_group(group_id)
            .await?
            .ok_or_else(|| SettlementError::GroupNotFound(group_id.to_string()))
    }

    /// List all groups
    pub async fn list_groups(&self) -> SettlementResult<Vec<Group>> {
        self.storage.list_groups().await
    }

    /// Rename a group
    pub async fn rename_group(&mut self, group_id: &str, name: String) -> SettlementResult<Group> {
        let mut group = self.get_group_required(group_id).await?;
        group.name = name;
        group.updated_at = chrono::Utc::now().naive_utc();

        self.validator.validate_group(&group)?;
        self.storage.update_group(&group).await?;

        Ok(group)
    }

    /// Delete a group with its expenses and settlement records
    pub async fn delete_group(&mut self, group_id: &str) -> SettlementResult<()> {
        // Ensure the group exists
        self.get_group_required(group_id).await?;
        self.storage.delete_group(group_id).await
    }

    /// Add a member to a group
    pub async fn add_member(&mut self, group_id: &str, member: Member) -> SettlementResult<Group> {
        self.validator.validate_member(&member)?;

        let mut group = self.get_group_required(group_id).await?;
        if group.has_member(&member.id) {
            return Err(SettlementError::Validation(format!(
                "Member '{}' is already in group '{}'",
                member.id, group_id
            )));
        }

        group.members.push(member);
        group.updated_at = chrono::Utc::now().naive_utc();
        self.storage.update_group(&group).await?;

        Ok(group)
    }

    /// Remove a member who is not referenced by any expense of the group
    pub async fn remove_member(&mut self, group_id: &str, member_id: &str) -> SettlementResult<Group> {
        let mut group = self.get_group_required(group_id).await?;
        if !group.has_member(member_id) {
            return Err(SettlementError::MemberNotFound(member_id.to_string()));
        }

        let expenses = self
            .storage
            .list_expenses(group_id, &ExpenseFilter::default())
            .await?;
        if expenses.iter().any(|expense| expense.involves(member_id)) {
            return Err(SettlementError::Validation(format!(
                "Member '{}' has expenses in group '{}' and cannot be removed",
                member_id, group_id
            )));
        }

        group.members.retain(|m| m.id != member_id);
        group.updated_at = chrono::Utc::now().naive_utc();
        self.storage.update_group(&group).await?;

        Ok(group)
    }
}
