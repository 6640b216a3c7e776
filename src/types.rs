//! Core types and data structures for the settlement system

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a group member
pub type MemberId = String;

/// A participant in a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Unique identifier for the member
    pub id: MemberId,
    /// Display name
    pub name: String,
    /// Optional contact email
    pub email: Option<String>,
    /// Optional avatar URL
    pub avatar_url: Option<String>,
}

impl Member {
    /// Create a new member with display name only
    pub fn new(id: impl Into<MemberId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
            avatar_url: None,
        }
    }

    /// Attach an email address
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Currency label carried by a group. No conversion is ever performed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Inr,
    Usd,
    Eur,
    Gbp,
}

impl Currency {
    /// ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Inr => "INR",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
        }
    }
}

/// Spending category of an expense
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    Food,
    Transport,
    Accommodation,
    Entertainment,
    Shopping,
    Bills,
    Healthcare,
    Education,
    #[default]
    Other,
}

/// How an expense is divided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitType {
    /// Equal shares among the named participants
    Equal,
    /// Explicit per-participant amounts
    Custom,
}

/// Explicit amount owed by one participant of a custom split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomShare {
    pub member_id: MemberId,
    pub amount: BigDecimal,
}

impl CustomShare {
    pub fn new(member_id: impl Into<MemberId>, amount: BigDecimal) -> Self {
        Self {
            member_id: member_id.into(),
            amount,
        }
    }
}

/// Split rule of an expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Split {
    Equal { participants: Vec<MemberId> },
    Custom { shares: Vec<CustomShare> },
}

impl Split {
    pub fn split_type(&self) -> SplitType {
        match self {
            Split::Equal { .. } => SplitType::Equal,
            Split::Custom { .. } => SplitType::Custom,
        }
    }

    /// Ids of everyone who owes a share, in declaration order
    pub fn participant_ids(&self) -> Vec<&str> {
        match self {
            Split::Equal { participants } => participants.iter().map(String::as_str).collect(),
            Split::Custom { shares } => shares.iter().map(|s| s.member_id.as_str()).collect(),
        }
    }
}

/// An immutable expense record belonging to exactly one group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier for the expense
    pub id: String,
    /// Group the expense belongs to
    pub group_id: String,
    /// What the money was spent on
    pub description: String,
    /// Total amount paid
    pub amount: BigDecimal,
    /// Member who paid
    pub paid_by: MemberId,
    /// How the amount is divided
    pub split: Split,
    pub category: ExpenseCategory,
    /// Date the expense occurred
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Expense {
    /// Create a new expense dated today
    pub fn new(
        id: String,
        group_id: String,
        description: String,
        amount: BigDecimal,
        paid_by: MemberId,
        split: Split,
    ) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id,
            group_id,
            description,
            amount,
            paid_by,
            split,
            category: ExpenseCategory::default(),
            date: now.date(),
            notes: None,
            created_at: now,
        }
    }

    pub fn split_type(&self) -> SplitType {
        self.split.split_type()
    }

    /// Sum of the explicit shares, or `None` for an equal split
    pub fn custom_total(&self) -> Option<BigDecimal> {
        match &self.split {
            Split::Equal { .. } => None,
            Split::Custom { shares } => Some(shares.iter().map(|s| &s.amount).sum()),
        }
    }

    /// How far the custom shares miss the amount; zero for an equal split
    pub fn split_residue(&self) -> BigDecimal {
        match self.custom_total() {
            Some(total) => (&self.amount - total).abs(),
            None => BigDecimal::from(0),
        }
    }

    /// Whether the member paid for or shares in this expense
    pub fn involves(&self, member_id: &str) -> bool {
        self.paid_by == member_id || self.split.participant_ids().contains(&member_id)
    }

    /// Check that the amount and split are internally consistent
    pub fn validate_split(&self, tolerance: &BigDecimal) -> SettlementResult<()> {
        if self.amount <= BigDecimal::from(0) {
            return Err(SettlementError::MalformedExpense(format!(
                "Expense '{}' amount must be positive",
                self.id
            )));
        }

        match &self.split {
            Split::Equal { participants } => {
                if participants.is_empty() {
                    return Err(SettlementError::MalformedExpense(format!(
                        "Expense '{}' has an equal split with no participants",
                        self.id
                    )));
                }
            }
            Split::Custom { shares } => {
                if shares.is_empty() {
                    return Err(SettlementError::MalformedExpense(format!(
                        "Expense '{}' has a custom split with no shares",
                        self.id
                    )));
                }

                if shares.iter().any(|s| s.amount < BigDecimal::from(0)) {
                    return Err(SettlementError::MalformedExpense(format!(
                        "Expense '{}' has a negative custom share",
                        self.id
                    )));
                }

                let total: BigDecimal = shares.iter().map(|s| &s.amount).sum();
                if (&total - &self.amount).abs() > *tolerance {
                    return Err(SettlementError::MalformedExpense(format!(
                        "Custom split amounts must equal the total expense amount: {} != {}",
                        total, self.amount
                    )));
                }
            }
        }

        Ok(())
    }
}

/// A group of members sharing expenses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Unique identifier for the group
    pub id: String,
    /// Human-readable group name
    pub name: String,
    pub currency: Currency,
    /// Members in the order they joined
    pub members: Vec<Member>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Group {
    /// Create a new group
    pub fn new(id: String, name: String, currency: Currency, members: Vec<Member>) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id,
            name,
            currency,
            members,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_member(&self, member_id: &str) -> bool {
        self.members.iter().any(|m| m.id == member_id)
    }

    pub fn member(&self, member_id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == member_id)
    }
}

/// One member's signed position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceEntry {
    pub member_id: MemberId,
    /// Positive when the member is owed money, negative when they owe
    pub amount: BigDecimal,
}

/// Net position of every member, in member-list order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetBalance {
    entries: Vec<BalanceEntry>,
}

impl NetBalance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of a single member
    pub fn get(&self, member_id: &str) -> Option<&BigDecimal> {
        self.entries
            .iter()
            .find(|e| e.member_id == member_id)
            .map(|e| &e.amount)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BalanceEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all balances; zero for any closed set of expenses
    pub fn total(&self) -> BigDecimal {
        self.entries.iter().map(|e| &e.amount).sum()
    }

    /// Add `delta` to a member's balance, appending the member if absent
    pub fn adjust(&mut self, member_id: &str, delta: &BigDecimal) {
        match self.entries.iter_mut().find(|e| e.member_id == member_id) {
            Some(entry) => entry.amount += delta,
            None => self.entries.push(BalanceEntry {
                member_id: member_id.to_string(),
                amount: delta.clone(),
            }),
        }
    }
}

impl FromIterator<(MemberId, BigDecimal)> for NetBalance {
    fn from_iter<I: IntoIterator<Item = (MemberId, BigDecimal)>>(iter: I) -> Self {
        let mut balance = NetBalance::new();
        for (member_id, amount) in iter {
            balance.adjust(&member_id, &amount);
        }
        balance
    }
}

impl From<Vec<BalanceEntry>> for NetBalance {
    fn from(entries: Vec<BalanceEntry>) -> Self {
        entries
            .into_iter()
            .map(|e| (e.member_id, e.amount))
            .collect()
    }
}

/// A recommended payment from a debtor to a creditor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    /// Member who pays
    pub from: MemberId,
    /// Member who receives
    pub to: MemberId,
    /// Positive amount, rounded to the configured scale
    pub amount: BigDecimal,
}

/// Combined output of one engine run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementReport {
    pub net_balance: NetBalance,
    pub settlements: Vec<Settlement>,
}

/// Per-member view of a settlement list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberBalance {
    pub member: Member,
    /// Total this member still has to pay
    pub total_owed: BigDecimal,
    /// Total this member still has to receive
    pub total_to_receive: BigDecimal,
    /// `total_to_receive - total_owed`
    pub net_balance: BigDecimal,
}

/// Everything needed to render a group's balances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub group_id: String,
    pub total_expenses: usize,
    pub total_amount: BigDecimal,
    pub currency: Currency,
    pub member_count: usize,
    pub settlements: Vec<Settlement>,
    pub member_balances: Vec<MemberBalance>,
}

/// Lifecycle of a recorded payment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementStatus {
    #[default]
    Pending,
    Settled,
}

/// A confirmed payment stored in the settlement ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementRecord {
    pub id: Uuid,
    pub group_id: String,
    pub from: MemberId,
    pub to: MemberId,
    pub amount: BigDecimal,
    pub currency: Currency,
    pub status: SettlementStatus,
    pub settled_at: Option<NaiveDateTime>,
    /// Member who confirmed the payment
    pub settled_by: Option<MemberId>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Filter applied when listing a group's expenses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseFilter {
    pub category: Option<ExpenseCategory>,
    /// Inclusive lower bound on the expense date
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on the expense date
    pub end_date: Option<NaiveDate>,
}

impl ExpenseFilter {
    pub fn matches(&self, expense: &Expense) -> bool {
        if let Some(category) = self.category {
            if expense.category != category {
                return false;
            }
        }
        if let Some(start) = self.start_date {
            if expense.date < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if expense.date > end {
                return false;
            }
        }
        true
    }
}

/// One page of a longer listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub pages: usize,
}

/// Errors that can occur in the settlement system
#[derive(Debug, thiserror::Error)]
pub enum SettlementError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Member '{member_id}' in expense '{expense_id}' is not a group member")]
    InvalidParticipant {
        expense_id: String,
        member_id: MemberId,
    },
    #[error("Malformed expense: {0}")]
    MalformedExpense(String),
    #[error("Net balances do not sum to zero (sum = {sum})")]
    InvariantViolation { sum: BigDecimal },
    #[error("Group not found: {0}")]
    GroupNotFound(String),
    #[error("Expense not found: {0}")]
    ExpenseNotFound(String),
    #[error("Member not found: {0}")]
    MemberNotFound(String),
    #[error("Validation error: {0}")]
    Validation(String),
}

impl SettlementError {
    /// Internal errors indicate corrupted upstream data, not bad user input
    pub fn is_internal(&self) -> bool {
        matches!(self, SettlementError::InvariantViolation { .. })
    }
}

/// Result type for settlement operations
pub type SettlementResult<T> = Result<T, SettlementError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_net_balance_merges_duplicates() {
        let balance: NetBalance = vec![
            ("a".to_string(), BigDecimal::from(10)),
            ("b".to_string(), BigDecimal::from(-4)),
            ("a".to_string(), BigDecimal::from(-6)),
        ]
        .into_iter()
        .collect();

        assert_eq!(balance.len(), 2);
        assert_eq!(balance.get("a"), Some(&BigDecimal::from(4)));
        assert_eq!(balance.total(), BigDecimal::from(0));
    }

    #[test]
    fn test_expense_filter_bounds_are_inclusive() {
        let mut expense = Expense::new(
            "e1".to_string(),
            "g1".to_string(),
            "Museum".to_string(),
            BigDecimal::from(30),
            "a".to_string(),
            Split::Equal {
                participants: vec!["a".to_string()],
            },
        );
        expense.category = ExpenseCategory::Entertainment;
        expense.date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        let filter = ExpenseFilter {
            category: Some(ExpenseCategory::Entertainment),
            start_date: NaiveDate::from_ymd_opt(2024, 5, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 5, 1),
        };
        assert!(filter.matches(&expense));

        let food_only = ExpenseFilter {
            category: Some(ExpenseCategory::Food),
            ..ExpenseFilter::default()
        };
        assert!(!food_only.matches(&expense));
    }

    #[test]
    fn test_split_serializes_with_type_tag() {
        let split = Split::Custom {
            shares: vec![CustomShare::new("a", BigDecimal::from(5))],
        };
        let json = serde_json::to_value(&split).unwrap();
        assert_eq!(json["type"], "custom");
    }
}
