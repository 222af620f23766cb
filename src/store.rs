use chrono::Utc;
use dashmap::{mapref::entry::Entry, DashMap};
use tracing::info;

use crate::error::StoreError;
use crate::schemas::{Expense, Group, GroupStatus, Member};

#[derive(Debug)]
struct GroupRecord {
    group: Group,
    expenses: Vec<Expense>,
}

/// In-memory groups, members and expenses.
///
/// Readers always get cloned snapshots, never references into the store, so
/// a settlement computed from them cannot observe a concurrent write.
#[derive(Debug, Default)]
pub struct GroupStore {
    groups: DashMap<String, GroupRecord>,
}

impl GroupStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, id: &str, f: impl FnOnce(&GroupRecord) -> T) -> Result<T, StoreError> {
        self.groups
            .get(id)
            .map(|record| f(&record))
            .ok_or_else(|| StoreError::GroupNotFound(id.to_string()))
    }

    fn write<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut GroupRecord) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut record = self
            .groups
            .get_mut(id)
            .ok_or_else(|| StoreError::GroupNotFound(id.to_string()))?;
        f(&mut record)
    }

    /// Like `write`, but refuses once the group has been settled.
    fn write_active<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut GroupRecord) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        self.write(id, |record| {
            if record.group.status == GroupStatus::Settled {
                return Err(StoreError::GroupSettled(record.group.id.clone()));
            }
            f(record)
        })
    }

    pub fn create_group(&self, id: &str, name: &str) -> Result<Group, StoreError> {
        let slot = match self.groups.entry(id.to_string()) {
            Entry::Occupied(_) => return Err(StoreError::GroupExists(id.to_string())),
            Entry::Vacant(slot) => slot,
        };
        let group = Group {
            id: id.to_string(),
            name: name.to_string(),
            members: vec![],
            status: GroupStatus::Active,
            created_at: Utc::now(),
            settled_at: None,
        };
        slot.insert(GroupRecord {
            group: group.clone(),
            expenses: vec![],
        });
        info!(group = id, "group created");
        Ok(group)
    }

    pub fn group(&self, id: &str) -> Result<Group, StoreError> {
        self.read(id, |record| record.group.clone())
    }

    /// Groups newest first, optionally only those with the given status.
    pub fn groups(&self, status: Option<GroupStatus>) -> Vec<Group> {
        let mut groups: Vec<Group> = self
            .groups
            .iter()
            .filter(|record| status.map_or(true, |s| record.group.status == s))
            .map(|record| record.group.clone())
            .collect();
        groups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        groups
    }

    /// Removes the group with all its expenses, whatever its status.
    pub fn delete_group(&self, id: &str) -> Result<(), StoreError> {
        match self.groups.remove(id) {
            Some(_) => {
                info!(group = id, "group deleted");
                Ok(())
            }
            None => Err(StoreError::GroupNotFound(id.to_string())),
        }
    }

    pub fn add_member(&self, group_id: &str, member: Member) -> Result<Member, StoreError> {
        self.write_active(group_id, |record| {
            if record.group.members.iter().any(|m| m.id == member.id) {
                return Err(StoreError::MemberExists(member.id.clone()));
            }
            record.group.members.push(member.clone());
            Ok(member)
        })
    }

    /// Expenses ordered most recent first.
    pub fn expenses(&self, group_id: &str) -> Result<Vec<Expense>, StoreError> {
        self.read(group_id, |record| {
            let mut expenses = record.expenses.clone();
            expenses.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            expenses
        })
    }

    /// A consistent point-in-time copy of the group's expenses and roster.
    pub fn snapshot(&self, group_id: &str) -> Result<(Vec<Expense>, Vec<Member>), StoreError> {
        self.read(group_id, |record| {
            (record.expenses.clone(), record.group.members.clone())
        })
    }

    pub fn add_expense(&self, group_id: &str, expense: Expense) -> Result<Expense, StoreError> {
        self.write_active(group_id, |record| {
            record.expenses.push(expense.clone());
            Ok(expense)
        })
    }

    /// Replaces the whole expense; there are no partial edits.
    pub fn replace_expense(
        &self,
        group_id: &str,
        expense_id: &str,
        expense: Expense,
    ) -> Result<Expense, StoreError> {
        self.write_active(group_id, |record| {
            let slot = record
                .expenses
                .iter_mut()
                .find(|e| e.id == expense_id)
                .ok_or_else(|| StoreError::ExpenseNotFound(expense_id.to_string()))?;
            *slot = expense.clone();
            Ok(expense)
        })
    }

    pub fn delete_expense(&self, group_id: &str, expense_id: &str) -> Result<(), StoreError> {
        self.write_active(group_id, |record| {
            let position = record
                .expenses
                .iter()
                .position(|e| e.id == expense_id)
                .ok_or_else(|| StoreError::ExpenseNotFound(expense_id.to_string()))?;
            record.expenses.remove(position);
            Ok(())
        })
    }

    /// Moves the group from active to settled.
    pub fn mark_settled(&self, group_id: &str) -> Result<Group, StoreError> {
        self.write_active(group_id, |record| {
            record.group.status = GroupStatus::Settled;
            record.group.settled_at = Some(Utc::now());
            info!(group = group_id, "group settled");
            Ok(record.group.clone())
        })
    }
}
