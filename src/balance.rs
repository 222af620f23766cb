use indexmap::{IndexMap, IndexSet};
use tracing::trace;

use crate::schemas::{Expense, Member, MemberId};

/// Net position per member: positive is owed money, negative owes money.
pub type Balance = IndexMap<MemberId, f64>;

/// Folds the expenses into a net balance per member.
///
/// Every roster member starts at zero. Ids that only appear in expenses
/// (removed or temporary members) still get an entry, appended in the
/// order they are first seen.
pub fn compute_balance(expenses: &[Expense], members: &[Member]) -> Balance {
    let mut balance: Balance = members.iter().map(|m| (m.id.clone(), 0.0)).collect();

    for expense in expenses {
        debug_assert!(
            expense.amount.is_finite() && expense.amount >= 0.0,
            "expense {} has invalid amount {}",
            expense.id,
            expense.amount
        );

        let involved: IndexSet<&MemberId> = expense.involved_uids.iter().collect();
        if involved.is_empty() {
            trace!(expense = %expense.id, "expense has nobody involved, skipping split");
            continue;
        }

        let amount = expense.amount;
        *balance.entry(expense.payer_uid.clone()).or_insert(0.0) += amount;

        let amount_per_receiver = amount / involved.len() as f64;
        for receiver in involved {
            *balance.entry(receiver.clone()).or_insert(0.0) -= amount_per_receiver;
        }
    }
    balance
}
