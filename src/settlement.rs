use indexmap::IndexSet;
use tracing::{debug, warn};

use crate::balance::compute_balance;
use crate::exchange::match_debts;
use crate::schemas::{Expense, Member, MemberId, Settlement};

/// Balances within this distance of zero count as settled.
pub const EPSILON: f64 = 0.01;

/// Tolerance for the sum-to-zero check over a balance.
pub const ZERO_SUM_TOLERANCE: f64 = 1e-6;

/// Total spend and the transfers that bring every member back to zero.
///
/// Pure: the same snapshot always yields the same settlement. Expenses with
/// nobody involved still count toward `total_spend`.
pub fn settle(expenses: &[Expense], members: &[Member]) -> Settlement {
    let total_spend = expenses.iter().map(|e| e.amount).sum();

    let unknown = unknown_member_ids(expenses, members);
    if !members.is_empty() && !unknown.is_empty() {
        warn!(?unknown, "expenses reference ids missing from the roster");
    }

    let balance = compute_balance(expenses, members);
    let plan = match_debts(&balance, EPSILON);
    debug!(
        expenses = expenses.len(),
        members = members.len(),
        transfers = plan.len(),
        total_spend,
        "computed settlement"
    );

    Settlement { total_spend, plan }
}

/// Ids that end up with a balance entry without being on the roster, in
/// first-seen order.
pub fn unknown_member_ids(expenses: &[Expense], members: &[Member]) -> Vec<MemberId> {
    let known: IndexSet<&MemberId> = members.iter().map(|m| &m.id).collect();
    let mut unknown = IndexSet::new();
    // Expenses with nobody involved never touch a balance, so their payer
    // is not reported either.
    for expense in expenses.iter().filter(|e| !e.involved_uids.is_empty()) {
        for id in std::iter::once(&expense.payer_uid).chain(&expense.involved_uids) {
            if !known.contains(id) {
                unknown.insert(id.clone());
            }
        }
    }
    unknown.into_iter().collect()
}
