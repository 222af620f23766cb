use tracing::debug;

use crate::balance::Balance;
use crate::schemas::{MemberId, Transfer};

#[derive(Clone, Debug)]
pub struct PersonalBalance {
    pub id: MemberId,
    pub balance: f64,
}

/// Splits a balance into debtors and creditors, each holding the absolute
/// amount still to pay or receive. Members within `epsilon` of zero are
/// already settled and land in neither list.
fn split_payers_and_receivers(
    balance: &Balance,
    epsilon: f64,
) -> (Vec<PersonalBalance>, Vec<PersonalBalance>) {
    let mut payers = Vec::new();
    let mut receivers = Vec::new();

    for (id, &net) in balance {
        let person = PersonalBalance {
            id: id.clone(),
            balance: net.abs(),
        };
        if net < -epsilon {
            payers.push(person);
        } else if net > epsilon {
            receivers.push(person);
        }
    }

    // Largest first. `sort_by` is stable so equal balances keep map order.
    payers.sort_by(|a, b| b.balance.total_cmp(&a.balance));
    receivers.sort_by(|a, b| b.balance.total_cmp(&a.balance));
    (payers, receivers)
}

/// Greedy largest-debtor against largest-creditor matching.
///
/// Produces a zero-sum plan in at most `debtors + creditors - 1` transfers.
/// This is not guaranteed to be the minimum number of transfers; finding that
/// is NP-hard and out of reach for a recompute-on-every-change engine.
///
/// An input that does not sum to zero leaves residual debt or credit behind;
/// matching stops once either side runs out and the residual is dropped.
pub fn match_debts(balance: &Balance, epsilon: f64) -> Vec<Transfer> {
    let (mut payers, mut receivers) = split_payers_and_receivers(balance, epsilon);

    let mut exchanges = Vec::with_capacity((payers.len() + receivers.len()).saturating_sub(1));
    let (mut i, mut j) = (0, 0);

    while i < payers.len() && j < receivers.len() {
        let payer = &mut payers[i];
        let receiver = &mut receivers[j];

        let amount = payer.balance.min(receiver.balance);
        exchanges.push(Transfer {
            from: payer.id.clone(),
            to: receiver.id.clone(),
            amount,
        });

        payer.balance -= amount;
        receiver.balance -= amount;

        if payer.balance < epsilon {
            i += 1;
        }
        if receiver.balance < epsilon {
            j += 1;
        }
    }

    let unmatched: f64 = payers[i..]
        .iter()
        .chain(&receivers[j..])
        .map(|p| p.balance)
        .filter(|b| *b >= epsilon)
        .sum();
    if unmatched > 0.0 {
        debug!(unmatched, "balance did not net to zero, residual left unmatched");
    }

    exchanges
}
