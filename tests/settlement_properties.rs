use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use opensplit_settle::{compute_balance, settle, Expense, Member, EPSILON, ZERO_SUM_TOLERANCE};

const NAMES: [&str; 6] = ["alice", "bob", "carol", "dave", "erin", "frank"];

fn roster(member_count: usize) -> Vec<Member> {
    NAMES[..member_count]
        .iter()
        .map(|id| Member::new(*id, id.to_uppercase()))
        .collect()
}

fn build_expenses(
    member_count: usize,
    amounts: &[u32],
    payer_indexes: &[usize],
    involved_masks: &[u8],
) -> Vec<Expense> {
    amounts
        .iter()
        .enumerate()
        .map(|(idx, cents)| {
            let payer = payer_indexes.get(idx).copied().unwrap_or(0) % member_count;
            let mask = involved_masks.get(idx).copied().unwrap_or(0);
            let involved = (0..member_count)
                .filter(|bit| mask & (1 << bit) != 0)
                .map(|bit| NAMES[bit].to_string())
                .collect();
            Expense {
                id: format!("exp{idx}"),
                description: format!("expense {idx}"),
                amount: f64::from(*cents) / 100.0,
                payer_uid: NAMES[payer].to_string(),
                involved_uids: involved,
                category: "Miscellaneous".to_string(),
                timestamp: Utc.timestamp_opt(1_700_000_000 + idx as i64, 0).unwrap(),
            }
        })
        .collect()
}

prop_compose! {
    fn group_snapshot()(
        member_count in 1usize..=6,
        amounts in prop::collection::vec(0u32..=100_000, 0..=25),
        payer_indexes in prop::collection::vec(0usize..=5, 25),
        involved_masks in prop::collection::vec(any::<u8>(), 25),
    ) -> (Vec<Expense>, Vec<Member>) {
        (
            build_expenses(member_count, &amounts, &payer_indexes, &involved_masks),
            roster(member_count),
        )
    }
}

proptest! {
    #[test]
    fn balances_sum_to_zero((expenses, members) in group_snapshot()) {
        let balance = compute_balance(&expenses, &members);
        let total: f64 = balance.values().sum();
        prop_assert!(total.abs() < ZERO_SUM_TOLERANCE, "balances sum to {total}");
    }

    #[test]
    fn plan_moves_exactly_the_outstanding_credit((expenses, members) in group_snapshot()) {
        let balance = compute_balance(&expenses, &members);
        let credit: f64 = balance.values().filter(|v| **v > 0.0).sum();
        let debt: f64 = balance.values().filter(|v| **v < 0.0).map(|v| -v).sum();
        let settlement = settle(&expenses, &members);
        let moved: f64 = settlement.plan.iter().map(|t| t.amount).sum();

        let slack = EPSILON * balance.len() as f64 + ZERO_SUM_TOLERANCE;
        prop_assert!((credit - debt).abs() < ZERO_SUM_TOLERANCE);
        prop_assert!((moved - credit).abs() <= slack, "moved {moved}, credit {credit}");
    }

    #[test]
    fn transfers_are_positive_and_never_to_self((expenses, members) in group_snapshot()) {
        for transfer in settle(&expenses, &members).plan {
            prop_assert_ne!(&transfer.from, &transfer.to);
            prop_assert!(transfer.amount > 0.0);
        }
    }

    #[test]
    fn executing_the_plan_settles_everyone((expenses, members) in group_snapshot()) {
        let mut balance = compute_balance(&expenses, &members);
        let settlement = settle(&expenses, &members);
        let parties = balance.values().filter(|v| v.abs() > EPSILON).count();
        prop_assert!(settlement.plan.len() <= parties.saturating_sub(1));

        for transfer in &settlement.plan {
            balance[&transfer.from] += transfer.amount;
            balance[&transfer.to] -= transfer.amount;
        }
        let slack = EPSILON * balance.len() as f64 + ZERO_SUM_TOLERANCE;
        for (id, residual) in &balance {
            prop_assert!(residual.abs() <= slack, "{id} left with {residual}");
        }
    }

    #[test]
    fn total_spend_counts_every_expense((expenses, members) in group_snapshot()) {
        let expected: f64 = expenses.iter().map(|e| e.amount).sum();
        prop_assert_eq!(settle(&expenses, &members).total_spend, expected);
    }

    #[test]
    fn settle_is_deterministic((expenses, members) in group_snapshot()) {
        let first = settle(&expenses, &members);
        let second = settle(&expenses, &members);
        prop_assert_eq!(first.total_spend.to_bits(), second.total_spend.to_bits());
        prop_assert_eq!(first.plan, second.plan);
    }
}
