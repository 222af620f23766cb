//! Shared-expense settlement: folds a group's expenses into net balances and
//! matches debtors against creditors into a list of transfers.
//!
//! [`settle`] is the entry point. The HTTP surface in [`routes`] wraps it
//! around an in-memory group store.

pub mod balance;
pub mod config;
pub mod currency;
pub mod error;
pub mod exchange;
pub mod routes;
pub mod schemas;
pub mod settlement;
pub mod store;

pub use balance::{compute_balance, Balance};
pub use exchange::match_debts;
pub use schemas::{Expense, Member, Settlement, Transfer};
pub use settlement::{settle, unknown_member_ids, EPSILON, ZERO_SUM_TOLERANCE};
