use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type MemberId = String;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: MemberId,
    pub display_name: String,
    #[serde(default)]
    pub temporary: bool,
}

impl Member {
    pub fn new(id: impl Into<MemberId>, display_name: impl Into<String>) -> Self {
        Member {
            id: id.into(),
            display_name: display_name.into(),
            temporary: false,
        }
    }
}

/// A single logged expense. Amounts are already in the group's base currency.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    #[serde(default)]
    pub description: String,
    pub amount: f64,
    pub payer_uid: MemberId,
    #[serde(default)]
    pub involved_uids: Vec<MemberId>,
    #[serde(default = "default_category")]
    pub category: String,
    pub timestamp: DateTime<Utc>,
}

fn default_category() -> String {
    "Miscellaneous".to_string()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupStatus {
    Active,
    Settled,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    pub members: Vec<Member>,
    pub status: GroupStatus,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settled_at: Option<DateTime<Utc>>,
}

/// `from` pays `to` the given amount.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Transfer {
    pub from: MemberId,
    pub to: MemberId,
    pub amount: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub total_spend: f64,
    pub plan: Vec<Transfer>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SettlementRequest {
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub members: Vec<Member>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GroupNameJson {
    #[serde(default)]
    pub name: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GroupQuery {
    pub status: Option<GroupStatus>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMember {
    pub id: Option<MemberId>,
    pub display_name: String,
}

/// An expense as entered by a user, possibly in a foreign currency.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseInput {
    #[serde(default)]
    pub description: String,
    pub amount: f64,
    pub payer_uid: MemberId,
    #[serde(default)]
    pub involved_uids: Vec<MemberId>,
    pub category: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub currency: Option<String>,
    pub exchange_rate: Option<f64>,
}
