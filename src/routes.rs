use actix_web::{delete, get, post, put, web, HttpResponse};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::balance::compute_balance;
use crate::currency::CurrencyNormalizer;
use crate::error::{ApiError, ValidationError};
use crate::schemas::{
    Expense, ExpenseInput, GroupNameJson, GroupQuery, Member, NewMember, SettlementRequest,
};
use crate::settlement::settle;
use crate::store::GroupStore;

pub struct AppState {
    pub store: GroupStore,
    pub normalizer: CurrencyNormalizer,
}

impl AppState {
    pub fn new(base_currency: &str) -> Self {
        AppState {
            store: GroupStore::new(),
            normalizer: CurrencyNormalizer::new(base_currency),
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(compute_settlement)
        .service(list_groups)
        .service(add_group)
        .service(get_group)
        .service(delete_group)
        .service(add_member)
        .service(list_expenses)
        .service(add_expense)
        .service(replace_expense)
        .service(delete_expense)
        .service(get_balance)
        .service(get_settlement)
        .service(settle_group);
}

fn expense_from_input(
    id: String,
    input: ExpenseInput,
    normalizer: &CurrencyNormalizer,
) -> Result<Expense, ValidationError> {
    if input.payer_uid.trim().is_empty() {
        return Err(ValidationError::MissingPayer);
    }
    let amount = normalizer.normalize(input.amount, input.currency.as_deref(), input.exchange_rate)?;
    Ok(Expense {
        id,
        description: input.description,
        amount,
        payer_uid: input.payer_uid,
        involved_uids: input.involved_uids,
        category: input.category.unwrap_or_else(|| "Miscellaneous".to_string()),
        timestamp: input.timestamp.unwrap_or_else(Utc::now),
    })
}

#[post("/settlement")]
async fn compute_settlement(request: web::Json<SettlementRequest>) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    if let Some(bad) = request
        .expenses
        .iter()
        .find(|e| !e.amount.is_finite() || e.amount < 0.0)
    {
        return Err(ValidationError::InvalidAmount(bad.amount).into());
    }
    Ok(HttpResponse::Ok().json(settle(&request.expenses, &request.members)))
}

#[put("/groups/{id}")]
async fn add_group(
    state: web::Data<AppState>,
    id: web::Path<String>,
    json: web::Json<GroupNameJson>,
) -> Result<HttpResponse, ApiError> {
    let name = json.into_inner().name.trim().to_string();
    // Unnamed groups are named after the day they were created.
    let name = if name.is_empty() {
        Utc::now().date_naive().format("%Y-%m-%d").to_string()
    } else {
        name
    };
    let group = state.store.create_group(&id, &name)?;
    Ok(HttpResponse::Ok().json(group))
}

#[get("/groups")]
async fn list_groups(state: web::Data<AppState>, query: web::Query<GroupQuery>) -> HttpResponse {
    HttpResponse::Ok().json(state.store.groups(query.status))
}

#[delete("/groups/{id}")]
async fn delete_group(state: web::Data<AppState>, id: web::Path<String>) -> Result<HttpResponse, ApiError> {
    state.store.delete_group(&id)?;
    Ok(HttpResponse::Ok().body("Group deleted"))
}

#[get("/groups/{id}")]
async fn get_group(state: web::Data<AppState>, id: web::Path<String>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.store.group(&id)?))
}

#[post("/groups/{id}/members")]
async fn add_member(
    state: web::Data<AppState>,
    id: web::Path<String>,
    json: web::Json<NewMember>,
) -> Result<HttpResponse, ApiError> {
    let new_member = json.into_inner();
    let display_name = new_member.display_name.trim().to_string();
    if display_name.is_empty() {
        return Err(ValidationError::MissingDisplayName.into());
    }
    let member = match new_member.id.filter(|id| !id.trim().is_empty()) {
        Some(member_id) => Member::new(member_id, display_name),
        None => Member {
            id: format!("temp-{}", Uuid::new_v4()),
            display_name,
            temporary: true,
        },
    };
    let member = state.store.add_member(&id, member)?;
    info!(group = %id, member = %member.id, temporary = member.temporary, "member added");
    Ok(HttpResponse::Ok().json(member))
}

#[get("/groups/{id}/expenses")]
async fn list_expenses(state: web::Data<AppState>, id: web::Path<String>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.store.expenses(&id)?))
}

#[post("/groups/{id}/expenses")]
async fn add_expense(
    state: web::Data<AppState>,
    id: web::Path<String>,
    expense: web::Json<ExpenseInput>,
) -> Result<HttpResponse, ApiError> {
    let expense = expense_from_input(Uuid::new_v4().to_string(), expense.into_inner(), &state.normalizer)?;
    let expense = state.store.add_expense(&id, expense)?;
    info!(group = %id, expense = %expense.id, amount = expense.amount, "expense added");
    Ok(HttpResponse::Ok().json(expense))
}

#[put("/groups/{id}/expenses/{expense_id}")]
async fn replace_expense(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    expense: web::Json<ExpenseInput>,
) -> Result<HttpResponse, ApiError> {
    let (id, expense_id) = path.into_inner();
    let expense = expense_from_input(expense_id.clone(), expense.into_inner(), &state.normalizer)?;
    let expense = state.store.replace_expense(&id, &expense_id, expense)?;
    Ok(HttpResponse::Ok().json(expense))
}

#[delete("/groups/{id}/expenses/{expense_id}")]
async fn delete_expense(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (id, expense_id) = path.into_inner();
    state.store.delete_expense(&id, &expense_id)?;
    Ok(HttpResponse::Ok().body("Expense deleted"))
}

#[get("/groups/{id}/balance")]
async fn get_balance(state: web::Data<AppState>, id: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let (expenses, members) = state.store.snapshot(&id)?;
    Ok(HttpResponse::Ok().json(compute_balance(&expenses, &members)))
}

#[get("/groups/{id}/settlement")]
async fn get_settlement(state: web::Data<AppState>, id: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let (expenses, members) = state.store.snapshot(&id)?;
    Ok(HttpResponse::Ok().json(settle(&expenses, &members)))
}

#[post("/groups/{id}/settle")]
async fn settle_group(state: web::Data<AppState>, id: web::Path<String>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.store.mark_settled(&id)?))
}
