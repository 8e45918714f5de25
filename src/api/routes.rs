//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::{rejection::QueryRejection, Extension, Query, State},
    middleware,
    routing::{get, post},
    Form, Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::auth::{AccessToken, RegisterCommand};
use crate::domain::OperationContext;
use crate::error::{AppError, AppResult};

use super::middleware::{auth_middleware, context_middleware, logging_middleware, CurrentUser};
use super::AppState;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct AmountQuery {
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct SendQuery {
    pub amount: Decimal,
    pub recipient_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub user_balance: Decimal,
}

impl BalanceResponse {
    fn new(balance: Decimal) -> Self {
        Self {
            user_balance: balance.normalize(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SendResponse {
    pub sender_balance: Decimal,
    pub recipient_balance: Decimal,
}

// =========================================================================
// API Router
// =========================================================================

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/deposit", post(deposit))
        .route("/withdraw", post(withdraw))
        .route("/send", post(send))
        .route("/show-balance", get(show_balance))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Note: layers run in reverse order (last added = first executed)
    // Order: context -> logging -> auth -> handler
    Router::new()
        .route("/health", get(health_check))
        .route("/register", post(register))
        .route("/authorization", post(login))
        .merge(protected)
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(context_middleware))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> AppResult<T> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))
}

// =========================================================================
// POST /register
// =========================================================================

/// Register a user; its account starts at zero
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<Json<RegisterResponse>> {
    let command = RegisterCommand::new(request.username, request.email, request.password);

    let user = state.auth.register(command).await?;

    Ok(Json(RegisterResponse {
        id: user.id,
        username: user.username,
        email: user.email,
    }))
}

// =========================================================================
// POST /authorization
// =========================================================================

/// Exchange form credentials for a bearer token
async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> AppResult<Json<AccessToken>> {
    let token = state.auth.login(&form.username, &form.password).await?;
    Ok(Json(token))
}

// =========================================================================
// POST /deposit
// =========================================================================

async fn deposit(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Extension(context): Extension<OperationContext>,
    query: Result<Query<AmountQuery>, QueryRejection>,
) -> AppResult<Json<BalanceResponse>> {
    let params = query_params(query)?;

    let balance = state.ledger.deposit(user.id, params.amount).await?;

    tracing::debug!(
        correlation_id = %context.correlation_id,
        user_id = ?context.user_id,
        "Deposit served"
    );

    Ok(Json(BalanceResponse::new(balance)))
}

// =========================================================================
// POST /withdraw
// =========================================================================

async fn withdraw(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Extension(context): Extension<OperationContext>,
    query: Result<Query<AmountQuery>, QueryRejection>,
) -> AppResult<Json<BalanceResponse>> {
    let params = query_params(query)?;

    let balance = state.ledger.withdraw(user.id, params.amount).await?;

    tracing::debug!(
        correlation_id = %context.correlation_id,
        user_id = ?context.user_id,
        "Withdrawal served"
    );

    Ok(Json(BalanceResponse::new(balance)))
}

// =========================================================================
// POST /send
// =========================================================================

/// Transfer from the authenticated user to `recipient_id`
async fn send(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Extension(context): Extension<OperationContext>,
    query: Result<Query<SendQuery>, QueryRejection>,
) -> AppResult<Json<SendResponse>> {
    let params = query_params(query)?;

    let result = state
        .ledger
        .transfer(params.amount, user.id, params.recipient_id)
        .await?;

    tracing::debug!(
        correlation_id = %context.correlation_id,
        user_id = ?context.user_id,
        sender = %user.username,
        "Transfer served"
    );

    Ok(Json(SendResponse {
        sender_balance: result.sender_balance.normalize(),
        recipient_balance: result.recipient_balance.normalize(),
    }))
}

// =========================================================================
// GET /show-balance
// =========================================================================

async fn show_balance(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Extension(context): Extension<OperationContext>,
) -> AppResult<Json<BalanceResponse>> {
    let balance = state.ledger.balance(user.id).await?;

    tracing::debug!(
        correlation_id = %context.correlation_id,
        user_id = ?context.user_id,
        "Balance served"
    );

    Ok(Json(BalanceResponse::new(balance)))
}
