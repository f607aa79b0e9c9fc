//! API Routes
//!
//! HTTP endpoint definitions. JSON endpoints answer unauthorized access
//! with hard 401/403 errors; page routes are covered by the redirect gate
//! in `middleware::page_gate_middleware`.

use axum::{
    extract::{Extension, Path, State},
    http::{header::SET_COOKIE, StatusCode},
    response::{AppendHeaders, IntoResponse},
    routing::{get, patch, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{DomainError, MemberStatus, RequestContext, Role};
use crate::error::AppError;
use crate::handlers::{
    AssignDuesCommand, AssignDuesHandler, RecordPaymentCommand, RecordPaymentHandler,
    RegisterMemberCommand, RegisterMemberHandler,
};
use crate::reconcile::{PgMemberLedger, ReconcileReport, ReconcileService};
use crate::session::hash_password;

use super::middleware::{BearerToken, SESSION_COOKIE};
use super::AppState;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterMemberRequest {
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterMemberResponse {
    pub member_id: Uuid,
    pub membership_number: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub id: Uuid,
    pub membership_number: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: String,
    pub outstanding_balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMemberStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct AssignDuesRequest {
    pub amount: String,
    pub period: String,
}

#[derive(Debug, Serialize)]
pub struct AssignDuesResponse {
    pub due_id: Uuid,
    pub member_id: Uuid,
    pub amount: Decimal,
    pub outstanding_balance: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct RecordPaymentRequest {
    pub amount: String,
    pub method: String,
    #[serde(default)]
    pub memo: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecordPaymentResponse {
    pub payment_id: Uuid,
    pub member_id: Uuid,
    pub amount: Decimal,
    pub outstanding_balance: Decimal,
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub member_id: Uuid,
    pub outstanding_balance: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
}

// =========================================================================
// Routers
// =========================================================================

/// JSON API router, mounted under /api/v1
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/members", post(register_member))
        .route("/members/:member_id", get(get_member))
        .route("/members/:member_id/status", patch(update_member_status))
        .route("/members/:member_id/dues", post(assign_dues))
        .route("/members/:member_id/payments", post(record_payment))
        .route("/members/:member_id/balance", get(get_member_balance))
        .route("/admin/reconcile", post(run_reconciliation))
}

/// Authentication endpoints (no gate - login must be reachable)
pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

/// Page routes hosting the redirect gate
pub fn page_router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page))
        .route("/admin/dashboard", get(admin_dashboard))
        .route("/member/home", get(member_home))
}

// =========================================================================
// Role guards for JSON endpoints
// =========================================================================

/// Admin-only endpoints answer 401/403, never a redirect
fn require_admin(context: &RequestContext) -> Result<(), AppError> {
    match context.role {
        Role::Admin => Ok(()),
        Role::Member => Err(AppError::PermissionDenied),
        Role::Guest => Err(AppError::Unauthenticated),
    }
}

fn require_authenticated(context: &RequestContext) -> Result<(), AppError> {
    if context.role.is_authenticated() {
        Ok(())
    } else {
        Err(AppError::Unauthenticated)
    }
}

// =========================================================================
// Member endpoints
// =========================================================================

/// Register a new member (admin)
async fn register_member(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    Json(request): Json<RegisterMemberRequest>,
) -> Result<(StatusCode, Json<RegisterMemberResponse>), AppError> {
    require_admin(&context)?;

    let handler = RegisterMemberHandler::new(state.pool);

    let command = RegisterMemberCommand::new(request.full_name, request.email);
    let command = if let Some(phone) = request.phone {
        command.with_phone(phone)
    } else {
        command
    };

    let result = handler.execute(command, &context).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterMemberResponse {
            member_id: result.member_id,
            membership_number: result.membership_number,
            status: result.status,
        }),
    ))
}

/// Get member by ID
async fn get_member(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    Path(member_id): Path<Uuid>,
) -> Result<Json<MemberResponse>, AppError> {
    require_authenticated(&context)?;

    fetch_member(&state, member_id).await.map(Json)
}

async fn fetch_member(state: &AppState, member_id: Uuid) -> Result<MemberResponse, AppError> {
    #[allow(clippy::type_complexity)]
    let member: Option<(
        Uuid,
        String,
        String,
        String,
        Option<String>,
        String,
        Decimal,
        DateTime<Utc>,
        DateTime<Utc>,
    )> = sqlx::query_as(
        r#"
        SELECT id, membership_number, full_name, email, phone, status,
               outstanding_balance, created_at, updated_at
        FROM members
        WHERE id = $1
        "#,
    )
    .bind(member_id)
    .fetch_optional(&state.pool)
    .await?;

    let (
        id,
        membership_number,
        full_name,
        email,
        phone,
        status,
        outstanding_balance,
        created_at,
        updated_at,
    ) = member.ok_or_else(|| AppError::MemberNotFound(member_id.to_string()))?;

    Ok(MemberResponse {
        id,
        membership_number,
        full_name,
        email,
        phone,
        status,
        outstanding_balance,
        created_at,
        updated_at,
    })
}

/// Move a member through its lifecycle (admin)
async fn update_member_status(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    Path(member_id): Path<Uuid>,
    Json(request): Json<UpdateMemberStatusRequest>,
) -> Result<Json<MemberResponse>, AppError> {
    require_admin(&context)?;

    let next: MemberStatus = request.status.parse().map_err(AppError::Domain)?;

    let current: Option<String> = sqlx::query_scalar("SELECT status FROM members WHERE id = $1")
        .bind(member_id)
        .fetch_optional(&state.pool)
        .await?;

    let current = current.ok_or_else(|| AppError::MemberNotFound(member_id.to_string()))?;
    let current: MemberStatus = current.parse().map_err(AppError::Domain)?;

    if !current.can_transition_to(next) {
        return Err(AppError::Domain(DomainError::illegal_transition(
            current.as_str(),
            next.as_str(),
        )));
    }

    sqlx::query("UPDATE members SET status = $2, updated_at = NOW() WHERE id = $1")
        .bind(member_id)
        .bind(next.as_str())
        .execute(&state.pool)
        .await?;

    fetch_member(&state, member_id).await.map(Json)
}

/// Assign dues to a member (admin)
async fn assign_dues(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    Path(member_id): Path<Uuid>,
    Json(request): Json<AssignDuesRequest>,
) -> Result<(StatusCode, Json<AssignDuesResponse>), AppError> {
    require_admin(&context)?;

    let handler = AssignDuesHandler::new(state.pool);
    let command = AssignDuesCommand::new(member_id, request.amount, request.period);

    let result = handler.execute(command, &context).await?;

    Ok((
        StatusCode::CREATED,
        Json(AssignDuesResponse {
            due_id: result.due_id,
            member_id: result.member_id,
            amount: result.amount,
            outstanding_balance: result.outstanding_balance,
        }),
    ))
}

/// Record a payment for a member (admin)
async fn record_payment(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    Path(member_id): Path<Uuid>,
    Json(request): Json<RecordPaymentRequest>,
) -> Result<(StatusCode, Json<RecordPaymentResponse>), AppError> {
    require_admin(&context)?;

    let handler = RecordPaymentHandler::new(state.pool);

    let command = RecordPaymentCommand::new(member_id, request.amount, request.method);
    let command = if let Some(memo) = request.memo {
        command.with_memo(memo)
    } else {
        command
    };

    let result = handler.execute(command, &context).await?;

    Ok((
        StatusCode::CREATED,
        Json(RecordPaymentResponse {
            payment_id: result.payment_id,
            member_id: result.member_id,
            amount: result.amount,
            outstanding_balance: result.outstanding_balance,
        }),
    ))
}

/// Get a member's stored outstanding balance
async fn get_member_balance(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    Path(member_id): Path<Uuid>,
) -> Result<Json<BalanceResponse>, AppError> {
    require_authenticated(&context)?;

    let balance: Option<Decimal> =
        sqlx::query_scalar("SELECT outstanding_balance FROM members WHERE id = $1")
            .bind(member_id)
            .fetch_optional(&state.pool)
            .await?;

    let outstanding_balance =
        balance.ok_or_else(|| AppError::MemberNotFound(member_id.to_string()))?;

    Ok(Json(BalanceResponse {
        member_id,
        outstanding_balance,
    }))
}

/// Recompute every member's balance (admin)
async fn run_reconciliation(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
) -> Result<Json<ReconcileReport>, AppError> {
    require_admin(&context)?;

    let service = ReconcileService::new(PgMemberLedger::new(state.pool));
    let report = service
        .reconcile_all()
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(report))
}

// =========================================================================
// Auth endpoints
// =========================================================================

/// Log a portal user in, minting a session
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user: Option<(Uuid, String, String, bool)> = sqlx::query_as(
        r#"
        SELECT id, password_hash, role, is_active
        FROM portal_users
        WHERE email = $1
        "#,
    )
    .bind(&request.email)
    .fetch_optional(&state.pool)
    .await?;

    let (user_id, password_hash, role_claim, is_active) =
        user.ok_or(AppError::InvalidCredentials)?;

    if !is_active || hash_password(&request.password) != password_hash {
        return Err(AppError::InvalidCredentials);
    }

    // A user row with an unknown role claim logs in as GUEST rather than
    // failing - same fail-closed mapping as every other resolution site.
    let role = Role::resolve(Some(role_claim.as_str()));

    let token = state.sessions.create(user_id, role).await;

    tracing::info!(subject_id = %user_id, role = %role, "Portal user logged in");

    let cookie = format!("{}={}; HttpOnly; Path=/; SameSite=Lax", SESSION_COOKIE, token);

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(LoginResponse { token, role }),
    ))
}

/// Log out, revoking the current session
async fn logout(
    State(state): State<AppState>,
    token: Option<Extension<BearerToken>>,
) -> impl IntoResponse {
    if let Some(Extension(BearerToken(token))) = token {
        state.sessions.revoke(&token).await;
    }

    let cookie = format!("{}=; HttpOnly; Path=/; Max-Age=0", SESSION_COOKIE);

    (
        StatusCode::NO_CONTENT,
        AppendHeaders([(SET_COOKIE, cookie)]),
        (),
    )
}

// =========================================================================
// Page routes
// =========================================================================

async fn login_page() -> &'static str {
    "Member portal login"
}

async fn admin_dashboard() -> &'static str {
    "Admin dashboard"
}

async fn member_home() -> &'static str {
    "Member home"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_member_request_deserialize() {
        let json = r#"{
            "full_name": "Ada Lovelace",
            "email": "ada@example.com"
        }"#;

        let request: RegisterMemberRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.full_name, "Ada Lovelace");
        assert!(request.phone.is_none());
    }

    #[test]
    fn test_assign_dues_request_deserialize() {
        let json = r#"{
            "amount": "120.00",
            "period": "2026-Q3"
        }"#;

        let request: AssignDuesRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.amount, "120.00");
        assert_eq!(request.period, "2026-Q3");
    }

    #[test]
    fn test_record_payment_request_defaults() {
        let json = r#"{
            "amount": "45.50",
            "method": "card"
        }"#;

        let request: RecordPaymentRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.amount, "45.50");
        assert!(request.memo.is_none());
    }

    #[test]
    fn test_login_response_serializes_role() {
        let response = LoginResponse {
            token: "abc".to_string(),
            role: Role::Admin,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["role"], "ADMIN");
    }

    #[test]
    fn test_require_admin_guards() {
        let guest = RequestContext::new();
        assert!(matches!(
            require_admin(&guest),
            Err(AppError::Unauthenticated)
        ));

        let member = RequestContext::new().with_subject(Uuid::new_v4(), Role::Member);
        assert!(matches!(
            require_admin(&member),
            Err(AppError::PermissionDenied)
        ));

        let admin = RequestContext::new().with_subject(Uuid::new_v4(), Role::Admin);
        assert!(require_admin(&admin).is_ok());
    }

    #[test]
    fn test_require_authenticated_rejects_guest() {
        let guest = RequestContext::new();
        assert!(require_authenticated(&guest).is_err());

        let member = RequestContext::new().with_subject(Uuid::new_v4(), Role::Member);
        assert!(require_authenticated(&member).is_ok());
    }
}
