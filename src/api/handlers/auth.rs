use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{LoginRequest, SignupRequest};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::auth::AuthResponse;
use crate::domain::models::tenant::Tenant;
use crate::domain::models::user::User;
use crate::error::AppError;
use std::sync::Arc;
use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use serde_json::json;
use tracing::info;

pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = payload.email.trim().to_lowercase();
    if email.is_empty() || payload.password.is_empty() {
        return Err(AppError::Validation("Email and password are required".into()));
    }
    if payload.password.len() < 6 {
        return Err(AppError::Validation("Password must be at least 6 characters".into()));
    }

    // Repeat signup with a known email hands back a fresh token for the
    // existing account instead of opening another tenant.
    if let Some(existing) = state.user_repo.find_by_email(&email).await? {
        let tenant = state.tenant_repo.find_by_id(&existing.tenant_id).await?
            .ok_or(AppError::Internal)?;
        let access_token = state.auth_service.issue_token(&existing)?;

        state.reminder_scheduler.reconcile_all().await?;
        return Ok(Json(AuthResponse { access_token, tenant_key: tenant.tenant_key }));
    }

    let clinic = payload.clinic
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| "Clinic".to_string());

    let tenant = state.tenant_repo.create(&Tenant::new(clinic)).await?;

    let salt = SaltString::generate(&mut rand::thread_rng());
    let password_hash = Argon2::default()
        .hash_password(payload.password.as_bytes(), &salt)
        .map_err(|_| AppError::Internal)?
        .to_string();

    let user = state.user_repo.create(&User::new(tenant.id.clone(), email, password_hash)).await?;
    let access_token = state.auth_service.issue_token(&user)?;

    info!("Tenant signed up: {}", tenant.id);

    state.reminder_scheduler.reconcile_all().await?;
    Ok(Json(AuthResponse { access_token, tenant_key: tenant.tenant_key }))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = payload.email.trim().to_lowercase();

    let user = state.user_repo.find_by_email(&email).await?
        .ok_or(AppError::Unauthorized)?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal)?;

    Argon2::default().verify_password(payload.password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::Unauthorized)?;

    let tenant = state.tenant_repo.find_by_id(&user.tenant_id).await?
        .ok_or(AppError::Internal)?;
    let access_token = state.auth_service.issue_token(&user)?;

    info!("User logged in: {}", user.id);

    // Rebuild the reminder set on every login as drift repair.
    state.reminder_scheduler.reconcile_all().await?;

    Ok(Json(AuthResponse { access_token, tenant_key: tenant.tenant_key }))
}

pub async fn me(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let account = state.user_repo.find_by_id(&user.tenant_id, &user.user_id).await?
        .ok_or(AppError::Unauthorized)?;
    let tenant = state.tenant_repo.find_by_id(&user.tenant_id).await?
        .ok_or(AppError::Internal)?;

    Ok(Json(json!({
        "email": account.email,
        "tenant": { "name": tenant.name, "tenant_key": tenant.tenant_key }
    })))
}
