use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::UpdateTenantRequest;
use crate::api::extractors::auth::AuthUser;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

/// The tenant key is fixed at signup; only the display name can change.
pub async fn update_tenant(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<UpdateTenantRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut tenant = state.tenant_repo.find_by_id(&user.tenant_id).await?
        .ok_or_else(|| AppError::NotFound("Tenant not found".into()))?;

    if let Some(name) = payload.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("Name must not be empty".into()));
        }
        tenant.name = name;
    }

    let updated = state.tenant_repo.update(&tenant).await?;
    info!("Tenant updated: {}", updated.id);
    Ok(Json(updated))
}
