use axum::{
    extract::{FromRequestParts, Path},
    http::{request::Parts, StatusCode},
};
use std::collections::HashMap;
use crate::domain::models::tenant::Tenant;
use crate::state::AppState;
use std::sync::Arc;

/// Resolves the `{tenant_key}` path segment of the webhook routes against
/// storage. Unknown keys reject with 404 before the handler runs.
pub struct WebhookTenant(pub Tenant);

impl FromRequestParts<Arc<AppState>> for WebhookTenant {
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let params: Path<HashMap<String, String>> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| StatusCode::BAD_REQUEST)?;

        let tenant_key = params.get("tenant_key").ok_or(StatusCode::BAD_REQUEST)?;

        match state.tenant_repo.find_by_key(tenant_key).await {
            Ok(Some(tenant)) => Ok(WebhookTenant(tenant)),
            Ok(None) => Err(StatusCode::NOT_FOUND),
            Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}
