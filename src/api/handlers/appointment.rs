use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{CreateAppointmentRequest, UpcomingQuery};
use crate::api::dtos::responses::AppointmentView;
use crate::api::extractors::auth::AuthUser;
use crate::api::handlers::webhook::notify_best_effort;
use crate::domain::models::appointment::{Appointment, SOURCE_MANUAL};
use crate::error::AppError;
use std::sync::Arc;
use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let appointments = state.appointment_repo.list_by_tenant(&user.tenant_id).await?;
    let views = to_views(&state, &user.tenant_id, appointments).await?;
    Ok(Json(views))
}

pub async fn list_upcoming(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<UpcomingQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limit = query.limit.unwrap_or(20);
    let now = state.clock.now();
    let appointments = state.appointment_repo.list_upcoming(&user.tenant_id, now, limit).await?;
    let views = to_views(&state, &user.tenant_id, appointments).await?;
    Ok(Json(views))
}

pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<CreateAppointmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let phone = payload.phone.trim().to_string();
    if phone.is_empty() {
        return Err(AppError::Validation("Phone is required".into()));
    }

    let tz: Tz = state.config.timezone.parse().unwrap_or(chrono_tz::UTC);

    let start = parse_iso_in_zone(&payload.start, tz)?;
    let end = match &payload.end {
        Some(raw) => parse_iso_in_zone(raw, tz)?,
        None => start + Duration::minutes(state.config.slot_minutes as i64),
    };

    let created = state.booking_service
        .book(&user.tenant_id, &phone, start, end, SOURCE_MANUAL)
        .await?;

    let local_start = start.with_timezone(&tz).format("%d.%m.%Y %H:%M");
    let join = state.config.meeting_join_url.as_deref()
        .map(|url| format!("\nJoin: {}", url))
        .unwrap_or_default();
    notify_best_effort(&state, &phone, &format!("Your appointment is confirmed: {}{}", local_start, join)).await;

    Ok(Json(created))
}

pub async fn cancel_appointment(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(appointment_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let cancelled = state.booking_service.cancel(&user.tenant_id, &appointment_id).await?;
    Ok(Json(cancelled))
}

async fn to_views(
    state: &Arc<AppState>,
    tenant_id: &str,
    appointments: Vec<Appointment>,
) -> Result<Vec<AppointmentView>, AppError> {
    let mut views = Vec::with_capacity(appointments.len());
    for appointment in appointments {
        let client = state.client_repo.find_by_id(tenant_id, &appointment.client_id).await?;
        views.push(AppointmentView {
            id: appointment.id,
            phone: client.map(|c| c.phone).unwrap_or_else(|| "-".to_string()),
            start: appointment.start_time,
            end: appointment.end_time,
            status: appointment.status,
            source: appointment.source,
        });
    }
    Ok(views)
}

/// Accept RFC3339 or a naive ISO date-time; the naive form is read as
/// wall-clock time in `tz`.
fn parse_iso_in_zone(raw: &str, tz: Tz) -> Result<DateTime<Utc>, AppError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return tz.from_local_datetime(&naive)
                .single()
                .map(|dt| dt.with_timezone(&Utc))
                .ok_or_else(|| AppError::Validation("Invalid local time (ambiguous or skipped due to DST)".into()));
        }
    }

    Err(AppError::Validation("Date-time must be ISO formatted".into()))
}
