use axum::{extract::{Query, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::AvailabilityQuery;
use crate::api::dtos::responses::{SlotView, SlotsResponse};
use crate::api::extractors::auth::AuthUser;
use crate::domain::services::availability::{free_slots, local_day_window};
use crate::domain::services::slots::working_slots;
use crate::error::AppError;
use std::sync::Arc;
use chrono::NaiveDate;
use chrono_tz::Tz;

pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<AvailabilityQuery>,
) -> Result<impl IntoResponse, AppError> {
    let tz: Tz = state.config.timezone.parse().unwrap_or(chrono_tz::UTC);

    let date = match query.date {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map_err(|_| AppError::Validation("Date must be YYYY-MM-DD".into()))?,
        None => state.clock.now().with_timezone(&tz).date_naive(),
    };

    let (window_start, window_end) = local_day_window(date, tz)
        .ok_or_else(|| AppError::Validation("Date is not resolvable in the configured zone".into()))?;

    let busy: Vec<_> = state.appointment_repo
        .list_busy(&user.tenant_id, window_start, window_end)
        .await?
        .iter()
        .map(|a| (a.start_time, a.end_time))
        .collect();

    let candidates = working_slots(
        date,
        state.config.work_start,
        state.config.work_end,
        state.config.slot_minutes,
        tz,
    );
    let free = free_slots(&candidates, &busy);

    Ok(Json(SlotsResponse {
        date: date.to_string(),
        slots: free.iter().map(|(start, end)| SlotView { start: *start, end: *end }).collect(),
    }))
}
