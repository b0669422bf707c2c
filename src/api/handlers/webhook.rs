use axum::{extract::{Query, State}, http::StatusCode, response::{IntoResponse, Response}, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{WebhookPayload, WebhookVerifyQuery};
use crate::api::extractors::tenant::WebhookTenant;
use crate::domain::models::appointment::SOURCE_WHATSAPP;
use crate::domain::services::availability::{free_slots, local_day_window};
use crate::domain::services::datetime_parse::parse_date_time;
use crate::domain::services::intent::{classify, Intent};
use crate::domain::services::slots::{working_slots, Slot};
use crate::error::AppError;
use std::sync::Arc;
use chrono::Duration;
use chrono_tz::Tz;
use tracing::{info, warn};

/// Meta verification handshake: echo the challenge when the verify token
/// matches, refuse otherwise. Unknown tenant keys already 404 in the
/// extractor.
pub async fn verify_webhook(
    State(state): State<Arc<AppState>>,
    WebhookTenant(_tenant): WebhookTenant,
    Query(query): Query<WebhookVerifyQuery>,
) -> Response {
    if query.mode.as_deref() == Some("subscribe")
        && query.verify_token.as_deref() == Some(state.config.whatsapp_verify_token.as_str())
    {
        (StatusCode::OK, query.challenge.unwrap_or_default()).into_response()
    } else {
        (StatusCode::FORBIDDEN, "forbidden").into_response()
    }
}

pub async fn receive_message(
    State(state): State<Arc<AppState>>,
    WebhookTenant(tenant): WebhookTenant,
    Json(payload): Json<WebhookPayload>,
) -> Result<impl IntoResponse, AppError> {
    let Some((from_phone, raw_text)) = extract_text_message(&payload) else {
        return Ok(Json(serde_json::json!({ "status": "ignored" })));
    };
    let text = raw_text.trim().to_lowercase();

    info!("Webhook message for tenant {}: intent routing", tenant.id);

    let tz: Tz = state.config.timezone.parse().unwrap_or(chrono_tz::UTC);
    let now = state.clock.now();
    let today = now.with_timezone(&tz).date_naive();

    let (window_start, window_end) = local_day_window(today, tz)
        .ok_or(AppError::Internal)?;
    let busy: Vec<_> = state.appointment_repo
        .list_busy(&tenant.id, window_start, window_end)
        .await?
        .iter()
        .map(|a| (a.start_time, a.end_time))
        .collect();

    let candidates = working_slots(today, state.config.work_start, state.config.work_end, state.config.slot_minutes, tz);
    let free = free_slots(&candidates, &busy);

    match classify(&text) {
        Intent::Book | Intent::Availability => {
            if free.is_empty() {
                notify_best_effort(&state, &from_phone, "No free slots today. You can write 'tomorrow' or 'week'.").await;
            } else {
                let listing = format_slots(&free, tz);
                let reply = format!(
                    "Available times:\n{}\n\nReply with 'YYYY-MM-DD HH:MM' to reserve.",
                    listing
                );
                notify_best_effort(&state, &from_phone, &reply).await;
            }
        }
        Intent::Cancel => {
            match state.client_repo.find_by_phone(&tenant.id, &from_phone).await? {
                None => {
                    notify_best_effort(&state, &from_phone, "We could not find an appointment for this number.").await;
                }
                Some(client) => {
                    match state.appointment_repo.next_confirmed_for_client(&tenant.id, &client.id, now).await? {
                        None => {
                            notify_best_effort(&state, &from_phone, "No upcoming appointment found to cancel.").await;
                        }
                        Some(appointment) => {
                            state.booking_service.cancel(&tenant.id, &appointment.id).await?;
                            notify_best_effort(&state, &from_phone, "Your appointment has been cancelled.").await;
                        }
                    }
                }
            }
        }
        Intent::Help => {
            notify_best_effort(&state, &from_phone, "Hi! You can write 'book', 'today', 'tomorrow' or 'cancel'.").await;
        }
    }

    // Second, independent pass: a message that parses as a date-time is a
    // reservation attempt regardless of which keyword reply went out above.
    if let Some(start) = parse_date_time(&text, tz, now) {
        let end = start + Duration::minutes(state.config.slot_minutes as i64);
        match state.booking_service.book(&tenant.id, &from_phone, start, end, SOURCE_WHATSAPP).await {
            Ok(created) => {
                let local_start = created.start_time.with_timezone(&tz).format("%d.%m.%Y %H:%M");
                let join = state.config.meeting_join_url.as_deref()
                    .map(|url| format!("\nJoin: {}", url))
                    .unwrap_or_default();
                notify_best_effort(&state, &from_phone, &format!("Your appointment is confirmed: {}{}", local_start, join)).await;
            }
            Err(AppError::Conflict(_)) => {
                notify_best_effort(&state, &from_phone, "That time is already taken. Could you try another slot?").await;
            }
            Err(e) => {
                warn!("Webhook reservation attempt failed: {}", e);
            }
        }
    }

    Ok(Json(serde_json::json!({ "status": "ok" })))
}

/// Send a message, absorbing transport failures: delivery is best-effort
/// by contract and must never affect the request outcome.
pub async fn notify_best_effort(state: &Arc<AppState>, phone: &str, text: &str) {
    if let Err(e) = state.notifier.send(phone, text).await {
        warn!("Notification to {} dropped: {}", phone, e);
    }
}

fn extract_text_message(payload: &WebhookPayload) -> Option<(String, String)> {
    let message = payload.entry.first()?
        .changes.first()?
        .value.as_ref()?
        .messages.first()?;
    let body = message.text.as_ref()?.body.clone();
    Some((message.from.clone(), body))
}

fn format_slots(free: &[Slot], tz: Tz) -> String {
    free.iter()
        .take(10)
        .map(|(start, end)| {
            format!(
                "- {} - {}",
                start.with_timezone(&tz).format("%H:%M"),
                end.with_timezone(&tz).format("%H:%M")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
