mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use clinic_backend::domain::services::availability::{free_slots, local_day_window};
use clinic_backend::domain::services::slots::working_slots;
use common::{parse_body, TestApp};
use serde_json::json;
use tower::ServiceExt;

fn istanbul() -> Tz {
    "Europe/Istanbul".parse().unwrap()
}

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[test]
fn istanbul_short_day_has_two_slots() {
    let date = NaiveDate::from_ymd_opt(2025, 6, 16).unwrap();
    let candidates = working_slots(date, hm(9, 0), hm(11, 0), 60, istanbul());
    let free = free_slots(&candidates, &[]);

    assert_eq!(free.len(), 2);
    // 09:00 and 10:00 local are 06:00 and 07:00 UTC.
    assert_eq!(free[0].0, Utc.with_ymd_and_hms(2025, 6, 16, 6, 0, 0).unwrap());
    assert_eq!(free[1].0, Utc.with_ymd_and_hms(2025, 6, 16, 7, 0, 0).unwrap());
}

#[test]
fn busy_morning_leaves_only_the_late_slot() {
    let date = NaiveDate::from_ymd_opt(2025, 6, 16).unwrap();
    let candidates = working_slots(date, hm(9, 0), hm(11, 0), 60, istanbul());

    // One confirmed appointment at 09:00-10:00 local.
    let busy = vec![(
        Utc.with_ymd_and_hms(2025, 6, 16, 6, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2025, 6, 16, 7, 0, 0).unwrap(),
    )];
    let free = free_slots(&candidates, &busy);

    assert_eq!(free.len(), 1);
    assert_eq!(free[0].0, Utc.with_ymd_and_hms(2025, 6, 16, 7, 0, 0).unwrap());
}

#[test]
fn no_busy_intervals_keeps_all_candidates() {
    let date = NaiveDate::from_ymd_opt(2025, 6, 16).unwrap();
    let candidates = working_slots(date, hm(9, 0), hm(18, 0), 60, istanbul());
    assert_eq!(free_slots(&candidates, &[]), candidates);
}

#[test]
fn day_window_spans_local_midnights() {
    let date = NaiveDate::from_ymd_opt(2025, 6, 16).unwrap();
    let (start, end) = local_day_window(date, istanbul()).unwrap();

    assert_eq!(start, Utc.with_ymd_and_hms(2025, 6, 15, 21, 0, 0).unwrap());
    assert_eq!(end, Utc.with_ymd_and_hms(2025, 6, 16, 21, 0, 0).unwrap());
}

#[tokio::test]
async fn availability_endpoint_lists_full_working_day() {
    let app = TestApp::new().await;
    let session = app.signup("avail@test.com").await;

    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri("/api/availability?date=2025-06-16")
            .header(header::AUTHORIZATION, format!("Bearer {}", session.access_token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    let slots = body["slots"].as_array().unwrap();

    // 09:00-18:00 at 60 minutes.
    assert_eq!(slots.len(), 9);
    assert_eq!(slots[0]["start"].as_str().unwrap(), "2025-06-16T06:00:00Z");
}

#[tokio::test]
async fn booked_slot_disappears_from_availability() {
    let app = TestApp::new().await;
    let session = app.signup("consume@test.com").await;

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/appointments")
            .header(header::AUTHORIZATION, format!("Bearer {}", session.access_token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"phone": "905550001", "start": "2025-06-16T10:00"}).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri("/api/availability?date=2025-06-16")
            .header(header::AUTHORIZATION, format!("Bearer {}", session.access_token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();

    let body = parse_body(res).await;
    let slots = body["slots"].as_array().unwrap();

    assert_eq!(slots.len(), 8);
    // 10:00 local is 07:00 UTC; it must be gone.
    assert!(!slots.iter().any(|s| s["start"].as_str().unwrap() == "2025-06-16T07:00:00Z"));
}

#[tokio::test]
async fn availability_is_scoped_per_tenant() {
    let app = TestApp::new().await;
    let session_a = app.signup("tenant-a@test.com").await;
    let session_b = app.signup("tenant-b@test.com").await;

    app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/appointments")
            .header(header::AUTHORIZATION, format!("Bearer {}", session_a.access_token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"phone": "905550002", "start": "2025-06-16T10:00"}).to_string())).unwrap()
    ).await.unwrap();

    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri("/api/availability?date=2025-06-16")
            .header(header::AUTHORIZATION, format!("Bearer {}", session_b.access_token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();

    let body = parse_body(res).await;
    assert_eq!(body["slots"].as_array().unwrap().len(), 9, "Other tenant's booking must not consume slots");
}
