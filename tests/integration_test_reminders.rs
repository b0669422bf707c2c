mod common;

use chrono::{Duration, TimeZone, Utc};
use clinic_backend::domain::models::appointment::{Appointment, SOURCE_MANUAL, STATUS_CANCELLED};
use clinic_backend::domain::models::client::Client;
use clinic_backend::domain::services::reminders::ReminderKind;
use common::TestApp;

/// Fix the clock at a known instant and seed one client; most scenarios
/// drive the scheduler through the repository directly.
async fn setup(app: &TestApp) -> (String, Client) {
    let session = app.signup("reminders@test.com").await;
    app.clock.set(Utc.with_ymd_and_hms(2025, 6, 16, 8, 0, 0).unwrap());
    // Signup reconciled with the real clock; start every scenario clean.
    app.state.reminder_scheduler.reconcile_all().await.unwrap();

    let client = app.state.client_repo
        .create(&Client::new(session.tenant_id.clone(), "905551111".to_string(), None))
        .await
        .unwrap();

    (session.tenant_id, client)
}

async fn insert_appointment(app: &TestApp, tenant_id: &str, client_id: &str, minutes_ahead: i64) -> Appointment {
    let now = Utc.with_ymd_and_hms(2025, 6, 16, 8, 0, 0).unwrap();
    let appointment = Appointment::new(
        tenant_id.to_string(),
        client_id.to_string(),
        now + Duration::minutes(minutes_ahead),
        now + Duration::minutes(minutes_ahead + 60),
        SOURCE_MANUAL,
    );
    app.state.appointment_repo.create(&appointment).await.unwrap()
}

#[tokio::test]
async fn appointment_in_90_minutes_gets_only_the_hour_reminder() {
    let app = TestApp::new().await;
    let (tenant_id, client) = setup(&app).await;

    let appointment = insert_appointment(&app, &tenant_id, &client.id, 90).await;
    app.state.reminder_scheduler.reconcile_all().await.unwrap();

    let jobs = app.state.reminder_scheduler.pending_jobs().await;
    assert_eq!(jobs.len(), 1, "24h offset lies in the past, only 1h remains");
    assert_eq!(jobs[0].0, appointment.id);
    assert_eq!(jobs[0].1, ReminderKind::HourBefore);
    assert_eq!(jobs[0].2, appointment.start_time - Duration::minutes(60));
}

#[tokio::test]
async fn appointment_in_30_minutes_gets_no_reminders() {
    let app = TestApp::new().await;
    let (tenant_id, client) = setup(&app).await;

    insert_appointment(&app, &tenant_id, &client.id, 30).await;
    app.state.reminder_scheduler.reconcile_all().await.unwrap();

    assert!(app.state.reminder_scheduler.pending_jobs().await.is_empty());
}

#[tokio::test]
async fn distant_appointment_gets_both_reminders() {
    let app = TestApp::new().await;
    let (tenant_id, client) = setup(&app).await;

    let appointment = insert_appointment(&app, &tenant_id, &client.id, 3 * 24 * 60).await;
    app.state.reminder_scheduler.reconcile_all().await.unwrap();

    let jobs = app.state.reminder_scheduler.pending_jobs().await;
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].1, ReminderKind::DayBefore);
    assert_eq!(jobs[0].2, appointment.start_time - Duration::minutes(1440));
    assert_eq!(jobs[1].1, ReminderKind::HourBefore);
    assert_eq!(jobs[1].2, appointment.start_time - Duration::minutes(60));
}

#[tokio::test]
async fn reconcile_is_idempotent() {
    let app = TestApp::new().await;
    let (tenant_id, client) = setup(&app).await;

    insert_appointment(&app, &tenant_id, &client.id, 3 * 24 * 60).await;
    insert_appointment(&app, &tenant_id, &client.id, 5 * 24 * 60).await;

    app.state.reminder_scheduler.reconcile_all().await.unwrap();
    let first = app.state.reminder_scheduler.pending_jobs().await;

    app.state.reminder_scheduler.reconcile_all().await.unwrap();
    let second = app.state.reminder_scheduler.pending_jobs().await;

    assert_eq!(first.len(), 4);
    assert_eq!(first, second, "Back-to-back reconciles must produce identical fire times");
}

#[tokio::test]
async fn cancellation_drops_all_jobs_after_reconcile() {
    let app = TestApp::new().await;
    let (tenant_id, client) = setup(&app).await;

    let appointment = insert_appointment(&app, &tenant_id, &client.id, 3 * 24 * 60).await;
    app.state.reminder_scheduler.reconcile_all().await.unwrap();
    assert_eq!(app.state.reminder_scheduler.pending_jobs().await.len(), 2);

    app.state.appointment_repo
        .set_status(&tenant_id, &appointment.id, STATUS_CANCELLED)
        .await
        .unwrap();
    app.state.reminder_scheduler.reconcile_all().await.unwrap();

    assert!(app.state.reminder_scheduler.pending_jobs().await.is_empty());
}

#[tokio::test]
async fn booking_through_the_service_registers_jobs() {
    let app = TestApp::new().await;
    let (tenant_id, _client) = setup(&app).await;

    let now = Utc.with_ymd_and_hms(2025, 6, 16, 8, 0, 0).unwrap();
    let created = app.state.booking_service
        .book(
            &tenant_id,
            "905552222",
            now + Duration::days(2),
            now + Duration::days(2) + Duration::minutes(60),
            SOURCE_MANUAL,
        )
        .await
        .unwrap();

    let jobs = app.state.reminder_scheduler.pending_jobs().await;
    assert_eq!(jobs.len(), 2);
    assert!(jobs.iter().all(|(id, _, _)| *id == created.id));
}

#[tokio::test]
async fn shutdown_clears_the_job_table() {
    let app = TestApp::new().await;
    let (tenant_id, client) = setup(&app).await;

    insert_appointment(&app, &tenant_id, &client.id, 3 * 24 * 60).await;
    app.state.reminder_scheduler.reconcile_all().await.unwrap();
    assert!(!app.state.reminder_scheduler.pending_jobs().await.is_empty());

    app.state.reminder_scheduler.shutdown().await;
    assert!(app.state.reminder_scheduler.pending_jobs().await.is_empty());
}
