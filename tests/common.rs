use clinic_backend::{
    api::router::create_router,
    config::Config,
    domain::ports::{Clock, NotificationSender},
    domain::services::{auth_service::AuthService, booking::BookingService, reminders::ReminderScheduler},
    error::AppError,
    infra::repositories::{
        sqlite_appointment_repo::SqliteAppointmentRepo,
        sqlite_client_repo::SqliteClientRepo,
        sqlite_tenant_repo::SqliteTenantRepo,
        sqlite_user_repo::SqliteUserRepo,
    },
    state::AppState,
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use chrono::{DateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

/// Captures every outbound message; can be switched to fail to exercise
/// the swallow-on-transport-error contract.
pub struct RecordingSender {
    pub sent: Mutex<Vec<(String, String)>>,
    pub fail: AtomicBool,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    pub fn messages(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSender for RecordingSender {
    async fn send(&self, phone: &str, text: &str) -> Result<(), AppError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Transport("simulated outage".into()));
        }
        self.sent.lock().unwrap().push((phone.to_string(), text.to_string()));
        Ok(())
    }
}

pub struct FixedClock(pub Mutex<DateTime<Utc>>);

impl FixedClock {
    pub fn set(&self, now: DateTime<Utc>) {
        *self.0.lock().unwrap() = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

pub struct AuthSession {
    pub access_token: String,
    pub tenant_key: String,
    pub tenant_id: String,
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub sender: Arc<RecordingSender>,
    pub clock: Arc<FixedClock>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url,
            port: 0,
            jwt_secret: "test-secret".to_string(),
            jwt_expire_minutes: 60,
            whatsapp_verify_token: "verify-123".to_string(),
            whatsapp_access_token: String::new(),
            whatsapp_phone_number_id: String::new(),
            work_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            work_end: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            slot_minutes: 60,
            timezone: "Europe/Istanbul".to_string(),
            reminder_day_minutes: 1440,
            reminder_hour_minutes: 60,
            meeting_join_url: None,
        };

        let tenant_repo = Arc::new(SqliteTenantRepo::new(pool.clone()));
        let user_repo = Arc::new(SqliteUserRepo::new(pool.clone()));
        let client_repo = Arc::new(SqliteClientRepo::new(pool.clone()));
        let appointment_repo = Arc::new(SqliteAppointmentRepo::new(pool.clone()));

        let sender = Arc::new(RecordingSender::new());
        let clock = Arc::new(FixedClock(Mutex::new(Utc::now())));
        let timezone: Tz = config.timezone.parse().unwrap();

        let reminder_scheduler = Arc::new(ReminderScheduler::new(
            appointment_repo.clone(),
            client_repo.clone(),
            sender.clone(),
            clock.clone(),
            timezone,
            config.reminder_day_minutes,
            config.reminder_hour_minutes,
            config.meeting_join_url.clone(),
        ));

        let booking_service = Arc::new(BookingService::new(
            appointment_repo.clone(),
            client_repo.clone(),
            reminder_scheduler.clone(),
        ));

        let auth_service = Arc::new(AuthService::new(&config.jwt_secret, config.jwt_expire_minutes));

        let state = Arc::new(AppState {
            config,
            tenant_repo,
            user_repo,
            client_repo,
            appointment_repo,
            notifier: sender.clone(),
            clock: clock.clone(),
            auth_service,
            booking_service,
            reminder_scheduler,
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            sender,
            clock,
        }
    }

    pub async fn signup(&self, email: &str) -> AuthSession {
        let payload = serde_json::json!({
            "email": email,
            "password": "secret-pw",
            "clinic": "Test Clinic"
        });

        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/signup")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap();

        if !response.status().is_success() {
            panic!("Signup failed in test helper: status {}", response.status());
        }

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        let access_token = body["access_token"].as_str().expect("No access_token").to_string();
        let tenant_key = body["tenant_key"].as_str().expect("No tenant_key").to_string();

        let tenant = self.state.tenant_repo.find_by_key(&tenant_key).await.unwrap()
            .expect("Signed-up tenant missing");

        AuthSession {
            access_token,
            tenant_key,
            tenant_id: tenant.id,
        }
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}

#[allow(dead_code)]
pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
