use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use chrono_tz::Tz;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::ports::{
    AppointmentRepository, ClientRepository, Clock, NotificationSender,
    SystemClock, TenantRepository, UserRepository,
};
use crate::domain::services::auth_service::AuthService;
use crate::domain::services::booking::BookingService;
use crate::domain::services::reminders::ReminderScheduler;
use crate::infra::notify::whatsapp_sender::CloudApiSender;
use crate::infra::repositories::{
    postgres_appointment_repo::PostgresAppointmentRepo, postgres_client_repo::PostgresClientRepo,
    postgres_tenant_repo::PostgresTenantRepo, postgres_user_repo::PostgresUserRepo,
    sqlite_appointment_repo::SqliteAppointmentRepo, sqlite_client_repo::SqliteClientRepo,
    sqlite_tenant_repo::SqliteTenantRepo, sqlite_user_repo::SqliteUserRepo,
};
use crate::state::AppState;

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        assemble_state(
            config,
            Arc::new(PostgresTenantRepo::new(pool.clone())),
            Arc::new(PostgresUserRepo::new(pool.clone())),
            Arc::new(PostgresClientRepo::new(pool.clone())),
            Arc::new(PostgresAppointmentRepo::new(pool)),
        )
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        assemble_state(
            config,
            Arc::new(SqliteTenantRepo::new(pool.clone())),
            Arc::new(SqliteUserRepo::new(pool.clone())),
            Arc::new(SqliteClientRepo::new(pool.clone())),
            Arc::new(SqliteAppointmentRepo::new(pool)),
        )
    }
}

fn assemble_state(
    config: &Config,
    tenant_repo: Arc<dyn TenantRepository>,
    user_repo: Arc<dyn UserRepository>,
    client_repo: Arc<dyn ClientRepository>,
    appointment_repo: Arc<dyn AppointmentRepository>,
) -> AppState {
    let timezone: Tz = config.timezone.parse().unwrap_or(chrono_tz::UTC);

    let notifier: Arc<dyn NotificationSender> = Arc::new(CloudApiSender::new(
        config.whatsapp_access_token.clone(),
        config.whatsapp_phone_number_id.clone(),
    ));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let auth_service = Arc::new(AuthService::new(&config.jwt_secret, config.jwt_expire_minutes));

    let reminder_scheduler = Arc::new(ReminderScheduler::new(
        appointment_repo.clone(),
        client_repo.clone(),
        notifier.clone(),
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

    AppState {
        config: config.clone(),
        tenant_repo,
        user_repo,
        client_repo,
        appointment_repo,
        notifier,
        clock,
        auth_service,
        booking_service,
        reminder_scheduler,
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
