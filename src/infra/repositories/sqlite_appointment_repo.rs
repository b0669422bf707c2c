use crate::domain::{models::appointment::Appointment, ports::AppointmentRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteAppointmentRepo {
    pool: SqlitePool,
}

impl SqliteAppointmentRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentRepository for SqliteAppointmentRepo {
    async fn create(&self, appointment: &Appointment) -> Result<Appointment, AppError> {
        sqlx::query_as::<_, Appointment>(
            "INSERT INTO appointments (id, tenant_id, client_id, start_time, end_time, status, source, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&appointment.id).bind(&appointment.tenant_id).bind(&appointment.client_id)
            .bind(appointment.start_time).bind(appointment.end_time)
            .bind(&appointment.status).bind(&appointment.source).bind(appointment.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE tenant_id = ? AND id = ?").bind(tenant_id).bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_tenant(&self, tenant_id: &str) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE tenant_id = ? ORDER BY start_time DESC").bind(tenant_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_upcoming(&self, tenant_id: &str, after: DateTime<Utc>, limit: i64) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE tenant_id = ? AND start_time >= ? ORDER BY start_time ASC LIMIT ?"
        )
            .bind(tenant_id).bind(after).bind(limit)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_busy(&self, tenant_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE tenant_id = ? AND start_time < ? AND end_time > ? AND status = 'CONFIRMED'"
        )
            .bind(tenant_id).bind(end).bind(start)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_confirmed_future(&self, after: DateTime<Utc>) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE status = 'CONFIRMED' AND start_time > ? ORDER BY start_time ASC"
        )
            .bind(after)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn next_confirmed_for_client(&self, tenant_id: &str, client_id: &str, after: DateTime<Utc>) -> Result<Option<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE tenant_id = ? AND client_id = ? AND status = 'CONFIRMED' AND start_time > ? ORDER BY start_time ASC LIMIT 1"
        )
            .bind(tenant_id).bind(client_id).bind(after)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn set_status(&self, tenant_id: &str, id: &str, status: &str) -> Result<Appointment, AppError> {
        sqlx::query_as::<_, Appointment>(
            "UPDATE appointments SET status = ? WHERE tenant_id = ? AND id = ? RETURNING *"
        )
            .bind(status).bind(tenant_id).bind(id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
}
