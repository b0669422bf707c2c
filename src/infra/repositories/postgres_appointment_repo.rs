use crate::domain::{models::appointment::Appointment, ports::AppointmentRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresAppointmentRepo {
    pool: PgPool,
}

impl PostgresAppointmentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentRepository for PostgresAppointmentRepo {
    async fn create(&self, appointment: &Appointment) -> Result<Appointment, AppError> {
        sqlx::query_as::<_, Appointment>(
            "INSERT INTO appointments (id, tenant_id, client_id, start_time, end_time, status, source, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *"
        )
            .bind(&appointment.id).bind(&appointment.tenant_id).bind(&appointment.client_id)
            .bind(appointment.start_time).bind(appointment.end_time)
            .bind(&appointment.status).bind(&appointment.source).bind(appointment.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE tenant_id = $1 AND id = $2").bind(tenant_id).bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_tenant(&self, tenant_id: &str) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE tenant_id = $1 ORDER BY start_time DESC").bind(tenant_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_upcoming(&self, tenant_id: &str, after: DateTime<Utc>, limit: i64) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE tenant_id = $1 AND start_time >= $2 ORDER BY start_time ASC LIMIT $3"
        )
            .bind(tenant_id).bind(after).bind(limit)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_busy(&self, tenant_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE tenant_id = $1 AND start_time < $2 AND end_time > $3 AND status = 'CONFIRMED'"
        )
            .bind(tenant_id).bind(end).bind(start)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_confirmed_future(&self, after: DateTime<Utc>) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE status = 'CONFIRMED' AND start_time > $1 ORDER BY start_time ASC"
        )
            .bind(after)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn next_confirmed_for_client(&self, tenant_id: &str, client_id: &str, after: DateTime<Utc>) -> Result<Option<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE tenant_id = $1 AND client_id = $2 AND status = 'CONFIRMED' AND start_time > $3 ORDER BY start_time ASC LIMIT 1"
        )
            .bind(tenant_id).bind(client_id).bind(after)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn set_status(&self, tenant_id: &str, id: &str, status: &str) -> Result<Appointment, AppError> {
        sqlx::query_as::<_, Appointment>(
            "UPDATE appointments SET status = $1 WHERE tenant_id = $2 AND id = $3 RETURNING *"
        )
            .bind(status).bind(tenant_id).bind(id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
}
