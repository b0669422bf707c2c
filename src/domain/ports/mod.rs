use crate::domain::models::{
    appointment::Appointment, client::Client, tenant::Tenant, user::User,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait TenantRepository: Send + Sync {
    async fn create(&self, tenant: &Tenant) -> Result<Tenant, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Tenant>, AppError>;
    async fn find_by_key(&self, tenant_key: &str) -> Result<Option<Tenant>, AppError>;
    async fn update(&self, tenant: &Tenant) -> Result<Tenant, AppError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait ClientRepository: Send + Sync {
    async fn create(&self, client: &Client) -> Result<Client, AppError>;
    async fn find_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<Client>, AppError>;
    async fn find_by_phone(&self, tenant_id: &str, phone: &str) -> Result<Option<Client>, AppError>;
}

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn create(&self, appointment: &Appointment) -> Result<Appointment, AppError>;
    async fn find_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<Appointment>, AppError>;
    async fn list_by_tenant(&self, tenant_id: &str) -> Result<Vec<Appointment>, AppError>;
    async fn list_upcoming(&self, tenant_id: &str, after: DateTime<Utc>, limit: i64) -> Result<Vec<Appointment>, AppError>;
    /// Confirmed appointments of the tenant whose interval intersects [start, end).
    async fn list_busy(&self, tenant_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Appointment>, AppError>;
    /// Confirmed appointments starting after `after`, across all tenants.
    async fn list_confirmed_future(&self, after: DateTime<Utc>) -> Result<Vec<Appointment>, AppError>;
    async fn next_confirmed_for_client(&self, tenant_id: &str, client_id: &str, after: DateTime<Utc>) -> Result<Option<Appointment>, AppError>;
    async fn set_status(&self, tenant_id: &str, id: &str, status: &str) -> Result<Appointment, AppError>;
}

/// Outbound text messaging. Callers treat delivery as best-effort: a
/// returned error is logged and absorbed, never propagated.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, phone: &str, text: &str) -> Result<(), AppError>;
}

/// Injectable time source so reminder timing and "today" windows are
/// deterministic under test.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
