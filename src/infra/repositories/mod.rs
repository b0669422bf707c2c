pub mod sqlite_appointment_repo;
pub mod sqlite_client_repo;
pub mod sqlite_tenant_repo;
pub mod sqlite_user_repo;

pub mod postgres_appointment_repo;
pub mod postgres_client_repo;
pub mod postgres_tenant_repo;
pub mod postgres_user_repo;
