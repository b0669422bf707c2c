use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::info;

use crate::domain::models::appointment::{Appointment, STATUS_CANCELLED};
use crate::domain::models::client::Client;
use crate::domain::ports::{AppointmentRepository, ClientRepository};
use crate::domain::services::conflict::has_conflict;
use crate::domain::services::reminders::ReminderScheduler;
use crate::error::AppError;

/// The read-check-write booking sequence has no storage-level exclusion
/// constraint backing it, so all bookings of one tenant serialize on a
/// per-tenant mutex to keep the conflict check honest under concurrency.
pub struct BookingService {
    appointment_repo: Arc<dyn AppointmentRepository>,
    client_repo: Arc<dyn ClientRepository>,
    scheduler: Arc<ReminderScheduler>,
    tenant_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl BookingService {
    pub fn new(
        appointment_repo: Arc<dyn AppointmentRepository>,
        client_repo: Arc<dyn ClientRepository>,
        scheduler: Arc<ReminderScheduler>,
    ) -> Self {
        Self {
            appointment_repo,
            client_repo,
            scheduler,
            tenant_locks: Mutex::new(HashMap::new()),
        }
    }

    pub async fn book(
        &self,
        tenant_id: &str,
        phone: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        source: &str,
    ) -> Result<Appointment, AppError> {
        if phone.trim().is_empty() {
            return Err(AppError::Validation("Phone is required".into()));
        }
        if start >= end {
            return Err(AppError::Validation("Appointment must end after it starts".into()));
        }

        let lock = self.tenant_lock(tenant_id).await;
        let _guard = lock.lock().await;

        let busy: Vec<_> = self
            .appointment_repo
            .list_busy(tenant_id, start, end)
            .await?
            .iter()
            .map(|a| (a.start_time, a.end_time))
            .collect();

        if has_conflict(start, end, &busy) {
            return Err(AppError::Conflict("Requested time overlaps an existing appointment".into()));
        }

        let client = self.ensure_client(tenant_id, phone).await?;
        let appointment = Appointment::new(tenant_id.to_string(), client.id.clone(), start, end, source);
        let created = self.appointment_repo.create(&appointment).await?;
        drop(_guard);

        info!("Appointment booked: {} ({})", created.id, created.source);

        self.scheduler.reconcile_all().await?;
        Ok(created)
    }

    pub async fn cancel(&self, tenant_id: &str, appointment_id: &str) -> Result<Appointment, AppError> {
        let appointment = self
            .appointment_repo
            .find_by_id(tenant_id, appointment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Appointment not found".into()))?;

        if appointment.status == STATUS_CANCELLED {
            return Ok(appointment);
        }

        let cancelled = self
            .appointment_repo
            .set_status(tenant_id, appointment_id, STATUS_CANCELLED)
            .await?;

        info!("Appointment cancelled: {}", cancelled.id);

        self.scheduler.reconcile_all().await?;
        Ok(cancelled)
    }

    /// Look up the client by (tenant, phone), creating it on first contact.
    pub async fn ensure_client(&self, tenant_id: &str, phone: &str) -> Result<Client, AppError> {
        if let Some(existing) = self.client_repo.find_by_phone(tenant_id, phone).await? {
            return Ok(existing);
        }
        self.client_repo
            .create(&Client::new(tenant_id.to_string(), phone.to_string(), None))
            .await
    }

    async fn tenant_lock(&self, tenant_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.tenant_locks.lock().await;
        locks
            .entry(tenant_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
