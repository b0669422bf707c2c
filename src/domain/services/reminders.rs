use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::models::appointment::Appointment;
use crate::domain::ports::{AppointmentRepository, ClientRepository, Clock, NotificationSender};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReminderKind {
    DayBefore,
    HourBefore,
}

impl ReminderKind {
    pub fn label(&self) -> &'static str {
        match self {
            ReminderKind::DayBefore => "24h",
            ReminderKind::HourBefore => "1h",
        }
    }
}

struct ReminderJob {
    fire_at: DateTime<Utc>,
    handle: JoinHandle<()>,
}

/// In-memory registry of one-shot reminder deliveries for future confirmed
/// appointments. Nothing here is persisted: the whole job set is torn down
/// and rebuilt from storage by `reconcile_all` after every state-changing
/// operation, which is also the only cancellation mechanism.
pub struct ReminderScheduler {
    appointment_repo: Arc<dyn AppointmentRepository>,
    client_repo: Arc<dyn ClientRepository>,
    sender: Arc<dyn NotificationSender>,
    clock: Arc<dyn Clock>,
    timezone: Tz,
    offsets: [(ReminderKind, i64); 2],
    meeting_join_url: Option<String>,
    jobs: Mutex<HashMap<(String, ReminderKind), ReminderJob>>,
}

impl ReminderScheduler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        appointment_repo: Arc<dyn AppointmentRepository>,
        client_repo: Arc<dyn ClientRepository>,
        sender: Arc<dyn NotificationSender>,
        clock: Arc<dyn Clock>,
        timezone: Tz,
        day_minutes: i64,
        hour_minutes: i64,
        meeting_join_url: Option<String>,
    ) -> Self {
        Self {
            appointment_repo,
            client_repo,
            sender,
            clock,
            timezone,
            offsets: [
                (ReminderKind::DayBefore, day_minutes),
                (ReminderKind::HourBefore, hour_minutes),
            ],
            meeting_join_url,
            jobs: Mutex::new(HashMap::new()),
        }
    }

    /// Drop every pending job and re-derive the set from all confirmed
    /// appointments that still lie in the future. The registry mutex is
    /// held for the whole rebuild, so concurrent reconciles serialize; a
    /// job that already started firing is not revoked.
    pub async fn reconcile_all(&self) -> Result<(), AppError> {
        let mut jobs = self.jobs.lock().await;
        for (_, job) in jobs.drain() {
            job.handle.abort();
        }

        let now = self.clock.now();
        let upcoming = self.appointment_repo.list_confirmed_future(now).await?;
        info!("Reconciling reminders: {} upcoming appointments", upcoming.len());

        for appointment in &upcoming {
            self.schedule_one(appointment, now, &mut jobs).await?;
        }
        Ok(())
    }

    async fn schedule_one(
        &self,
        appointment: &Appointment,
        now: DateTime<Utc>,
        jobs: &mut HashMap<(String, ReminderKind), ReminderJob>,
    ) -> Result<(), AppError> {
        let client = match self
            .client_repo
            .find_by_id(&appointment.tenant_id, &appointment.client_id)
            .await?
        {
            Some(client) => client,
            None => {
                warn!("Appointment {} has no client; skipping reminders", appointment.id);
                return Ok(());
            }
        };

        for (kind, minutes) in self.offsets {
            let fire_at = appointment.start_time - Duration::minutes(minutes);
            if fire_at <= now {
                // Offset already passed; no catch-up delivery.
                continue;
            }

            let text = self.reminder_text(kind, appointment);
            let handle = self.spawn_job(fire_at - now, client.phone.clone(), text, appointment.id.clone(), kind);

            // Keyed by (appointment, offset): re-registration replaces a
            // stale job instead of duplicating it.
            if let Some(stale) = jobs.insert((appointment.id.clone(), kind), ReminderJob { fire_at, handle }) {
                stale.handle.abort();
            }
        }
        Ok(())
    }

    fn spawn_job(
        &self,
        delay: Duration,
        phone: String,
        text: String,
        appointment_id: String,
        kind: ReminderKind,
    ) -> JoinHandle<()> {
        let sender = self.sender.clone();
        let wait = delay.to_std().unwrap_or_default();
        tokio::spawn(async move {
            tokio::time::sleep(wait).await;
            debug!("Firing {} reminder for appointment {}", kind.label(), appointment_id);
            if let Err(e) = sender.send(&phone, &text).await {
                // Best-effort delivery: the job counts as fired either way.
                warn!("Reminder delivery failed for appointment {}: {}", appointment_id, e);
            }
        })
    }

    fn reminder_text(&self, kind: ReminderKind, appointment: &Appointment) -> String {
        let local_start = appointment.start_time.with_timezone(&self.timezone);
        let suffix = self
            .meeting_join_url
            .as_deref()
            .map(|url| format!("\nJoin: {}", url))
            .unwrap_or_default();
        format!(
            "Reminder ({}): you have a session on {}.{}",
            kind.label(),
            local_start.format("%d.%m %H:%M"),
            suffix
        )
    }

    /// Snapshot of the pending jobs as (appointment id, kind, fire time),
    /// sorted for stable comparison.
    pub async fn pending_jobs(&self) -> Vec<(String, ReminderKind, DateTime<Utc>)> {
        let jobs = self.jobs.lock().await;
        let mut out: Vec<_> = jobs
            .iter()
            .map(|((id, kind), job)| (id.clone(), *kind, job.fire_at))
            .collect();
        out.sort();
        out
    }

    /// Abort all pending timers. Called on process shutdown.
    pub async fn shutdown(&self) {
        let mut jobs = self.jobs.lock().await;
        for (_, job) in jobs.drain() {
            job.handle.abort();
        }
    }
}
