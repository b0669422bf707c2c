use std::sync::Arc;
use crate::config::Config;
use crate::domain::ports::{
    AppointmentRepository, ClientRepository, Clock, NotificationSender,
    TenantRepository, UserRepository,
};
use crate::domain::services::auth_service::AuthService;
use crate::domain::services::booking::BookingService;
use crate::domain::services::reminders::ReminderScheduler;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub tenant_repo: Arc<dyn TenantRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub client_repo: Arc<dyn ClientRepository>,
    pub appointment_repo: Arc<dyn AppointmentRepository>,
    pub notifier: Arc<dyn NotificationSender>,
    pub clock: Arc<dyn Clock>,
    pub auth_service: Arc<AuthService>,
    pub booking_service: Arc<BookingService>,
    pub reminder_scheduler: Arc<ReminderScheduler>,
}
