use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const STATUS_CONFIRMED: &str = "CONFIRMED";
pub const STATUS_CANCELLED: &str = "CANCELLED";

pub const SOURCE_MANUAL: &str = "MANUAL";
pub const SOURCE_WHATSAPP: &str = "WHATSAPP";

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Appointment {
    pub id: String,
    pub tenant_id: String,
    pub client_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    pub fn new(
        tenant_id: String,
        client_id: String,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        source: &str,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tenant_id,
            client_id,
            start_time,
            end_time,
            status: STATUS_CONFIRMED.to_string(),
            source: source.to_string(),
            created_at: Utc::now(),
        }
    }
}
