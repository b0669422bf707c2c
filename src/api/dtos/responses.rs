use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize)]
pub struct AppointmentView {
    pub id: String,
    pub phone: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: String,
    pub source: String,
}

#[derive(Serialize)]
pub struct SlotView {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct SlotsResponse {
    pub date: String,
    pub slots: Vec<SlotView>,
}
