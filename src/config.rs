use std::env;
use chrono::NaiveTime;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_expire_minutes: i64,
    pub whatsapp_verify_token: String,
    pub whatsapp_access_token: String,
    pub whatsapp_phone_number_id: String,
    pub work_start: NaiveTime,
    pub work_end: NaiveTime,
    pub slot_minutes: u32,
    pub timezone: String,
    pub reminder_day_minutes: i64,
    pub reminder_hour_minutes: i64,
    pub meeting_join_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            jwt_expire_minutes: env::var("JWT_EXPIRE_MINUTES").unwrap_or_else(|_| "43200".to_string()).parse().expect("JWT_EXPIRE_MINUTES must be a number"),
            whatsapp_verify_token: env::var("WHATSAPP_VERIFY_TOKEN").unwrap_or_else(|_| "verify-123".to_string()),
            whatsapp_access_token: env::var("WHATSAPP_ACCESS_TOKEN").unwrap_or_default(),
            whatsapp_phone_number_id: env::var("WHATSAPP_PHONE_NUMBER_ID").unwrap_or_default(),
            work_start: parse_time(&env::var("WORK_START").unwrap_or_else(|_| "09:00".to_string())),
            work_end: parse_time(&env::var("WORK_END").unwrap_or_else(|_| "18:00".to_string())),
            slot_minutes: env::var("SLOT_MINUTES").unwrap_or_else(|_| "60".to_string()).parse().expect("SLOT_MINUTES must be a number"),
            timezone: env::var("TIMEZONE").unwrap_or_else(|_| "Europe/Istanbul".to_string()),
            reminder_day_minutes: env::var("REMINDER_24H").unwrap_or_else(|_| "1440".to_string()).parse().expect("REMINDER_24H must be a number"),
            reminder_hour_minutes: env::var("REMINDER_1H").unwrap_or_else(|_| "60".to_string()).parse().expect("REMINDER_1H must be a number"),
            meeting_join_url: env::var("MEETING_JOIN_URL").ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
        }
    }
}

fn parse_time(s: &str) -> NaiveTime {
    NaiveTime::parse_from_str(s, "%H:%M").expect("Work hours must be HH:MM")
}
