use serde::Deserialize;

#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub clinic: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct UpdateTenantRequest {
    pub name: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateAppointmentRequest {
    pub phone: String,
    /// ISO date-time; a naive value is interpreted in the configured zone.
    pub start: String,
    pub end: Option<String>,
}

#[derive(Deserialize)]
pub struct UpcomingQuery {
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct AvailabilityQuery {
    pub date: Option<String>,
}

// Meta webhook verification handshake parameters.
#[derive(Deserialize)]
pub struct WebhookVerifyQuery {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
}

// Inbound WhatsApp Cloud API payload, reduced to the fields this service
// reads. Everything is optional so unrelated event shapes deserialize to
// an empty message list instead of failing.
#[derive(Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub entry: Vec<WebhookEntry>,
}

#[derive(Deserialize)]
pub struct WebhookEntry {
    #[serde(default)]
    pub changes: Vec<WebhookChange>,
}

#[derive(Deserialize)]
pub struct WebhookChange {
    pub value: Option<WebhookValue>,
}

#[derive(Deserialize)]
pub struct WebhookValue {
    #[serde(default)]
    pub messages: Vec<WebhookMessage>,
}

#[derive(Deserialize)]
pub struct WebhookMessage {
    pub from: String,
    pub text: Option<WebhookText>,
}

#[derive(Deserialize)]
pub struct WebhookText {
    pub body: String,
}
