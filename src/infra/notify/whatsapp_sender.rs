use crate::domain::ports::NotificationSender;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error};

/// WhatsApp Cloud API text sender. With no credentials configured the
/// sender degrades to a no-op that reports success, so a demo deployment
/// runs without a Meta account.
pub struct CloudApiSender {
    client: Client,
    access_token: String,
    phone_number_id: String,
}

impl CloudApiSender {
    pub fn new(access_token: String, phone_number_id: String) -> Self {
        Self {
            client: Client::new(),
            access_token,
            phone_number_id,
        }
    }

    fn is_configured(&self) -> bool {
        !self.access_token.is_empty() && !self.phone_number_id.is_empty()
    }
}

#[async_trait]
impl NotificationSender for CloudApiSender {
    async fn send(&self, phone: &str, text: &str) -> Result<(), AppError> {
        if !self.is_configured() {
            debug!("WhatsApp credentials missing; dropping message to {}", phone);
            return Ok(());
        }

        let url = format!("https://graph.facebook.com/v20.0/{}/messages", self.phone_number_id);
        let payload = json!({
            "messaging_product": "whatsapp",
            "to": phone,
            "type": "text",
            "text": { "body": text },
        });

        let res = self.client.post(&url)
            .bearer_auth(&self.access_token)
            .timeout(Duration::from_secs(10))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("WhatsApp connection error: {}", e);
                error!("{}", msg);
                AppError::Transport(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            let msg = format!("WhatsApp send failed. Status: {}, Body: {}", status, body);
            error!("{}", msg);
            return Err(AppError::Transport(msg));
        }

        Ok(())
    }
}
