use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, error, info};

use shared_config::AppConfig;

use crate::models::NotificationError;

/// Outbound mail contract consumed by the booking workflow. Delivery is
/// best-effort; a transport rejection surfaces as an error and the caller
/// decides what to do with the request.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_mail(
        &self,
        recipients: &[String],
        subject: &str,
        html_body: &str,
    ) -> Result<(), NotificationError>;
}

#[derive(Serialize)]
struct MailRelayRequest<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    html: &'a str,
}

/// HTTP client for the transactional mail relay.
/// POST {base_url}/messages with a bearer token.
pub struct HttpMailerClient {
    client: Client,
    base_url: String,
    api_key: String,
    sender: String,
    configured: bool,
}

impl HttpMailerClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.mail_api_url.clone(),
            api_key: config.mail_api_key.clone(),
            sender: config.mail_sender.clone(),
            configured: config.is_mail_configured(),
        }
    }
}

#[async_trait]
impl Mailer for HttpMailerClient {
    async fn send_mail(
        &self,
        recipients: &[String],
        subject: &str,
        html_body: &str,
    ) -> Result<(), NotificationError> {
        if !self.configured {
            return Err(NotificationError::NotConfigured);
        }
        if recipients.is_empty() {
            return Err(NotificationError::NoRecipients);
        }

        let url = format!("{}/messages", self.base_url);

        let request_body = MailRelayRequest {
            from: &self.sender,
            to: recipients,
            subject,
            html: html_body,
        };

        debug!("Sending mail request to: {}", url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let response_text = response.text().await.unwrap_or_default();
            error!("Mail relay rejected message: {} - {}", status, response_text);
            return Err(NotificationError::RelayError {
                message: format!("HTTP {}: {}", status, response_text),
            });
        }

        info!("Mail dispatched to {} recipient(s): {}", recipients.len(), subject);
        Ok(())
    }
}
