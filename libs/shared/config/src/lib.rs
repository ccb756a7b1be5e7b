use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub docstore_url: String,
    pub docstore_service_key: String,
    pub jwt_secret: String,
    pub mail_api_url: String,
    pub mail_api_key: String,
    pub mail_sender: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            docstore_url: env::var("DOCSTORE_URL").unwrap_or_else(|_| {
                warn!("DOCSTORE_URL not set, using empty value");
                String::new()
            }),
            docstore_service_key: env::var("DOCSTORE_SERVICE_KEY").unwrap_or_else(|_| {
                warn!("DOCSTORE_SERVICE_KEY not set, using empty value");
                String::new()
            }),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| {
                warn!("JWT_SECRET not set, using empty value");
                String::new()
            }),
            mail_api_url: env::var("MAIL_API_URL").unwrap_or_else(|_| {
                warn!("MAIL_API_URL not set, using empty value");
                String::new()
            }),
            mail_api_key: env::var("MAIL_API_KEY").unwrap_or_else(|_| {
                warn!("MAIL_API_KEY not set, using empty value");
                String::new()
            }),
            mail_sender: env::var("MAIL_SENDER").unwrap_or_else(|_| {
                warn!("MAIL_SENDER not set, using default");
                "DocConnect <no-reply@docconnect.example>".to_string()
            }),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.docstore_url.is_empty()
            && !self.docstore_service_key.is_empty()
            && !self.jwt_secret.is_empty()
    }

    pub fn is_mail_configured(&self) -> bool {
        !self.mail_api_url.is_empty()
            && !self.mail_api_key.is_empty()
            && !self.mail_sender.is_empty()
    }
}
