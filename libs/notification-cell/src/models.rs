use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("Mail delivery is not configured")]
    NotConfigured,

    #[error("At least one recipient is required")]
    NoRecipients,

    #[error("Mail relay error: {message}")]
    RelayError { message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
