use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Graph API error: {0}")]
    Graph(#[from] reqwest::Error),

    #[error("Graph API rejected the message: {0}")]
    Send(String),

    #[error("Webhook signature verification failed")]
    Signature,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
