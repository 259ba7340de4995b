use thiserror::Error;

pub type Result<T> = std::result::Result<T, CaptchaError>;

#[derive(Debug, Error)]
pub enum CaptchaError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service error: {0}")]
    Service(String),
}
