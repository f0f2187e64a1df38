use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid viewport '{0}': expected WIDTHxHEIGHT, e.g. 1280x800")]
    InvalidViewport(String),

    #[error("Invalid wait policy '{0}': expected networkidle, domready, or delay:<ms>")]
    InvalidWaitPolicy(String),

    #[error("Invalid target URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
