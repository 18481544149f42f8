use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Markup parsing error: {0}")]
    Markup(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Carousel service has shut down")]
    ServiceClosed,

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
