use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("failed to read HTML file: {0}")]
    Io(#[from] std::io::Error),
}
