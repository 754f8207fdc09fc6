use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum AnimError {
    #[error("unknown easing `{0}`")]
    UnknownEasing(String),
}
