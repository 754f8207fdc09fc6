use thiserror::Error;
use timeless_dom::DomError;

#[derive(Debug, Error)]
pub enum PageError {
    /// An element a feature depends on is not in the document.
    #[error("missing element `{selector}`")]
    MissingElement { selector: String },

    #[error(transparent)]
    Dom(#[from] DomError),

    #[error("form submission failed: {0}")]
    Submit(#[from] SubmitError),
}

impl PageError {
    pub fn missing(selector: impl Into<String>) -> Self {
        Self::MissingElement {
            selector: selector.into(),
        }
    }

    pub fn is_missing_element(&self) -> bool {
        matches!(self, Self::MissingElement { .. })
    }
}

/// Why a contact form submission did not go through.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("network error: {0}")]
    Network(String),
}
