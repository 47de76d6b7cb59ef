//! Error types for the page behaviour layer

use thiserror::Error;

/// Main error type for page behaviour operations
#[derive(Error, Debug)]
pub enum ClientError {
    /// A delete counter did not start with a base-10 integer
    #[error("Counter {selector} is not a number: {text:?}")]
    CounterParse {
        /// Selector of the offending counter node
        selector: String,
        /// The text found in the node
        text: String,
    },

    /// Configuration was rejected
    #[error("Config error: {0}")]
    Config(String),

    /// Error during serialization/deserialization
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// General I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A third-party widget (CAPTCHA, lightbox) failed
    #[error("Widget error: {0}")]
    Widget(String),

    /// A scenario step referenced an element that is not in the page
    #[error("Unknown element: #{0}")]
    UnknownElement(String),
}

/// Result type alias using ClientError
pub type ClientResult<T> = Result<T, ClientError>;
