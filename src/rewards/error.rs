//! Error types for the rewards gateway.

use thiserror::Error;

/// Errors surfaced while calling the rewards platform.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RewardsError {
    /// No API token was configured.
    #[error("rewards API token is required")]
    MissingToken,

    /// The HTTP client could not be configured.
    #[error("rewards client configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// The platform rejected the token.
    #[error("rewards platform rejected the token: {message}")]
    Authentication {
        /// Status and body returned with the 401/403 response.
        message: String,
    },

    /// The platform returned an error response.
    #[error("rewards API error: {message}")]
    Api {
        /// Status and (truncated) body of the response.
        message: String,
    },

    /// The request could not be delivered or timed out.
    #[error("network error talking to the rewards platform: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// The response body was not the expected JSON.
    #[error("could not decode rewards response: {message}")]
    Decode {
        /// Decoder error detail.
        message: String,
    },
}
