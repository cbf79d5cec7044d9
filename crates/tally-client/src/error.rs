//! Error taxonomy for the tally client.
//!
//! Every failure in this crate is fatal for the run it occurs in: the caller
//! surfaces it and aborts the remaining sequence. There is no retry layer.

use thiserror::Error;

pub type TallyResult<T> = Result<T, TallyError>;

#[derive(Debug, Error)]
pub enum TallyError {
    /// Bad or missing stored signer material.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Invalid role bindings or signer set for an operation. Always raised
    /// before anything reaches the network.
    #[error("construction error: {message}")]
    Construction { message: String },

    /// Submission rejected, confirmation timed out, or funding denied. The
    /// message carries the underlying transport detail verbatim.
    #[error("network error: {message}")]
    Network { message: String },
}

impl TallyError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    pub fn construction(message: impl Into<String>) -> Self {
        Self::Construction { message: message.into() }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network { message: message.into() }
    }
}

impl From<solana_client::client_error::ClientError> for TallyError {
    fn from(err: solana_client::client_error::ClientError) -> Self {
        Self::Network { message: err.to_string() }
    }
}
