use crate::HttpError;

/// Errors that occurred while building or reporting an item.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A field of the payload violates one of its constraints (length, blank value, missing
    /// required field). Raised synchronously while constructing the payload.
    #[error("invalid {field}: {reason}")]
    Validation {
        /// Name of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// Attempt to overwrite a known member of an extensible payload node through
    /// [`Extensible::put`](crate::models::Extensible::put).
    #[error("'{0}' is a known member and must be set with the corresponding method")]
    ReservedKey(String),

    /// Neither an error nor a message was given to the reporter.
    #[error("either an error or a message is required to build an item")]
    MissingContent,

    /// The configured endpoint is not a valid absolute URI.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// A required environment variable is not set or not valid unicode.
    #[error("reading environment variable {0} failed with {1}")]
    MissingEnvVar(&'static str, std::env::VarError),

    /// The item failed to serialize to JSON. Reporting failed because of this.
    ///
    /// Note: This is an error in this crate. If you spot this, please open an issue.
    #[error("serializing item failed with {0}")]
    Serialize(serde_json::Error),

    /// Could not complete the HTTP request to Rollbar. Reporting failed because of this.
    #[error("sending item failed with {0}")]
    Transport(HttpError),

    /// Rollbar rejected the item and told us why.
    #[error("{status}: error message from Rollbar: {message}")]
    RemoteRejection {
        /// HTTP status code of the response.
        status: u16,
        /// Error message returned by Rollbar.
        message: String,
    },

    /// Rollbar answered with a response we could not make sense of.
    ///
    /// Reporting may have worked. But since we could not look into the response, we can't be
    /// sure.
    #[error("{status}: could not parse response: <{body}>")]
    MalformedResponse {
        /// HTTP status code of the response.
        status: u16,
        /// Raw response body.
        body: String,
    },
}

impl Error {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Error::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// HTTP status code of the response, if the error was caused by one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::RemoteRejection { status, .. } | Error::MalformedResponse { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}
