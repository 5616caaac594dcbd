//! Failure categories shared by every port backed by the external service.

use tracing::warn;

use crate::domain::Error;

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity and data ports.
    pub enum BackendServiceError {
        /// The service could not be reached or answered with a server error.
        Transport { message: String } =>
            "backend service transport failed: {message}",
        /// The request exceeded the configured timeout.
        Timeout { message: String } =>
            "backend service timed out: {message}",
        /// The service refused the token or credentials.
        Unauthorized { message: String } =>
            "backend service rejected credentials: {message}",
        /// The service rejected the request itself.
        Rejected { message: String } =>
            "backend service rejected request: {message}",
        /// The response body could not be decoded.
        Decode { message: String } =>
            "backend service returned an unreadable payload: {message}",
    }
}

impl From<BackendServiceError> for Error {
    fn from(value: BackendServiceError) -> Self {
        warn!(error = %value, "backend service call failed");
        match value {
            BackendServiceError::Unauthorized { .. } => Self::unauthorized("invalid credentials"),
            BackendServiceError::Transport { .. } | BackendServiceError::Timeout { .. } => {
                Self::service_unavailable("backend service unavailable")
            }
            BackendServiceError::Rejected { .. } | BackendServiceError::Decode { .. } => {
                Self::internal(value.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(BackendServiceError::unauthorized("jwt expired"), ErrorCode::Unauthorized)]
    #[case(BackendServiceError::transport("connection refused"), ErrorCode::ServiceUnavailable)]
    #[case(BackendServiceError::timeout("10s"), ErrorCode::ServiceUnavailable)]
    #[case(BackendServiceError::rejected("status 404"), ErrorCode::InternalError)]
    #[case(BackendServiceError::decode("missing field"), ErrorCode::InternalError)]
    fn maps_to_domain_error(#[case] source: BackendServiceError, #[case] expected: ErrorCode) {
        assert_eq!(Error::from(source).code(), expected);
    }
}
