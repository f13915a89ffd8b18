//! Result of one call to one backend

use bytes::Bytes;

/// What a single backend call produced
///
/// Created once per backend per replayed request and consumed by
/// [`classify`](crate::classify). Never retried or cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendOutcome {
    /// The backend answered `200 OK` and the body was read completely
    Success { body: Bytes },
    /// Connection, status or body-read failure
    Failure { reason: String },
}

impl BackendOutcome {
    /// Create a success outcome
    pub fn success(body: impl Into<Bytes>) -> Self {
        Self::Success { body: body.into() }
    }

    /// Create a failure outcome
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The response body, if the call succeeded
    pub fn body(&self) -> Option<&Bytes> {
        match self {
            Self::Success { body } => Some(body),
            Self::Failure { .. } => None,
        }
    }

    /// The failure reason, if the call failed
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { reason } => Some(reason),
        }
    }
}
