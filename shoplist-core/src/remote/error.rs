//! Remote failure taxonomy.

/// Broad class of a remote failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Unreachable,
    Rejected,
}

/// Why a remote operation did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteFailure {
    /// No response: connection refused, DNS failure, timeout, dropped body.
    Unreachable(String),
    /// The remote answered but declined the operation, or answered with
    /// something that could not be understood. `status` is `None` for the
    /// latter.
    Rejected { status: Option<u16>, reason: String },
}

impl RemoteFailure {
    pub fn kind(&self) -> FailureKind {
        match self {
            RemoteFailure::Unreachable(_) => FailureKind::Unreachable,
            RemoteFailure::Rejected { .. } => FailureKind::Rejected,
        }
    }
}

impl std::fmt::Display for RemoteFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteFailure::Unreachable(e) => write!(f, "Server unreachable: {}", e),
            RemoteFailure::Rejected {
                status: Some(status),
                reason,
            } => write!(f, "Server rejected request ({}): {}", status, reason),
            RemoteFailure::Rejected {
                status: None,
                reason,
            } => write!(f, "Server sent an unusable response: {}", reason),
        }
    }
}

impl std::error::Error for RemoteFailure {}
