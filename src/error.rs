use std::fmt;

/// Domain errors raised while loading or persisting the state document.
///
/// Storage I/O failures are not represented here; they propagate
/// unchanged from the provider.
#[derive(Debug)]
pub enum StateError {
    /// Persisted content exists but is not a well-formed state document.
    Parse(serde_json::Error),
    /// Persisted document belongs to a different organization than the
    /// current session.
    OrganizationMismatch { persisted: String, session: String },
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::Parse(e) => write!(f, "unable to parse state document: {}", e),
            StateError::OrganizationMismatch { persisted, session } => write!(
                f,
                "state and session do not belong to the same organization (state: {}, session: {})",
                persisted, session
            ),
        }
    }
}

impl std::error::Error for StateError {}

impl From<serde_json::Error> for StateError {
    fn from(e: serde_json::Error) -> Self {
        StateError::Parse(e)
    }
}
