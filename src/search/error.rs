use crate::types::{PoseDataError, SingularTransformError};

/// Structural failures surfaced to the caller of a search.
///
/// Rejection of an individual candidate is never an error; it only shows up
/// in the validation diagnostics.
#[derive(Clone, Debug, PartialEq)]
pub enum SearchError {
    /// The composition base pose (`model[0]`) cannot be inverted.
    SingularTransform(SingularTransformError),
    /// Raw pose input could not be decoded.
    MalformedInput(PoseDataError),
    /// A tolerance or threshold is out of range.
    InvalidParameter { name: &'static str, value: f32 },
    /// The caller abandoned the search.
    Cancelled,
    /// The worker running the search stopped without reporting a result.
    WorkerLost,
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::SingularTransform(err) => write!(f, "singular transform: {err}"),
            SearchError::MalformedInput(err) => write!(f, "malformed input: {err}"),
            SearchError::InvalidParameter { name, value } => {
                write!(f, "invalid parameter {name} = {value}")
            }
            SearchError::Cancelled => write!(f, "search cancelled"),
            SearchError::WorkerLost => write!(f, "search worker exited without a result"),
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SearchError::SingularTransform(err) => Some(err),
            SearchError::MalformedInput(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SingularTransformError> for SearchError {
    fn from(err: SingularTransformError) -> Self {
        SearchError::SingularTransform(err)
    }
}

impl From<PoseDataError> for SearchError {
    fn from(err: PoseDataError) -> Self {
        SearchError::MalformedInput(err)
    }
}
