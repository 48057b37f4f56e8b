use crate::{build::BuildError, expr::path::ResolveError, rebind::RebindError};
use thiserror::Error as ThisError;

///
/// Error
///
/// Top-level error surface for callers that funnel builder and transformer
/// failures through one type. Module errors stay usable on their own; this
/// only aggregates.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum Error {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Rebind(#[from] RebindError),
}

impl From<ResolveError> for Error {
    fn from(err: ResolveError) -> Self {
        Self::Build(err.into())
    }
}

///
/// TESTS
///
