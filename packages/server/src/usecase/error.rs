//! UseCase 層のエラー定義

use thiserror::Error;

use crate::{
    domain::{RepositoryError, RoomError},
    infrastructure::dto::websocket::CodecError,
};

/// Reasons a client frame was rejected.
///
/// The display text is what the client sees in the `error` event.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoordinatorError {
    #[error(transparent)]
    Malformed(#[from] CodecError),

    #[error(transparent)]
    Rejected(#[from] RoomError),

    #[error("Could not create room: {0}")]
    Repository(#[from] RepositoryError),
}
