//! Typed error handling for the store layer
//!
//! Two layers of errors cross this crate:
//!
//! - [`FetchError`]: what the transport collaborators raise (network failures,
//!   garbled responses). The stores never let these escape raw.
//! - [`StoreError`]: what store operations return to UI callers. Every fetch
//!   failure is caught at the store boundary and converted here, so callers
//!   can match on a small, stable set of conditions.
//!
//! A failed operation never leaves a store partially updated: either the whole
//! fetched result is committed, or the previous state (selection, cache,
//! wishlist membership) survives untouched.

use thiserror::Error;

use crate::core::id::EntityId;

/// Errors raised by the transport collaborators.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// The request never completed (timeout, connection refused, offline).
    #[error("network failure: {message}")]
    Network { message: String },

    /// The transport answered with something the client cannot use.
    #[error("unexpected transport response: {message}")]
    Unexpected { message: String },
}

impl FetchError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }
}

/// Errors surfaced by store operations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Selection by identifier did not resolve. The previous active selection
    /// is preserved.
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: EntityId },

    /// The transport failed. Any previously cached data is preserved and
    /// keeps rendering as stale state.
    #[error("network failure: {message}")]
    Network { message: String },

    /// A wishlist mutation was attempted with no authenticated user.
    #[error("no authenticated user")]
    SignedOut,

    /// Something the store cannot recover from (a bug, not a user condition).
    #[error("internal store error: {message}")]
    Internal { message: String },
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: EntityId) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Stable code for notification routing in UI layers
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Network { .. } => "NETWORK_FAILURE",
            Self::SignedOut => "SIGNED_OUT",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<FetchError> for StoreError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Network { message } => StoreError::Network { message },
            FetchError::Unexpected { message } => StoreError::Internal { message },
        }
    }
}

/// A specialized Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
