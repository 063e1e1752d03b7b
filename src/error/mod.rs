//! Error types for the community engine.
//!
//! `AppError` is the error returned by every service operation. It separates domain
//! failures (not found, validation, access, business rules, quotas, state, concurrency)
//! from infrastructure failures (configuration and database). Callers that map errors to
//! transport codes match on [`AppError::kind`].

pub mod business;
pub mod config;

use thiserror::Error;

use crate::error::{business::BusinessRuleError, config::ConfigError};

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Database operation error from SeaORM.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// Referenced resource does not exist.
    ///
    /// # Fields
    /// - `resource` - Kind of resource, e.g. `"community"` or `"user"`
    /// - `id` - Identifier that was looked up
    #[error("{resource} {id} not found")]
    ResourceNotFound { resource: &'static str, id: String },

    /// Input failed validation before any rule was evaluated.
    #[error("{0}")]
    Validation(String),

    /// Acting user lacks the membership or role the operation requires.
    #[error("Access denied for user {user_id}: {reason}")]
    AccessDenied { user_id: i32, reason: String },

    /// A domain rule refused the operation.
    #[error(transparent)]
    BusinessRule(#[from] BusinessRuleError),

    /// A configured limit has been reached.
    ///
    /// # Fields
    /// - `quota` - Name of the limit, e.g. `"members"` or `"relationships"`
    /// - `limit` - Configured maximum
    /// - `current` - Count observed when the check ran
    #[error("Quota '{quota}' exceeded: {current} of {limit}")]
    QuotaExceeded {
        quota: String,
        limit: u64,
        current: u64,
    },

    /// The stored state does not allow the operation, or a multi-step write failed.
    #[error("{message}")]
    State {
        message: String,
        #[source]
        source: Option<Box<AppError>>,
    },

    /// Assigning a community role failed after the community and user were found.
    #[error("Failed to assign role '{role}' to user {user_id} in community {community_id}: {source}")]
    RoleAssignment {
        community_id: i32,
        user_id: i32,
        role: String,
        #[source]
        source: Box<AppError>,
    },

    /// A row changed between being read and being written.
    #[error("Concurrent modification: {0}")]
    Concurrency(String),
}

/// Flat classification of [`AppError`] for callers mapping errors to transport codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Validation,
    AccessDenied,
    BusinessRule,
    QuotaExceeded,
    State,
    RoleAssignment,
    Concurrency,
    Config,
    Database,
}

impl AppError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::ResourceNotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn access_denied(user_id: i32, reason: impl Into<String>) -> Self {
        Self::AccessDenied {
            user_id,
            reason: reason.into(),
        }
    }

    pub fn state(message: impl Into<String>) -> Self {
        Self::State {
            message: message.into(),
            source: None,
        }
    }

    /// Wraps `source` into a `State` error with the given message.
    pub fn state_with_source(message: impl Into<String>, source: AppError) -> Self {
        Self::State {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn quota(quota: impl Into<String>, limit: u64, current: u64) -> Self {
        Self::QuotaExceeded {
            quota: quota.into(),
            limit,
            current,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigErr(_) => ErrorKind::Config,
            Self::DbErr(_) => ErrorKind::Database,
            Self::ResourceNotFound { .. } => ErrorKind::NotFound,
            Self::Validation(_) => ErrorKind::Validation,
            Self::AccessDenied { .. } => ErrorKind::AccessDenied,
            Self::BusinessRule(_) => ErrorKind::BusinessRule,
            Self::QuotaExceeded { .. } => ErrorKind::QuotaExceeded,
            Self::State { .. } => ErrorKind::State,
            Self::RoleAssignment { .. } => ErrorKind::RoleAssignment,
            Self::Concurrency(_) => ErrorKind::Concurrency,
        }
    }
}
