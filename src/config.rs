use std::str::FromStr;

use crate::error::{config::ConfigError, AppError};

/// Members allowed in a community owned by a free user.
pub const MAX_MEMBERS_FREE: u64 = 50;
/// Members allowed in a community owned by a premium user.
pub const MAX_MEMBERS_PREMIUM: u64 = 500;
/// Relationships a single community may hold.
pub const MAX_RELATIONSHIPS: u64 = 10;
/// Communities a free user may own.
pub const MAX_OWNED_FREE: u64 = 5;
/// Communities a premium user may own.
pub const MAX_OWNED_PREMIUM: u64 = 20;
/// Outstanding invitations a community may hold.
pub const MAX_PENDING_INVITES: u64 = 100;

/// Words a community name may not contain, compared case-insensitively.
pub const RESTRICTED_NAMES: [&str; 9] = [
    "admin",
    "moderator",
    "official",
    "banned",
    "restricted",
    "community_admin",
    "system",
    "support",
    "test",
];

pub struct Config {
    pub database_url: String,
    pub engine: EngineConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .map_err(|_| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?,
            engine: EngineConfig::from_env()?,
        })
    }
}

/// Limits applied by the quota checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaLimits {
    pub max_members_free: u64,
    pub max_members_premium: u64,
    pub max_relationships: u64,
    pub max_owned_free: u64,
    pub max_owned_premium: u64,
    pub max_pending_invites: u64,
}

impl Default for QuotaLimits {
    fn default() -> Self {
        Self {
            max_members_free: MAX_MEMBERS_FREE,
            max_members_premium: MAX_MEMBERS_PREMIUM,
            max_relationships: MAX_RELATIONSHIPS,
            max_owned_free: MAX_OWNED_FREE,
            max_owned_premium: MAX_OWNED_PREMIUM,
            max_pending_invites: MAX_PENDING_INVITES,
        }
    }
}

/// Bounds for walking the relationship graph.
///
/// `max_depth` limits how far from the root a walk descends, `max_nodes` limits how many
/// communities a single walk or snapshot may visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraversalLimits {
    pub max_depth: usize,
    pub max_nodes: usize,
}

impl Default for TraversalLimits {
    fn default() -> Self {
        Self {
            max_depth: 32,
            max_nodes: 1000,
        }
    }
}

/// Settings the community service is built with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub quotas: QuotaLimits,
    pub traversal: TraversalLimits,
    pub restricted_names: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            quotas: QuotaLimits::default(),
            traversal: TraversalLimits::default(),
            restricted_names: RESTRICTED_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl EngineConfig {
    /// Builds the engine settings from defaults overridden by optional environment variables.
    ///
    /// # Returns
    /// - `Ok(EngineConfig)` - Defaults with every set variable applied
    /// - `Err(AppError::ConfigErr)` - A variable is set but is not a valid number
    pub fn from_env() -> Result<Self, AppError> {
        let mut config = Self::default();
        let quotas = &mut config.quotas;

        override_from_env("COMMUNITY_MAX_MEMBERS_FREE", &mut quotas.max_members_free)?;
        override_from_env(
            "COMMUNITY_MAX_MEMBERS_PREMIUM",
            &mut quotas.max_members_premium,
        )?;
        override_from_env("COMMUNITY_MAX_RELATIONSHIPS", &mut quotas.max_relationships)?;
        override_from_env("COMMUNITY_MAX_OWNED_FREE", &mut quotas.max_owned_free)?;
        override_from_env("COMMUNITY_MAX_OWNED_PREMIUM", &mut quotas.max_owned_premium)?;
        override_from_env(
            "COMMUNITY_MAX_PENDING_INVITES",
            &mut quotas.max_pending_invites,
        )?;

        let traversal = &mut config.traversal;
        override_from_env("COMMUNITY_TRAVERSAL_MAX_DEPTH", &mut traversal.max_depth)?;
        override_from_env("COMMUNITY_TRAVERSAL_MAX_NODES", &mut traversal.max_nodes)?;

        Ok(config)
    }
}

fn override_from_env<T: FromStr>(name: &str, target: &mut T) -> Result<(), ConfigError> {
    if let Ok(value) = std::env::var(name) {
        *target = value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidEnvVar {
                name: name.to_string(),
                value,
            })?;
    }

    Ok(())
}
