//! Community domain engine.
//!
//! Business rules for communities: the relationship graph between communities, the
//! membership lifecycle, the community role hierarchy, privacy transitions and ownership
//! transfer. Persistence goes through the repositories in [`data`], and every public
//! operation of [`service::community::CommunityService`] runs inside one database
//! transaction.

pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod service;
pub mod startup;
