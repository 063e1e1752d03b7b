//! Domain models and parameter types.
//!
//! Repositories convert entity models into these types at the data boundary. Stored
//! strings such as privacy levels and community roles are parsed here, so a row holding
//! an unknown value surfaces as a database error instead of reaching the business rules.

pub mod community;
pub mod member;
pub mod relationship;
pub mod user;
