//! Session extractors.
//!
//! - [`auth::Caller`] -- resolves the caller's role; anonymous without a token.
//! - [`auth::AuthUser`] -- requires a valid Bearer token.
//! - [`rbac::RequireAdmin`] -- requires the `admin` role.

pub mod auth;
pub mod rbac;
