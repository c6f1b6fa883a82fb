//! Caller roles and the single authorization rule of the admin console.
//!
//! The session itself is issued by an external authentication collaborator;
//! this module only turns an already-verified session into a [`Role`] and
//! checks it. The role is always passed explicitly, never read from ambient
//! state.

use serde::Serialize;

use crate::error::CoreError;

/// Role claim value carried by admin sessions.
pub const ROLE_ADMIN: &str = "admin";

/// Role claim value carried by ordinary signed-in visitors.
pub const ROLE_USER: &str = "user";

/// Resolved role of the caller of a core operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Anonymous,
    User,
    Admin,
}

/// A verified session as handed over by the authentication collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Stable subject identifier of the signed-in account.
    pub subject: String,
    /// Raw role claim (e.g. `"admin"`).
    pub role: String,
}

/// Resolve the caller's role. No session means anonymous; any role claim
/// other than `admin` is treated as a plain user.
pub fn current_role(session: Option<&Session>) -> Role {
    match session {
        None => Role::Anonymous,
        Some(s) if s.role == ROLE_ADMIN => Role::Admin,
        Some(_) => Role::User,
    }
}

/// Refuse anything but the admin role.
pub fn require_admin(role: Role) -> Result<(), CoreError> {
    match role {
        Role::Admin => Ok(()),
        Role::User => Err(CoreError::Unauthorized("Admin role required".into())),
        Role::Anonymous => Err(CoreError::Unauthorized("Authentication required".into())),
    }
}
