//! Session tokens.
//!
//! - [`jwt`] -- HS256 session token generation and validation.

pub mod jwt;
