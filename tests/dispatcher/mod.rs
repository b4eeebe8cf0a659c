//! Operation dispatch tests against the in-memory reference connector.

pub mod crud;
pub mod validation;
