//! Request middleware.

pub(crate) mod access;
pub(crate) mod security;
