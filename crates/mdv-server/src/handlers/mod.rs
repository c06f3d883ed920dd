//! HTTP request handlers.

pub(crate) mod admin;
pub(crate) mod docs;
pub(crate) mod generated;
pub(crate) mod listing;
