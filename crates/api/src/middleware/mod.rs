//! Request extractors used as handler guards.

pub mod admin;

pub use admin::AdminAccess;
