//! Domain logic for the Canvass survey submission engine.
//!
//! This crate is pure: no database access, no network I/O. It holds the
//! survey field/answer schema model, per-type answer validation, the
//! submission-window state machine, table-answer normalization, the
//! organization registry with its identifier compatibility rules, and
//! the coverage aggregation engine. Callers (the API crate) pre-load
//! any data these functions need and pass it in.

pub mod coverage;
pub mod error;
pub mod ownership;
pub mod registry;
pub mod schema;
pub mod table;
pub mod validation;
pub mod window;
