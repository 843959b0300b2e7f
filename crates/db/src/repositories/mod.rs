//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod submission_repo;
pub mod survey_repo;
pub mod template_repo;

pub use submission_repo::{SubmissionPage, SubmissionRepo};
pub use survey_repo::SurveyRepo;
pub use template_repo::TemplateRepo;
