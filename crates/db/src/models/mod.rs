//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - Save DTOs where the repository needs structured input

pub mod submission;
pub mod survey;
pub mod template;

pub use submission::SubmissionRow;
pub use survey::{SaveSurvey, SurveyRow};
pub use template::{SaveTemplate, TemplateRow};
