//! Admin routes. Every handler here takes the [`AdminAccess`] extractor.
//!
//! [`AdminAccess`]: crate::middleware::AdminAccess

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{admin_submissions, admin_surveys, coverage, templates};
use crate::state::AppState;

/// Admin routes mounted at `/admin`.
///
/// ```text
/// POST   /surveys                                  -> create_survey
/// PUT    /surveys/{id}                             -> update_survey
/// DELETE /surveys/{id}                             -> delete_survey
/// GET    /surveys/{id}/submissions                 -> list_submissions
/// PUT    /surveys/{id}/submissions/{sid}           -> update_submission
/// GET    /surveys/{id}/coverage                    -> coverage_report
/// GET    /surveys/{id}/coverage/organizations      -> coverage_organizations
/// DELETE /submissions/{id}                         -> delete_submission
/// GET    /templates                                -> list_templates
/// POST   /templates                                -> create_template
/// GET    /templates/{id}                           -> get_template
/// PUT    /templates/{id}                           -> update_template
/// DELETE /templates/{id}                           -> delete_template
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/surveys", post(admin_surveys::create_survey))
        .route(
            "/surveys/{id}",
            put(admin_surveys::update_survey).delete(admin_surveys::delete_survey),
        )
        .route(
            "/surveys/{id}/submissions",
            get(admin_submissions::list_submissions),
        )
        .route(
            "/surveys/{id}/submissions/{sid}",
            put(admin_submissions::update_submission),
        )
        .route("/surveys/{id}/coverage", get(coverage::coverage_report))
        .route(
            "/surveys/{id}/coverage/organizations",
            get(coverage::coverage_organizations),
        )
        .route(
            "/submissions/{id}",
            delete(admin_submissions::delete_submission),
        )
        .route(
            "/templates",
            get(templates::list_templates).post(templates::create_template),
        )
        .route(
            "/templates/{id}",
            get(templates::get_template)
                .put(templates::update_template)
                .delete(templates::delete_template),
        )
}
