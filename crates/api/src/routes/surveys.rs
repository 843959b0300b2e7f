//! Public survey and submission routes.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{submissions, surveys};
use crate::state::AppState;

/// Survey routes mounted at `/api/v1`.
///
/// ```text
/// GET  /surveys                                     -> list_surveys
/// GET  /surveys/{id}                                -> get_survey
/// POST /surveys/{id}/submissions                    -> create_or_replace
/// POST /surveys/{id}/submissions/lookup             -> lookup_own
/// PUT  /surveys/{id}/submissions/{submissionId}     -> update_own
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/surveys", get(surveys::list_surveys))
        .route("/surveys/{id}", get(surveys::get_survey))
        .route(
            "/surveys/{id}/submissions",
            post(submissions::create_or_replace),
        )
        .route(
            "/surveys/{id}/submissions/lookup",
            post(submissions::lookup_own),
        )
        .route(
            "/surveys/{id}/submissions/{submission_id}",
            put(submissions::update_own),
        )
}
