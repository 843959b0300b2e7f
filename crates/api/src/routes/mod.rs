pub mod admin;
pub mod health;
pub mod organizations;
pub mod surveys;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /surveys                                          list (public)
/// /surveys/{id}                                     get
/// /surveys/{id}/submissions                         createOrReplace (POST)
/// /surveys/{id}/submissions/lookup                  lookupOwn (POST)
/// /surveys/{id}/submissions/{submissionId}          updateOwn (PUT)
///
/// /organizations                                    registry listing
/// /organizations/regions                            region picker values
/// /organizations/types                              type picker values
///
/// /admin/surveys                                    create (admin only)
/// /admin/surveys/{id}                               update, delete
/// /admin/surveys/{id}/submissions                   paged listing
/// /admin/surveys/{id}/submissions/{sid}             edit answers (PUT)
/// /admin/surveys/{id}/coverage                      coverage report
/// /admin/surveys/{id}/coverage/organizations        coverage drawer
/// /admin/submissions/{id}                           delete one
/// /admin/templates                                  list, create
/// /admin/templates/{id}                             get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(surveys::router())
        .nest("/organizations", organizations::router())
        .nest("/admin", admin::router())
}
