//! Organization registry routes.

use axum::routing::get;
use axum::Router;

use crate::handlers::organizations;
use crate::state::AppState;

/// Registry routes mounted at `/organizations`.
///
/// ```text
/// GET /          -> list_organizations
/// GET /regions   -> list_regions
/// GET /types     -> list_org_types
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(organizations::list_organizations))
        .route("/regions", get(organizations::list_regions))
        .route("/types", get(organizations::list_org_types))
}
