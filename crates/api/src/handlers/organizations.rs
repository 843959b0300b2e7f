//! Organization registry endpoints. The registry is in-memory; these never
//! touch the database.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use canvass_core::registry::OrganizationRecord;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryQuery {
    pub region: Option<String>,
    pub org_type: Option<String>,
}

/// GET /api/v1/organizations
///
/// List registry organizations, optionally filtered by region and type.
pub async fn list_organizations(
    State(state): State<AppState>,
    Query(query): Query<RegistryQuery>,
) -> AppResult<impl IntoResponse> {
    let records: Vec<OrganizationRecord> = state
        .registry
        .filter(query.region.as_deref(), query.org_type.as_deref())
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(DataResponse { data: records }))
}

/// GET /api/v1/organizations/regions
///
/// Distinct regions in display order, for filter pickers.
pub async fn list_regions(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: state.registry.regions(),
    }))
}

/// GET /api/v1/organizations/types
///
/// Distinct organization types in alphabetical order, for filter pickers.
pub async fn list_org_types(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: state.registry.org_types(),
    }))
}
