//! Read-only organization registry and identifier compatibility.
//!
//! The registry is loaded once at startup and passed explicitly into
//! whatever needs it; it is never mutated by this crate. Organization
//! identifiers appear in two historical formats — a bare code and a
//! composite `type:code` form — and every join or lookup treats the two
//! as equivalent when the trailing code segment matches.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Region bucket for organizations whose registry record carries no
/// region (or type, for the type groupings).
pub const UNCLASSIFIED: &str = "미분류";

/// The nationwide pseudo-region, displayed before every province.
pub const REGION_NATIONWIDE: &str = "전국";

/// Fixed display order: nationwide first, then the 17 provinces. Regions
/// not listed here rank after all of these and fall back to lexicographic
/// ordering among themselves.
const REGION_DISPLAY_ORDER: &[&str] = &[
    REGION_NATIONWIDE,
    "서울",
    "부산",
    "대구",
    "인천",
    "광주",
    "대전",
    "울산",
    "세종",
    "경기",
    "강원",
    "충북",
    "충남",
    "전북",
    "전남",
    "경북",
    "경남",
    "제주",
];

/// Rank used for regions outside the fixed display order.
const UNRANKED: usize = 9999;

/// One organization in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub org_type: String,
}

/// Extract the trailing code segment of an organization identifier.
///
/// `"hc:0042"` and `"0042"` both yield `"0042"`, making the two historical
/// spellings of one organization interchangeable at every join.
pub fn org_code(id: &str) -> &str {
    id.rsplit(':').next().unwrap_or(id)
}

/// Display rank of a region name; unknown regions sort after fixed ones.
pub fn region_rank(region: &str) -> usize {
    REGION_DISPLAY_ORDER
        .iter()
        .position(|candidate| *candidate == region)
        .unwrap_or(UNRANKED)
}

/// Compare two region names in display order.
pub fn compare_regions(a: &str, b: &str) -> std::cmp::Ordering {
    region_rank(a).cmp(&region_rank(b)).then_with(|| a.cmp(b))
}

/// The full, read-only organization registry.
#[derive(Debug, Clone, Default)]
pub struct OrganizationRegistry {
    records: Vec<OrganizationRecord>,
}

impl OrganizationRegistry {
    pub fn new(records: Vec<OrganizationRecord>) -> Self {
        Self { records }
    }

    /// Parse a registry from its JSON file contents.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, CoreError> {
        let records: Vec<OrganizationRecord> = serde_json::from_slice(bytes)
            .map_err(|e| CoreError::Validation(format!("invalid organization registry: {e}")))?;
        Ok(Self::new(records))
    }

    pub fn records(&self) -> &[OrganizationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Find an organization by identifier, accepting either historical
    /// form transparently.
    pub fn find_by_id(&self, id: &str) -> Option<&OrganizationRecord> {
        let code = org_code(id);
        self.records
            .iter()
            .find(|record| org_code(&record.id) == code)
    }

    /// The slice of the registry a survey targets. An empty target list
    /// means every organization type is eligible.
    pub fn targeted(&self, target_org_types: &[String]) -> Vec<&OrganizationRecord> {
        if target_org_types.is_empty() {
            return self.records.iter().collect();
        }
        self.records
            .iter()
            .filter(|record| target_org_types.iter().any(|t| *t == record.org_type))
            .collect()
    }

    /// Filter by optional region and organization type (exact matches).
    pub fn filter(&self, region: Option<&str>, org_type: Option<&str>) -> Vec<&OrganizationRecord> {
        self.records
            .iter()
            .filter(|record| region.is_none_or(|r| record.region == r))
            .filter(|record| org_type.is_none_or(|t| record.org_type == t))
            .collect()
    }

    /// Distinct regions in display order.
    pub fn regions(&self) -> Vec<String> {
        let mut regions: Vec<String> = Vec::new();
        for record in &self.records {
            if !record.region.is_empty() && !regions.contains(&record.region) {
                regions.push(record.region.clone());
            }
        }
        regions.sort_by(|a, b| compare_regions(a, b));
        regions
    }

    /// Distinct organization types, sorted alphabetically.
    pub fn org_types(&self) -> Vec<String> {
        let mut types: Vec<String> = Vec::new();
        for record in &self.records {
            if !record.org_type.is_empty() && !types.contains(&record.org_type) {
                types.push(record.org_type.clone());
            }
        }
        types.sort();
        types
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn org(id: &str, name: &str, region: &str, org_type: &str) -> OrganizationRecord {
        OrganizationRecord {
            id: id.to_string(),
            name: name.to_string(),
            region: region.to_string(),
            org_type: org_type.to_string(),
        }
    }

    fn sample_registry() -> OrganizationRegistry {
        OrganizationRegistry::new(vec![
            org("hc:0001", "강남구 보건소", "서울", "보건소"),
            org("0002", "분당구 보건소", "경기", "보건소"),
            org("cl:0003", "수성구 의원", "대구", "의원"),
            org("0004", "중앙지원센터", "전국", "지원센터"),
        ])
    }

    // -- org_code -------------------------------------------------------------

    #[test]
    fn org_code_strips_type_prefix() {
        assert_eq!(org_code("hc:0042"), "0042");
        assert_eq!(org_code("0042"), "0042");
        assert_eq!(org_code("a:b:0042"), "0042");
        assert_eq!(org_code(""), "");
    }

    // -- find_by_id -----------------------------------------------------------

    #[test]
    fn find_accepts_either_identifier_form() {
        let registry = sample_registry();
        // Composite stored, bare presented.
        assert_eq!(registry.find_by_id("0001").unwrap().name, "강남구 보건소");
        // Bare stored, composite presented.
        assert_eq!(registry.find_by_id("hc:0002").unwrap().name, "분당구 보건소");
        assert!(registry.find_by_id("9999").is_none());
    }

    // -- targeted -------------------------------------------------------------

    #[test]
    fn empty_target_list_means_every_type() {
        let registry = sample_registry();
        assert_eq!(registry.targeted(&[]).len(), 4);
    }

    #[test]
    fn targeted_filters_by_org_type() {
        let registry = sample_registry();
        let targets = registry.targeted(&["보건소".to_string()]);
        assert_eq!(targets.len(), 2);
        assert!(targets.iter().all(|r| r.org_type == "보건소"));
    }

    // -- filter ---------------------------------------------------------------

    #[test]
    fn filter_by_region_and_type() {
        let registry = sample_registry();
        assert_eq!(registry.filter(Some("서울"), None).len(), 1);
        assert_eq!(registry.filter(None, Some("보건소")).len(), 2);
        assert_eq!(registry.filter(Some("서울"), Some("의원")).len(), 0);
        assert_eq!(registry.filter(None, None).len(), 4);
    }

    // -- display ordering -----------------------------------------------------

    #[test]
    fn regions_listed_in_display_order() {
        let registry = sample_registry();
        assert_eq!(registry.regions(), vec!["전국", "서울", "대구", "경기"]);
    }

    #[test]
    fn unknown_regions_rank_after_fixed_ones() {
        let registry = OrganizationRegistry::new(vec![
            org("1", "A", "Zetaville", ""),
            org("2", "B", "제주", ""),
            org("3", "C", "Alphaton", ""),
        ]);
        assert_eq!(registry.regions(), vec!["제주", "Alphaton", "Zetaville"]);
    }

    #[test]
    fn org_types_sorted_alphabetically() {
        let registry = sample_registry();
        assert_eq!(registry.org_types(), vec!["보건소", "의원", "지원센터"]);
    }

    // -- from_json_slice ------------------------------------------------------

    #[test]
    fn registry_parses_from_json() {
        let registry = OrganizationRegistry::from_json_slice(
            r#"[{"id": "hc:0001", "name": "Test org", "region": "서울", "orgType": "보건소"}]"#
                .as_bytes(),
        )
        .unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.records()[0].org_type, "보건소");
    }

    #[test]
    fn malformed_registry_json_rejected() {
        let result = OrganizationRegistry::from_json_slice(b"{\"not\": \"a list\"}");
        assert!(result.is_err());
    }
}
