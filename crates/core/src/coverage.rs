//! Coverage aggregation and the organization drawer.
//!
//! Coverage compares a survey's targeted organization set against the set
//! of organization codes that actually submitted, producing overall counts
//! plus per-region, per-type, and region-by-type breakdowns. Rates are
//! reported as percentages with one decimal place, rounded half-up at the
//! per-mille level.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::registry::{compare_regions, org_code, OrganizationRecord, UNCLASSIFIED};

/// Submission rate as a percentage with one decimal place.
///
/// Rounds half-up at the per-mille level, so 1 of 3 is 33.3 and 2 of 3 is
/// 66.7. A zero target yields 0.0 rather than a division error.
pub fn calc_rate(submitted: usize, target: usize) -> f64 {
    if target == 0 {
        return 0.0;
    }
    (submitted as f64 / target as f64 * 1000.0).round() / 10.0
}

/// Counts for one aggregation bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageCounts {
    pub target_count: usize,
    pub submitted_count: usize,
    pub not_submitted_count: usize,
    pub submitted_rate: f64,
}

impl CoverageCounts {
    fn new(target: usize, submitted: usize) -> Self {
        Self {
            target_count: target,
            submitted_count: submitted,
            not_submitted_count: target - submitted,
            submitted_rate: calc_rate(submitted, target),
        }
    }
}

/// Counts for one named group (a region or an organization type).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCoverage {
    pub key: String,
    #[serde(flatten)]
    pub counts: CoverageCounts,
}

/// Counts for one region-and-type cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionTypeCoverage {
    pub region: String,
    pub org_type: String,
    #[serde(flatten)]
    pub counts: CoverageCounts,
}

/// The full coverage report for one survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageReport {
    pub overall: CoverageCounts,
    pub by_region: Vec<GroupCoverage>,
    pub by_org_type: Vec<GroupCoverage>,
    pub by_region_org_type: Vec<RegionTypeCoverage>,
}

impl CoverageReport {
    /// The per-type rows for a single region, for region drill-down views.
    pub fn for_region(&self, region: &str) -> Vec<&RegionTypeCoverage> {
        self.by_region_org_type
            .iter()
            .filter(|cell| cell.region == region)
            .collect()
    }
}

fn region_key(record: &OrganizationRecord) -> &str {
    if record.region.is_empty() {
        UNCLASSIFIED
    } else {
        &record.region
    }
}

fn type_key(record: &OrganizationRecord) -> &str {
    if record.org_type.is_empty() {
        UNCLASSIFIED
    } else {
        &record.org_type
    }
}

/// Aggregate coverage for a targeted organization set.
///
/// `submitted_codes` holds bare organization codes (composite identifiers
/// already reduced via [`org_code`] by the caller or here on the target
/// side). Submissions from organizations outside the target set do not
/// count anywhere.
pub fn compute_coverage(
    targets: &[&OrganizationRecord],
    submitted_codes: &HashSet<String>,
) -> CoverageReport {
    let mut overall_submitted = 0usize;
    let mut by_region: Vec<(String, usize, usize)> = Vec::new();
    let mut by_org_type: Vec<(String, usize, usize)> = Vec::new();
    let mut by_cell: Vec<(String, String, usize, usize)> = Vec::new();

    for record in targets {
        let submitted = submitted_codes.contains(org_code(&record.id));
        if submitted {
            overall_submitted += 1;
        }

        let region = region_key(record);
        let org_type = type_key(record);

        bump(&mut by_region, region, submitted);
        bump(&mut by_org_type, org_type, submitted);
        bump_cell(&mut by_cell, region, org_type, submitted);
    }

    by_region.sort_by(|a, b| compare_regions(&a.0, &b.0));
    by_org_type.sort_by(|a, b| a.0.cmp(&b.0));
    by_cell.sort_by(|a, b| compare_regions(&a.0, &b.0).then_with(|| a.1.cmp(&b.1)));

    CoverageReport {
        overall: CoverageCounts::new(targets.len(), overall_submitted),
        by_region: by_region
            .into_iter()
            .map(|(key, target, submitted)| GroupCoverage {
                key,
                counts: CoverageCounts::new(target, submitted),
            })
            .collect(),
        by_org_type: by_org_type
            .into_iter()
            .map(|(key, target, submitted)| GroupCoverage {
                key,
                counts: CoverageCounts::new(target, submitted),
            })
            .collect(),
        by_region_org_type: by_cell
            .into_iter()
            .map(|(region, org_type, target, submitted)| RegionTypeCoverage {
                region,
                org_type,
                counts: CoverageCounts::new(target, submitted),
            })
            .collect(),
    }
}

fn bump(groups: &mut Vec<(String, usize, usize)>, key: &str, submitted: bool) {
    match groups.iter_mut().find(|(k, _, _)| k == key) {
        Some((_, target, count)) => {
            *target += 1;
            if submitted {
                *count += 1;
            }
        }
        None => groups.push((key.to_string(), 1, usize::from(submitted))),
    }
}

fn bump_cell(
    cells: &mut Vec<(String, String, usize, usize)>,
    region: &str,
    org_type: &str,
    submitted: bool,
) {
    match cells
        .iter_mut()
        .find(|(r, t, _, _)| r == region && t == org_type)
    {
        Some((_, _, target, count)) => {
            *target += 1;
            if submitted {
                *count += 1;
            }
        }
        None => cells.push((
            region.to_string(),
            org_type.to_string(),
            1,
            usize::from(submitted),
        )),
    }
}

// ---------------------------------------------------------------------------
// Organization drawer
// ---------------------------------------------------------------------------

/// Submission status filter for the organization drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CoverageStatus {
    Submitted,
    NotSubmitted,
}

/// Drawer filter: all fields optional, combined with AND.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationFilter {
    pub status: Option<CoverageStatus>,
    pub region: Option<String>,
    pub org_type: Option<String>,
    pub search: Option<String>,
}

/// One drawer row: a targeted organization with its submission status.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationStatus {
    pub id: String,
    pub name: String,
    pub region: String,
    pub org_type: String,
    pub submitted: bool,
}

/// Filter and sort the targeted organizations for the drawer listing.
///
/// Sort order is region display rank, then region name, then organization
/// type, then name. The search term matches name, region, or type,
/// case-insensitively on the substring level.
pub fn filter_organizations(
    targets: &[&OrganizationRecord],
    submitted_codes: &HashSet<String>,
    filter: &OrganizationFilter,
) -> Vec<OrganizationStatus> {
    let search = filter
        .search
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    let mut rows: Vec<OrganizationStatus> = targets
        .iter()
        .map(|record| OrganizationStatus {
            id: record.id.clone(),
            name: record.name.clone(),
            region: region_key(record).to_string(),
            org_type: type_key(record).to_string(),
            submitted: submitted_codes.contains(org_code(&record.id)),
        })
        .filter(|row| match filter.status {
            Some(CoverageStatus::Submitted) => row.submitted,
            Some(CoverageStatus::NotSubmitted) => !row.submitted,
            None => true,
        })
        .filter(|row| filter.region.as_deref().is_none_or(|r| row.region == r))
        .filter(|row| filter.org_type.as_deref().is_none_or(|t| row.org_type == t))
        .filter(|row| {
            search.as_deref().is_none_or(|needle| {
                row.name.to_lowercase().contains(needle)
                    || row.region.to_lowercase().contains(needle)
                    || row.org_type.to_lowercase().contains(needle)
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        compare_regions(&a.region, &b.region)
            .then_with(|| a.org_type.cmp(&b.org_type))
            .then_with(|| a.name.cmp(&b.name))
    });
    rows
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

    fn codes(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    // -- calc_rate ------------------------------------------------------------

    #[test]
    fn rate_rounds_half_up_at_per_mille() {
        assert_eq!(calc_rate(1, 3), 33.3);
        assert_eq!(calc_rate(2, 3), 66.7);
        assert_eq!(calc_rate(1, 8), 12.5);
        assert_eq!(calc_rate(5, 5), 100.0);
        assert_eq!(calc_rate(0, 7), 0.0);
    }

    #[test]
    fn zero_target_rate_is_zero() {
        assert_eq!(calc_rate(0, 0), 0.0);
        assert_eq!(calc_rate(3, 0), 0.0);
    }

    // -- compute_coverage -----------------------------------------------------

    #[test]
    fn overall_counts_only_targeted_organizations() {
        // 10 health centers targeted, 6 submitted; clinics outside the
        // target set submitted too and must not count anywhere.
        let mut records = Vec::new();
        for i in 0..10 {
            records.push(org(&format!("hc:{i:04}"), &format!("HC {i}"), "서울", "보건소"));
        }
        for i in 10..15 {
            records.push(org(&format!("cl:{i:04}"), &format!("CL {i}"), "서울", "의원"));
        }
        let targets: Vec<&OrganizationRecord> = records
            .iter()
            .filter(|r| r.org_type == "보건소")
            .collect();
        let submitted = codes(&[
            "0000", "0001", "0002", "0003", "0004", "0005", "0010", "0011", "0012",
        ]);

        let report = compute_coverage(&targets, &submitted);

        assert_eq!(report.overall.target_count, 10);
        assert_eq!(report.overall.submitted_count, 6);
        assert_eq!(report.overall.not_submitted_count, 4);
        assert_eq!(report.overall.submitted_rate, 60.0);
    }

    #[test]
    fn composite_and_bare_identifiers_count_the_same() {
        let records = vec![
            org("hc:0001", "A", "서울", "보건소"),
            org("0002", "B", "서울", "보건소"),
        ];
        let targets: Vec<&OrganizationRecord> = records.iter().collect();
        let report = compute_coverage(&targets, &codes(&["0001", "0002"]));
        assert_eq!(report.overall.submitted_count, 2);
    }

    #[test]
    fn regions_report_nationwide_first() {
        let records = vec![
            org("1", "A", "제주", "보건소"),
            org("2", "B", "전국", "지원센터"),
            org("3", "C", "서울", "보건소"),
        ];
        let targets: Vec<&OrganizationRecord> = records.iter().collect();
        let report = compute_coverage(&targets, &HashSet::new());
        let keys: Vec<&str> = report.by_region.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["전국", "서울", "제주"]);
    }

    #[test]
    fn missing_region_and_type_fall_into_unclassified() {
        let records = vec![org("1", "A", "", ""), org("2", "B", "서울", "보건소")];
        let targets: Vec<&OrganizationRecord> = records.iter().collect();
        let report = compute_coverage(&targets, &codes(&["1"]));

        let bucket = report
            .by_region
            .iter()
            .find(|g| g.key == UNCLASSIFIED)
            .unwrap();
        assert_eq!(bucket.counts.target_count, 1);
        assert_eq!(bucket.counts.submitted_count, 1);
        assert!(report.by_org_type.iter().any(|g| g.key == UNCLASSIFIED));
    }

    #[test]
    fn region_type_cells_support_drill_down() {
        let records = vec![
            org("1", "A", "서울", "보건소"),
            org("2", "B", "서울", "의원"),
            org("3", "C", "경기", "보건소"),
        ];
        let targets: Vec<&OrganizationRecord> = records.iter().collect();
        let report = compute_coverage(&targets, &codes(&["1"]));

        let seoul = report.for_region("서울");
        assert_eq!(seoul.len(), 2);
        assert_eq!(seoul[0].org_type, "보건소");
        assert_eq!(seoul[0].counts.submitted_count, 1);
        assert_eq!(seoul[1].org_type, "의원");
        assert_eq!(seoul[1].counts.submitted_count, 0);
    }

    // -- filter_organizations -------------------------------------------------

    fn drawer_fixture() -> Vec<OrganizationRecord> {
        vec![
            org("hc:0001", "강남구 보건소", "서울", "보건소"),
            org("hc:0002", "분당구 보건소", "경기", "보건소"),
            org("cl:0003", "수성구 의원", "대구", "의원"),
            org("0004", "중앙지원센터", "전국", "지원센터"),
        ]
    }

    #[test]
    fn drawer_sorted_region_then_type_then_name() {
        let records = drawer_fixture();
        let targets: Vec<&OrganizationRecord> = records.iter().collect();
        let rows = filter_organizations(&targets, &HashSet::new(), &OrganizationFilter::default());
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["중앙지원센터", "강남구 보건소", "수성구 의원", "분당구 보건소"]
        );
    }

    #[test]
    fn drawer_filters_by_status() {
        let records = drawer_fixture();
        let targets: Vec<&OrganizationRecord> = records.iter().collect();
        let submitted = codes(&["0001", "0003"]);

        let filter = OrganizationFilter {
            status: Some(CoverageStatus::Submitted),
            ..Default::default()
        };
        let rows = filter_organizations(&targets, &submitted, &filter);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.submitted));

        let filter = OrganizationFilter {
            status: Some(CoverageStatus::NotSubmitted),
            ..Default::default()
        };
        let rows = filter_organizations(&targets, &submitted, &filter);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| !r.submitted));
    }

    #[test]
    fn drawer_search_is_case_insensitive_substring() {
        let records = vec![
            org("1", "Seoul Health Center", "서울", "보건소"),
            org("2", "Busan Clinic", "부산", "의원"),
        ];
        let targets: Vec<&OrganizationRecord> = records.iter().collect();

        let filter = OrganizationFilter {
            search: Some("seoul".to_string()),
            ..Default::default()
        };
        let rows = filter_organizations(&targets, &HashSet::new(), &filter);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Seoul Health Center");

        // Region and type text are searchable too.
        let filter = OrganizationFilter {
            search: Some("보건".to_string()),
            ..Default::default()
        };
        let rows = filter_organizations(&targets, &HashSet::new(), &filter);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn drawer_combines_filters_with_and() {
        let records = drawer_fixture();
        let targets: Vec<&OrganizationRecord> = records.iter().collect();
        let filter = OrganizationFilter {
            region: Some("서울".to_string()),
            org_type: Some("의원".to_string()),
            ..Default::default()
        };
        let rows = filter_organizations(&targets, &HashSet::new(), &filter);
        assert!(rows.is_empty());
    }

    #[test]
    fn blank_search_matches_everything() {
        let records = drawer_fixture();
        let targets: Vec<&OrganizationRecord> = records.iter().collect();
        let filter = OrganizationFilter {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        // Whitespace-only search is ignored rather than matching nothing.
        let rows = filter_organizations(&targets, &HashSet::new(), &filter);
        assert_eq!(rows.len(), 4);
    }
}
