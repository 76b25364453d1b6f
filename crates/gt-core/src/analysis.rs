//! Static analysis of test expectations.
//!
//! Two expectations for the same test conflict when their constraint sets
//! overlap: some machine would match both, so the expected outcome on that
//! machine is ambiguous.

use crate::constraint::ConstraintSet;
use crate::logging::event_names;
use crate::profile::ResolvedMachineProfile;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Expected result of a test on matching machines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
    Flaky,
    Timeout,
    Skip,
}

/// One annotation: a test is expected to produce `outcome` on machines
/// matching `constraints`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expectation {
    pub test_name: String,
    pub constraints: ConstraintSet,
    pub outcome: Outcome,
}

impl Expectation {
    pub fn new(test_name: impl Into<String>, constraints: ConstraintSet, outcome: Outcome) -> Self {
        Self {
            test_name: test_name.into(),
            constraints,
            outcome,
        }
    }
}

/// A problem found by [`detect_conflicts`]. Indices refer to the input slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// Two entries for the same test whose constraints overlap.
    Conflict {
        test_name: String,
        first: usize,
        second: usize,
    },
    /// An entry whose constraint set is not valid.
    InvalidEntry { test_name: String, index: usize },
}

/// Report overlapping and invalid expectations.
///
/// Findings are ordered by test name, then by entry index.
pub fn detect_conflicts(entries: &[Expectation]) -> Vec<Finding> {
    let mut by_test: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (index, entry) in entries.iter().enumerate() {
        by_test.entry(entry.test_name.as_str()).or_default().push(index);
    }

    let mut findings = Vec::new();
    for (test_name, indices) in by_test {
        let (valid, invalid): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| entries[i].constraints.is_valid());

        for index in invalid {
            warn!(
                target: event_names::ANALYSIS_INVALID_ENTRY,
                test = test_name,
                index,
                constraints = %entries[index].constraints,
                "invalid constraint set"
            );
            findings.push(Finding::InvalidEntry {
                test_name: test_name.to_string(),
                index,
            });
        }

        for (pos, &first) in valid.iter().enumerate() {
            for &second in &valid[pos + 1..] {
                if entries[first]
                    .constraints
                    .overlaps_with(&entries[second].constraints)
                {
                    warn!(
                        target: event_names::ANALYSIS_CONFLICT,
                        test = test_name,
                        first,
                        second,
                        "overlapping expectations"
                    );
                    findings.push(Finding::Conflict {
                        test_name: test_name.to_string(),
                        first,
                        second,
                    });
                }
            }
        }
    }
    findings
}

/// First valid expectation for `test_name` that `profile` satisfies.
///
/// # Panics
/// If `profile` is not valid.
pub fn expectation_for<'a>(
    profile: &ResolvedMachineProfile,
    test_name: &str,
    entries: &'a [Expectation],
) -> Option<&'a Expectation> {
    entries.iter().find(|entry| {
        entry.test_name == test_name
            && entry.constraints.is_valid()
            && profile.satisfies(&entry.constraints)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gt_common::{BuildType, BuildTypeMask, OsMask, VENDOR_AMD, VENDOR_NVIDIA};

    #[test]
    fn test_disjoint_entries_do_not_conflict() {
        let entries = vec![
            Expectation::new("WebGL.conformance", ConstraintSet::new().with_os(OsMask::WIN), Outcome::Fail),
            Expectation::new("WebGL.conformance", ConstraintSet::new().with_os(OsMask::MAC), Outcome::Flaky),
        ];
        assert!(detect_conflicts(&entries).is_empty());
    }

    #[test]
    fn test_overlapping_entries_conflict() {
        let entries = vec![
            Expectation::new("Pixel.canvas", ConstraintSet::new().with_os(OsMask::WIN), Outcome::Fail),
            Expectation::new("Other", ConstraintSet::new(), Outcome::Pass),
            Expectation::new(
                "Pixel.canvas",
                ConstraintSet::new().with_os(OsMask::WIN7).with_gpu_vendor(VENDOR_NVIDIA),
                Outcome::Timeout,
            ),
        ];
        assert_eq!(
            detect_conflicts(&entries),
            vec![Finding::Conflict {
                test_name: "Pixel.canvas".to_string(),
                first: 0,
                second: 2,
            }]
        );
    }

    #[test]
    fn test_same_constraints_for_different_tests_are_fine() {
        let entries = vec![
            Expectation::new("A", ConstraintSet::new(), Outcome::Fail),
            Expectation::new("B", ConstraintSet::new(), Outcome::Fail),
        ];
        assert!(detect_conflicts(&entries).is_empty());
    }

    #[test]
    fn test_invalid_entries_are_reported_not_compared() {
        let entries = vec![
            Expectation::new("T", ConstraintSet::new().with_gpu_device_id(0x1180), Outcome::Fail),
            Expectation::new("T", ConstraintSet::new(), Outcome::Pass),
        ];
        assert_eq!(
            detect_conflicts(&entries),
            vec![Finding::InvalidEntry {
                test_name: "T".to_string(),
                index: 0,
            }]
        );
    }

    #[test]
    fn test_expectation_for_picks_first_match() {
        let mut profile = ResolvedMachineProfile::new();
        profile.set_os(OsMask::LINUX);
        profile.add_gpu_vendor(VENDOR_AMD);
        profile.set_gpu_device_id(0x6798);
        profile.set_build_type(BuildType::Debug);

        let entries = vec![
            Expectation::new("T", ConstraintSet::new().with_os(OsMask::WIN), Outcome::Fail),
            Expectation::new(
                "T",
                ConstraintSet::new().with_build_type(BuildTypeMask::DEBUG),
                Outcome::Flaky,
            ),
            Expectation::new("T", ConstraintSet::new(), Outcome::Pass),
        ];

        let found = expectation_for(&profile, "T", &entries).unwrap();
        assert_eq!(found.outcome, Outcome::Flaky);
        assert!(expectation_for(&profile, "U", &entries).is_none());
    }

    #[test]
    fn test_expectation_json_with_bad_constraints_is_rejected() {
        let json = r#"{
            "test_name": "Pixel.canvas",
            "outcome": "fail",
            "constraints": {"os": 256, "gpu_vendors": [7, 7, 0], "gpu_device_id": 0, "build_type": 12}
        }"#;
        assert!(serde_json::from_str::<Expectation>(json).is_err());

        let good = r#"{
            "test_name": "Pixel.canvas",
            "outcome": "flaky",
            "constraints": {"os": 7, "gpu_vendors": [4318], "gpu_device_id": 4480, "build_type": 1}
        }"#;
        let entry: Expectation = serde_json::from_str(good).unwrap();
        assert!(entry.constraints.is_valid());
        assert_eq!(entry.constraints.os(), OsMask::WIN);
        assert_eq!(entry.outcome, Outcome::Flaky);
    }

    #[test]
    fn test_finding_serialization() {
        let finding = Finding::InvalidEntry {
            test_name: "T".into(),
            index: 3,
        };
        assert_eq!(
            serde_json::to_value(&finding).unwrap(),
            serde_json::json!({"kind": "invalid_entry", "test_name": "T", "index": 3})
        );
    }
}
