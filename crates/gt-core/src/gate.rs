//! Run/skip decisions for individual tests.
//!
//! The gate wraps the process-wide profile and the outcome of resolving it.
//! An unresolved machine never matches a constrained test.

use crate::constraint::ConstraintSet;
use crate::logging::event_names;
use crate::profile::ResolvedMachineProfile;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Why a test was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The machine profile could not be fully determined.
    Unresolved,
    /// The machine does not satisfy the test's constraints.
    Mismatch,
    /// The test declares an inconsistent constraint set.
    InvalidConstraints,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Unresolved => write!(f, "machine configuration unresolved"),
            SkipReason::Mismatch => write!(f, "machine does not match constraints"),
            SkipReason::InvalidConstraints => write!(f, "invalid constraint set"),
        }
    }
}

/// Outcome of gating one test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "reason", rename_all = "snake_case")]
pub enum GateDecision {
    Run,
    Skip(SkipReason),
}

impl GateDecision {
    pub fn should_run(&self) -> bool {
        matches!(self, GateDecision::Run)
    }
}

/// Decides which tests run on the current machine.
#[derive(Debug, Clone, Copy)]
pub struct TestGate<'a> {
    profile: &'a ResolvedMachineProfile,
    resolved: bool,
}

impl<'a> TestGate<'a> {
    /// `resolved` is the result of loading `profile`.
    pub fn new(profile: &'a ResolvedMachineProfile, resolved: bool) -> Self {
        Self { profile, resolved }
    }

    pub fn profile(&self) -> &ResolvedMachineProfile {
        self.profile
    }

    /// True when constrained tests can be matched at all.
    pub fn is_resolved(&self) -> bool {
        self.resolved && self.profile.is_valid()
    }

    /// Decide whether a test declaring `constraints` runs here.
    ///
    /// Unconstrained tests always run. Invalid declarations are skipped
    /// rather than tripping the matcher's contract checks.
    pub fn decide(&self, constraints: &ConstraintSet) -> GateDecision {
        let decision = if constraints.is_unconstrained() {
            GateDecision::Run
        } else if !constraints.is_valid() {
            GateDecision::Skip(SkipReason::InvalidConstraints)
        } else if !self.is_resolved() {
            GateDecision::Skip(SkipReason::Unresolved)
        } else if self.profile.satisfies(constraints) {
            GateDecision::Run
        } else {
            GateDecision::Skip(SkipReason::Mismatch)
        };

        match decision {
            GateDecision::Run => {
                debug!(target: event_names::GATE_RUN, constraints = %constraints, "running test")
            }
            GateDecision::Skip(reason) => debug!(
                target: event_names::GATE_SKIP,
                constraints = %constraints,
                reason = %reason,
                "skipping test"
            ),
        }
        decision
    }
}
