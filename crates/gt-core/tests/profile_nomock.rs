//! No-mock integration tests for machine resolution and test gating.
//!
//! These tests drive the public API end to end:
//! - Constraint sets declared the way test annotations declare them
//! - Profiles resolved through `FixedPlatform` and through `SystemPlatform`
//!   with environment-style overrides and a fake DRM tree
//! - Gate decisions and expectation analysis on top of the resolved profile

use gt_core::config::{ENV_DRM_ROOT, ENV_GPU, ENV_OS};
use gt_core::{
    detect_conflicts, expectation_for, BuildType, BuildTypeMask, ConstraintSet, Expectation,
    FixedPlatform, Finding, GateConfig, GateDecision, GpuInfo, Os, OsMask, Outcome, Platform,
    ResolvedMachineProfile, SkipReason, SystemPlatform, TestGate, VENDOR_INTEL, VENDOR_NVIDIA,
};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

// ============================================================================
// Helpers
// ============================================================================

fn env_lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

fn write_card(root: &Path, card: &str, vendor: &str, device: &str) {
    let dir = root.join(card).join("device");
    fs::create_dir_all(&dir).expect("create card dir");
    fs::write(dir.join("vendor"), vendor).expect("write vendor");
    fs::write(dir.join("device"), device).expect("write device");
}

fn win7_nvidia_release() -> (ResolvedMachineProfile, bool) {
    let platform = FixedPlatform::new(Some(Os::Win7), GpuInfo::new(VENDOR_NVIDIA, 0x1180))
        .with_build_type(BuildType::Release);
    ResolvedMachineProfile::detect(&platform)
}

// ============================================================================
// Matching
// ============================================================================

#[test]
fn test_windows_nvidia_machine_matches_windows_vendor_list() {
    let (machine, resolved) = win7_nvidia_release();
    assert!(resolved);
    assert!(machine.is_valid());

    let constraints = ConstraintSet::new()
        .with_os(OsMask::WIN)
        .with_gpu_vendor(VENDOR_NVIDIA)
        .with_gpu_vendor(VENDOR_INTEL);
    assert!(machine.satisfies(&constraints));
    assert!(machine.overlaps_with(&constraints));

    let linux_only = ConstraintSet::new().with_os(OsMask::LINUX);
    assert!(!machine.satisfies(&linux_only));
    assert!(!machine.overlaps_with(&linux_only));
}

#[test]
fn test_generic_ids_on_linux_release() {
    let platform =
        FixedPlatform::new(Some(Os::Linux), GpuInfo::new(5, 100)).with_build_type(BuildType::Release);
    let (machine, resolved) = ResolvedMachineProfile::detect(&platform);
    assert!(resolved);

    let vendor_list = ConstraintSet::new()
        .with_gpu_vendor(5)
        .with_gpu_vendor(6)
        .with_os(OsMask::LINUX | OsMask::MAC);
    assert!(machine.satisfies(&vendor_list));

    let wrong_device = ConstraintSet::new().with_gpu_vendor(5).with_gpu_device_id(200);
    assert!(!machine.satisfies(&wrong_device));

    let debug_only = ConstraintSet::new().with_build_type(BuildTypeMask::DEBUG);
    assert!(!machine.satisfies(&debug_only));
}

#[test]
fn test_family_and_concrete_constraints_overlap() {
    let family = ConstraintSet::new().with_os(OsMask::MAC);
    let lion = ConstraintSet::new().with_os(OsMask::MAC_LION);
    let xp = ConstraintSet::new().with_os(OsMask::WIN_XP);

    assert!(family.overlaps_with(&lion));
    assert!(lion.overlaps_with(&family));
    assert!(!family.overlaps_with(&xp));
    assert!(ConstraintSet::new().overlaps_with(&xp));
}

// ============================================================================
// Resolution through SystemPlatform
// ============================================================================

#[test]
fn test_system_platform_honours_env_overrides() {
    let config = GateConfig::try_from_lookup(env_lookup(&[
        (ENV_OS, "lion"),
        (ENV_GPU, "0x1002:0x6798"),
    ]))
    .expect("valid overrides");
    let platform = SystemPlatform::new(config);

    assert_eq!(platform.current_os(), Some(Os::MacLion));
    let (machine, resolved) = ResolvedMachineProfile::detect(&platform);
    assert!(resolved);
    assert_eq!(machine.os(), OsMask::MAC_LION);
    assert_eq!(machine.gpu_vendors(), &[0x1002]);
    assert_eq!(machine.gpu_device_id(), 0x6798);
    assert_eq!(machine.build_type(), BuildType::current().mask());
}

#[test]
fn test_family_override_is_rejected() {
    let err = GateConfig::try_from_lookup(env_lookup(&[(ENV_OS, "win")])).unwrap_err();
    assert_eq!(err.code(), 21);

    let lenient = GateConfig::from_lookup(env_lookup(&[(ENV_OS, "win"), (ENV_GPU, "nonsense")]));
    assert_eq!(lenient.os_override, None);
    assert_eq!(lenient.gpu_override, None);
}

#[cfg(target_os = "linux")]
#[test]
fn test_system_platform_reads_fake_drm_tree() {
    let tmp = tempdir().expect("tempdir");
    write_card(tmp.path(), "card0", "0x8086\n", "0x0166\n");
    let drm_root = tmp.path().to_string_lossy().into_owned();

    let config = GateConfig::from_lookup(env_lookup(&[
        (ENV_OS, "linux"),
        (ENV_DRM_ROOT, drm_root.as_str()),
    ]));
    let (machine, resolved) = ResolvedMachineProfile::detect(&SystemPlatform::new(config));

    assert!(resolved);
    assert_eq!(machine.gpu_vendors(), &[VENDOR_INTEL]);
    assert_eq!(machine.gpu_device_id(), 0x0166);
}

#[test]
fn test_missing_gpu_leaves_machine_unresolved() {
    let tmp = tempdir().expect("tempdir");
    let config = GateConfig::default()
        .with_os_override(Os::Linux)
        .with_drm_root(tmp.path().join("absent"));
    let (machine, resolved) = ResolvedMachineProfile::detect(&SystemPlatform::new(config));

    assert!(!resolved);
    assert!(!machine.is_valid());
    assert_eq!(machine.os(), OsMask::LINUX);
}

// ============================================================================
// Gating and analysis
// ============================================================================

#[test]
fn test_gate_over_detected_profile() {
    let (machine, resolved) = win7_nvidia_release();
    let gate = TestGate::new(&machine, resolved);

    assert_eq!(gate.decide(&ConstraintSet::new()), GateDecision::Run);
    assert_eq!(
        gate.decide(&ConstraintSet::new().with_os(OsMask::WIN7).with_gpu_vendor(VENDOR_NVIDIA)),
        GateDecision::Run
    );
    assert_eq!(
        gate.decide(&ConstraintSet::new().with_os(OsMask::MAC)),
        GateDecision::Skip(SkipReason::Mismatch)
    );
}

#[test]
fn test_gate_skips_everything_constrained_when_unresolved() {
    let platform = FixedPlatform::new(None, GpuInfo::new(VENDOR_NVIDIA, 0x1180));
    let (machine, resolved) = ResolvedMachineProfile::detect(&platform);
    let gate = TestGate::new(&machine, resolved);

    assert!(!gate.is_resolved());
    assert!(gate.decide(&ConstraintSet::new()).should_run());
    assert_eq!(
        gate.decide(&ConstraintSet::new().with_build_type(BuildTypeMask::ALL)),
        GateDecision::Skip(SkipReason::Unresolved)
    );
}

#[test]
fn test_expectations_resolve_against_machine() {
    let (machine, _) = win7_nvidia_release();
    let entries = vec![
        Expectation::new(
            "Pixel.canvas",
            ConstraintSet::new().with_os(OsMask::MAC).with_gpu_vendor(VENDOR_INTEL),
            Outcome::Fail,
        ),
        Expectation::new(
            "Pixel.canvas",
            ConstraintSet::new().with_os(OsMask::WIN).with_gpu_vendor(VENDOR_NVIDIA),
            Outcome::Flaky,
        ),
        Expectation::new(
            "Pixel.canvas",
            ConstraintSet::new().with_gpu_vendor(VENDOR_NVIDIA).with_gpu_device_id(0x1180),
            Outcome::Timeout,
        ),
    ];

    let found = expectation_for(&machine, "Pixel.canvas", &entries).expect("matching entry");
    assert_eq!(found.outcome, Outcome::Flaky);

    assert_eq!(
        detect_conflicts(&entries),
        vec![Finding::Conflict {
            test_name: "Pixel.canvas".to_string(),
            first: 1,
            second: 2,
        }]
    );
}
