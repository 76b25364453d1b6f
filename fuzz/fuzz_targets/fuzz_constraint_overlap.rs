//! Fuzz target for the overlap and satisfaction relations.
//!
//! Builds valid constraint sets from arbitrary fields and checks symmetry of
//! `overlaps_with` and agreement between `satisfies` and the gate.

#![no_main]

use arbitrary::Arbitrary;
use gt_common::{BuildType, BuildTypeMask, Os, OsMask};
use gt_core::{ConstraintSet, ResolvedMachineProfile, TestGate};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct RawSet {
    os: u8,
    vendors: Vec<u16>,
    device: u16,
    build: u8,
}

impl RawSet {
    fn build(&self) -> ConstraintSet {
        let mut set = ConstraintSet::new()
            .with_os(OsMask::from_bits_retain(u32::from(self.os)))
            .with_build_type(BuildTypeMask::from_bits_retain(u32::from(self.build & 0b11)));
        for vendor in &self.vendors {
            let vendor = u32::from(*vendor);
            if vendor != 0 && !set.gpu_vendors().contains(&vendor) {
                set.add_gpu_vendor(vendor);
            }
        }
        if set.gpu_vendors().len() == 1 {
            set.set_gpu_device_id(u32::from(self.device));
        }
        set
    }
}

#[derive(Debug, Arbitrary)]
struct Input {
    a: RawSet,
    b: RawSet,
    os_index: u8,
    vendor: u16,
    device: u16,
    debug: bool,
}

fuzz_target!(|input: Input| {
    let a = input.a.build();
    let b = input.b.build();
    assert_eq!(a.overlaps_with(&b), b.overlaps_with(&a));

    if input.vendor == 0 || input.device == 0 {
        return;
    }
    let mut machine = ResolvedMachineProfile::new();
    machine.set_os(Os::ALL[usize::from(input.os_index) % Os::ALL.len()].into());
    machine.add_gpu_vendor(u32::from(input.vendor));
    machine.set_gpu_device_id(u32::from(input.device));
    machine.set_build_type(if input.debug { BuildType::Debug } else { BuildType::Release });

    let gate = TestGate::new(&machine, true);
    assert_eq!(gate.decide(&a).should_run(), machine.satisfies(&a));
});
