//! Fuzz target for OS and build-type mask parsing.
//!
//! Parsed masks must print back to text that parses to the same mask.

#![no_main]

use gt_common::{BuildTypeMask, Os, OsMask};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Ok(mask) = data.parse::<OsMask>() {
        assert!(mask.is_known());
        let reparsed: OsMask = mask.to_string().parse().expect("display output parses");
        assert_eq!(reparsed, mask);
    }
    let _ = data.parse::<Os>();
    if let Ok(build) = data.parse::<BuildTypeMask>() {
        assert!(build.is_known());
    }
});
