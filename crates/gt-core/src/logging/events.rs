//! Stable event names used as `tracing` targets.
//!
//! Filtering on these targets (e.g. `RUST_LOG=gate.skip=debug`) isolates one
//! kind of decision without touching the rest of the output.

pub mod event_names {
    // Profile resolution
    pub const PROFILE_LOADED: &str = "profile.loaded";
    pub const PROFILE_UNRESOLVED: &str = "profile.unresolved";

    // Platform probes
    pub const PROBE_OS: &str = "probe.os";
    pub const PROBE_GPU: &str = "probe.gpu";

    // Gate decisions
    pub const GATE_RUN: &str = "gate.run";
    pub const GATE_SKIP: &str = "gate.skip";

    // Static analysis
    pub const ANALYSIS_CONFLICT: &str = "analysis.conflict";
    pub const ANALYSIS_INVALID_ENTRY: &str = "analysis.invalid_entry";

    // Configuration
    pub const CONFIG_OVERRIDE: &str = "config.override";
    pub const CONFIG_INVALID: &str = "config.invalid";
}
