//! Debugging feature flags.
//!
//! Toggle individual diagnostics here; keep them `false` by default so release
//! builds remain quiet. Every flag is further gated by `cfg(debug_assertions)`
//! at the call site.

pub struct DebugFlags {
    /// Emit a line for every refresh: outcome, revision, active timeframe.
    pub print_refresh_events: bool,
    /// Dump the full zone and setup tables each time a snapshot is published.
    pub print_snapshot_details: bool,
    /// Emit scheduler tick / skipped-tick diagnostics.
    pub print_scheduler_ticks: bool,
    /// Emit raw values returned by the indicator source.
    pub print_indicator_polls: bool,
}

pub const DEBUG_FLAGS: DebugFlags = DebugFlags {
    print_refresh_events: false,
    print_snapshot_details: false,
    print_scheduler_ticks: false,
    print_indicator_polls: false,
};
