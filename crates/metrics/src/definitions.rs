//! Metric name and label definitions.
//!
//! This module defines all metric names and common label keys used throughout
//! lumen. Centralizing these definitions ensures consistency and makes it
//! easier to document what metrics are available.

/// App-link policy metrics
pub mod applinks {
    /// Total decisions produced by the policy engine, labeled by `decision`
    pub const DECISIONS_TOTAL: &str = "lumen_applinks_decisions_total";
    /// Confirmation prompts shown to the user
    pub const PROMPTS_SHOWN_TOTAL: &str = "lumen_applinks_prompts_shown_total";
    /// External application launches, silent or user-confirmed
    pub const APP_LAUNCHES_TOTAL: &str = "lumen_applinks_app_launches_total";
    /// Targets dropped because the user previously declined them
    pub const SUPPRESSED_TOTAL: &str = "lumen_applinks_suppressed_total";
    /// Resolution oracle failures degraded to empty candidate sets
    pub const RESOLVE_ERRORS_TOTAL: &str = "lumen_applinks_resolve_errors_total";
}

/// Tab state metrics
pub mod tabs {
    /// Number of tabs with tracked link state
    pub const TRACKED: &str = "lumen_tabs_tracked";
}
