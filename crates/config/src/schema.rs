//! Config schema types for the lumen browser shell.

use serde::{Deserialize, Serialize};

/// How a navigation that an installed application could handle is treated:
/// ask the user first, hand off silently, or stay in the browser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenLinksMode {
    /// Prompt before every external-app handoff.
    #[default]
    Ask,
    /// Hand off silently whenever an application claims the target.
    Always,
    /// Keep the navigation in the browser when a web representation exists.
    Never,
}

/// `[app_links]` section: external application link handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppLinksSettings {
    /// Whether external-app handoff is considered at all. When false,
    /// navigations with a web representation load in the browser and
    /// everything else is dropped.
    pub enabled: bool,
    /// Global user preference for external-app navigation.
    pub open_links_in_apps: OpenLinksMode,
    /// How long one resolution oracle answer may be reused, in seconds.
    /// Covers the redirect hops of a single user action. 0 disables caching.
    pub resolver_cache_ttl_secs: u64,
}

impl Default for AppLinksSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            open_links_in_apps: OpenLinksMode::Ask,
            resolver_cache_ttl_secs: 30,
        }
    }
}

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LumenConfig {
    pub app_links: AppLinksSettings,
}
