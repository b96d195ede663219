//! Request, candidate, and decision types for the app-links layer.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

/// What initiated a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavTrigger {
    /// Direct user gesture (a tap on a link).
    UserGesture,
    /// Server-issued redirect hop, including form-submission redirects.
    Redirect,
}

/// One candidate navigation whose target may leave the browser.
///
/// `sequence_id` ties together the redirect hops of a single user action.
/// The engine carries it through for the driver's logging; policy does not
/// branch on it or on `trigger`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationRequest {
    pub uri: String,
    pub tab_id: String,
    pub trigger: NavTrigger,
    pub sequence_id: u64,
}

impl NavigationRequest {
    pub fn new(
        uri: impl Into<String>,
        tab_id: impl Into<String>,
        trigger: NavTrigger,
        sequence_id: u64,
    ) -> Self {
        Self {
            uri: uri.into(),
            tab_id: tab_id.into(),
            trigger,
            sequence_id,
        }
    }
}

/// An installed application reported by the resolution oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppCandidate {
    /// Human-readable name shown in the prompt (e.g. "YouTube").
    pub name: String,
    /// Platform package identifier (e.g. "com.google.android.youtube").
    pub package: String,
}

impl AppCandidate {
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
        }
    }
}

/// Output of scheme classification: the scheme, if the URI parses at all,
/// and the web-renderable representation of the target, if one exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub scheme: Option<String>,
    pub web_fallback: Option<String>,
}

/// The user's answer to an open-in-app prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptAnswer {
    Open,
    Cancel,
}

/// Global user preference for external-app navigation.
///
/// Read fresh on every evaluation through
/// [`PolicySource`](crate::engine::PolicySource); the engine never caches it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkPolicy {
    /// Prompt before every handoff.
    #[default]
    Ask,
    /// Hand off silently whenever an application is installed.
    Always,
    /// Stay in the browser when a web representation exists.
    Never,
}

impl From<lumen_config::schema::OpenLinksMode> for LinkPolicy {
    fn from(mode: lumen_config::schema::OpenLinksMode) -> Self {
        use lumen_config::schema::OpenLinksMode;
        match mode {
            OpenLinksMode::Ask => Self::Ask,
            OpenLinksMode::Always => Self::Always,
            OpenLinksMode::Never => Self::Never,
        }
    }
}

/// What the navigation driver should do with a request.
///
/// Every variant carries all the driver needs to act; no further lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    /// Load the web representation of the target in the current tab.
    ContinueInBrowser { fallback_url: String },
    /// Hand the navigation to the given application.
    LaunchApp { app: AppCandidate },
    /// Drop the request with no user-visible effect.
    Suppressed,
    /// Show the open-in-app confirmation prompt. The first candidate is
    /// the one named in the prompt; chooser-capable UIs get the full set.
    ShowPrompt { candidates: Vec<AppCandidate> },
}

impl Decision {
    /// Short label used in logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ContinueInBrowser { .. } => "continue_in_browser",
            Self::LaunchApp { .. } => "launch_app",
            Self::Suppressed => "suppressed",
            Self::ShowPrompt { .. } => "show_prompt",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContinueInBrowser { fallback_url } => {
                write!(f, "continue_in_browser({fallback_url})")
            },
            Self::LaunchApp { app } => write!(f, "launch_app({})", app.package),
            Self::Suppressed => write!(f, "suppressed"),
            Self::ShowPrompt { candidates } => {
                write!(f, "show_prompt({} candidates)", candidates.len())
            },
        }
    }
}

/// Engine-side app-links configuration.
#[derive(Debug, Clone)]
pub struct AppLinksConfig {
    /// Whether external-app handoff is considered at all.
    pub enabled: bool,
    /// How long one resolution oracle answer may be reused. Zero disables
    /// caching and every evaluation queries the oracle.
    pub resolver_cache_ttl: Duration,
}

impl Default for AppLinksConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            resolver_cache_ttl: Duration::from_secs(30),
        }
    }
}

impl From<&lumen_config::schema::AppLinksSettings> for AppLinksConfig {
    fn from(settings: &lumen_config::schema::AppLinksSettings) -> Self {
        Self {
            enabled: settings.enabled,
            resolver_cache_ttl: Duration::from_secs(settings.resolver_cache_ttl_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_serializes_tagged() {
        let decision = Decision::LaunchApp {
            app: AppCandidate::new("Phone", "com.android.dialer"),
        };
        let json = match serde_json::to_value(&decision) {
            Ok(v) => v,
            Err(e) => panic!("serialize: {e}"),
        };
        assert_eq!(json["decision"], "launch_app");
        assert_eq!(json["app"]["package"], "com.android.dialer");
    }

    #[test]
    fn decision_display_is_compact() {
        let show = Decision::ShowPrompt {
            candidates: vec![AppCandidate::new("YouTube", "com.google.android.youtube")],
        };
        assert_eq!(show.to_string(), "show_prompt(1 candidates)");
        assert_eq!(Decision::Suppressed.to_string(), "suppressed");
    }

    #[test]
    fn policy_converts_from_config_mode() {
        use lumen_config::schema::OpenLinksMode;
        assert_eq!(LinkPolicy::from(OpenLinksMode::Ask), LinkPolicy::Ask);
        assert_eq!(LinkPolicy::from(OpenLinksMode::Always), LinkPolicy::Always);
        assert_eq!(LinkPolicy::from(OpenLinksMode::Never), LinkPolicy::Never);
    }

    #[test]
    fn engine_config_converts_from_settings() {
        let settings = lumen_config::schema::AppLinksSettings {
            enabled: false,
            open_links_in_apps: lumen_config::schema::OpenLinksMode::Ask,
            resolver_cache_ttl_secs: 7,
        };
        let config = AppLinksConfig::from(&settings);
        assert!(!config.enabled);
        assert_eq!(config.resolver_cache_ttl, Duration::from_secs(7));
    }
}
