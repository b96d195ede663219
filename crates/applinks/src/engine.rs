//! The policy engine: decides what happens to a navigation whose target may
//! leave the browser.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    classify::{classify, is_internal_scheme},
    resolve::{AppResolver, CachedResolver},
    tabs::{PendingPrompt, TabLinkState, TabRegistry},
    types::{
        AppLinksConfig, Classification, Decision, LinkPolicy, NavigationRequest, PromptAnswer,
    },
};

/// Live view of the user's external-app preference.
///
/// Read once per evaluation, so a settings change is picked up by the next
/// navigation without restarting anything.
pub trait PolicySource: Send + Sync {
    fn link_policy(&self) -> LinkPolicy;
}

/// A fixed policy, for tests and embedders without live settings.
impl PolicySource for LinkPolicy {
    fn link_policy(&self) -> LinkPolicy {
        *self
    }
}

impl PolicySource for lumen_config::ConfigHandle {
    fn link_policy(&self) -> LinkPolicy {
        self.open_links_in_apps().into()
    }
}

/// Decides, per navigation request, between staying in the browser, handing
/// off to an installed application, and asking the user first.
///
/// One engine serves all tabs. Per-tab state (declined targets, the pending
/// prompt) lives in an internal registry keyed by the driver's opaque tab id;
/// the driver reports tab lifecycle through [`tab_created`](Self::tab_created),
/// [`tab_navigated_away`](Self::tab_navigated_away), and
/// [`tab_closed`](Self::tab_closed).
pub struct LinkPolicyEngine {
    policy: Arc<dyn PolicySource>,
    resolver: Arc<dyn AppResolver>,
    tabs: TabRegistry,
    config: AppLinksConfig,
}

impl LinkPolicyEngine {
    /// Create an engine over the given policy source and resolution oracle.
    ///
    /// When the configured cache TTL is non-zero the oracle is wrapped in a
    /// [`CachedResolver`] so redirect chains reuse one answer.
    pub fn new(
        config: AppLinksConfig,
        policy: Arc<dyn PolicySource>,
        resolver: Arc<dyn AppResolver>,
    ) -> Self {
        let resolver: Arc<dyn AppResolver> = if config.resolver_cache_ttl.is_zero() {
            resolver
        } else {
            Arc::new(CachedResolver::new(resolver, config.resolver_cache_ttl))
        };

        info!(
            enabled = config.enabled,
            cache_ttl_secs = config.resolver_cache_ttl.as_secs(),
            "link policy engine initialized"
        );

        Self {
            policy,
            resolver,
            tabs: TabRegistry::new(),
            config,
        }
    }

    /// Evaluate one navigation request to a decision.
    ///
    /// The tab's state lock is held for the whole evaluation, including the
    /// resolver call: requests for one tab are strictly serialized, and a
    /// request arriving behind a still-unanswered prompt consumes that
    /// prompt first — the newest request always wins. Distinct tabs evaluate
    /// concurrently.
    pub async fn evaluate(&self, request: NavigationRequest) -> Decision {
        let tab = self.tabs.entry(&request.tab_id).await;
        let mut state = tab.lock().await;

        if let Some(stale) = state.take_pending() {
            debug!(
                tab_id = request.tab_id,
                stale_uri = stale.request.uri,
                "discarding unanswered prompt superseded by new request"
            );
        }

        let decision = self.decide(&request, &mut state).await;

        info!(
            tab_id = request.tab_id,
            uri = request.uri,
            trigger = ?request.trigger,
            sequence_id = request.sequence_id,
            decision = %decision,
            "evaluated navigation request"
        );

        #[cfg(feature = "metrics")]
        {
            lumen_metrics::counter!(
                lumen_metrics::applinks::DECISIONS_TOTAL,
                "decision" => decision.label()
            )
            .increment(1);
            match decision {
                Decision::LaunchApp { .. } => {
                    lumen_metrics::counter!(lumen_metrics::applinks::APP_LAUNCHES_TOTAL)
                        .increment(1);
                },
                Decision::ShowPrompt { .. } => {
                    lumen_metrics::counter!(lumen_metrics::applinks::PROMPTS_SHOWN_TOTAL)
                        .increment(1);
                },
                Decision::Suppressed => {
                    lumen_metrics::counter!(lumen_metrics::applinks::SUPPRESSED_TOTAL)
                        .increment(1);
                },
                Decision::ContinueInBrowser { .. } => {},
            }
        }

        decision
    }

    async fn decide(&self, request: &NavigationRequest, state: &mut TabLinkState) -> Decision {
        let classification = classify(&request.uri);

        // Engine-rendered schemes never leave the browser; no oracle
        // round-trip.
        if let Some(scheme) = classification.scheme.as_deref() {
            if is_internal_scheme(scheme) {
                return Decision::ContinueInBrowser {
                    fallback_url: request.uri.clone(),
                };
            }
        }

        // Handoff disabled: decide from classification alone. No resolution,
        // no prompts, no launches.
        if !self.config.enabled {
            return Self::stay_in_browser(&classification);
        }

        let candidates = match self.resolver.resolve(&request.uri).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(
                    uri = request.uri,
                    error = %e,
                    "app resolution failed, treating as no candidates"
                );
                #[cfg(feature = "metrics")]
                lumen_metrics::counter!(lumen_metrics::applinks::RESOLVE_ERRORS_TOTAL)
                    .increment(1);
                Vec::new()
            },
        };

        let Some(app) = candidates.first().cloned() else {
            // Nothing installed: render the fallback, or drop the request
            // with no user-visible effect.
            return Self::stay_in_browser(&classification);
        };

        let policy = self.policy.link_policy();

        // The global "always open" preference overrides per-page declines
        // left over from an earlier Ask phase.
        if policy == LinkPolicy::Always {
            return Decision::LaunchApp { app };
        }

        if state.is_declined(&request.uri, &app.package) {
            debug!(
                tab_id = request.tab_id,
                uri = request.uri,
                package = app.package,
                "target declined earlier on this page"
            );
            return Decision::Suppressed;
        }

        match (policy, classification.web_fallback) {
            (LinkPolicy::Never, Some(fallback_url)) => {
                Decision::ContinueInBrowser { fallback_url }
            },
            // Under Never with no web representation there is no safe
            // default, so the policy degrades to asking.
            _ => {
                state.pending = Some(PendingPrompt {
                    request: request.clone(),
                    candidates: candidates.clone(),
                });
                Decision::ShowPrompt { candidates }
            },
        }
    }

    /// Consume the user's answer to a previously returned
    /// [`Decision::ShowPrompt`].
    ///
    /// Returns the follow-up decision for the driver: `LaunchApp` on Open,
    /// nothing on Cancel. An answer for a tab with no pending prompt — it
    /// was superseded, the page changed, or the tab closed — is a no-op.
    pub async fn on_prompt_answered(
        &self,
        tab_id: &str,
        answer: PromptAnswer,
    ) -> Option<Decision> {
        let tab = self.tabs.get(tab_id).await?;
        let mut state = tab.lock().await;

        let Some(pending) = state.take_pending() else {
            debug!(tab_id, "ignoring answer for a prompt that no longer exists");
            return None;
        };

        let app = pending.candidates.first().cloned()?;

        match answer {
            PromptAnswer::Open => {
                info!(
                    tab_id,
                    uri = pending.request.uri,
                    package = app.package,
                    "user confirmed external app launch"
                );
                #[cfg(feature = "metrics")]
                lumen_metrics::counter!(lumen_metrics::applinks::APP_LAUNCHES_TOTAL).increment(1);
                // No suppression recorded: accepting stays an explicit
                // per-tap choice, so the same link prompts again.
                Some(Decision::LaunchApp { app })
            },
            PromptAnswer::Cancel => {
                // A decline sticks for this exact target on this page, so
                // repeat taps of the same dead link stay quiet.
                state.record_decline(pending.request.uri.clone(), app.package.clone());
                info!(
                    tab_id,
                    uri = pending.request.uri,
                    package = app.package,
                    "user declined external app launch"
                );
                None
            },
        }
    }

    /// A new tab exists. If its id is recycled, stale state is wiped.
    pub async fn tab_created(&self, tab_id: &str) {
        self.tabs.clear(tab_id).await;
        self.record_tracked_tabs().await;
    }

    /// The tab committed a navigation to a different page; prior declines
    /// and any unanswered prompt no longer apply. Not called for redirect
    /// hops within one chain.
    pub async fn tab_navigated_away(&self, tab_id: &str) {
        self.tabs.clear(tab_id).await;
    }

    /// The tab is gone; drop its state. Late prompt answers become no-ops.
    pub async fn tab_closed(&self, tab_id: &str) {
        self.tabs.remove(tab_id).await;
        self.record_tracked_tabs().await;
    }

    /// Number of tabs with tracked link state.
    pub async fn tracked_tabs(&self) -> usize {
        self.tabs.tracked_count().await
    }

    #[cfg(feature = "metrics")]
    async fn record_tracked_tabs(&self) {
        lumen_metrics::gauge!(lumen_metrics::tabs::TRACKED)
            .set(self.tabs.tracked_count().await as f64);
    }

    #[cfg(not(feature = "metrics"))]
    async fn record_tracked_tabs(&self) {}

    fn stay_in_browser(classification: &Classification) -> Decision {
        match &classification.web_fallback {
            Some(fallback_url) => Decision::ContinueInBrowser {
                fallback_url: fallback_url.clone(),
            },
            None => Decision::Suppressed,
        }
    }
}
