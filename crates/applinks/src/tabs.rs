//! Per-tab link state: declined targets and the pending prompt slot.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use {
    tokio::sync::{Mutex, RwLock},
    tracing::debug,
};

use crate::types::{AppCandidate, NavigationRequest};

/// A prompt shown to the user and not yet answered.
///
/// At most one exists per tab; a newer request on the same tab consumes it
/// unanswered.
#[derive(Debug, Clone)]
pub struct PendingPrompt {
    pub request: NavigationRequest,
    pub candidates: Vec<AppCandidate>,
}

/// Mutable link state for one tab.
///
/// Declined targets are scoped to the current page of this tab: an entry
/// exists only after an explicit Cancel on that exact (uri, package) pair,
/// and [`reset`](Self::reset) wipes everything when the page changes.
#[derive(Debug, Default)]
pub struct TabLinkState {
    declined: HashSet<(String, String)>,
    pub(crate) pending: Option<PendingPrompt>,
}

impl TabLinkState {
    /// Whether the user already declined this exact target on this page.
    pub fn is_declined(&self, uri: &str, package: &str) -> bool {
        self.declined
            .iter()
            .any(|(u, p)| u == uri && p == package)
    }

    /// Remember a decline for this exact target.
    pub fn record_decline(&mut self, uri: impl Into<String>, package: impl Into<String>) {
        self.declined.insert((uri.into(), package.into()));
    }

    /// Forget everything tied to the current page: declines and any
    /// unanswered prompt.
    pub fn reset(&mut self) {
        self.declined.clear();
        self.pending = None;
    }

    /// Take the pending prompt, leaving the tab idle.
    pub(crate) fn take_pending(&mut self) -> Option<PendingPrompt> {
        self.pending.take()
    }
}

/// Registry of per-tab state, keyed by the driver's opaque tab id.
///
/// Each tab's state sits behind its own mutex; an evaluation holds the lock
/// for its full duration, which serializes requests per tab while leaving
/// distinct tabs fully independent.
#[derive(Debug, Default)]
pub struct TabRegistry {
    tabs: RwLock<HashMap<String, Arc<Mutex<TabLinkState>>>>,
}

impl TabRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// State handle for a tab, created on first use.
    pub async fn entry(&self, tab_id: &str) -> Arc<Mutex<TabLinkState>> {
        {
            let tabs = self.tabs.read().await;
            if let Some(state) = tabs.get(tab_id) {
                return Arc::clone(state);
            }
        }

        let mut tabs = self.tabs.write().await;
        Arc::clone(tabs.entry(tab_id.to_string()).or_default())
    }

    /// State handle for a tab, if it is tracked.
    pub async fn get(&self, tab_id: &str) -> Option<Arc<Mutex<TabLinkState>>> {
        self.tabs.read().await.get(tab_id).cloned()
    }

    /// Reset a tab's state: a new page committed, or the tab was freshly
    /// created with a recycled id.
    pub async fn clear(&self, tab_id: &str) {
        if let Some(state) = self.get(tab_id).await {
            state.lock().await.reset();
            debug!(tab_id, "cleared tab link state");
        }
    }

    /// Drop a tab's state entirely (tab closed).
    pub async fn remove(&self, tab_id: &str) {
        if self.tabs.write().await.remove(tab_id).is_some() {
            debug!(tab_id, "dropped state for closed tab");
        }
    }

    /// Number of tabs currently tracked.
    pub async fn tracked_count(&self) -> usize {
        self.tabs.read().await.len()
    }
}
