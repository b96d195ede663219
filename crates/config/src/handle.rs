//! Shared, reloadable view of the loaded configuration.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::schema::{AppLinksSettings, LumenConfig, OpenLinksMode};

/// Cheap-to-clone handle to the current configuration.
///
/// Readers take a snapshot per call and nothing is cached on their side, so
/// a [`replace`](ConfigHandle::replace) — settings screen change, config
/// file reload — is visible to the very next reader without coordination.
#[derive(Clone, Debug, Default)]
pub struct ConfigHandle {
    inner: Arc<RwLock<LumenConfig>>,
}

impl ConfigHandle {
    pub fn new(config: LumenConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Clone of the full current configuration.
    pub fn snapshot(&self) -> LumenConfig {
        self.read().clone()
    }

    /// Replace the whole configuration; takes effect on the next read.
    pub fn replace(&self, config: LumenConfig) {
        *self.write() = config;
    }

    /// The `[app_links]` section of the current configuration.
    pub fn app_links(&self) -> AppLinksSettings {
        self.read().app_links.clone()
    }

    /// Current external-app navigation preference.
    pub fn open_links_in_apps(&self) -> OpenLinksMode {
        self.read().app_links.open_links_in_apps
    }

    fn read(&self) -> RwLockReadGuard<'_, LumenConfig> {
        // A poisoned lock only means a writer panicked mid-replace; the
        // stored config is still a complete value.
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, LumenConfig> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}
