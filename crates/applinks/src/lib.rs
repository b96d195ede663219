//! External app link handling for the lumen browser.
//!
//! When a navigation targets something the browser cannot render — `tel:`,
//! `intent:`, app-specific schemes — or a web URL that an installed
//! application claims, this crate decides between three outcomes: continue
//! in the browser, hand off to the application, or ask the user first.
//!
//! # Behavior
//!
//! - **ask** (default): prompt before every handoff. Declining remembers the
//!   exact target for the current page of the current tab; accepting does
//!   not, so every launch stays an explicit choice.
//! - **always**: hand off silently whenever an application is installed.
//! - **never**: stay in the browser when a web representation exists; when
//!   none does, asking is the only safe option and a prompt is shown anyway.
//!
//! Targets nothing can handle are dropped with no user-visible effect, and
//! any resolver failure degrades the same way: an external application is
//! launched only through the `always` preference or an explicit Open answer.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use lumen_applinks::{
//!     AppCandidate, AppLinksConfig, LinkPolicy, LinkPolicyEngine,
//!     NavTrigger, NavigationRequest, StaticResolver,
//! };
//!
//! let resolver = StaticResolver::new()
//!     .register("tel", AppCandidate::new("Phone", "com.android.dialer"));
//! let engine = LinkPolicyEngine::new(
//!     AppLinksConfig::default(),
//!     Arc::new(LinkPolicy::Ask),
//!     Arc::new(resolver),
//! );
//!
//! let decision = engine
//!     .evaluate(NavigationRequest::new(
//!         "tel:5551234",
//!         "tab-1",
//!         NavTrigger::UserGesture,
//!         0,
//!     ))
//!     .await;
//! ```

pub mod classify;
pub mod engine;
pub mod error;
pub mod resolve;
pub mod tabs;
pub mod types;

pub use {
    engine::{LinkPolicyEngine, PolicySource},
    error::ResolveError,
    resolve::{AppResolver, CachedResolver, StaticResolver},
    types::{
        AppCandidate, AppLinksConfig, Decision, LinkPolicy, NavTrigger, NavigationRequest,
        PromptAnswer,
    },
};
