#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Integration tests driving the engine the way a navigation driver would:
//! clicks and redirect hops in, decisions out, prompt answers back in.

use std::sync::Arc;

use lumen_applinks::{
    AppCandidate, AppLinksConfig, Decision, LinkPolicy, LinkPolicyEngine, NavTrigger,
    NavigationRequest, PromptAnswer, StaticResolver,
};

const PAGE: &str = "https://localhost:5165/app_links.html";
const PHONE_LINK: &str = "tel:1234567890";
const YOUTUBE_SCHEME_LINK: &str = "vnd.youtube:dQw4w9WgXcQ";
const YOUTUBE_WEB_LINK: &str = "https://youtube.com/watch?v=dQw4w9WgXcQ";
const DEAD_INTENT_LINK: &str =
    "intent://scan/#Intent;scheme=zxing;package=com.google.zxing.client.android;end";

fn phone() -> AppCandidate {
    AppCandidate::new("Phone", "com.android.dialer")
}

fn youtube() -> AppCandidate {
    AppCandidate::new("YouTube", "com.google.android.youtube")
}

/// Resolver mirroring a device with a dialer and the YouTube app installed;
/// the YouTube app also claims youtube.com web links.
fn device_resolver() -> Arc<StaticResolver> {
    Arc::new(
        StaticResolver::new()
            .register("tel", phone())
            .register("vnd.youtube", youtube())
            .register("https", youtube()),
    )
}

fn engine_with(policy: LinkPolicy) -> LinkPolicyEngine {
    LinkPolicyEngine::new(AppLinksConfig::default(), Arc::new(policy), device_resolver())
}

fn click(uri: &str, tab: &str) -> NavigationRequest {
    NavigationRequest::new(uri, tab, NavTrigger::UserGesture, 0)
}

fn redirect(uri: &str, tab: &str, sequence_id: u64) -> NavigationRequest {
    NavigationRequest::new(uri, tab, NavTrigger::Redirect, sequence_id)
}

#[tokio::test]
async fn ask_prompt_cancel_stays_on_page() {
    let engine = engine_with(LinkPolicy::Ask);
    engine.tab_created("tab-1").await;

    let decision = engine.evaluate(click(YOUTUBE_SCHEME_LINK, "tab-1")).await;
    assert_eq!(
        decision,
        Decision::ShowPrompt {
            candidates: vec![youtube()]
        }
    );

    // Cancel: no launch, navigation stays on the current page.
    let follow_up = engine
        .on_prompt_answered("tab-1", PromptAnswer::Cancel)
        .await;
    assert!(follow_up.is_none());
}

#[tokio::test]
async fn cancel_suppresses_repeat_taps_until_navigation() {
    let engine = engine_with(LinkPolicy::Ask);
    engine.tab_created("tab-1").await;

    assert!(matches!(
        engine.evaluate(click(YOUTUBE_SCHEME_LINK, "tab-1")).await,
        Decision::ShowPrompt { .. }
    ));
    engine
        .on_prompt_answered("tab-1", PromptAnswer::Cancel)
        .await;

    // Repeat taps of the same dead link stay quiet.
    assert_eq!(
        engine.evaluate(click(YOUTUBE_SCHEME_LINK, "tab-1")).await,
        Decision::Suppressed
    );
    assert_eq!(
        engine.evaluate(click(YOUTUBE_SCHEME_LINK, "tab-1")).await,
        Decision::Suppressed
    );

    // A different target on the same page is unaffected.
    assert!(matches!(
        engine.evaluate(click(PHONE_LINK, "tab-1")).await,
        Decision::ShowPrompt { .. }
    ));

    // Leaving the page forgets the decline.
    engine.tab_navigated_away("tab-1").await;
    assert!(matches!(
        engine.evaluate(click(YOUTUBE_SCHEME_LINK, "tab-1")).await,
        Decision::ShowPrompt { .. }
    ));
}

#[tokio::test]
async fn cancel_only_affects_the_current_tab() {
    let engine = engine_with(LinkPolicy::Ask);
    engine.tab_created("tab-1").await;
    engine.tab_created("tab-2").await;

    assert!(matches!(
        engine.evaluate(click(YOUTUBE_SCHEME_LINK, "tab-1")).await,
        Decision::ShowPrompt { .. }
    ));
    engine
        .on_prompt_answered("tab-1", PromptAnswer::Cancel)
        .await;
    assert_eq!(
        engine.evaluate(click(YOUTUBE_SCHEME_LINK, "tab-1")).await,
        Decision::Suppressed
    );

    // Same target in another tab still prompts.
    assert!(matches!(
        engine.evaluate(click(YOUTUBE_SCHEME_LINK, "tab-2")).await,
        Decision::ShowPrompt { .. }
    ));
}

#[tokio::test]
async fn open_launches_and_does_not_suppress() {
    let engine = engine_with(LinkPolicy::Ask);
    engine.tab_created("tab-1").await;

    assert!(matches!(
        engine.evaluate(click(PHONE_LINK, "tab-1")).await,
        Decision::ShowPrompt { .. }
    ));
    let follow_up = engine.on_prompt_answered("tab-1", PromptAnswer::Open).await;
    assert_eq!(follow_up, Some(Decision::LaunchApp { app: phone() }));

    // Accepting is per-tap: the identical click prompts again rather than
    // auto-launching.
    assert!(matches!(
        engine.evaluate(click(PHONE_LINK, "tab-1")).await,
        Decision::ShowPrompt { .. }
    ));
}

#[tokio::test]
async fn always_launches_phone_app_directly() {
    let engine = engine_with(LinkPolicy::Always);
    engine.tab_created("tab-1").await;

    assert_eq!(
        engine.evaluate(click(PHONE_LINK, "tab-1")).await,
        Decision::LaunchApp { app: phone() }
    );

    // Repeatable every time; no prompt, no suppression.
    assert_eq!(
        engine.evaluate(click(PHONE_LINK, "tab-1")).await,
        Decision::LaunchApp { app: phone() }
    );
}

#[tokio::test]
async fn always_ignores_an_earlier_decline() {
    let handle = lumen_config::ConfigHandle::default();
    let engine = LinkPolicyEngine::new(
        AppLinksConfig::default(),
        Arc::new(handle.clone()),
        device_resolver(),
    );
    engine.tab_created("tab-1").await;

    assert!(matches!(
        engine.evaluate(click(PHONE_LINK, "tab-1")).await,
        Decision::ShowPrompt { .. }
    ));
    engine
        .on_prompt_answered("tab-1", PromptAnswer::Cancel)
        .await;
    assert_eq!(
        engine.evaluate(click(PHONE_LINK, "tab-1")).await,
        Decision::Suppressed
    );

    // Flipping the preference to "always" overrides the per-page decline:
    // the user's global choice wins over the earlier Cancel.
    let mut cfg = handle.snapshot();
    cfg.app_links.open_links_in_apps = lumen_config::OpenLinksMode::Always;
    handle.replace(cfg);

    assert_eq!(
        engine.evaluate(click(PHONE_LINK, "tab-1")).await,
        Decision::LaunchApp { app: phone() }
    );
}

#[tokio::test]
async fn never_prefers_the_web_representation() {
    let engine = engine_with(LinkPolicy::Never);
    engine.tab_created("tab-1").await;

    // The YouTube app claims the web link, but under Never the browser
    // renders it itself.
    assert_eq!(
        engine.evaluate(click(YOUTUBE_WEB_LINK, "tab-1")).await,
        Decision::ContinueInBrowser {
            fallback_url: YOUTUBE_WEB_LINK.into()
        }
    );
}

#[tokio::test]
async fn never_still_prompts_when_nothing_can_render_the_target() {
    let engine = engine_with(LinkPolicy::Never);
    engine.tab_created("tab-1").await;

    // tel: has no web representation; silently dropping the tap would break
    // telephony links, so the engine asks.
    assert!(matches!(
        engine.evaluate(click(PHONE_LINK, "tab-1")).await,
        Decision::ShowPrompt { .. }
    ));
}

#[tokio::test]
async fn unresolvable_intent_is_dropped_silently() {
    let engine = engine_with(LinkPolicy::Ask);
    engine.tab_created("tab-1").await;

    // No app claims the zxing scheme and the intent declares no fallback.
    assert_eq!(
        engine.evaluate(click(DEAD_INTENT_LINK, "tab-1")).await,
        Decision::Suppressed
    );
}

#[tokio::test]
async fn intent_fallback_renders_when_nothing_is_installed() {
    let engine = engine_with(LinkPolicy::Ask);
    engine.tab_created("tab-1").await;

    let uri = "intent://watch/#Intent;scheme=vnd.example;package=com.example.app;\
               S.browser_fallback_url=https%3A%2F%2Fexample.com%2Fwatch;end";
    assert_eq!(
        engine.evaluate(click(uri, "tab-1")).await,
        Decision::ContinueInBrowser {
            fallback_url: "https://example.com/watch".into()
        }
    );
}

#[tokio::test]
async fn redirect_hops_use_the_same_policy_as_clicks() {
    // A form submission that server-redirects to tel: behaves exactly like
    // a direct tap under each policy.
    let ask = engine_with(LinkPolicy::Ask);
    ask.tab_created("tab-1").await;
    assert!(matches!(
        ask.evaluate(redirect(PHONE_LINK, "tab-1", 7)).await,
        Decision::ShowPrompt { .. }
    ));

    let always = engine_with(LinkPolicy::Always);
    always.tab_created("tab-1").await;
    assert_eq!(
        always.evaluate(redirect(PHONE_LINK, "tab-1", 7)).await,
        Decision::LaunchApp { app: phone() }
    );

    let never = engine_with(LinkPolicy::Never);
    never.tab_created("tab-1").await;
    assert!(matches!(
        never.evaluate(redirect(PHONE_LINK, "tab-1", 7)).await,
        Decision::ShowPrompt { .. }
    ));
}

#[tokio::test]
async fn new_request_supersedes_an_unanswered_prompt() {
    // Only the dialer is installed here, so plain web navigation continues
    // in the browser instead of prompting.
    let engine = LinkPolicyEngine::new(
        AppLinksConfig::default(),
        Arc::new(LinkPolicy::Ask),
        Arc::new(StaticResolver::new().register("tel", phone())),
    );
    engine.tab_created("tab-1").await;

    assert!(matches!(
        engine.evaluate(click(PHONE_LINK, "tab-1")).await,
        Decision::ShowPrompt { .. }
    ));

    // The user navigates on before answering; the new request wins and the
    // old prompt dies silently.
    assert_eq!(
        engine.evaluate(click(PAGE, "tab-1")).await,
        Decision::ContinueInBrowser {
            fallback_url: PAGE.into()
        }
    );

    // An answer to the dead prompt is a no-op: no launch, no decline.
    assert!(
        engine
            .on_prompt_answered("tab-1", PromptAnswer::Open)
            .await
            .is_none()
    );
    assert!(matches!(
        engine.evaluate(click(PHONE_LINK, "tab-1")).await,
        Decision::ShowPrompt { .. }
    ));
}

#[tokio::test]
async fn answer_after_tab_close_is_a_noop() {
    let engine = engine_with(LinkPolicy::Ask);
    engine.tab_created("tab-1").await;

    assert!(matches!(
        engine.evaluate(click(PHONE_LINK, "tab-1")).await,
        Decision::ShowPrompt { .. }
    ));

    engine.tab_closed("tab-1").await;
    assert_eq!(engine.tracked_tabs().await, 0);

    assert!(
        engine
            .on_prompt_answered("tab-1", PromptAnswer::Open)
            .await
            .is_none()
    );
}

#[tokio::test]
async fn recreated_tab_starts_with_a_clean_slate() {
    let engine = engine_with(LinkPolicy::Ask);
    engine.tab_created("tab-1").await;

    assert!(matches!(
        engine.evaluate(click(PHONE_LINK, "tab-1")).await,
        Decision::ShowPrompt { .. }
    ));
    engine
        .on_prompt_answered("tab-1", PromptAnswer::Cancel)
        .await;
    assert_eq!(
        engine.evaluate(click(PHONE_LINK, "tab-1")).await,
        Decision::Suppressed
    );

    // The driver recycles the tab id for a fresh tab.
    engine.tab_created("tab-1").await;
    assert!(matches!(
        engine.evaluate(click(PHONE_LINK, "tab-1")).await,
        Decision::ShowPrompt { .. }
    ));
}

#[tokio::test]
async fn settings_change_applies_to_the_next_navigation() {
    let handle = lumen_config::ConfigHandle::default();
    let engine = LinkPolicyEngine::new(
        AppLinksConfig::from(&handle.app_links()),
        Arc::new(handle.clone()),
        device_resolver(),
    );
    engine.tab_created("tab-1").await;

    assert!(matches!(
        engine.evaluate(click(PHONE_LINK, "tab-1")).await,
        Decision::ShowPrompt { .. }
    ));

    // The settings screen flips the preference mid-session.
    let mut cfg = handle.snapshot();
    cfg.app_links.open_links_in_apps = lumen_config::OpenLinksMode::Never;
    handle.replace(cfg);

    // tel: has no web representation, so Never still asks...
    assert!(matches!(
        engine.evaluate(click(PHONE_LINK, "tab-1")).await,
        Decision::ShowPrompt { .. }
    ));
    // ...while a web link now stays in the browser.
    assert_eq!(
        engine.evaluate(click(YOUTUBE_WEB_LINK, "tab-1")).await,
        Decision::ContinueInBrowser {
            fallback_url: YOUTUBE_WEB_LINK.into()
        }
    );
}
