use slotwatch_browser::{BrowserActions, BrowserEngine, LaunchOptions, PortalBrowser};
use std::time::Duration;

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_engine_launch_and_shutdown() {
    let engine = BrowserEngine::launch(&LaunchOptions::default())
        .await
        .expect("launch browser");
    engine.shutdown().await;
}

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_navigation_and_wait() {
    let engine = BrowserEngine::launch(&LaunchOptions::default())
        .await
        .expect("launch browser");
    let page = engine.new_page().await.expect("open page");

    page.navigate("https://example.com").await.expect("navigate");
    page.wait_for_selector("h1", Duration::from_secs(10))
        .await
        .expect("h1 renders");
    let text = page.element_text("h1").await.expect("read heading");
    assert!(text.contains("Example"));

    engine.shutdown().await;
}
