use super::support::*;
use crate::error::HarvestError;
use crate::profile::Profile;
use crate::session::SnapshotPage;
use crate::{Harvest, Harvester};
use std::fs;

fn harvester() -> Harvester<InstantClock> {
    Harvester::new().with_clock(InstantClock::default())
}

#[tokio::test]
async fn test_collects_posts_then_comments() {
    let inner = SnapshotPage::new()
        .with_route(POSTS_URL, [listing(&numbered_posts(0..2))])
        .with_route(
            COMMENTS_URL,
            [listing(&[comment("Totally agree with this take"), comment("no")])],
        );
    let page = FlakyPage::new(inner);
    let closed = page.close_count();
    let profile = Profile::parse("someone").unwrap();

    let harvest = harvester().collect_with(page, &profile).await.unwrap();

    assert_eq!(harvest.posts.len(), 2);
    assert_eq!(harvest.comments.len(), 1);
    assert_eq!(harvest.comments[0].text, "Totally agree with this take");
    assert_eq!(closed.get(), 1);
}

#[tokio::test]
async fn test_session_released_once_on_failure() {
    let inner = SnapshotPage::new().with_route(POSTS_URL, [listing(&numbered_posts(0..2))]);
    let page = FlakyPage::new(inner).failing_on_scroll();
    let closed = page.close_count();
    let profile = Profile::parse("someone").unwrap();

    let result = harvester().collect_with(page, &profile).await;

    assert!(matches!(result, Err(HarvestError::Session(_))));
    assert_eq!(closed.get(), 1);
}

#[tokio::test]
async fn test_missing_profile_returns_two_empty_lists() {
    let missing = "<html><body><p>Sorry, this user doesn't exist.</p></body></html>";
    let page = SnapshotPage::new()
        .with_route(POSTS_URL, [missing])
        .with_route(COMMENTS_URL, [missing]);
    let profile = Profile::parse("u/someone").unwrap();

    let harvest = harvester().collect_with(page, &profile).await.unwrap();
    assert_eq!(harvest, Harvest::default());
}

#[tokio::test]
async fn test_invalid_username_fails_before_launch() {
    let result = harvester().collect("   ").await;
    assert!(matches!(result, Err(HarvestError::InvalidUsername(_))));
}

#[test]
fn test_builder_overrides() {
    let harvester = Harvester::new()
        .with_max_posts(5)
        .with_max_comments(7)
        .with_max_scrolls(1, 2)
        .headless(false)
        .with_webdriver_url("http://localhost:9515");

    let config = harvester.config();
    assert_eq!(config.posts.max_items, 5);
    assert_eq!(config.comments.max_items, 7);
    assert_eq!(config.posts.max_scrolls, 1);
    assert_eq!(config.comments.max_scrolls, 2);
    assert!(!config.headless);
    assert_eq!(config.webdriver_url, "http://localhost:9515");
}

#[tokio::test]
async fn test_replay_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("posts-0.html"), listing(&numbered_posts(0..2))).unwrap();
    fs::write(dir.path().join("posts-1.html"), listing(&numbered_posts(0..3))).unwrap();
    fs::write(
        dir.path().join("comments-0.html"),
        listing(&[comment("Ça marche très bien, merci !")]),
    )
    .unwrap();

    let harvest = harvester()
        .with_max_posts(10)
        .replay("someone", dir.path())
        .await
        .unwrap();

    assert_eq!(harvest.posts.len(), 3);
    assert_eq!(harvest.comments.len(), 1);

    let json = harvest.to_json().unwrap();
    assert!(json.contains("Ça marche très bien, merci !"));
    assert!(json.starts_with("{\n  \"posts\": [\n    {\n      \"title\": \"Post 0\""));
}

#[tokio::test]
async fn test_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{ "headless": false, "posts": {
        "max_items": 2, "max_scrolls": 1, "stagnation": "not_grown",
        "items": ["article"], "min_fragment_chars": 10, "min_line_chars": 50 } }"#)
    .unwrap();

    let harvester = harvester().with_config_file(&path).unwrap();
    assert!(!harvester.config().headless);
    assert_eq!(harvester.config().posts.max_items, 2);
    assert_eq!(harvester.config().comments.max_items, 30);

    assert!(harvester.with_config_file(dir.path().join("missing.json")).is_err());
}
