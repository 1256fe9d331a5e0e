//! Page manager tests

mod common;

use common::{fast_timeouts, practice_site, setup, SIDEBAR_HEADINGS};
use pw_practice::session::{Selector, Session};
use pw_practice::{expect, Error, ExamplePage, HomePage, Navigable, PageManager};
use std::sync::Arc;

#[tokio::test]
async fn test_instances_share_session() {
    let (session, manager) = setup();
    let session: Arc<dyn Session> = session;

    let home = manager.home_page();
    let example = manager.example_page();

    assert!(Arc::ptr_eq(home.session(), &session));
    assert!(Arc::ptr_eq(example.session(), &session));
}

#[tokio::test]
async fn test_repeated_factory_calls_are_independent() {
    let (_session, manager) = setup();

    let first = manager.example_page();
    let second = manager.example_page();
    first.navigate_to().await.unwrap();

    // Both instances drive the same tab
    second.fill_user_name("admin").await.unwrap();
    expect(&first.username_input).to_have_value("admin").await.unwrap();

    drop(first);
    expect(&second.username_input).to_have_value("admin").await.unwrap();
}

#[tokio::test]
async fn test_pages_switch_within_one_session() {
    let (session, manager) = setup();

    manager.home_page().navigate_to().await.unwrap();
    manager.example_page().navigate_to().await.unwrap();

    let history = session.history().await;
    assert_eq!(history.len(), 2);
    assert!(history[1].ends_with("/wp-admin"));
    assert_eq!(manager.home_page().footer_copyright.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let first = PageManager::new(practice_site(fast_timeouts()));
    let second = PageManager::new(practice_site(fast_timeouts()));

    first.example_page().navigate_to().await.unwrap();
    second.example_page().navigate_to().await.unwrap();
    first.example_page().fill_user_name("admin").await.unwrap();

    expect(&second.example_page().username_input).to_have_value("").await.unwrap();
}

#[tokio::test]
async fn test_closed_session_fails_every_page() {
    let (session, manager) = setup();
    session.close().await.unwrap();

    assert!(matches!(manager.home_page().navigate_to().await, Err(Error::Internal(_))));
    assert!(matches!(
        manager.example_page().fill_user_name("admin").await,
        Err(Error::Internal(_))
    ));
}

#[tokio::test]
async fn test_practice_site_fixture() {
    let session = practice_site(fast_timeouts());

    session.goto(HomePage::URL).await.unwrap();
    let headings = session.query(&Selector::css("h2.wp-block-heading")).await.unwrap();
    assert_eq!(headings.len(), SIDEBAR_HEADINGS.len());

    session.goto(ExamplePage::URL).await.unwrap();
    let inputs = session.query(&Selector::css("#user_login")).await.unwrap();
    assert_eq!(inputs[0].input_value.as_deref(), Some(""));
}
