//! Live-browser tests
//!
//! Run against a Chrome started with `--remote-debugging-port`:
//!
//! ```text
//! PW_CDP_ENDPOINT=ws://localhost:9222 cargo test --test live_test -- --ignored
//! ```

mod common;

use common::{setup_live, COPYRIGHT};
use pw_practice::session::Session;
use pw_practice::{expect, ContainTextOptions, Error, Navigable};

/// CASE_HOME_01
#[tokio::test]
#[ignore = "requires a running Chrome"]
async fn test_live_sidebar_heading_visible() {
    let manager = setup_live().await.unwrap();
    let home_page = manager.home_page();
    home_page.navigate_to().await.unwrap();

    expect(&home_page.sidebar_heading("Recent Posts")).to_be_visible().await.unwrap();

    manager.session().close().await.unwrap();
}

/// CASE_HOME_02
#[tokio::test]
#[ignore = "requires a running Chrome"]
async fn test_live_footer_copyright() {
    let manager = setup_live().await.unwrap();
    let home_page = manager.home_page();
    home_page.navigate_to().await.unwrap();

    expect(&home_page.footer_copyright)
        .to_contain_text(COPYRIGHT, ContainTextOptions { ignore_case: true })
        .await
        .unwrap();

    manager.session().close().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running Chrome"]
async fn test_live_missing_heading() {
    let manager = setup_live().await.unwrap();
    let home_page = manager.home_page();
    home_page.navigate_to().await.unwrap();

    let result = expect(&home_page.sidebar_heading("Nonexistent Heading")).to_be_visible().await;
    assert!(matches!(result, Err(Error::AssertionMismatch { .. })));

    manager.session().close().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running Chrome"]
async fn test_live_fill_user_name() {
    let manager = setup_live().await.unwrap();
    let example_page = manager.example_page();
    example_page.navigate_to().await.unwrap();

    example_page.fill_user_name("admin").await.unwrap();
    expect(&example_page.username_input).to_have_value("admin").await.unwrap();

    manager.session().close().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running Chrome"]
async fn test_live_data_url_page() {
    let manager = setup_live().await.unwrap();
    let html = r#"<html><body><footer><p class="copyright">© 2025 Local</p></footer></body></html>"#;
    let url = format!("data:text/html;charset=utf-8,{}", urlencoding::encode(html));

    manager.session().goto(&url).await.unwrap();
    expect(&manager.home_page().footer_copyright)
        .to_contain_text("© 2025 local", ContainTextOptions { ignore_case: true })
        .await
        .unwrap();

    manager.session().close().await.unwrap();
}
