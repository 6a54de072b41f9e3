//! Tests for the practice-form page object over a scripted session

use std::time::Duration;

use crate::config::SessionConfig;
use crate::errors::AutomationError;
use crate::locator::LocatorOptions;
use crate::page::PracticeFormPage;
use crate::strategy::Strategy;
use crate::tests::mock_session::{test_browser, MockNode, MockSession};
use crate::Browser;

fn form_session() -> (std::sync::Arc<MockSession>, PracticeFormPage) {
    let session = MockSession::new();
    let first_name = MockNode::new("first-name");
    let email = MockNode::new("email");
    let mobile = MockNode::new("mobile");
    session.bind(Strategy::Id("fname".to_string()), &first_name);
    session.bind(Strategy::Id("email".to_string()), &email);
    session.bind(Strategy::Id("phone".to_string()), &mobile);
    let browser = test_browser(session.clone());
    let page = PracticeFormPage::with_url(browser, "http://localhost/practice-form");
    (session, page)
}

#[tokio::test]
async fn fills_and_reads_back_all_fields() {
    crate::tests::init_tracing();
    let (session, page) = form_session();

    page.navigate().await.unwrap();
    page.wait_for_page_load().await.unwrap();

    page.enter_first_name("John").await.unwrap();
    page.enter_email("john.doe@example.com").await.unwrap();
    page.enter_mobile_number("9876543210").await.unwrap();

    assert_eq!(page.first_name_value().await.unwrap(), "John");
    assert_eq!(page.email_value().await.unwrap(), "john.doe@example.com");
    assert_eq!(page.mobile_number_value().await.unwrap(), "9876543210");
    assert_eq!(session.visited(), vec!["http://localhost/practice-form"]);
}

#[tokio::test]
async fn updated_value_replaces_old_value() {
    let (_session, page) = form_session();

    page.enter_first_name("Jane").await.unwrap();
    assert_eq!(page.first_name_value().await.unwrap(), "Jane");

    page.enter_first_name("Sarah").await.unwrap();
    let final_value = page.first_name_value().await.unwrap();
    assert_eq!(final_value, "Sarah");
    assert_ne!(final_value, "Jane");
}

#[tokio::test]
async fn accepts_special_characters() {
    let (_session, page) = form_session();

    page.enter_first_name("Mary-Anne O'Brien").await.unwrap();
    assert_eq!(page.first_name_value().await.unwrap(), "Mary-Anne O'Brien");
}

#[tokio::test]
async fn field_falls_back_when_preferred_strategy_is_gone() {
    // only the css type=email rung matches; every id/name/xpath rung before
    // it times out first
    let session = MockSession::new();
    let email = MockNode::new("email-by-css");
    session.bind(Strategy::Css("input[type='email']".to_string()), &email);
    let config = SessionConfig {
        locator: LocatorOptions {
            timeout: Duration::from_millis(30),
            poll_interval: Duration::from_millis(10),
        },
        ..SessionConfig::default()
    };
    let browser = Browser::with_session(session, &config);
    let page = PracticeFormPage::with_url(browser, "http://localhost/practice-form");

    page.enter_email("fallback@example.com").await.unwrap();
    assert_eq!(page.email_value().await.unwrap(), "fallback@example.com");
}

#[tokio::test]
async fn wait_for_page_load_times_out_when_document_never_completes() {
    let session = MockSession::new();
    session.set_ready_state("loading");
    let browser = test_browser(session);
    let page = PracticeFormPage::with_url(browser, "http://localhost/practice-form");

    match page.wait_for_page_load().await {
        Err(AutomationError::Timeout(_)) => {}
        other => panic!("Expected Timeout, got {other:?}"),
    }
}
