//! Page objects for the automation practice form.
//!
//! Thin declarative glue: each logical field owns an ordered strategy list,
//! most specific first, and re-evaluates it on every access so no stale
//! handle is cached across calls. All resolution goes through the resilient
//! locator.

use std::time::Instant;

use serde_json::json;
use tracing::instrument;

use crate::element::ElementHandle;
use crate::errors::AutomationError;
use crate::strategy::Strategy;
use crate::Browser;

const PAGE_URL: &str = "https://app.cloudqa.io/home/AutomationPracticeForm";

/// Page object for the practice registration form
#[derive(Clone)]
pub struct PracticeFormPage {
    browser: Browser,
    url: String,
}

impl PracticeFormPage {
    pub fn new(browser: Browser) -> Self {
        Self {
            browser,
            url: PAGE_URL.to_string(),
        }
    }

    /// Page object pointed at a different deployment of the same form
    /// (e.g. a locally served fixture)
    pub fn with_url(browser: Browser, url: impl Into<String>) -> Self {
        Self {
            browser,
            url: url.into(),
        }
    }

    pub async fn navigate(&self) -> Result<(), AutomationError> {
        self.browser.goto(&self.url).await
    }

    /// True once the form (or its heading) is present
    pub async fn is_loaded(&self) -> bool {
        self.browser
            .find_element(&[
                Strategy::Css("form".to_string()),
                Strategy::XPath("//h2[contains(text(), 'Form')]".to_string()),
            ])
            .await
            .is_ok()
    }

    /// Poll `document.readyState` until the document reports complete,
    /// bounded by the session's configured page-load timeout
    #[instrument(level = "debug", skip(self))]
    pub async fn wait_for_page_load(&self) -> Result<(), AutomationError> {
        let timeout = self.browser.page_load_timeout();
        let interval = self.browser.locator_options().poll_interval;
        let deadline = Instant::now() + timeout;
        loop {
            let state = self
                .browser
                .execute_script("return document.readyState;", vec![])
                .await
                .unwrap_or_else(|_| json!(null));
            if state.as_str() == Some("complete") {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(AutomationError::Timeout(format!(
                    "page did not reach readyState 'complete' within {timeout:?}"
                )));
            }
            tokio::time::sleep(interval).await;
        }
    }

    // -- First Name field ---------------------------------------------------

    pub async fn first_name_field(&self) -> Result<ElementHandle, AutomationError> {
        self.browser
            .find_element(&[
                Strategy::Id("fname".to_string()),
                Strategy::Name("fname".to_string()),
                Strategy::XPath("//input[@placeholder='First Name']".to_string()),
                Strategy::XPath(
                    "//label[contains(text(), 'First Name')]/following::input[1]".to_string(),
                ),
                Strategy::XPath("(//input[@type='text'])[1]".to_string()),
                Strategy::Css("input[placeholder*='First']".to_string()),
            ])
            .await
    }

    pub async fn enter_first_name(&self, first_name: &str) -> Result<(), AutomationError> {
        self.first_name_field().await?.set_text(first_name).await
    }

    pub async fn first_name_value(&self) -> Result<String, AutomationError> {
        self.first_name_field().await?.value().await
    }

    // -- Email field --------------------------------------------------------

    pub async fn email_field(&self) -> Result<ElementHandle, AutomationError> {
        self.browser
            .find_element(&[
                Strategy::Id("email".to_string()),
                Strategy::Name("email".to_string()),
                Strategy::XPath("//input[@type='email']".to_string()),
                Strategy::XPath("//input[@placeholder='Email']".to_string()),
                Strategy::XPath("//input[contains(@placeholder, 'mail')]".to_string()),
                Strategy::XPath(
                    "//label[contains(text(), 'Email')]/following::input[1]".to_string(),
                ),
                Strategy::XPath("//label[contains(text(), 'Email')]/..//input".to_string()),
                Strategy::Css("input[type='email']".to_string()),
                Strategy::Css("input[name*='email' i]".to_string()),
            ])
            .await
    }

    pub async fn enter_email(&self, email: &str) -> Result<(), AutomationError> {
        self.email_field().await?.set_text(email).await
    }

    pub async fn email_value(&self) -> Result<String, AutomationError> {
        self.email_field().await?.value().await
    }

    // -- Mobile Number field ------------------------------------------------

    pub async fn mobile_number_field(&self) -> Result<ElementHandle, AutomationError> {
        self.browser
            .find_element(&[
                Strategy::Id("phone".to_string()),
                Strategy::Id("mobile".to_string()),
                Strategy::Name("phone".to_string()),
                Strategy::Name("mobile".to_string()),
                Strategy::XPath("//input[@placeholder='Mobile #']".to_string()),
                Strategy::XPath("//input[contains(@placeholder, 'Mobile')]".to_string()),
                Strategy::XPath("//input[contains(@placeholder, 'Phone')]".to_string()),
                Strategy::XPath(
                    "//label[contains(text(), 'Mobile')]/following::input[1]".to_string(),
                ),
                Strategy::XPath("//label[contains(text(), 'Mobile')]/..//input".to_string()),
                Strategy::Css("input[type='tel']".to_string()),
                Strategy::XPath(
                    "//input[@type='text' and (contains(@name, 'phone') or contains(@name, 'mobile'))]"
                        .to_string(),
                ),
                Strategy::Css("input[aria-label*='mobile' i]".to_string()),
                Strategy::Css("input[aria-label*='phone' i]".to_string()),
            ])
            .await
    }

    pub async fn enter_mobile_number(&self, mobile_number: &str) -> Result<(), AutomationError> {
        self.mobile_number_field().await?.set_text(mobile_number).await
    }

    pub async fn mobile_number_value(&self) -> Result<String, AutomationError> {
        self.mobile_number_field().await?.value().await
    }
}
