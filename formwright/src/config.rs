use std::time::Duration;

use crate::locator::LocatorOptions;

/// Default WebDriver endpoint (chromedriver's standalone port)
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";

/// Default bound for page-load waits
pub const DEFAULT_PAGE_LOAD_TIMEOUT: Duration = Duration::from_secs(10);

/// Explicit session configuration, threaded through construction.
///
/// There is no driver-level implicit wait: all waiting behavior lives in
/// [`LocatorOptions`] and `page_load_timeout`.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Base URL of the WebDriver server
    pub webdriver_url: String,
    /// `browserName` capability; `None` lets the server pick
    pub browser: Option<String>,
    /// Extra browser process arguments (e.g. `--disable-notifications`)
    pub browser_args: Vec<String>,
    /// Bound for `wait_for_page_load`
    pub page_load_timeout: Duration,
    /// Timing defaults handed to every locator created from this session
    pub locator: LocatorOptions,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            browser: None,
            browser_args: Vec::new(),
            page_load_timeout: DEFAULT_PAGE_LOAD_TIMEOUT,
            locator: LocatorOptions::default(),
        }
    }
}

impl SessionConfig {
    /// Configuration pointing at a specific WebDriver endpoint
    pub fn for_endpoint(webdriver_url: impl Into<String>) -> Self {
        Self {
            webdriver_url: webdriver_url.into(),
            ..Self::default()
        }
    }

    pub fn with_browser(mut self, browser: impl Into<String>) -> Self {
        self.browser = Some(browser.into());
        self
    }

    pub fn with_browser_arg(mut self, arg: impl Into<String>) -> Self {
        self.browser_args.push(arg.into());
        self
    }

    pub fn with_locator_timeout(mut self, timeout: Duration) -> Self {
        self.locator.timeout = timeout;
        self
    }
}
