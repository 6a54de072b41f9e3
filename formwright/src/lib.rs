//! Resilient web-form automation over browser-automation drivers
//!
//! This crate provides a Playwright-inspired API for driving web forms in
//! UI tests. A logical field owns an ordered list of location strategies,
//! most specific first, and the locator returns the first strategy that
//! resolves to a currently visible element within a bounded wait. Tests keep
//! working while a page is still rendering or after cosmetic markup changes
//! break the preferred selector.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::instrument;

pub mod config;
pub mod element;
pub mod errors;
pub mod locator;
pub mod page;
pub mod session;
pub mod strategy;
#[cfg(test)]
mod tests;

pub use config::SessionConfig;
pub use element::ElementHandle;
pub use errors::AutomationError;
pub use locator::{Locator, LocatorOptions};
pub use page::PracticeFormPage;
pub use session::AutomationSession;
pub use strategy::Strategy;

/// The main entry point for web-form automation
///
/// Owns a borrowed automation session (the session's lifecycle is managed by
/// the test harness) and hands out locators configured with this browser's
/// timing defaults.
pub struct Browser {
    session: Arc<dyn AutomationSession>,
    locator_options: LocatorOptions,
    page_load_timeout: Duration,
}

impl Browser {
    /// Connect a new WebDriver-backed browser per `config`
    #[instrument(skip(config))]
    pub async fn connect(config: SessionConfig) -> Result<Self, AutomationError> {
        let session = session::connect(&config).await?;
        Ok(Self {
            session,
            locator_options: config.locator,
            page_load_timeout: config.page_load_timeout,
        })
    }

    /// Wrap an already-established session of any transport
    pub fn with_session(session: Arc<dyn AutomationSession>, config: &SessionConfig) -> Self {
        Self {
            session,
            locator_options: config.locator,
            page_load_timeout: config.page_load_timeout,
        }
    }

    /// Build a locator over an ordered strategy list
    pub fn locator(&self, strategies: Vec<Strategy>) -> Locator {
        Locator::new(self.session.clone(), strategies).with_options(self.locator_options)
    }

    /// Return the first strategy's visible element, by list priority.
    ///
    /// Fails fast with [`AutomationError::InvalidArgument`] on an empty list
    /// and with [`AutomationError::StrategyExhausted`] when every strategy
    /// times out.
    pub async fn find_element(
        &self,
        strategies: &[Strategy],
    ) -> Result<ElementHandle, AutomationError> {
        self.locator(strategies.to_vec()).wait(None).await
    }

    /// Find the form control associated with a label's text, via `for`
    /// attribute, following-input, then same-container fallbacks
    pub async fn find_by_label_text(&self, label: &str) -> Result<ElementHandle, AutomationError> {
        locator::find_by_label_text(&self.session, label, &self.locator_options).await
    }

    /// Find an input by its placeholder text, exact match first, then a
    /// substring match
    pub async fn find_by_placeholder(
        &self,
        placeholder: &str,
    ) -> Result<ElementHandle, AutomationError> {
        self.locator(locator::placeholder_strategies(placeholder))
            .wait(None)
            .await
    }

    /// Find an input by its `type` plus context text matched against
    /// placeholder, name, or a preceding label
    pub async fn find_by_type_and_context(
        &self,
        input_type: &str,
        context: &str,
    ) -> Result<ElementHandle, AutomationError> {
        self.locator(locator::type_and_context_strategies(input_type, context))
            .wait(None)
            .await
    }

    #[instrument(skip(self))]
    pub async fn goto(&self, url: &str) -> Result<(), AutomationError> {
        self.session.goto(url).await
    }

    pub async fn current_url(&self) -> Result<String, AutomationError> {
        self.session.current_url().await
    }

    pub async fn title(&self) -> Result<String, AutomationError> {
        self.session.title().await
    }

    /// Evaluate a script in the page, returning its JSON-converted result
    pub async fn execute_script(
        &self,
        script: &str,
        args: Vec<Value>,
    ) -> Result<Value, AutomationError> {
        self.session.execute_script(script, args).await
    }

    /// Tear the underlying session down
    #[instrument(skip(self))]
    pub async fn close(&self) -> Result<(), AutomationError> {
        self.session.close().await
    }

    pub fn locator_options(&self) -> &LocatorOptions {
        &self.locator_options
    }

    pub fn page_load_timeout(&self) -> Duration {
        self.page_load_timeout
    }
}

impl Clone for Browser {
    fn clone(&self) -> Self {
        Self {
            session: self.session.clone(),
            locator_options: self.locator_options,
            page_load_timeout: self.page_load_timeout,
        }
    }
}
