use std::sync::Arc;

use serde_json::Value;

use crate::config::SessionConfig;
use crate::element::ElementHandle;
use crate::errors::AutomationError;
use crate::strategy::Strategy;

pub mod webdriver;

/// The common trait all automation-session transports must implement
///
/// A session exposes single-shot capabilities only: resolving a strategy is
/// one evaluation against the current document with no internal polling.
/// Waiting and retrying are owned by the locator layer.
#[async_trait::async_trait]
pub trait AutomationSession: Send + Sync {
    /// Resolve a strategy to zero or one elements in the current document.
    ///
    /// `Ok(None)` means the strategy matched nothing right now; `Err` means
    /// the attempt itself failed (bad selector, stale document, transport).
    async fn resolve(&self, strategy: &Strategy) -> Result<Option<ElementHandle>, AutomationError>;

    /// Navigate the session to a URL
    async fn goto(&self, url: &str) -> Result<(), AutomationError>;

    async fn current_url(&self) -> Result<String, AutomationError>;

    async fn title(&self) -> Result<String, AutomationError>;

    /// Evaluate a script in the page, returning its JSON-converted result
    async fn execute_script(
        &self,
        script: &str,
        args: Vec<Value>,
    ) -> Result<Value, AutomationError>;

    /// Tear the session down. The session is unusable afterwards.
    async fn close(&self) -> Result<(), AutomationError>;
}

/// Connect a session for the configured transport
pub async fn connect(config: &SessionConfig) -> Result<Arc<dyn AutomationSession>, AutomationError> {
    let session = webdriver::WebDriverSession::connect(config).await?;
    Ok(Arc::new(session))
}
