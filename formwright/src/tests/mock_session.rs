//! Scripted in-memory session double.
//!
//! Tests wire strategies to nodes explicitly, so the locator's polling and
//! fallback behavior can be exercised without a browser. A node can appear
//! after a delay (still-rendering page) or stay invisible; a binding can be
//! scripted to fail, modeling per-attempt resolution errors.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde_json::{json, Value};

use crate::config::SessionConfig;
use crate::element::{ElementHandle, ElementImpl};
use crate::errors::AutomationError;
use crate::locator::LocatorOptions;
use crate::session::AutomationSession;
use crate::strategy::Strategy;
use crate::Browser;

pub struct MockNode {
    marker: String,
    attrs: Mutex<HashMap<String, String>>,
    value: Mutex<String>,
    visible: AtomicBool,
    appear_after: Duration,
    born: Instant,
}

impl std::fmt::Debug for MockNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockNode").field("marker", &self.marker).finish()
    }
}

impl MockNode {
    /// A node present and visible from the start
    pub fn new(marker: &str) -> Arc<Self> {
        Self::build(marker, Duration::ZERO, true)
    }

    /// A node absent from the document until `delay` has elapsed
    pub fn appearing_after(marker: &str, delay: Duration) -> Arc<Self> {
        Self::build(marker, delay, true)
    }

    /// A node present in the document but never visible
    pub fn hidden(marker: &str) -> Arc<Self> {
        Self::build(marker, Duration::ZERO, false)
    }

    fn build(marker: &str, appear_after: Duration, visible: bool) -> Arc<Self> {
        Arc::new(Self {
            marker: marker.to_string(),
            attrs: Mutex::new(HashMap::new()),
            value: Mutex::new(String::new()),
            visible: AtomicBool::new(visible),
            appear_after,
            born: Instant::now(),
        })
    }

    pub fn set_attr(&self, name: &str, value: &str) {
        self.attrs
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
    }

    pub fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::SeqCst);
    }

    pub fn current_value(&self) -> String {
        self.value.lock().unwrap().clone()
    }

    fn present(&self) -> bool {
        self.born.elapsed() >= self.appear_after
    }
}

enum Binding {
    Node(Arc<MockNode>),
    Error(String),
}

pub struct MockSession {
    bindings: Mutex<HashMap<Strategy, Binding>>,
    ready_state: Mutex<String>,
    visited: Mutex<Vec<String>>,
}

impl MockSession {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            bindings: Mutex::new(HashMap::new()),
            ready_state: Mutex::new("complete".to_string()),
            visited: Mutex::new(Vec::new()),
        })
    }

    /// Wire a strategy to a node; an unbound strategy resolves to nothing
    pub fn bind(&self, strategy: Strategy, node: &Arc<MockNode>) {
        self.bindings
            .lock()
            .unwrap()
            .insert(strategy, Binding::Node(node.clone()));
    }

    /// Script a strategy to fail on every resolution attempt
    pub fn bind_error(&self, strategy: Strategy, message: &str) {
        self.bindings
            .lock()
            .unwrap()
            .insert(strategy, Binding::Error(message.to_string()));
    }

    pub fn set_ready_state(&self, state: &str) {
        *self.ready_state.lock().unwrap() = state.to_string();
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl AutomationSession for MockSession {
    async fn resolve(&self, strategy: &Strategy) -> Result<Option<ElementHandle>, AutomationError> {
        let bindings = self.bindings.lock().unwrap();
        match bindings.get(strategy) {
            Some(Binding::Node(node)) if node.present() => Ok(Some(ElementHandle::new(
                Box::new(MockElement { node: node.clone() }),
            ))),
            Some(Binding::Node(_)) => Ok(None),
            Some(Binding::Error(message)) => {
                Err(AutomationError::SessionError(message.clone()))
            }
            None => Ok(None),
        }
    }

    async fn goto(&self, url: &str) -> Result<(), AutomationError> {
        self.visited.lock().unwrap().push(url.to_string());
        Ok(())
    }

    async fn current_url(&self) -> Result<String, AutomationError> {
        Ok(self.visited.lock().unwrap().last().cloned().unwrap_or_default())
    }

    async fn title(&self) -> Result<String, AutomationError> {
        Ok("Mock Page".to_string())
    }

    async fn execute_script(
        &self,
        script: &str,
        _args: Vec<Value>,
    ) -> Result<Value, AutomationError> {
        if script.contains("readyState") {
            return Ok(json!(self.ready_state.lock().unwrap().clone()));
        }
        Ok(Value::Null)
    }

    async fn close(&self) -> Result<(), AutomationError> {
        Ok(())
    }
}

#[derive(Debug)]
struct MockElement {
    node: Arc<MockNode>,
}

#[async_trait::async_trait]
impl ElementImpl for MockElement {
    fn element_id(&self) -> String {
        self.node.marker.clone()
    }

    async fn tag_name(&self) -> Result<String, AutomationError> {
        Ok(self
            .node
            .attrs
            .lock()
            .unwrap()
            .get("tag")
            .cloned()
            .unwrap_or_else(|| "input".to_string()))
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, AutomationError> {
        Ok(self.node.attrs.lock().unwrap().get(name).cloned())
    }

    async fn property(&self, name: &str) -> Result<Option<String>, AutomationError> {
        if name == "value" {
            return Ok(Some(self.node.value.lock().unwrap().clone()));
        }
        Ok(self.node.attrs.lock().unwrap().get(name).cloned())
    }

    async fn text(&self) -> Result<String, AutomationError> {
        Ok(self
            .node
            .attrs
            .lock()
            .unwrap()
            .get("text")
            .cloned()
            .unwrap_or_default())
    }

    async fn is_visible(&self) -> Result<bool, AutomationError> {
        Ok(self.node.present() && self.node.visible.load(Ordering::SeqCst))
    }

    async fn is_enabled(&self) -> Result<bool, AutomationError> {
        Ok(true)
    }

    async fn clear(&self) -> Result<(), AutomationError> {
        self.node.value.lock().unwrap().clear();
        Ok(())
    }

    async fn type_text(&self, text: &str) -> Result<(), AutomationError> {
        // keystrokes append, they do not replace
        self.node.value.lock().unwrap().push_str(text);
        Ok(())
    }

    async fn click(&self) -> Result<(), AutomationError> {
        Ok(())
    }

    async fn focus(&self) -> Result<(), AutomationError> {
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn ElementImpl> {
        Box::new(MockElement {
            node: self.node.clone(),
        })
    }
}

/// Browser over a mock session with test-sized locator budgets
pub fn test_browser(session: Arc<MockSession>) -> Browser {
    test_browser_with_timeout(session, Duration::from_millis(300))
}

pub fn test_browser_with_timeout(session: Arc<MockSession>, timeout: Duration) -> Browser {
    let config = SessionConfig {
        page_load_timeout: Duration::from_millis(500),
        locator: LocatorOptions {
            timeout,
            poll_interval: Duration::from_millis(20),
        },
        ..SessionConfig::default()
    };
    Browser::with_session(session, &config)
}
