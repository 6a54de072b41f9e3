use std::sync::Arc;

use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, warn};
use url::Url;

use crate::config::SessionConfig;
use crate::element::{ElementHandle, ElementImpl};
use crate::errors::AutomationError;
use crate::session::AutomationSession;
use crate::strategy::{xpath_literal, Strategy};

/// W3C WebDriver element identifier key
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Session over the W3C WebDriver HTTP protocol (chromedriver, geckodriver,
/// or a remote grid: anything speaking the wire protocol)
#[derive(Debug, Clone)]
pub struct WebDriverSession {
    core: Arc<WdCore>,
}

#[derive(Debug)]
struct WdCore {
    http: reqwest::Client,
    base_url: String,
    session_id: String,
}

impl WdCore {
    fn session_path(&self, suffix: &str) -> String {
        if suffix.is_empty() {
            format!("{}/session/{}", self.base_url, self.session_id)
        } else {
            format!("{}/session/{}/{}", self.base_url, self.session_id, suffix)
        }
    }

    /// Issue a command and unwrap the protocol's `value` envelope
    async fn command(
        &self,
        method: Method,
        url: String,
        body: Option<Value>,
    ) -> Result<Value, AutomationError> {
        let mut request = self.http.request(method, url.as_str());
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await.map_err(|e| {
            AutomationError::SessionError(format!("WebDriver request to {url} failed: {e}"))
        })?;
        let status = response.status();
        let mut payload: Value = response.json().await.map_err(|e| {
            AutomationError::SessionError(format!("Failed to parse WebDriver response: {e}"))
        })?;

        if status.is_success() {
            Ok(payload.get_mut("value").map(Value::take).unwrap_or(Value::Null))
        } else {
            Err(wire_error(&payload))
        }
    }

    /// Resolve `(using, value)` to a driver element reference, `None` when
    /// nothing matches the current document
    async fn find_element_ref(
        &self,
        using: &str,
        value: &str,
    ) -> Result<Option<String>, AutomationError> {
        let url = self.session_path("element");
        let response = self
            .http
            .post(url.as_str())
            .json(&json!({ "using": using, "value": value }))
            .send()
            .await
            .map_err(|e| AutomationError::SessionError(format!("WebDriver request failed: {e}")))?;
        let status = response.status();
        let payload: Value = response.json().await.map_err(|e| {
            AutomationError::SessionError(format!("Failed to parse WebDriver response: {e}"))
        })?;

        if status.is_success() {
            match payload["value"][ELEMENT_KEY].as_str() {
                Some(id) => Ok(Some(id.to_string())),
                None => Err(AutomationError::SessionError(
                    "Find-element response carried no element reference".to_string(),
                )),
            }
        } else if payload["value"]["error"].as_str() == Some("no such element") {
            Ok(None)
        } else {
            Err(wire_error(&payload))
        }
    }
}

fn wire_error(payload: &Value) -> AutomationError {
    let code = payload["value"]["error"].as_str().unwrap_or("unknown error");
    let message = payload["value"]["message"].as_str().unwrap_or("");
    match code {
        "invalid selector" => AutomationError::InvalidSelector(message.to_string()),
        "stale element reference" => {
            AutomationError::SessionError(format!("stale element reference: {message}"))
        }
        _ => AutomationError::SessionError(format!("{code}: {message}")),
    }
}

/// Map a strategy to the protocol's `(using, value)` pair.
///
/// `Id` and `Name` go through XPath attribute equality rather than CSS so
/// values containing CSS metacharacters need no escaping.
fn to_wire(strategy: &Strategy) -> Result<(&'static str, String), AutomationError> {
    match strategy {
        Strategy::Id(v) => Ok(("xpath", format!("//*[@id={}]", xpath_literal(v)))),
        Strategy::Name(v) => Ok(("xpath", format!("//*[@name={}]", xpath_literal(v)))),
        Strategy::Css(v) => Ok(("css selector", v.clone())),
        Strategy::XPath(v) => Ok(("xpath", v.clone())),
        Strategy::LinkText(v) => Ok(("link text", v.clone())),
        Strategy::Invalid(reason) => Err(AutomationError::InvalidSelector(reason.clone())),
    }
}

impl WebDriverSession {
    /// Open a new session against the configured WebDriver endpoint
    pub async fn connect(config: &SessionConfig) -> Result<Self, AutomationError> {
        let base = Url::parse(&config.webdriver_url).map_err(|e| {
            AutomationError::InvalidArgument(format!(
                "Invalid WebDriver URL '{}': {e}",
                config.webdriver_url
            ))
        })?;
        let base_url = base.as_str().trim_end_matches('/').to_string();

        let mut always_match = serde_json::Map::new();
        if let Some(browser) = &config.browser {
            always_match.insert("browserName".to_string(), json!(browser));
        }
        if !config.browser_args.is_empty() {
            always_match.insert(
                "goog:chromeOptions".to_string(),
                json!({ "args": config.browser_args }),
            );
        }

        let http = reqwest::Client::new();
        let response = http
            .post(format!("{base_url}/session"))
            .json(&json!({ "capabilities": { "alwaysMatch": Value::Object(always_match) } }))
            .send()
            .await
            .map_err(|e| {
                AutomationError::SessionError(format!(
                    "Failed to reach WebDriver server at {base_url}: {e}"
                ))
            })?;
        let status = response.status();
        let payload: Value = response.json().await.map_err(|e| {
            AutomationError::SessionError(format!("Failed to parse new-session response: {e}"))
        })?;
        if !status.is_success() {
            return Err(wire_error(&payload));
        }

        let session_id = payload["value"]["sessionId"]
            .as_str()
            .ok_or_else(|| {
                AutomationError::SessionError(
                    "New-session response carried no session id".to_string(),
                )
            })?
            .to_string();
        debug!(%session_id, "WebDriver session established");

        Ok(Self {
            core: Arc::new(WdCore {
                http,
                base_url,
                session_id,
            }),
        })
    }
}

#[async_trait::async_trait]
impl AutomationSession for WebDriverSession {
    async fn resolve(&self, strategy: &Strategy) -> Result<Option<ElementHandle>, AutomationError> {
        let (using, value) = to_wire(strategy)?;
        let element_ref = self.core.find_element_ref(using, &value).await?;
        Ok(element_ref.map(|id| {
            ElementHandle::new(Box::new(WebDriverElement {
                core: self.core.clone(),
                element_id: id,
            }))
        }))
    }

    async fn goto(&self, url: &str) -> Result<(), AutomationError> {
        self.core
            .command(
                Method::POST,
                self.core.session_path("url"),
                Some(json!({ "url": url })),
            )
            .await?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String, AutomationError> {
        let value = self
            .core
            .command(Method::GET, self.core.session_path("url"), None)
            .await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn title(&self) -> Result<String, AutomationError> {
        let value = self
            .core
            .command(Method::GET, self.core.session_path("title"), None)
            .await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn execute_script(
        &self,
        script: &str,
        args: Vec<Value>,
    ) -> Result<Value, AutomationError> {
        self.core
            .command(
                Method::POST,
                self.core.session_path("execute/sync"),
                Some(json!({ "script": script, "args": args })),
            )
            .await
    }

    async fn close(&self) -> Result<(), AutomationError> {
        self.core
            .command(Method::DELETE, self.core.session_path(""), None)
            .await?;
        Ok(())
    }
}

/// A live element resolved through a WebDriver session
#[derive(Debug)]
struct WebDriverElement {
    core: Arc<WdCore>,
    element_id: String,
}

impl WebDriverElement {
    fn path(&self, suffix: &str) -> String {
        self.core
            .session_path(&format!("element/{}/{suffix}", self.element_id))
    }

    async fn get_string(&self, suffix: &str) -> Result<Value, AutomationError> {
        self.core.command(Method::GET, self.path(suffix), None).await
    }
}

#[async_trait::async_trait]
impl ElementImpl for WebDriverElement {
    fn element_id(&self) -> String {
        self.element_id.clone()
    }

    async fn tag_name(&self) -> Result<String, AutomationError> {
        let value = self.get_string("name").await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, AutomationError> {
        let value = self.get_string(&format!("attribute/{name}")).await?;
        Ok(value.as_str().map(str::to_string))
    }

    async fn property(&self, name: &str) -> Result<Option<String>, AutomationError> {
        let value = self.get_string(&format!("property/{name}")).await?;
        Ok(match value {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        })
    }

    async fn text(&self) -> Result<String, AutomationError> {
        let value = self.get_string("text").await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn is_visible(&self) -> Result<bool, AutomationError> {
        let value = self.get_string("displayed").await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn is_enabled(&self) -> Result<bool, AutomationError> {
        let value = self.get_string("enabled").await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn clear(&self) -> Result<(), AutomationError> {
        self.core
            .command(Method::POST, self.path("clear"), Some(json!({})))
            .await?;
        Ok(())
    }

    async fn type_text(&self, text: &str) -> Result<(), AutomationError> {
        self.core
            .command(Method::POST, self.path("value"), Some(json!({ "text": text })))
            .await?;
        Ok(())
    }

    async fn click(&self) -> Result<(), AutomationError> {
        self.core
            .command(Method::POST, self.path("click"), Some(json!({})))
            .await?;
        Ok(())
    }

    async fn focus(&self) -> Result<(), AutomationError> {
        let result = self
            .core
            .command(
                Method::POST,
                self.core.session_path("execute/sync"),
                Some(json!({
                    "script": "arguments[0].focus();",
                    "args": [{ ELEMENT_KEY: self.element_id }],
                })),
            )
            .await;
        if let Err(e) = &result {
            warn!("focus() script failed: {e}");
        }
        result.map(|_| ())
    }

    fn clone_box(&self) -> Box<dyn ElementImpl> {
        Box::new(WebDriverElement {
            core: self.core.clone(),
            element_id: self.element_id.clone(),
        })
    }
}
