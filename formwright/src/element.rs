use std::fmt::Debug;

use crate::errors::AutomationError;

/// Interface for transport-specific element implementations
///
/// A handle is only valid for the lifetime of the document it was resolved
/// against; callers re-locate rather than cache across navigations.
#[async_trait::async_trait]
pub trait ElementImpl: Send + Sync + Debug {
    /// Driver-assigned reference for this element
    fn element_id(&self) -> String;

    async fn tag_name(&self) -> Result<String, AutomationError>;

    /// Read an attribute as written in the markup; `None` when absent
    async fn attribute(&self, name: &str) -> Result<Option<String>, AutomationError>;

    /// Read a live DOM property (e.g. `value` reflects typed input)
    async fn property(&self, name: &str) -> Result<Option<String>, AutomationError>;

    async fn text(&self) -> Result<String, AutomationError>;

    async fn is_visible(&self) -> Result<bool, AutomationError>;

    async fn is_enabled(&self) -> Result<bool, AutomationError>;

    /// Clear the element's current value
    async fn clear(&self) -> Result<(), AutomationError>;

    /// Send text to the element as keystrokes, appending to current content
    async fn type_text(&self, text: &str) -> Result<(), AutomationError>;

    async fn click(&self) -> Result<(), AutomationError>;

    async fn focus(&self) -> Result<(), AutomationError>;

    fn clone_box(&self) -> Box<dyn ElementImpl>;
}

/// An opaque handle to an element in the current document
#[derive(Debug)]
pub struct ElementHandle {
    inner: Box<dyn ElementImpl>,
}

impl ElementHandle {
    pub fn new(inner: Box<dyn ElementImpl>) -> Self {
        Self { inner }
    }

    pub fn element_id(&self) -> String {
        self.inner.element_id()
    }

    pub async fn tag_name(&self) -> Result<String, AutomationError> {
        self.inner.tag_name().await
    }

    pub async fn attribute(&self, name: &str) -> Result<Option<String>, AutomationError> {
        self.inner.attribute(name).await
    }

    pub async fn property(&self, name: &str) -> Result<Option<String>, AutomationError> {
        self.inner.property(name).await
    }

    /// Current `value` property, empty string when unset
    pub async fn value(&self) -> Result<String, AutomationError> {
        Ok(self.inner.property("value").await?.unwrap_or_default())
    }

    pub async fn text(&self) -> Result<String, AutomationError> {
        self.inner.text().await
    }

    pub async fn is_visible(&self) -> Result<bool, AutomationError> {
        self.inner.is_visible().await
    }

    pub async fn is_enabled(&self) -> Result<bool, AutomationError> {
        self.inner.is_enabled().await
    }

    pub async fn clear(&self) -> Result<(), AutomationError> {
        self.inner.clear().await
    }

    pub async fn type_text(&self, text: &str) -> Result<(), AutomationError> {
        self.inner.type_text(text).await
    }

    /// Clear, then type. The usual way to set a form field's value.
    pub async fn set_text(&self, text: &str) -> Result<(), AutomationError> {
        self.inner.clear().await?;
        self.inner.type_text(text).await
    }

    pub async fn click(&self) -> Result<(), AutomationError> {
        self.inner.click().await
    }

    pub async fn focus(&self) -> Result<(), AutomationError> {
        self.inner.focus().await
    }
}

impl Clone for ElementHandle {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone_box(),
        }
    }
}
