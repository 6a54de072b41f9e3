use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, instrument};

use crate::element::ElementHandle;
use crate::errors::AutomationError;
use crate::session::AutomationSession;
use crate::strategy::{css_literal, describe_list, xpath_literal, Strategy};

// Default per-strategy timeout if none is specified on the locator itself
pub const DEFAULT_LOCATOR_TIMEOUT: Duration = Duration::from_secs(10);

/// Interval between resolution attempts against the live document
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Timing configuration for a locator instance
#[derive(Debug, Clone, Copy)]
pub struct LocatorOptions {
    /// Budget per strategy (and per label tier), not for the whole list
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_LOCATOR_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Outcome of a single resolution attempt.
///
/// `NotFound` and `Failed` are handled identically by the polling loop:
/// partial failure of one attempt is expected and never aborts the search.
enum Resolution {
    Found(ElementHandle),
    NotFound,
    Failed(AutomationError),
}

/// A high-level API for finding a working element for a logical field
///
/// Holds an ordered strategy list; priority is list order, most specific
/// first. The first strategy that resolves to a visible element within its
/// budget wins, even when a later strategy would have resolved sooner.
#[derive(Clone)]
pub struct Locator {
    session: Arc<dyn AutomationSession>,
    strategies: Vec<Strategy>,
    options: LocatorOptions,
}

impl Locator {
    pub(crate) fn new(session: Arc<dyn AutomationSession>, strategies: Vec<Strategy>) -> Self {
        Self {
            session,
            strategies,
            options: LocatorOptions::default(),
        }
    }

    pub(crate) fn with_options(mut self, options: LocatorOptions) -> Self {
        self.options = options;
        self
    }

    /// Set a default per-strategy timeout for this locator instance.
    /// Used if no specific timeout is passed to wait/first.
    pub fn set_default_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    pub fn set_poll_interval(mut self, interval: Duration) -> Self {
        self.options.poll_interval = interval;
        self
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    pub async fn first(&self, timeout: Option<Duration>) -> Result<ElementHandle, AutomationError> {
        self.wait(timeout).await
    }

    /// Wait for the first strategy that yields a visible element.
    ///
    /// Strategies are tried strictly in list order; each gets the full
    /// per-strategy budget before the next is attempted. Total wait is
    /// bounded by budget x list length.
    #[instrument(level = "debug", skip(self, timeout))]
    pub async fn wait(&self, timeout: Option<Duration>) -> Result<ElementHandle, AutomationError> {
        if self.strategies.is_empty() {
            return Err(AutomationError::InvalidArgument(
                "no location strategies provided".to_string(),
            ));
        }
        let per_strategy = timeout.unwrap_or(self.options.timeout);

        for strategy in &self.strategies {
            debug!(%strategy, "Trying location strategy");
            if let Some(element) = self.poll_strategy(strategy, per_strategy).await {
                debug!(%strategy, "Strategy yielded a visible element");
                return Ok(element);
            }
        }

        Err(AutomationError::StrategyExhausted(format!(
            "no strategy yielded a visible element within {per_strategy:?} each: [{}]",
            describe_list(&self.strategies)
        )))
    }

    /// Poll one strategy until it yields a visible element or its budget
    /// elapses. Always attempts at least once.
    async fn poll_strategy(&self, strategy: &Strategy, timeout: Duration) -> Option<ElementHandle> {
        let deadline = Instant::now() + timeout;
        loop {
            match resolve_visible(self.session.as_ref(), strategy).await {
                Resolution::Found(element) => return Some(element),
                Resolution::NotFound => {}
                Resolution::Failed(e) => {
                    debug!(%strategy, "Resolution attempt failed: {e}");
                }
            }
            if Instant::now() >= deadline {
                return None;
            }
            tokio::time::sleep(self.options.poll_interval).await;
        }
    }
}

/// One resolution attempt: the strategy must resolve AND the element must be
/// currently visible
async fn resolve_visible(session: &dyn AutomationSession, strategy: &Strategy) -> Resolution {
    match session.resolve(strategy).await {
        Ok(Some(element)) => match element.is_visible().await {
            Ok(true) => Resolution::Found(element),
            Ok(false) => Resolution::NotFound,
            Err(e) => Resolution::Failed(e),
        },
        Ok(None) => Resolution::NotFound,
        Err(e) => Resolution::Failed(e),
    }
}

// ---------------------------------------------------------------------------
// Label-text resolution

/// Tiers of the label fallback, tried in order
#[derive(Debug, Clone, Copy)]
enum LabelTier {
    /// Exact-text label, follow its `for` attribute to the target id
    ForAttribute,
    /// First input following the label in document order
    FollowingInput,
    /// First input nested under the label's parent container
    ContainerInput,
}

const LABEL_TIERS: [LabelTier; 3] = [
    LabelTier::ForAttribute,
    LabelTier::FollowingInput,
    LabelTier::ContainerInput,
];

/// Find the form control associated with a label's visible text.
///
/// Each tier runs under the same bounded-polling discipline as strategy
/// lists; tier-internal failures are absorbed and only all-tiers exhaustion
/// surfaces.
#[instrument(level = "debug", skip(session, options))]
pub(crate) async fn find_by_label_text(
    session: &Arc<dyn AutomationSession>,
    label: &str,
    options: &LocatorOptions,
) -> Result<ElementHandle, AutomationError> {
    let label = normalize_label(label);

    for tier in LABEL_TIERS {
        debug!(?tier, %label, "Trying label tier");
        let deadline = Instant::now() + options.timeout;
        loop {
            match label_tier_attempt(session.as_ref(), tier, &label).await {
                Resolution::Found(element) => return Ok(element),
                Resolution::NotFound => {}
                Resolution::Failed(e) => {
                    debug!(?tier, "Label tier attempt failed: {e}");
                }
            }
            if Instant::now() >= deadline {
                break;
            }
            tokio::time::sleep(options.poll_interval).await;
        }
    }

    Err(AutomationError::StrategyExhausted(format!(
        "no element located for label text: '{label}'"
    )))
}

async fn label_tier_attempt(
    session: &dyn AutomationSession,
    tier: LabelTier,
    label: &str,
) -> Resolution {
    match tier {
        LabelTier::ForAttribute => {
            let label_element = match session.resolve(&label_probe(label)).await {
                Ok(Some(element)) => element,
                Ok(None) => return Resolution::NotFound,
                Err(e) => return Resolution::Failed(e),
            };
            let target_id = match label_element.attribute("for").await {
                Ok(Some(id)) if !id.is_empty() => id,
                Ok(_) => return Resolution::NotFound,
                Err(e) => return Resolution::Failed(e),
            };
            resolve_visible(session, &Strategy::Id(target_id)).await
        }
        LabelTier::FollowingInput => {
            resolve_visible(session, &label_following_input(label)).await
        }
        LabelTier::ContainerInput => {
            resolve_visible(session, &label_container_input(label)).await
        }
    }
}

/// Collapse internal whitespace and trim; the document side is normalized by
/// XPath's `normalize-space`
pub(crate) fn normalize_label(label: &str) -> String {
    label.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn label_probe(label: &str) -> Strategy {
    Strategy::XPath(format!(
        "//label[normalize-space(text())={}]",
        xpath_literal(label)
    ))
}

pub(crate) fn label_following_input(label: &str) -> Strategy {
    Strategy::XPath(format!(
        "//label[normalize-space(text())={}]/following::input[1]",
        xpath_literal(label)
    ))
}

pub(crate) fn label_container_input(label: &str) -> Strategy {
    Strategy::XPath(format!(
        "//label[normalize-space(text())={}]/..//input",
        xpath_literal(label)
    ))
}

// ---------------------------------------------------------------------------
// Fixed strategy ladders for the specialized finders

pub(crate) fn placeholder_strategies(placeholder: &str) -> Vec<Strategy> {
    let exact = xpath_literal(placeholder);
    vec![
        Strategy::XPath(format!("//input[@placeholder={exact}]")),
        Strategy::XPath(format!("//*[@placeholder={exact}]")),
        Strategy::Css(format!("input[placeholder*={}]", css_literal(placeholder))),
    ]
}

pub(crate) fn type_and_context_strategies(input_type: &str, context: &str) -> Vec<Strategy> {
    let ty = xpath_literal(input_type);
    let ctx = xpath_literal(context);
    vec![
        Strategy::XPath(format!(
            "//input[@type={ty} and contains(@placeholder, {ctx})]"
        )),
        Strategy::XPath(format!("//input[@type={ty} and contains(@name, {ctx})]")),
        Strategy::XPath(format!(
            "//label[contains(text(), {ctx})]/following::input[@type={ty}][1]"
        )),
    ]
}
