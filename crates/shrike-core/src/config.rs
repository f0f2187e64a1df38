use crate::error::{Error, Result};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Simulated browser window dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl FromStr for Viewport {
    type Err = Error;

    /// Parses "WIDTHxHEIGHT" strings, e.g. "1280x800".
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidViewport(s.to_string());

        let (width, height) = s.split_once('x').ok_or_else(invalid)?;
        let width: u32 = width.trim().parse().map_err(|_| invalid())?;
        let height: u32 = height.trim().parse().map_err(|_| invalid())?;

        if width == 0 || height == 0 {
            return Err(invalid());
        }

        Ok(Self { width, height })
    }
}

impl std::fmt::Display for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// How long to wait after navigation before inspecting the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadWaitPolicy {
    /// Wait for the navigation lifecycle to settle (load event fired and
    /// document.readyState == "complete").
    NetworkIdle,
    /// Wait until the DOM is parsed (readyState "interactive" or later).
    DomReady,
    /// Sleep for a fixed duration after the navigation request returns.
    FixedDelay(Duration),
}

impl FromStr for LoadWaitPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "networkidle" => Ok(LoadWaitPolicy::NetworkIdle),
            "domready" => Ok(LoadWaitPolicy::DomReady),
            other => {
                if let Some(ms) = other.strip_prefix("delay:") {
                    let ms: u64 = ms
                        .parse()
                        .map_err(|_| Error::InvalidWaitPolicy(s.to_string()))?;
                    Ok(LoadWaitPolicy::FixedDelay(Duration::from_millis(ms)))
                } else {
                    Err(Error::InvalidWaitPolicy(s.to_string()))
                }
            }
        }
    }
}

/// Configuration for one smoke-test run.
///
/// Defaults match the checklist the tool was built around: a desktop
/// viewport of 1280x800, a mobile viewport of 375x667, screenshots under
/// /tmp/webapp_test, and a 30 second navigation timeout.
#[derive(Debug, Clone)]
pub struct SmokeConfig {
    /// Directory screenshots are written to; created if absent, never
    /// deleted.
    pub screenshot_dir: PathBuf,
    pub desktop_viewport: Viewport,
    pub mobile_viewport: Viewport,
    pub load_wait: LoadWaitPolicy,
    /// Upper bound on reaching the required load state after navigation.
    pub navigation_timeout: Duration,
    /// Settle time after switching to the mobile viewport, before the
    /// second screenshot.
    pub settle_delay: Duration,
    /// Rendering limit for console messages; the report itself always
    /// carries the full sequence.
    pub max_console_reported: usize,
    /// Explicit Chrome binary path; auto-detected when unset.
    pub chrome_path: Option<PathBuf>,
}

impl SmokeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshot_dir = dir.into();
        self
    }

    pub fn with_desktop_viewport(mut self, viewport: Viewport) -> Self {
        self.desktop_viewport = viewport;
        self
    }

    pub fn with_mobile_viewport(mut self, viewport: Viewport) -> Self {
        self.mobile_viewport = viewport;
        self
    }

    pub fn with_load_wait(mut self, policy: LoadWaitPolicy) -> Self {
        self.load_wait = policy;
        self
    }

    pub fn with_navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn with_max_console_reported(mut self, max: usize) -> Self {
        self.max_console_reported = max;
        self
    }

    pub fn with_chrome_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_path = Some(path.into());
        self
    }
}

impl Default for SmokeConfig {
    fn default() -> Self {
        Self {
            screenshot_dir: PathBuf::from("/tmp/webapp_test"),
            desktop_viewport: Viewport::new(1280, 800),
            mobile_viewport: Viewport::new(375, 667),
            load_wait: LoadWaitPolicy::NetworkIdle,
            navigation_timeout: Duration::from_secs(30),
            settle_delay: Duration::from_millis(500),
            max_console_reported: 10,
            chrome_path: None,
        }
    }
}

/// Validates a target URL before any browser work starts. Only http and
/// https targets make sense for a page smoke test.
pub fn validate_target_url(target: &str) -> Result<url::Url> {
    if target.trim().is_empty() {
        return Err(Error::InvalidUrl {
            url: target.to_string(),
            reason: "URL is empty".to_string(),
        });
    }

    let parsed = url::Url::parse(target).map_err(|e| Error::InvalidUrl {
        url: target.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" | "file" => Ok(parsed),
        other => Err(Error::InvalidUrl {
            url: target.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}
