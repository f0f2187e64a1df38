use crate::profile::TempProfile;
use crate::{ChromeFinder, Error, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use shrike_core::Viewport;
use std::path::PathBuf;
use tokio::task::JoinHandle;

/// One headless Chrome process plus the task driving its CDP connection.
///
/// A session is exclusively owned by one smoke-test run. `close` must be
/// reachable on every exit path; if it is skipped (panic, early drop),
/// chromiumoxide's Drop still kills the Chrome process.
pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    // Held for its Drop: the profile directory outlives the Chrome process.
    _profile: TempProfile,
}

impl BrowserSession {
    /// Locate Chrome, launch it headless at the given window size, and
    /// start driving the CDP message loop.
    pub async fn launch(chrome_path: Option<PathBuf>, viewport: Viewport) -> Result<Self> {
        let chrome_binary = ChromeFinder::new(chrome_path).find()?;
        tracing::debug!("Using Chrome at: {}", chrome_binary.display());

        let profile = TempProfile::new()?;
        let config = build_config(&chrome_binary, profile.path(), viewport)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| Error::Launch(format!("failed to start Chrome: {}", e)))?;

        // Drive CDP protocol messages; required for every browser command.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    // Some CDP events are not fully parseable; keep going.
                    tracing::debug!("CDP handler event error (continuing): {}", e);
                }
            }
        });

        tracing::info!("Chrome launched ({})", chrome_binary.display());

        Ok(Self {
            browser,
            handler_task,
            _profile: profile,
        })
    }

    /// Open a blank page in this session.
    pub async fn new_page(&self) -> Result<Page> {
        let page = self.browser.new_page("about:blank").await?;
        Ok(page)
    }

    /// Close the browser and stop the CDP handler.
    pub async fn close(mut self) -> Result<()> {
        tracing::debug!("Closing browser session");
        let close_result = self.browser.close().await;
        self.handler_task.abort();
        close_result.map_err(|e| Error::Cdp(format!("failed to close browser: {}", e)))?;
        Ok(())
    }
}

fn build_config(
    chrome_binary: &std::path::Path,
    profile_dir: &std::path::Path,
    viewport: Viewport,
) -> Result<BrowserConfig> {
    BrowserConfig::builder()
        .chrome_executable(chrome_binary)
        .arg(format!("--window-size={},{}", viewport.width, viewport.height))
        .arg(format!("--user-data-dir={}", profile_dir.display()))
        // Required in containers where user namespaces are unavailable.
        .arg("--no-sandbox")
        // Prevents /dev/shm exhaustion in containerized environments.
        .arg("--disable-dev-shm-usage")
        .arg("--no-first-run")
        .arg("--no-default-browser-check")
        .build()
        .map_err(|e| Error::Launch(format!("invalid browser configuration: {}", e)))
}
