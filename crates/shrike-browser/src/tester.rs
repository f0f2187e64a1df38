use crate::console::ConsoleObserver;
use crate::session::BrowserSession;
use crate::{Error, Result};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::{Page, ScreenshotParams};
use chrono::Utc;
use shrike_core::config::validate_target_url;
use shrike_core::{
    ElementSummary, LinkSample, LoadWaitPolicy, SmokeConfig, SmokeReport, Viewport,
    selector_groups,
};
use std::path::PathBuf;
use std::time::Duration;

const DESKTOP_SCREENSHOT: &str = "01_homepage.png";
const MOBILE_SCREENSHOT: &str = "02_mobile_view.png";
const READY_STATE_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Runs one deterministic, non-destructive inspection checklist against a
/// single page and returns a [`SmokeReport`].
///
/// Each `run` owns exactly one browser session and one page; the session
/// is released on every exit path, including navigation timeouts and
/// screenshot write failures.
pub struct SmokeTester {
    config: SmokeConfig,
}

impl SmokeTester {
    pub fn new(config: SmokeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SmokeConfig {
        &self.config
    }

    /// Execute the checklist against `target_url`.
    ///
    /// Fatal errors: Chrome failed to start, the page did not reach the
    /// required load state within the navigation timeout, or a screenshot
    /// could not be written. Console errors emitted by the page are report
    /// data, never harness failures.
    pub async fn run(&self, target_url: &str) -> Result<SmokeReport> {
        let url = validate_target_url(target_url)?;

        std::fs::create_dir_all(&self.config.screenshot_dir)?;

        let started_at = Utc::now();
        tracing::info!("Starting smoke test against {}", url);

        let session =
            BrowserSession::launch(self.config.chrome_path.clone(), self.config.desktop_viewport)
                .await?;

        // Scoped release: the session closes whether the checklist
        // succeeded or not, before any error propagates.
        let outcome = self.checklist(&session, url.as_str(), started_at).await;
        let close_outcome = session.close().await;

        let mut report = outcome?;
        close_outcome?;

        report.finished_at = Utc::now();
        tracing::info!(
            "Smoke test finished: {} console messages, {} errors",
            report.console_messages.len(),
            report.error_count
        );
        Ok(report)
    }

    async fn checklist(
        &self,
        session: &BrowserSession,
        url: &str,
        started_at: chrono::DateTime<Utc>,
    ) -> Result<SmokeReport> {
        let page = session.new_page().await?;

        // The observer must be attached before navigation so messages from
        // early page scripts are not lost.
        let observer = ConsoleObserver::attach(&page).await?;

        set_viewport(&page, self.config.desktop_viewport, false).await?;

        tracing::info!("Navigating to {}", url);
        self.navigate(&page, url).await?;

        tracing::info!("Capturing desktop screenshot");
        let desktop_shot = self
            .capture_screenshot(&page, DESKTOP_SCREENSHOT)
            .await?;

        let title = page.get_title().await?.unwrap_or_default();
        tracing::debug!("Page title: {:?}", title);

        tracing::info!("Counting elements");
        let element_summaries = count_elements(&page).await?;

        let links = element_summaries
            .iter()
            .find(|s| s.group == "links")
            .map(|s| s.count)
            .unwrap_or(0);
        let first_link = if links > 0 {
            sample_first_link(&page).await?
        } else {
            None
        };

        tracing::info!(
            "Capturing mobile screenshot at {}",
            self.config.mobile_viewport
        );
        set_viewport(&page, self.config.mobile_viewport, true).await?;
        tokio::time::sleep(self.config.settle_delay).await;
        let mobile_shot = self.capture_screenshot(&page, MOBILE_SCREENSHOT).await?;

        // Restore the desktop viewport so the session exits in the same
        // state it started in.
        set_viewport(&page, self.config.desktop_viewport, false).await?;

        let console_messages = observer.finish();
        let error_count = console_messages.iter().filter(|m| m.level.is_error()).count();

        Ok(SmokeReport {
            target_url: url.to_string(),
            title,
            element_summaries,
            first_link,
            console_messages,
            error_count,
            screenshot_paths: vec![desktop_shot, mobile_shot],
            started_at,
            finished_at: started_at,
        })
    }

    /// Navigate and wait per the configured load-wait policy, bounded by
    /// the navigation timeout.
    async fn navigate(&self, page: &Page, url: &str) -> Result<()> {
        let timeout = self.config.navigation_timeout;

        let navigation = async {
            page.goto(url).await.map_err(|e| Error::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

            match self.config.load_wait {
                LoadWaitPolicy::NetworkIdle => {
                    page.wait_for_navigation().await.map_err(|e| Error::Navigation {
                        url: url.to_string(),
                        reason: e.to_string(),
                    })?;
                    wait_for_ready_state(page, &["complete"]).await
                }
                LoadWaitPolicy::DomReady => {
                    wait_for_ready_state(page, &["interactive", "complete"]).await
                }
                LoadWaitPolicy::FixedDelay(delay) => {
                    tokio::time::sleep(delay).await;
                    Ok(())
                }
            }
        };

        match tokio::time::timeout(timeout, navigation).await {
            Ok(result) => result,
            Err(_) => Err(Error::Navigation {
                url: url.to_string(),
                reason: format!(
                    "did not reach required load state within {:?}",
                    timeout
                ),
            }),
        }
    }

    async fn capture_screenshot(&self, page: &Page, file_name: &str) -> Result<PathBuf> {
        let path = self.config.screenshot_dir.join(file_name);

        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(true)
            .build();
        let bytes = page.screenshot(params).await?;

        std::fs::write(&path, &bytes)?;
        tracing::debug!("Screenshot written: {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}

/// Apply a device-metrics override. `mobile` enables Chrome's mobile
/// emulation for the smaller viewport.
async fn set_viewport(page: &Page, viewport: Viewport, mobile: bool) -> Result<()> {
    let params = SetDeviceMetricsOverrideParams::builder()
        .width(i64::from(viewport.width))
        .height(i64::from(viewport.height))
        .device_scale_factor(1.0)
        .mobile(mobile)
        .build()
        .map_err(|e| Error::Cdp(format!("failed to build viewport params: {}", e)))?;

    page.execute(params).await?;
    Ok(())
}

/// Poll `document.readyState` until it reaches one of the accepted states.
/// Callers bound this loop with the navigation timeout.
async fn wait_for_ready_state(page: &Page, accepted: &[&str]) -> Result<()> {
    loop {
        let result = page
            .evaluate("document.readyState")
            .await
            .map_err(|e| Error::Cdp(e.to_string()))?;

        let state = result
            .value()
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();

        if accepted.contains(&state.as_str()) {
            return Ok(());
        }

        tokio::time::sleep(READY_STATE_POLL_INTERVAL).await;
    }
}

/// Count every selector group in the fixed checklist order. Queries never
/// fail on a well-formed page; an empty page yields zero counts.
async fn count_elements(page: &Page) -> Result<Vec<ElementSummary>> {
    let mut summaries = Vec::with_capacity(selector_groups().len());

    for group in selector_groups() {
        // JSON-encode the selector so it lands in the script as a safe
        // string literal.
        let escaped = serde_json::to_string(group.selector)
            .map_err(|e| Error::Cdp(e.to_string()))?;
        let script = format!("document.querySelectorAll({}).length", escaped);

        let count: u64 = page
            .evaluate(script.as_str())
            .await
            .map_err(|e| Error::Cdp(e.to_string()))?
            .into_value()
            .map_err(|e| Error::Cdp(e.to_string()))?;

        tracing::debug!("Selector group '{}': {} elements", group.name, count);
        summaries.push(ElementSummary {
            group: group.name.to_string(),
            count: count as usize,
        });
    }

    Ok(summaries)
}

/// Sample the first link's text and href. A missing href attribute is a
/// value, not an error.
async fn sample_first_link(page: &Page) -> Result<Option<LinkSample>> {
    let script = r#"
        (() => {
            const a = document.querySelector("a");
            if (!a) return null;
            return {
                text: (a.textContent || "").trim(),
                href: a.getAttribute("href"),
            };
        })()
    "#;

    let sample: Option<LinkSample> = page
        .evaluate(script)
        .await
        .map_err(|e| Error::Cdp(e.to_string()))?
        .into_value()
        .map_err(|e| Error::Cdp(e.to_string()))?;

    Ok(sample)
}

/// The two artifact file names, exposed for report consumers and tests.
pub fn screenshot_file_names() -> [&'static str; 2] {
    [DESKTOP_SCREENSHOT, MOBILE_SCREENSHOT]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screenshot_names_are_ordinal_sorted() {
        let [desktop, mobile] = screenshot_file_names();
        assert!(desktop < mobile);
        assert!(desktop.ends_with(".png"));
        assert!(mobile.ends_with(".png"));
    }

    #[tokio::test]
    async fn test_run_rejects_empty_url() {
        let tester = SmokeTester::new(SmokeConfig::default());
        let err = tester.run("").await.unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[tokio::test]
    async fn test_run_rejects_unparseable_url() {
        let tester = SmokeTester::new(SmokeConfig::default());
        assert!(tester.run("not a url at all").await.is_err());
    }

    // Full checklist runs require Chrome; see tests/live_chrome.rs.
}
