//! Chromium-backed implementation of the browser traits, via chromiumoxide.

use super::{BrowserEngine, PostPage};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// How often `wait_clickable` re-checks for the target element.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Find the Chromium binary path.
pub fn find_chromium() -> Option<PathBuf> {
    // 1. POSTCOMB_CHROME env
    if let Ok(p) = std::env::var("POSTCOMB_CHROME") {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. System PATH
    if let Ok(path) = which::which("google-chrome") {
        return Some(path);
    }
    if let Ok(path) = which::which("chromium") {
        return Some(path);
    }
    if let Ok(path) = which::which("chromium-browser") {
        return Some(path);
    }

    // 3. Common macOS location
    if cfg!(target_os = "macos") {
        let common =
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// Chromium engine owning the browser process for the run.
pub struct ChromiumEngine {
    browser: Browser,
}

impl ChromiumEngine {
    /// Launch a Chromium instance. Headless by default; `headed` opens a
    /// visible window (useful when LinkedIn asks for a manual challenge).
    pub async fn launch(headed: bool) -> Result<Self> {
        let chrome_path = find_chromium()
            .context("Chromium not found. Install Chrome or set POSTCOMB_CHROME.")?;

        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .window_size(1920, 1080)
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking");
        builder = if headed {
            builder.with_head()
        } else {
            builder.arg("--headless=new")
        };
        let config = builder
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build browser config: {e}"))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("failed to launch Chromium")?;

        // Drive the CDP event stream for the browser's lifetime.
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        Ok(Self { browser })
    }
}

#[async_trait]
impl BrowserEngine for ChromiumEngine {
    async fn open_page(&self) -> Result<Box<dyn PostPage>> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .context("failed to create new page")?;
        Ok(Box::new(ChromiumPage { page }))
    }

    async fn shutdown(&self) -> Result<()> {
        // Browser process goes down when ChromiumEngine is dropped
        Ok(())
    }
}

/// A single Chromium page.
pub struct ChromiumPage {
    page: Page,
}

#[async_trait]
impl PostPage for ChromiumPage {
    async fn goto(&self, url: &str, timeout: Duration) -> Result<()> {
        let result = tokio::time::timeout(timeout, self.page.goto(url)).await;
        match result {
            Ok(Ok(_)) => {
                let _ = self.page.wait_for_navigation().await;
                Ok(())
            }
            Ok(Err(e)) => bail!("navigation to {url} failed: {e}"),
            Err(_) => bail!("navigation to {url} timed out after {}ms", timeout.as_millis()),
        }
    }

    async fn wait_clickable(&self, css: &str, timeout: Duration) -> Result<bool> {
        let deadline = Instant::now() + timeout;
        loop {
            // find_element errors when nothing matches; that is the condition
            // we are polling for, not a fault.
            if let Ok(element) = self.page.find_element(css).await {
                if element.clickable_point().await.is_ok() {
                    return Ok(true);
                }
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn activate(&self, css: &str) -> Result<()> {
        let element = self
            .page
            .find_element(css)
            .await
            .with_context(|| format!("element {css} not found"))?;
        element
            .scroll_into_view()
            .await
            .with_context(|| format!("failed to scroll {css} into view"))?;
        // hover + click dispatch real CDP input events; LinkedIn's handlers
        // need the pointer move, a synthetic DOM click is ignored.
        element
            .hover()
            .await
            .with_context(|| format!("failed to move pointer to {css}"))?;
        element
            .click()
            .await
            .with_context(|| format!("failed to click {css}"))?;
        Ok(())
    }

    async fn type_into(&self, css: &str, text: &str) -> Result<()> {
        let element = self
            .page
            .find_element(css)
            .await
            .with_context(|| format!("element {css} not found"))?;
        element
            .click()
            .await
            .with_context(|| format!("failed to focus {css}"))?;
        element
            .type_str(text)
            .await
            .with_context(|| format!("failed to type into {css}"))?;
        Ok(())
    }

    async fn page_html(&self) -> Result<String> {
        let result = self
            .page
            .evaluate("document.documentElement.outerHTML")
            .await
            .context("failed to get HTML")?;
        let html: String = result
            .into_value()
            .map_err(|e| anyhow::anyhow!("failed to convert HTML result: {e:?}"))?;
        Ok(html)
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let _ = self.page.close().await;
        Ok(())
    }
}
