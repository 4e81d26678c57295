//! Browser abstraction for the scraping session.
//!
//! Defines the `BrowserEngine` and `PostPage` traits that abstract over the
//! browser (Chromium via chromiumoxide). The pipeline only ever talks to
//! these traits, so tests drive it with scripted fakes.

pub mod chromium;

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Timeout for full page navigations.
pub const NAV_TIMEOUT: Duration = Duration::from_secs(30);

/// A browser engine that can open pages.
#[async_trait]
pub trait BrowserEngine: Send + Sync {
    /// Open a new page (tab).
    async fn open_page(&self) -> Result<Box<dyn PostPage>>;
    /// Shut down the browser engine.
    async fn shutdown(&self) -> Result<()>;
}

/// A single live page. Mutated only by navigation and the interactions below;
/// the extractor never touches it, it works from a `page_html` snapshot.
#[async_trait]
pub trait PostPage: Send + Sync {
    /// Navigate to a URL and wait for the load, up to `timeout`.
    async fn goto(&self, url: &str, timeout: Duration) -> Result<()>;

    /// Wait up to `timeout` for an element matching `css` to be present and
    /// clickable. `Ok(false)` means the wait expired with no such element —
    /// the normal exhaustion signal, not an error.
    async fn wait_clickable(&self, css: &str, timeout: Duration) -> Result<bool>;

    /// Activate the element matching `css` with real pointer semantics
    /// (scroll into view, move the mouse over it, click). The element is
    /// looked up fresh; callers must not assume references survive a click.
    async fn activate(&self, css: &str) -> Result<()>;

    /// Focus the element matching `css` and type `text` into it.
    async fn type_into(&self, css: &str, text: &str) -> Result<()>;

    /// Snapshot the full rendered markup at this instant.
    async fn page_html(&self) -> Result<String>;

    /// Close this page.
    async fn close(self: Box<Self>) -> Result<()>;
}
