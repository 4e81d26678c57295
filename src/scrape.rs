//! Session orchestrator: validate, log in, navigate, expand, extract, write.
//!
//! The pipeline owns the page for the whole run; the page is closed on every
//! exit path and the completion line (elapsed seconds, record count) is
//! logged whether or not extraction ran.

use crate::auth::{self, Credentials, LoginPolicy};
use crate::browser::{BrowserEngine, PostPage, NAV_TIMEOUT};
use crate::config::ScrapeConfig;
use crate::expand::{self, ExpandPolicy, ExpansionEnd};
use crate::extract;
use crate::linkedin;
use crate::output;
use anyhow::{Context, Result};
use chrono::Local;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Per-run options from the command surface, plus injected timing policies.
#[derive(Debug, Clone, Default)]
pub struct ScrapeOptions {
    /// Also exhaust the "load previous replies" controls.
    pub show_replies: bool,
    /// Output file base name; overrides the configured, timestamped default.
    pub output: Option<String>,
    pub expand: ExpandPolicy,
    pub login: LoginPolicy,
}

/// What a run accomplished. Zero-valued fields mean the corresponding stage
/// never completed; the record count is set only by a finished extraction.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub records: usize,
    pub output_path: Option<PathBuf>,
    pub comment_clicks: u32,
    pub reply_clicks: u32,
    pub elapsed: Duration,
}

/// Scrape one post URL end to end.
///
/// The URL is validated before any session cost is incurred; an invalid URL
/// never opens a page. Pipeline errors after that are logged and folded into
/// the summary rather than propagated — cleanup and the completion log run on
/// every path. Configuration and credential errors belong to startup and
/// never reach this function.
pub async fn scrape_post(
    engine: &dyn BrowserEngine,
    config: &ScrapeConfig,
    credentials: &Credentials,
    url: &str,
    options: &ScrapeOptions,
) -> RunSummary {
    let mut summary = RunSummary::default();

    if !linkedin::is_post_url(url) {
        error!("invalid URL, expected a LinkedIn post URL: {url}");
        return summary;
    }
    info!("URL validated successfully: {url}");

    let started = Instant::now();
    let page = match engine.open_page().await {
        Ok(page) => page,
        Err(e) => {
            error!("failed to open a browser page: {e:#}");
            summary.elapsed = started.elapsed();
            return summary;
        }
    };

    if let Err(e) =
        run_pipeline(page.as_ref(), config, credentials, url, options, &mut summary).await
    {
        error!("scrape aborted: {e:#}");
    }

    if let Err(e) = page.close().await {
        debug!("page close failed: {e:#}");
    }

    summary.elapsed = started.elapsed();
    info!(
        "run complete. {} comments scraped in {} seconds",
        summary.records,
        summary.elapsed.as_secs()
    );
    summary
}

async fn run_pipeline(
    page: &dyn PostPage,
    config: &ScrapeConfig,
    credentials: &Credentials,
    url: &str,
    options: &ScrapeOptions,
    summary: &mut RunSummary,
) -> Result<()> {
    auth::login(page, credentials, &options.login).await?;

    page.goto(url, NAV_TIMEOUT)
        .await
        .context("failed to open the post")?;

    // Comments are always exhausted fully before replies are touched.
    let report = expand::load_all(page, "comments", &config.show_comments_class, &options.expand).await;
    summary.comment_clicks = report.clicks;
    if let ExpansionEnd::Faulted(e) = report.end {
        warn!("comment expansion stopped early: {e:#}");
    }

    if options.show_replies {
        let report =
            expand::load_all(page, "hidden replies", &config.show_replies_class, &options.expand)
                .await;
        summary.reply_clicks = report.clicks;
        if let ExpansionEnd::Faulted(e) = report.end {
            warn!("reply expansion stopped early: {e:#}");
        }
    }

    let html = page.page_html().await.context("failed to snapshot the page")?;

    // Parsing a fully-expanded thread is CPU-bound; keep it off the runtime.
    let extraction_config = config.clone();
    let fields = tokio::task::spawn_blocking(move || {
        extract::extract_comment_fields(&html, &extraction_config)
    })
    .await
    .context("extraction task panicked")??;
    let records = fields.into_records();

    let path = output::resolve_output_path(options.output.as_deref(), &config.filename, Local::now());
    output::write_csv(&path, &records)?;

    summary.records = records.len();
    summary.output_path = Some(path);
    Ok(())
}
