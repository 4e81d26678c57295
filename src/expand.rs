//! Expansion driver: exhaust a "load more" control on a live page.
//!
//! LinkedIn lazily injects comment batches and re-renders the control after
//! each click, so the control is re-located on every iteration — element
//! references are never cached across clicks.

use crate::browser::PostPage;
use crate::config::compound_class_selector;
use std::time::Duration;
use tracing::{debug, info};

/// Timing knobs for the expansion loop. These are policy, not correctness:
/// `wait` must be long enough to tell a slow batch from a truly exhausted
/// thread. Tests inject zero durations.
#[derive(Debug, Clone)]
pub struct ExpandPolicy {
    /// Bounded wait for the control to (re)appear and become clickable.
    pub wait: Duration,
    /// Pause after each click while the new batch is injected.
    pub settle: Duration,
}

impl Default for ExpandPolicy {
    fn default() -> Self {
        Self {
            wait: Duration::from_secs(10),
            settle: Duration::from_secs(2),
        }
    }
}

/// How an expansion loop ended.
#[derive(Debug)]
pub enum ExpansionEnd {
    /// The control disappeared: every batch is loaded. Normal termination,
    /// including the zero-click case where the control never appeared.
    Exhausted,
    /// A page operation failed mid-loop. The clicks already performed have
    /// loaded real content, so the caller proceeds to extraction anyway.
    Faulted(anyhow::Error),
}

/// Outcome of [`load_all`].
#[derive(Debug)]
pub struct ExpansionReport {
    /// Number of successful activations.
    pub clicks: u32,
    pub end: ExpansionEnd,
}

impl ExpansionReport {
    pub fn is_exhausted(&self) -> bool {
        matches!(self.end, ExpansionEnd::Exhausted)
    }
}

/// Click the affordance with class `affordance_class` until it stops coming
/// back. `label` is only used in log lines ("comments", "hidden replies").
///
/// There is no iteration ceiling; the loop ends when the bounded re-location
/// wait reports the control gone, or a page operation faults.
pub async fn load_all(
    page: &dyn PostPage,
    label: &str,
    affordance_class: &str,
    policy: &ExpandPolicy,
) -> ExpansionReport {
    info!("attempting to load more {label}");
    let css = compound_class_selector("", affordance_class);
    let mut clicks = 0u32;

    match page.wait_clickable(&css, policy.wait).await {
        Ok(true) => {}
        Ok(false) => {
            info!("all {label} are loaded ({clicks} clicks)");
            return ExpansionReport {
                clicks,
                end: ExpansionEnd::Exhausted,
            };
        }
        Err(e) => {
            return ExpansionReport {
                clicks,
                end: ExpansionEnd::Faulted(e),
            }
        }
    }

    loop {
        if let Err(e) = page.activate(&css).await {
            return ExpansionReport {
                clicks,
                end: ExpansionEnd::Faulted(e),
            };
        }
        clicks += 1;
        debug!("loading more {label}... ({clicks} so far)");
        tokio::time::sleep(policy.settle).await;

        match page.wait_clickable(&css, policy.wait).await {
            Ok(true) => continue,
            Ok(false) => {
                info!("all {label} are loaded ({clicks} clicks)");
                return ExpansionReport {
                    clicks,
                    end: ExpansionEnd::Exhausted,
                };
            }
            Err(e) => {
                return ExpansionReport {
                    clicks,
                    end: ExpansionEnd::Faulted(e),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// A page whose affordance survives a fixed number of activations.
    struct FakePage {
        remaining: Mutex<u32>,
        fail_on_click: Option<u32>,
        clicks: Mutex<u32>,
    }

    impl FakePage {
        fn with_batches(remaining: u32) -> Self {
            Self {
                remaining: Mutex::new(remaining),
                fail_on_click: None,
                clicks: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl PostPage for FakePage {
        async fn goto(&self, _url: &str, _timeout: Duration) -> Result<()> {
            Ok(())
        }

        async fn wait_clickable(&self, _css: &str, _timeout: Duration) -> Result<bool> {
            Ok(*self.remaining.lock().unwrap() > 0)
        }

        async fn activate(&self, _css: &str) -> Result<()> {
            let clicks = *self.clicks.lock().unwrap();
            if self.fail_on_click == Some(clicks + 1) {
                return Err(anyhow!("node detached during click"));
            }
            *self.remaining.lock().unwrap() -= 1;
            *self.clicks.lock().unwrap() += 1;
            Ok(())
        }

        async fn type_into(&self, _css: &str, _text: &str) -> Result<()> {
            Ok(())
        }

        async fn page_html(&self) -> Result<String> {
            Ok(String::new())
        }

        async fn close(self: Box<Self>) -> Result<()> {
            Ok(())
        }
    }

    fn fast() -> ExpandPolicy {
        ExpandPolicy {
            wait: Duration::ZERO,
            settle: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn clicks_exactly_k_times_then_exhausts() {
        for k in [0u32, 1, 3, 7] {
            let page = FakePage::with_batches(k);
            let report = load_all(&page, "comments", "load-more", &fast()).await;
            assert_eq!(report.clicks, k, "k = {k}");
            assert!(report.is_exhausted(), "k = {k}");
            assert_eq!(*page.clicks.lock().unwrap(), k);
        }
    }

    #[tokio::test]
    async fn absent_control_is_normal_termination() {
        let page = FakePage::with_batches(0);
        let report = load_all(&page, "hidden replies", "show-prev", &fast()).await;
        assert_eq!(report.clicks, 0);
        assert!(report.is_exhausted());
    }

    #[tokio::test]
    async fn click_failure_is_reported_with_prior_count() {
        let page = FakePage {
            remaining: Mutex::new(5),
            fail_on_click: Some(3),
            clicks: Mutex::new(0),
        };
        let report = load_all(&page, "comments", "load-more", &fast()).await;
        assert_eq!(report.clicks, 2);
        assert!(matches!(report.end, ExpansionEnd::Faulted(_)));
    }
}
