//! Site constants and the post-URL predicate.

use regex::Regex;
use std::sync::LazyLock;

/// Base origin that relative profile hrefs are resolved against.
pub const BASE_ORIGIN: &str = "https://www.linkedin.com/";

/// The login form page.
pub const LOGIN_URL: &str = "https://www.linkedin.com/login";

static POST_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://www\.linkedin\.com/posts/.+").expect("static post-url pattern")
});

/// Whether `candidate` structurally matches a LinkedIn post URL
/// (scheme + host + `/posts/` prefix + non-empty remainder).
pub fn is_post_url(candidate: &str) -> bool {
    POST_URL.is_match(candidate.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_post_urls() {
        assert!(is_post_url(
            "https://www.linkedin.com/posts/jane-doe_some-activity-7123456789"
        ));
        assert!(is_post_url("https://www.linkedin.com/posts/x"));
        // surrounding whitespace from interactive input is tolerated
        assert!(is_post_url("  https://www.linkedin.com/posts/x \n"));
    }

    #[test]
    fn rejects_non_post_urls() {
        assert!(!is_post_url(""));
        assert!(!is_post_url("https://www.linkedin.com/posts/"));
        assert!(!is_post_url("https://www.linkedin.com/feed/"));
        assert!(!is_post_url("http://www.linkedin.com/posts/x"));
        assert!(!is_post_url("https://linkedin.com/posts/x"));
        assert!(!is_post_url("https://example.com/posts/x"));
        assert!(!is_post_url("ftp://www.linkedin.com/posts/x"));
    }
}
