//! Record extraction from a static HTML snapshot.
//!
//! Four independent per-field queries over one parsed document, zipped by
//! position into records. Alignment holds only when the markup yields exactly
//! one element per field per comment, in document order; a count mismatch is
//! warned about and truncated to the shortest field, never silently repaired.

use crate::config::{compound_class_selector, ConfigError, ScrapeConfig};
use crate::linkedin;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::{info, warn};
use url::Url;

/// Marker span that carries the literal display name inside a name element,
/// distinguishing it from decorative/duplicate text nodes.
static HIDDEN_NAME: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"span[aria-hidden="true"]"#).expect("static hidden-name selector")
});

/// One extracted comment: author, their headline, their profile, the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRecord {
    pub name: String,
    pub position: String,
    pub profile_url: String,
    pub comment: String,
}

/// The four independently-queried field sequences. Empty sequences are valid
/// ("no matches"), not an error.
#[derive(Debug, Default)]
pub struct CommentFields {
    pub names: Vec<String>,
    pub positions: Vec<String>,
    pub profile_urls: Vec<String>,
    pub comments: Vec<String>,
}

impl CommentFields {
    /// Zip the field sequences by position. Truncates to the shortest
    /// sequence; unequal counts mean some records would pair fields from
    /// different comment nodes, so the mismatch is logged before zipping.
    pub fn into_records(self) -> Vec<CommentRecord> {
        let counts = [
            self.names.len(),
            self.positions.len(),
            self.profile_urls.len(),
            self.comments.len(),
        ];
        if counts.iter().any(|&c| c != counts[0]) {
            warn!(
                names = counts[0],
                positions = counts[1],
                urls = counts[2],
                comments = counts[3],
                "field counts differ; records truncated to the shortest field"
            );
        }

        self.names
            .into_iter()
            .zip(self.positions)
            .zip(self.profile_urls)
            .zip(self.comments)
            .map(|(((name, position), profile_url), comment)| CommentRecord {
                name,
                position,
                profile_url,
                comment,
            })
            .collect()
    }
}

/// Run the four field queries against `html`.
///
/// The class strings are sanity-checked at startup; the error path here only
/// fires for library callers that skip [`ScrapeConfig::from_value`].
pub fn extract_comment_fields(
    html: &str,
    config: &ScrapeConfig,
) -> Result<CommentFields, ConfigError> {
    let document = Html::parse_document(html);

    // Names: only elements wrapping a hidden-marker span count, and the
    // record text is that span's, not the wrapper's.
    let name_selector = field_selector("span", "name_class", &config.name_class)?;
    let names = document
        .select(&name_selector)
        .filter_map(|element| element.select(&HIDDEN_NAME).next())
        .map(|hidden| collect_text(&hidden))
        .collect();

    let position_selector = field_selector("span", "position_class", &config.position_class)?;
    let positions = document
        .select(&position_selector)
        .map(|element| collect_text(&element))
        .collect();

    let url_selector = field_selector("a", "linkedin_url_class", &config.linkedin_url_class)?;
    let base = Url::parse(linkedin::BASE_ORIGIN).expect("static base origin");
    let profile_urls = document
        .select(&url_selector)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| {
            base.join(href)
                .map(|resolved| resolved.to_string())
                .unwrap_or_else(|_| href.to_string())
        })
        .collect();

    let comment_selector = field_selector("span", "comment_class", &config.comment_class)?;
    let comments = document
        .select(&comment_selector)
        .map(|element| collect_text(&element))
        .collect();

    info!("data extraction completed");
    Ok(CommentFields {
        names,
        positions,
        profile_urls,
        comments,
    })
}

fn field_selector(
    tag: &str,
    key: &'static str,
    classes: &str,
) -> Result<Selector, ConfigError> {
    Selector::parse(&compound_class_selector(tag, classes)).map_err(|_| {
        ConfigError::BadSelector {
            key,
            value: classes.to_string(),
        }
    })
}

fn collect_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}
