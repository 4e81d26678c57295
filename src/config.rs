//! Selector configuration: loading, required-key validation, selector sanity.

use scraper::Selector;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Every key the configuration file must supply. Missing-key errors list the
/// offending keys in this order.
pub const REQUIRED_KEYS: [&str; 7] = [
    "name_class",
    "position_class",
    "linkedin_url_class",
    "comment_class",
    "show_comments_class",
    "show_replies_class",
    "filename",
];

/// The field-to-selector mapping driving extraction and expansion.
///
/// Loaded once at startup and passed by reference everywhere; never mutated.
/// The `*_class` values are HTML class attribute strings (possibly
/// multi-class, space separated), not full CSS selectors.
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeConfig {
    /// Class of the span wrapping a commenter's display name.
    pub name_class: String,
    /// Class of the span holding a commenter's current position.
    pub position_class: String,
    /// Class of the anchor linking to a commenter's profile.
    pub linkedin_url_class: String,
    /// Class of the span holding the comment body.
    pub comment_class: String,
    /// Class of the "load more comments" control.
    pub show_comments_class: String,
    /// Class of the "load previous replies" control.
    pub show_replies_class: String,
    /// Base name for timestamp-derived output files.
    pub filename: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config file {path} is not valid JSON")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("missing configuration for keys: {}", .0.join(", "))]
    MissingKeys(Vec<String>),
    #[error("configuration field has the wrong type")]
    Invalid(#[source] serde_json::Error),
    #[error("configuration key {key} is not a usable CSS class: {value:?}")]
    BadSelector { key: &'static str, value: String },
}

impl ScrapeConfig {
    /// Read and validate the configuration file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let value: Value = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_value(value)
    }

    /// Validate a parsed JSON object: every required key present, every class
    /// string usable as a selector.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        let missing: Vec<String> = REQUIRED_KEYS
            .iter()
            .filter(|key| value.get(**key).is_none())
            .map(|key| key.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingKeys(missing));
        }

        let config: ScrapeConfig =
            serde_json::from_value(value).map_err(ConfigError::Invalid)?;
        config.validate_selectors()?;
        info!("configuration validated successfully");
        Ok(config)
    }

    fn validate_selectors(&self) -> Result<(), ConfigError> {
        let classes: [(&'static str, &str); 6] = [
            ("name_class", &self.name_class),
            ("position_class", &self.position_class),
            ("linkedin_url_class", &self.linkedin_url_class),
            ("comment_class", &self.comment_class),
            ("show_comments_class", &self.show_comments_class),
            ("show_replies_class", &self.show_replies_class),
        ];
        for (key, value) in classes {
            let css = compound_class_selector("span", value);
            if value.trim().is_empty() || Selector::parse(&css).is_err() {
                return Err(ConfigError::BadSelector {
                    key,
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Build a CSS selector matching `tag` elements that carry every class token
/// in `classes`. LinkedIn class attributes are often multi-valued, so
/// `"a b"` becomes `tag.a.b`.
pub fn compound_class_selector(tag: &str, classes: &str) -> String {
    let mut css = String::from(tag);
    for token in classes.split_whitespace() {
        css.push('.');
        css.push_str(token);
    }
    css
}

/// Resolve the configuration path: the given path if it exists, otherwise the
/// per-user fallback `<config dir>/postcomb/config.json` when that exists.
/// Falls through to the given path so the load error names what the user asked
/// for.
pub fn resolve_config_path(requested: &Path) -> PathBuf {
    if requested.exists() {
        return requested.to_path_buf();
    }
    if let Some(dir) = dirs::config_dir() {
        let fallback = dir.join("postcomb/config.json");
        if fallback.exists() {
            return fallback;
        }
    }
    requested.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_config() -> Value {
        json!({
            "name_class": "comments-post-meta__name-text",
            "position_class": "comments-post-meta__headline",
            "linkedin_url_class": "comments-post-meta__actor-link",
            "comment_class": "comments-comment-item__main-content",
            "show_comments_class": "comments-comments-list__load-more-comments-button",
            "show_replies_class": "show-prev-replies",
            "filename": "comments",
        })
    }

    #[test]
    fn accepts_complete_config() {
        let config = ScrapeConfig::from_value(full_config()).unwrap();
        assert_eq!(config.filename, "comments");
        assert_eq!(config.show_replies_class, "show-prev-replies");
    }

    #[test]
    fn lists_exactly_the_missing_keys() {
        let mut value = full_config();
        value.as_object_mut().unwrap().remove("position_class");
        value.as_object_mut().unwrap().remove("filename");

        let err = ScrapeConfig::from_value(value).unwrap_err();
        match err {
            ConfigError::MissingKeys(keys) => {
                assert_eq!(keys, vec!["position_class", "filename"]);
            }
            other => panic!("expected MissingKeys, got {other:?}"),
        }
    }

    #[test]
    fn empty_object_is_missing_everything() {
        let err = ScrapeConfig::from_value(json!({})).unwrap_err();
        match err {
            ConfigError::MissingKeys(keys) => assert_eq!(keys.len(), REQUIRED_KEYS.len()),
            other => panic!("expected MissingKeys, got {other:?}"),
        }
    }

    #[test]
    fn wrong_type_is_not_reported_as_missing() {
        let mut value = full_config();
        value["comment_class"] = json!(42);
        assert!(matches!(
            ScrapeConfig::from_value(value),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn unusable_class_is_a_bad_selector() {
        let mut value = full_config();
        value["name_class"] = json!("");
        assert!(matches!(
            ScrapeConfig::from_value(value),
            Err(ConfigError::BadSelector {
                key: "name_class",
                ..
            })
        ));
    }

    #[test]
    fn compound_selector_handles_multi_class_values() {
        assert_eq!(compound_class_selector("span", "a"), "span.a");
        assert_eq!(compound_class_selector("a", "x y"), "a.x.y");
        assert_eq!(compound_class_selector("", "btn"), ".btn");
    }

    #[test]
    fn load_reports_unreadable_file() {
        let err = ScrapeConfig::load(Path::new("/nonexistent/config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn load_reports_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = ScrapeConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
