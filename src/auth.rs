//! Credentials from the environment and the LinkedIn login flow.

use crate::browser::{PostPage, NAV_TIMEOUT};
use crate::linkedin;
use anyhow::{Context, Result};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Environment variable holding the account email.
pub const EMAIL_VAR: &str = "LINKEDIN_EMAIL";
/// Environment variable holding the account password.
pub const PASSWORD_VAR: &str = "LINKEDIN_PASSWORD";

/// Submit button of the login form.
const SIGN_IN_BUTTON: &str = r#"#organic-div form button[type="submit"]"#;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("{0} not set in environment")]
    Missing(&'static str),
}

/// LinkedIn account credentials. Read once at startup, before any session.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Read both credentials from the process environment. An unset or empty
    /// variable is fatal.
    pub fn from_env() -> Result<Self, CredentialError> {
        let email = non_empty_var(EMAIL_VAR)?;
        let password = non_empty_var(PASSWORD_VAR)?;
        Ok(Self { email, password })
    }
}

fn non_empty_var(name: &'static str) -> Result<String, CredentialError> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(CredentialError::Missing(name))
}

/// Settle pauses around the login form. Injected so tests run without delays.
#[derive(Debug, Clone)]
pub struct LoginPolicy {
    /// Pause after the login page loads, before filling the form.
    pub form_settle: Duration,
    /// Pause after submitting, while the feed session is established.
    pub post_login_settle: Duration,
}

impl Default for LoginPolicy {
    fn default() -> Self {
        Self {
            form_settle: Duration::from_secs(1),
            post_login_settle: Duration::from_secs(3),
        }
    }
}

/// Log in to LinkedIn on `page`: navigate to the login form, fill both
/// fields, submit, and wait out the post-login settle.
pub async fn login(
    page: &dyn PostPage,
    credentials: &Credentials,
    policy: &LoginPolicy,
) -> Result<()> {
    info!("attempting to log in...");
    page.goto(linkedin::LOGIN_URL, NAV_TIMEOUT)
        .await
        .context("failed to open the login page")?;
    tokio::time::sleep(policy.form_settle).await;

    page.type_into("#username", &credentials.email)
        .await
        .context("failed to fill the email field")?;
    page.type_into("#password", &credentials.password)
        .await
        .context("failed to fill the password field")?;
    page.activate(SIGN_IN_BUTTON)
        .await
        .context("failed to click the sign-in button")?;

    tokio::time::sleep(policy.post_login_settle).await;
    info!("logged in successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingPage {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PostPage for RecordingPage {
        async fn goto(&self, url: &str, _timeout: Duration) -> Result<()> {
            self.calls.lock().unwrap().push(format!("goto {url}"));
            Ok(())
        }
        async fn wait_clickable(&self, _css: &str, _timeout: Duration) -> Result<bool> {
            Ok(false)
        }
        async fn activate(&self, css: &str) -> Result<()> {
            self.calls.lock().unwrap().push(format!("click {css}"));
            Ok(())
        }
        async fn type_into(&self, css: &str, text: &str) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("type {css}={text}"));
            Ok(())
        }
        async fn page_html(&self) -> Result<String> {
            Ok(String::new())
        }
        async fn close(self: Box<Self>) -> Result<()> {
            Ok(())
        }
    }

    fn instant() -> LoginPolicy {
        LoginPolicy {
            form_settle: Duration::ZERO,
            post_login_settle: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn login_fills_form_then_submits() {
        let page = RecordingPage::default();
        let credentials = Credentials {
            email: "me@example.com".into(),
            password: "hunter2".into(),
        };

        login(&page, &credentials, &instant()).await.unwrap();

        let calls = page.calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec![
                format!("goto {}", linkedin::LOGIN_URL),
                "type #username=me@example.com".to_string(),
                "type #password=hunter2".to_string(),
                format!("click {SIGN_IN_BUTTON}"),
            ]
        );
    }

    #[test]
    fn missing_credentials_name_the_variable() {
        // Env mutation: keep both cases in one test to avoid parallel races.
        std::env::remove_var(EMAIL_VAR);
        std::env::remove_var(PASSWORD_VAR);
        assert!(matches!(
            Credentials::from_env(),
            Err(CredentialError::Missing(EMAIL_VAR))
        ));

        std::env::set_var(EMAIL_VAR, "me@example.com");
        assert!(matches!(
            Credentials::from_env(),
            Err(CredentialError::Missing(PASSWORD_VAR))
        ));

        std::env::set_var(PASSWORD_VAR, "hunter2");
        let creds = Credentials::from_env().unwrap();
        assert_eq!(creds.email, "me@example.com");

        std::env::remove_var(EMAIL_VAR);
        std::env::remove_var(PASSWORD_VAR);
    }
}
