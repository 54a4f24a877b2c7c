//! Account session: login, logout and login-state checks.
//!
//! Login is a single form POST to the site root. Success is read from the
//! DLE session cookies first; when those are inconclusive the response body
//! is checked for a logout link or for the account name in the login box.

use serde::Serialize;

use crate::parse::Document;
use crate::{Result, SourceError};

#[cfg(feature = "fetch")]
use std::sync::Arc;

#[cfg(feature = "fetch")]
use crate::fetch::HttpClient;

pub const LOGIN_PATH: &str = "/";
pub const LOGOUT_PATH: &str = "/index.php?action=logout";
pub const REGISTER_PATH: &str = "/index.php?do=register";

/// Cookie holding the numeric user id; `0` means anonymous.
pub const USER_ID_COOKIE: &str = "dle_user_id";
/// Cookie holding the session password hash.
pub const PASSWORD_COOKIE: &str = "dle_password";

const LOGOUT_LINK: &str = r#"a[href*="action=logout"]"#;
const LOGIN_TITLE: &str = ".login__title";

/// How a successful login was confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LoginOutcome {
    /// Session cookies carry a valid user id.
    Cookies,
    /// The response page offers a logout link.
    LogoutLink,
    /// The login box shows the account name.
    AccountName,
}

impl LoginOutcome {
    pub fn message(self) -> &'static str {
        match self {
            Self::Cookies => "Logged in (session cookies set with a valid user id)",
            Self::LogoutLink => "Logged in (logout link found in response)",
            Self::AccountName => "Logged in (account name found in response)",
        }
    }
}

/// Decides whether a login response represents a logged-in session.
///
/// `cookies` holds `(name, value)` pairs, response cookies first.
///
/// # Errors
///
/// Returns [`SourceError::LoginFailed`] with the status and a body excerpt
/// when nothing confirms the login.
pub fn evaluate_login(status: u16, cookies: &[(String, String)], body: &str, account: &str) -> Result<LoginOutcome> {
    if (200..300).contains(&status) {
        let lookup = |name: &str| cookies.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str());

        if lookup(PASSWORD_COOKIE).is_some() && lookup(USER_ID_COOKIE).is_some_and(is_valid_user_id) {
            return Ok(LoginOutcome::Cookies);
        }

        let doc = Document::parse(body);
        if doc.exists(LOGOUT_LINK)? {
            return Ok(LoginOutcome::LogoutLink);
        }
        let account = account.trim();
        if !account.is_empty()
            && doc
                .select(LOGIN_TITLE)?
                .iter()
                .any(|title| title.text().contains(account))
        {
            return Ok(LoginOutcome::AccountName);
        }
    }

    Err(SourceError::login_failed(status, body))
}

/// A user id cookie value that identifies a real account.
pub fn is_valid_user_id(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value != "0"
}

/// `name=value` pair at the start of a `Set-Cookie` header.
pub fn set_cookie_pair(header: &str) -> Option<(String, String)> {
    let first = header.split(';').next()?;
    let (name, value) = first.split_once('=')?;
    Some((name.trim().to_string(), value.trim().to_string()))
}

/// Login, logout and session state for one [`HttpClient`].
#[cfg(feature = "fetch")]
#[derive(Debug, Clone)]
pub struct SessionManager {
    http: Arc<HttpClient>,
}

#[cfg(feature = "fetch")]
impl SessionManager {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Logs in with account name and password.
    ///
    /// Session cookies from an earlier login are dropped before the request,
    /// so only this response can confirm the login.
    pub async fn login(&self, account: &str, password: &str) -> Result<LoginOutcome> {
        self.http.expire_cookies(&[USER_ID_COOKIE, PASSWORD_COOKIE]);

        let form = [("login_name", account), ("login_password", password), ("login", "submit")];
        let page = self.http.post_form(LOGIN_PATH, &form).await?;

        let mut cookies: Vec<(String, String)> = page.set_cookies.iter().filter_map(|h| set_cookie_pair(h)).collect();
        if let Some(stored) = self.http.cookie_header() {
            cookies.extend(stored.split(';').filter_map(set_cookie_pair));
        }

        let outcome = evaluate_login(page.status, &cookies, &page.body, account);
        match &outcome {
            Ok(how) => tracing::info!(?how, "login succeeded"),
            Err(e) => tracing::warn!(error = %e, "login failed"),
        }
        outcome
    }

    /// Logs out on the site and drops every cookie stored for it.
    ///
    /// Cookies are cleared even when the logout request fails.
    pub async fn logout(&self) -> Result<()> {
        let result = self.http.get(LOGOUT_PATH).await;
        self.http.clear_cookies();

        let page = result?;
        if !page.is_success() {
            tracing::warn!(status = page.status, "logout request returned a non-success status");
        }
        Ok(())
    }

    /// True when the cookie jar holds a valid user id.
    pub fn is_logged_in(&self) -> bool {
        self.http.stored_cookie(USER_ID_COOKIE).is_some_and(|id| is_valid_user_id(&id))
    }

    /// Registration page for new accounts.
    pub fn register_url(&self) -> Result<String> {
        Ok(self.http.url(REGISTER_PATH)?.to_string())
    }
}
