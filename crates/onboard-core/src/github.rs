//! Minimal GitHub REST client for the batch processor.
//!
//! Auth travels in the `Authorization` header, never in URLs or argv.
//! Requests retry up to three times with exponential backoff; a 403 carrying
//! a rate-limit message sleeps until the advertised reset before retrying.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use reqwest::blocking::{Client, Response};
use reqwest::Method;

use crate::credential::Credential;
use crate::error::{OnboardError, Result};

pub const GITHUB_API_URL: &str = "https://api.github.com";

const MAX_RETRIES: u32 = 3;
const USER_AGENT: &str = "onboard";

pub struct GithubClient {
    http: Client,
    base_url: String,
    credential: Credential,
}

impl GithubClient {
    pub fn new(credential: Credential) -> Self {
        Self::with_base_url(credential, GITHUB_API_URL)
    }

    /// Point the client at a different API root (used by tests).
    pub fn with_base_url(credential: Credential, base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            credential,
        }
    }

    /// Look up a user id by username or email.
    ///
    /// Emails go through the search API; when the search comes back empty the
    /// part before the `@` is retried as a username.
    pub fn user_id(&self, identifier: &str) -> Result<u64> {
        if identifier.contains('@') {
            let url = format!("{}/search/users?q={}", self.base_url, identifier);
            let body: serde_json::Value = self
                .request(Method::GET, &url, None)?
                .json()
                .map_err(|e| OnboardError::Api(e.to_string()))?;
            if let Some(id) = body
                .pointer("/items/0/id")
                .and_then(|id| id.as_u64())
            {
                return Ok(id);
            }
            let username = identifier.split('@').next().unwrap_or(identifier);
            tracing::warn!(identifier, username, "no user found by email; trying as username");
            self.user_id(username)
        } else {
            let url = format!("{}/users/{}", self.base_url, identifier);
            let body: serde_json::Value = self
                .request(Method::GET, &url, None)?
                .json()
                .map_err(|e| OnboardError::Api(e.to_string()))?;
            body.get("id")
                .and_then(|id| id.as_u64())
                .ok_or_else(|| OnboardError::Api(format!("no id in user response for '{identifier}'")))
        }
    }

    /// Invite a user to an organization. Only `admin` survives as-is; every
    /// other role becomes a plain `member` invitation.
    pub fn invite_to_org(&self, org: &str, invitee_id: u64, role: &str) -> Result<()> {
        let url = format!("{}/orgs/{}/invitations", self.base_url, org);
        let body = serde_json::json!({
            "invitee_id": invitee_id,
            "role": if role == "admin" { "admin" } else { "member" },
        });
        self.request(Method::POST, &url, Some(&body))?;
        Ok(())
    }

    /// Add a user as a repository collaborator with the given permission.
    pub fn add_repo_collaborator(
        &self,
        repo: &str,
        identifier: &str,
        permission: &str,
    ) -> Result<()> {
        let url = format!("{}/repos/{}/collaborators/{}", self.base_url, repo, identifier);
        let body = serde_json::json!({ "permission": permission });
        self.request(Method::PUT, &url, Some(&body))?;
        Ok(())
    }

    fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Response> {
        let mut last_error = String::new();
        for attempt in 0..MAX_RETRIES {
            let mut req = self
                .http
                .request(method.clone(), url)
                .header("Authorization", format!("token {}", self.credential.expose()))
                .header("Accept", "application/vnd.github.v3+json")
                .header("User-Agent", USER_AGENT);
            if let Some(json) = body {
                req = req.json(json);
            }

            match req.send() {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        return Ok(resp);
                    }
                    if status.as_u16() == 403 {
                        let reset = rate_limit_reset(&resp);
                        let text = resp.text().unwrap_or_default();
                        if text.to_lowercase().contains("rate limit") {
                            let sleep = reset_sleep(reset);
                            tracing::warn!(seconds = sleep.as_secs(), "rate limit hit; sleeping");
                            std::thread::sleep(sleep);
                            continue;
                        }
                        last_error = format!("{url}: HTTP 403: {text}");
                    } else {
                        last_error = format!("{url}: HTTP {status}");
                    }
                }
                Err(e) => {
                    last_error = format!("{url}: {e}");
                }
            }

            if attempt + 1 < MAX_RETRIES {
                tracing::warn!(
                    attempt = attempt + 1,
                    max = MAX_RETRIES,
                    error = %last_error,
                    "request failed; retrying"
                );
                std::thread::sleep(Duration::from_secs(1u64 << attempt));
            }
        }
        Err(OnboardError::Api(format!(
            "failed after {MAX_RETRIES} attempts: {last_error}"
        )))
    }
}

fn rate_limit_reset(resp: &Response) -> u64 {
    resp.headers()
        .get("X-RateLimit-Reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

fn reset_sleep(reset_epoch: u64) -> Duration {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    Duration::from_secs(reset_epoch.saturating_sub(now) + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(server: &mockito::ServerGuard) -> GithubClient {
        GithubClient::with_base_url(Credential::new("test-token"), server.url())
    }

    #[test]
    fn user_id_by_username() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/users/octocat")
            .match_header("authorization", "token test-token")
            .with_status(200)
            .with_body(r#"{"id": 583231, "login": "octocat"}"#)
            .create();
        let id = client(&server).user_id("octocat").unwrap();
        assert_eq!(id, 583231);
        mock.assert();
    }

    #[test]
    fn user_id_by_email_uses_search() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/search/users")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"items": [{"id": 42}]}"#)
            .create();
        let id = client(&server).user_id("octo@example.com").unwrap();
        assert_eq!(id, 42);
        mock.assert();
    }

    #[test]
    fn empty_email_search_falls_back_to_username() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/search/users")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"items": []}"#)
            .create();
        let user_mock = server
            .mock("GET", "/users/octo")
            .with_status(200)
            .with_body(r#"{"id": 7}"#)
            .create();
        let id = client(&server).user_id("octo@example.com").unwrap();
        assert_eq!(id, 7);
        user_mock.assert();
    }

    #[test]
    fn invite_to_org_posts_invitation() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/orgs/acme/invitations")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "invitee_id": 42,
                "role": "member",
            })))
            .with_status(201)
            .with_body("{}")
            .create();
        client(&server).invite_to_org("acme", 42, "pull").unwrap();
        mock.assert();
    }

    #[test]
    fn invite_to_org_keeps_admin_role() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/orgs/acme/invitations")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "invitee_id": 9,
                "role": "admin",
            })))
            .with_status(201)
            .with_body("{}")
            .create();
        client(&server).invite_to_org("acme", 9, "admin").unwrap();
        mock.assert();
    }

    #[test]
    fn add_repo_collaborator_puts_permission() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("PUT", "/repos/acme/widgets/collaborators/octocat")
            .match_body(mockito::Matcher::Json(
                serde_json::json!({"permission": "push"}),
            ))
            .with_status(201)
            .with_body("{}")
            .create();
        client(&server)
            .add_repo_collaborator("acme/widgets", "octocat", "push")
            .unwrap();
        mock.assert();
    }

    #[test]
    fn server_error_retries_then_fails() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/users/flaky")
            .with_status(500)
            .expect(3)
            .create();
        let result = client(&server).user_id("flaky");
        assert!(matches!(result, Err(OnboardError::Api(_))));
        mock.assert();
    }
}
