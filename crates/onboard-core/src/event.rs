use crate::error::{OnboardError, Result};
use serde::Deserialize;

/// The inbound comment event — one per run, read-only.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentEvent {
    pub body: String,
    /// Comment author login. Carried in the event envelope but unused by
    /// the pipeline logic itself.
    #[serde(default)]
    pub actor: Option<String>,
}

impl CommentEvent {
    pub fn new(body: impl Into<String>, actor: Option<String>) -> Self {
        Self {
            body: body.into(),
            actor,
        }
    }

    /// Parse a GitHub `issue_comment` webhook payload.
    ///
    /// Only `.comment.body` and `.comment.user.login` are read — the rest of
    /// the payload is ignored.
    pub fn from_issue_comment_json(raw: &str) -> Result<Self> {
        let payload: serde_json::Value = serde_json::from_str(raw)?;
        let body = payload
            .pointer("/comment/body")
            .and_then(|b| b.as_str())
            .ok_or_else(|| OnboardError::InvalidEvent("missing .comment.body".to_string()))?;
        let actor = payload
            .pointer("/comment/user/login")
            .and_then(|l| l.as_str())
            .map(|l| l.to_string());
        Ok(Self::new(body, actor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_issue_comment_payload() {
        let raw = r#"{
            "action": "created",
            "comment": {
                "body": "/onboard data.csv",
                "user": { "login": "octocat" }
            }
        }"#;
        let event = CommentEvent::from_issue_comment_json(raw).unwrap();
        assert_eq!(event.body, "/onboard data.csv");
        assert_eq!(event.actor.as_deref(), Some("octocat"));
    }

    #[test]
    fn missing_body_is_invalid() {
        let raw = r#"{"comment": {"user": {"login": "octocat"}}}"#;
        let result = CommentEvent::from_issue_comment_json(raw);
        assert!(matches!(result, Err(OnboardError::InvalidEvent(_))));
    }

    #[test]
    fn missing_actor_is_fine() {
        let raw = r#"{"comment": {"body": "hello"}}"#;
        let event = CommentEvent::from_issue_comment_json(raw).unwrap();
        assert_eq!(event.body, "hello");
        assert!(event.actor.is_none());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(CommentEvent::from_issue_comment_json("not json").is_err());
    }
}
