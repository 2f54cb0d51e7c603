use serde::{Deserialize, Serialize};

use super::user::User;
use crate::error::ApiError;

/// Envelope every mutation endpoint answers with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl StatusResponse {
    pub const SUCCESS: &'static str = "success";

    pub fn success() -> Self {
        Self { status: Self::SUCCESS.into(), message: None }
    }

    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case(Self::SUCCESS)
    }

    /// Turn a non-success envelope into `ApiError::Rejected`.
    pub fn into_result(self) -> Result<Self, ApiError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiError::Rejected(self.message.unwrap_or_default()))
        }
    }
}

/// `login.php` answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

/// A reversible viewer action and its endpoint pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interaction {
    Like,
    Save,
    Follow,
    EventJoin,
}

impl Interaction {
    /// Endpoint for switching the action on (`active`) or off.
    pub fn endpoint(self, active: bool) -> &'static str {
        match (self, active) {
            (Interaction::Like, true) => "like_post.php",
            (Interaction::Like, false) => "unlike_post.php",
            (Interaction::Save, true) => "save_post.php",
            (Interaction::Save, false) => "unsave_post.php",
            (Interaction::Follow, true) => "follow_user.php",
            (Interaction::Follow, false) => "unfollow_user.php",
            (Interaction::EventJoin, true) => "join_event.php",
            (Interaction::EventJoin, false) => "leave_event.php",
        }
    }

    /// JSON body naming the actor and the target.
    pub fn body(self, actor_id: i64, target_id: i64) -> serde_json::Value {
        match self {
            Interaction::Like | Interaction::Save => {
                serde_json::json!({ "user_id": actor_id, "post_id": target_id })
            }
            Interaction::Follow => {
                serde_json::json!({ "follower_id": actor_id, "following_id": target_id })
            }
            Interaction::EventJoin => {
                serde_json::json!({ "user_id": actor_id, "event_id": target_id })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_is_case_insensitive() {
        let resp: StatusResponse = serde_json::from_str(r#"{"status":"Success"}"#).unwrap();
        assert!(resp.is_success());
        assert!(resp.into_result().is_ok());
    }

    #[test]
    fn error_status_becomes_rejected() {
        let resp: StatusResponse =
            serde_json::from_str(r#"{"status":"error","message":"Post not found"}"#).unwrap();
        match resp.into_result() {
            Err(ApiError::Rejected(msg)) => assert_eq!(msg, "Post not found"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn follow_body_uses_follower_fields() {
        let body = Interaction::Follow.body(3, 9);
        assert_eq!(body["follower_id"], 3);
        assert_eq!(body["following_id"], 9);
        assert_eq!(Interaction::Follow.endpoint(false), "unfollow_user.php");
    }

    #[test]
    fn event_join_body() {
        let body = Interaction::EventJoin.body(1, 40);
        assert_eq!(body, serde_json::json!({ "user_id": 1, "event_id": 40 }));
        assert_eq!(Interaction::EventJoin.endpoint(true), "join_event.php");
    }
}
