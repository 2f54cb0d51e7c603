use reqwest::multipart::Form;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::api::CatPawApi;
use crate::error::ApiError;
use crate::types::*;

/// reqwest-backed [`CatPawApi`].
///
/// Reads are `GET` with query parameters, mutations `POST` a JSON body,
/// and anything carrying an image is a multipart form.
#[derive(Clone)]
pub struct HttpApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    /// Read a JSON body, mapping HTTP errors to `ApiError`.
    async fn parse(resp: reqwest::Response) -> Result<Value, ApiError> {
        let status = resp.status();
        if !status.is_success() {
            let code = status.as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Server { status: code, message: body });
        }
        let text = resp.text().await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(format!("response body: {e}")))
    }

    /// Decode a payload, surfacing an error envelope sent in its place.
    fn decode<R: DeserializeOwned>(endpoint: &str, value: Value) -> Result<R, ApiError> {
        if let Some(status) = value.get("status").and_then(Value::as_str) {
            if !status.eq_ignore_ascii_case(StatusResponse::SUCCESS) {
                let message = value
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                return Err(ApiError::Rejected(message));
            }
        }
        serde_json::from_value(value).map_err(|e| ApiError::Decode(format!("{endpoint}: {e}")))
    }

    async fn get_json<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<R, ApiError> {
        tracing::debug!(endpoint, "GET");
        let resp = self.http.get(self.url(endpoint)).query(query).send().await?;
        Self::decode(endpoint, Self::parse(resp).await?)
    }

    async fn post_json(&self, endpoint: &str, body: Value) -> Result<(), ApiError> {
        tracing::debug!(endpoint, "POST");
        let resp = self.http.post(self.url(endpoint)).json(&body).send().await?;
        let status: StatusResponse = Self::decode_status(endpoint, Self::parse(resp).await?)?;
        status.into_result().map(|_| ())
    }

    async fn post_form(&self, endpoint: &str, form: Form) -> Result<(), ApiError> {
        tracing::debug!(endpoint, "POST multipart");
        let resp = self.http.post(self.url(endpoint)).multipart(form).send().await?;
        let status: StatusResponse = Self::decode_status(endpoint, Self::parse(resp).await?)?;
        status.into_result().map(|_| ())
    }

    fn decode_status(endpoint: &str, value: Value) -> Result<StatusResponse, ApiError> {
        serde_json::from_value(value).map_err(|e| ApiError::Decode(format!("{endpoint}: {e}")))
    }
}

fn id(v: i64) -> String {
    v.to_string()
}

#[async_trait::async_trait]
impl CatPawApi for HttpApi {
    async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        tracing::debug!(endpoint = "login.php", "POST");
        let resp = self
            .http
            .post(self.url("login.php"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let value = Self::parse(resp).await?;
        let login: LoginResponse = serde_json::from_value(value)
            .map_err(|e| ApiError::Decode(format!("login.php: {e}")))?;
        if !login.status.eq_ignore_ascii_case(StatusResponse::SUCCESS) {
            return Err(ApiError::Rejected(login.message.unwrap_or_default()));
        }
        login
            .user
            .ok_or_else(|| ApiError::Decode("login.php: missing user".into()))
    }

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<(), ApiError> {
        self.post_json(
            "register.php",
            json!({
                "username": username,
                "email": email,
                "password": password,
                "full_name": full_name,
            }),
        )
        .await
    }

    async fn feed(&self, user_id: i64) -> Result<Vec<Post>, ApiError> {
        self.get_json("get_posts.php", &[("user_id", id(user_id))]).await
    }

    async fn user_posts(&self, user_id: i64, viewer_id: i64) -> Result<Vec<Post>, ApiError> {
        self.get_json(
            "get_user_posts.php",
            &[("user_id", id(user_id)), ("viewer_id", id(viewer_id))],
        )
        .await
    }

    async fn saved_posts(&self, user_id: i64) -> Result<Vec<Post>, ApiError> {
        self.get_json("get_saved_posts.php", &[("user_id", id(user_id))]).await
    }

    async fn create_post(&self, user_id: i64, post: NewPost) -> Result<(), ApiError> {
        let form = Form::new()
            .text("user_id", id(user_id))
            .text("caption", post.caption)
            .part("image", post.image.into_part()?);
        self.post_form("create_post.php", form).await
    }

    async fn delete_post(&self, user_id: i64, post_id: i64) -> Result<(), ApiError> {
        self.post_json("delete_post.php", json!({ "user_id": user_id, "post_id": post_id }))
            .await
    }

    async fn interact(
        &self,
        kind: Interaction,
        actor_id: i64,
        target_id: i64,
        active: bool,
    ) -> Result<(), ApiError> {
        self.post_json(kind.endpoint(active), kind.body(actor_id, target_id)).await
    }

    async fn comments(&self, post_id: i64) -> Result<Vec<Comment>, ApiError> {
        self.get_json("get_comments.php", &[("post_id", id(post_id))]).await
    }

    async fn add_comment(&self, user_id: i64, post_id: i64, text: &str) -> Result<(), ApiError> {
        self.post_json(
            "add_comment.php",
            json!({ "user_id": user_id, "post_id": post_id, "comment_text": text }),
        )
        .await
    }

    async fn delete_comment(&self, user_id: i64, comment_id: i64) -> Result<(), ApiError> {
        self.post_json(
            "delete_comment.php",
            json!({ "user_id": user_id, "comment_id": comment_id }),
        )
        .await
    }

    async fn profile(&self, user_id: i64, viewer_id: i64) -> Result<Profile, ApiError> {
        self.get_json(
            "get_profile.php",
            &[("user_id", id(user_id)), ("viewer_id", id(viewer_id))],
        )
        .await
    }

    async fn update_profile(&self, user_id: i64, update: ProfileUpdate) -> Result<(), ApiError> {
        let mut form = Form::new()
            .text("user_id", id(user_id))
            .text("full_name", update.full_name)
            .text("bio", update.bio);
        if let Some(pic) = update.profile_pic {
            form = form.part("profile_pic", pic.into_part()?);
        }
        self.post_form("update_profile.php", form).await
    }

    async fn search_users(&self, query: &str) -> Result<Vec<User>, ApiError> {
        self.get_json("search_users.php", &[("query", query.to_string())]).await
    }

    async fn story_tray(&self, user_id: i64) -> Result<Vec<StoryOwner>, ApiError> {
        self.get_json("get_stories.php", &[("user_id", id(user_id))]).await
    }

    async fn user_stories(&self, user_id: i64) -> Result<Vec<Story>, ApiError> {
        self.get_json("get_user_stories.php", &[("user_id", id(user_id))]).await
    }

    async fn upload_story(&self, user_id: i64, story: NewStory) -> Result<(), ApiError> {
        let form = Form::new()
            .text("user_id", id(user_id))
            .part("image", story.image.into_part()?);
        self.post_form("upload_story.php", form).await
    }

    async fn conversations(&self, user_id: i64) -> Result<Vec<Conversation>, ApiError> {
        self.get_json("get_conversations.php", &[("user_id", id(user_id))]).await
    }

    async fn messages(&self, user_id: i64, other_user_id: i64) -> Result<Vec<Message>, ApiError> {
        self.get_json(
            "get_messages.php",
            &[("user_id", id(user_id)), ("other_user_id", id(other_user_id))],
        )
        .await
    }

    async fn send_message(
        &self,
        sender_id: i64,
        receiver_id: i64,
        text: &str,
    ) -> Result<(), ApiError> {
        self.post_json(
            "send_message.php",
            json!({ "sender_id": sender_id, "receiver_id": receiver_id, "message_text": text }),
        )
        .await
    }

    async fn adoptions(&self) -> Result<Vec<Adoption>, ApiError> {
        self.get_json("get_adoptions.php", &[]).await
    }

    async fn create_adoption(&self, user_id: i64, adoption: NewAdoption) -> Result<(), ApiError> {
        let form = Form::new()
            .text("user_id", id(user_id))
            .text("cat_name", adoption.cat_name)
            .text("cat_age", adoption.cat_age)
            .text("cat_breed", adoption.cat_breed)
            .text("description", adoption.description)
            .text("location", adoption.location)
            .text("contact_info", adoption.contact_info)
            .part("image", adoption.image.into_part()?);
        self.post_form("create_adoption.php", form).await
    }

    async fn update_adoption_status(
        &self,
        adoption_id: i64,
        user_id: i64,
        status: &str,
    ) -> Result<(), ApiError> {
        self.post_json(
            "update_adoption_status.php",
            json!({ "adoption_id": adoption_id, "user_id": user_id, "status": status }),
        )
        .await
    }

    async fn events(&self, user_id: i64) -> Result<Vec<Event>, ApiError> {
        self.get_json("get_events.php", &[("user_id", id(user_id))]).await
    }

    async fn create_event(&self, user_id: i64, event: NewEvent) -> Result<(), ApiError> {
        let form = Form::new()
            .text("user_id", id(user_id))
            .text("title", event.title)
            .text("description", event.description)
            .text("event_date", event.event_date)
            .text("location", event.location)
            .part("image", event.image.into_part()?);
        self.post_form("create_event.php", form).await
    }

    async fn notifications(&self, user_id: i64) -> Result<Vec<Notification>, ApiError> {
        self.get_json("get_notifications.php", &[("user_id", id(user_id))]).await
    }

    async fn mark_notifications_read(&self, user_id: i64) -> Result<(), ApiError> {
        self.post_json("mark_notifications_read.php", json!({ "user_id": user_id }))
            .await
    }

    async fn admin_users(&self, admin_id: i64) -> Result<Vec<User>, ApiError> {
        self.get_json("admin_get_users.php", &[("admin_id", id(admin_id))]).await
    }

    async fn admin_stats(&self, admin_id: i64) -> Result<AdminStats, ApiError> {
        self.get_json("admin_get_stats.php", &[("admin_id", id(admin_id))]).await
    }

    async fn admin_delete_user(&self, admin_id: i64, user_id: i64) -> Result<(), ApiError> {
        self.post_json(
            "admin_delete_user.php",
            json!({ "admin_id": admin_id, "user_id": user_id }),
        )
        .await
    }

    async fn admin_delete_post(&self, admin_id: i64, post_id: i64) -> Result<(), ApiError> {
        self.post_json(
            "admin_delete_post.php",
            json!({ "admin_id": admin_id, "post_id": post_id }),
        )
        .await
    }
}
