use crate::error::ApiError;
use crate::types::*;

/// Every operation the CatPaw backend offers.
///
/// `HttpApi` is the production implementation; tests substitute an
/// in-memory fake.
#[async_trait::async_trait]
pub trait CatPawApi: Send + Sync + 'static {
    // ── Auth ────────────────────────────────────────────────────────

    async fn login(&self, email: &str, password: &str) -> Result<User, ApiError>;

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<(), ApiError>;

    // ── Posts ───────────────────────────────────────────────────────

    async fn feed(&self, user_id: i64) -> Result<Vec<Post>, ApiError>;

    async fn user_posts(&self, user_id: i64, viewer_id: i64) -> Result<Vec<Post>, ApiError>;

    async fn saved_posts(&self, user_id: i64) -> Result<Vec<Post>, ApiError>;

    async fn create_post(&self, user_id: i64, post: NewPost) -> Result<(), ApiError>;

    async fn delete_post(&self, user_id: i64, post_id: i64) -> Result<(), ApiError>;

    /// Switch a reversible action on or off for `actor_id` against `target_id`.
    async fn interact(
        &self,
        kind: Interaction,
        actor_id: i64,
        target_id: i64,
        active: bool,
    ) -> Result<(), ApiError>;

    // ── Comments ────────────────────────────────────────────────────

    async fn comments(&self, post_id: i64) -> Result<Vec<Comment>, ApiError>;

    async fn add_comment(&self, user_id: i64, post_id: i64, text: &str) -> Result<(), ApiError>;

    async fn delete_comment(&self, user_id: i64, comment_id: i64) -> Result<(), ApiError>;

    // ── Users ───────────────────────────────────────────────────────

    async fn profile(&self, user_id: i64, viewer_id: i64) -> Result<Profile, ApiError>;

    async fn update_profile(&self, user_id: i64, update: ProfileUpdate) -> Result<(), ApiError>;

    async fn search_users(&self, query: &str) -> Result<Vec<User>, ApiError>;

    // ── Stories ─────────────────────────────────────────────────────

    async fn story_tray(&self, user_id: i64) -> Result<Vec<StoryOwner>, ApiError>;

    async fn user_stories(&self, user_id: i64) -> Result<Vec<Story>, ApiError>;

    async fn upload_story(&self, user_id: i64, story: NewStory) -> Result<(), ApiError>;

    // ── Messages ────────────────────────────────────────────────────

    async fn conversations(&self, user_id: i64) -> Result<Vec<Conversation>, ApiError>;

    async fn messages(&self, user_id: i64, other_user_id: i64) -> Result<Vec<Message>, ApiError>;

    async fn send_message(
        &self,
        sender_id: i64,
        receiver_id: i64,
        text: &str,
    ) -> Result<(), ApiError>;

    // ── Adoptions ───────────────────────────────────────────────────

    async fn adoptions(&self) -> Result<Vec<Adoption>, ApiError>;

    async fn create_adoption(&self, user_id: i64, adoption: NewAdoption) -> Result<(), ApiError>;

    async fn update_adoption_status(
        &self,
        adoption_id: i64,
        user_id: i64,
        status: &str,
    ) -> Result<(), ApiError>;

    // ── Events ──────────────────────────────────────────────────────

    async fn events(&self, user_id: i64) -> Result<Vec<Event>, ApiError>;

    async fn create_event(&self, user_id: i64, event: NewEvent) -> Result<(), ApiError>;

    // ── Notifications ───────────────────────────────────────────────

    async fn notifications(&self, user_id: i64) -> Result<Vec<Notification>, ApiError>;

    async fn mark_notifications_read(&self, user_id: i64) -> Result<(), ApiError>;

    // ── Admin ───────────────────────────────────────────────────────

    async fn admin_users(&self, admin_id: i64) -> Result<Vec<User>, ApiError>;

    async fn admin_stats(&self, admin_id: i64) -> Result<AdminStats, ApiError>;

    async fn admin_delete_user(&self, admin_id: i64, user_id: i64) -> Result<(), ApiError>;

    async fn admin_delete_post(&self, admin_id: i64, post_id: i64) -> Result<(), ApiError>;
}
