//! In-memory backend for handler tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Notify;

use catpaw_client::*;

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Login(String),
    Register(String),
    Feed(i64),
    UserPosts { user_id: i64, viewer_id: i64 },
    SavedPosts(i64),
    CreatePost { user_id: i64, caption: String },
    DeletePost { user_id: i64, post_id: i64 },
    Interact { kind: Interaction, actor_id: i64, target_id: i64, active: bool },
    Comments(i64),
    AddComment { user_id: i64, post_id: i64, text: String },
    DeleteComment { user_id: i64, comment_id: i64 },
    Profile { user_id: i64, viewer_id: i64 },
    UpdateProfile { user_id: i64, bio: String, has_pic: bool },
    SearchUsers(String),
    StoryTray(i64),
    UserStories(i64),
    UploadStory(i64),
    Conversations(i64),
    Messages { user_id: i64, other_user_id: i64 },
    SendMessage { sender_id: i64, receiver_id: i64, text: String },
    Adoptions,
    CreateAdoption { user_id: i64, cat_name: String },
    AdoptionStatus { adoption_id: i64, user_id: i64, status: String },
    Events(i64),
    CreateEvent { user_id: i64, title: String },
    Notifications(i64),
    MarkNotificationsRead(i64),
    AdminUsers(i64),
    AdminStats(i64),
    AdminDeleteUser { admin_id: i64, user_id: i64 },
    AdminDeletePost { admin_id: i64, post_id: i64 },
}

#[derive(Default)]
pub struct FakeApi {
    pub accounts: Mutex<Vec<(String, String, User)>>,
    pub posts: Mutex<Vec<Post>>,
    pub comments: Mutex<Vec<Comment>>,
    pub profiles: Mutex<HashMap<i64, Profile>>,
    pub tray: Mutex<Vec<StoryOwner>>,
    pub stories: Mutex<HashMap<i64, Vec<Story>>>,
    pub conversations: Mutex<Vec<Conversation>>,
    pub messages: Mutex<Vec<Message>>,
    pub adoptions: Mutex<Vec<Adoption>>,
    pub events: Mutex<Vec<Event>>,
    pub notifications: Mutex<Vec<Notification>>,
    pub stats: Mutex<AdminStats>,
    failing: Mutex<HashSet<&'static str>>,
    held: Mutex<HashMap<&'static str, Arc<Notify>>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(self, email: &str, password: &str, user: User) -> Self {
        self.accounts
            .lock()
            .unwrap()
            .push((email.into(), password.into(), user));
        self
    }

    /// Make every call of operation `op` fail with `Rejected`.
    pub fn fail(&self, op: &'static str) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn recover(&self, op: &'static str) {
        self.failing.lock().unwrap().remove(op);
    }

    /// Park calls of `op` after recording them until [`release`](Self::release).
    pub fn hold(&self, op: &'static str) {
        self.held.lock().unwrap().insert(op, Arc::new(Notify::new()));
    }

    pub fn release(&self, op: &'static str) {
        if let Some(gate) = self.held.lock().unwrap().remove(op) {
            gate.notify_one();
        }
    }

    async fn gate(&self, op: &'static str) {
        let gate = self.held.lock().unwrap().get(op).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    /// Wait until at least `n` recorded calls satisfy `pred`.
    pub async fn wait_for(&self, n: usize, pred: impl Fn(&Call) -> bool) {
        let waited = tokio::time::timeout(Duration::from_secs(5), async {
            while self.count(&pred) < n {
                tokio::task::yield_now().await;
            }
        })
        .await;
        assert!(waited.is_ok(), "timed out waiting for {n} calls: {:?}", self.calls());
    }

    fn record(&self, op: &'static str, call: Call) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);
        if self.failing.lock().unwrap().contains(op) {
            return Err(ApiError::Rejected(format!("{op} failed")));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl CatPawApi for FakeApi {
    async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        self.record("login", Call::Login(email.into()))?;
        self.accounts
            .lock()
            .unwrap()
            .iter()
            .find(|(e, p, _)| e == email && p == password)
            .map(|(_, _, u)| u.clone())
            .ok_or_else(|| ApiError::Rejected("Invalid email or password".into()))
    }

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<(), ApiError> {
        self.record("register", Call::Register(username.into()))?;
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.iter().any(|(e, _, _)| e == email) {
            return Err(ApiError::Rejected("Email already registered".into()));
        }
        let id = accounts.len() as i64 + 100;
        let mut user = fixtures::user(id, username, "user");
        user.full_name = Some(full_name.into());
        accounts.push((email.into(), password.into(), user));
        Ok(())
    }

    async fn feed(&self, user_id: i64) -> Result<Vec<Post>, ApiError> {
        self.record("feed", Call::Feed(user_id))?;
        self.gate("feed").await;
        Ok(self.posts.lock().unwrap().clone())
    }

    async fn user_posts(&self, user_id: i64, viewer_id: i64) -> Result<Vec<Post>, ApiError> {
        self.record("user_posts", Call::UserPosts { user_id, viewer_id })?;
        let posts = self.posts.lock().unwrap();
        Ok(posts.iter().filter(|p| p.user_id == user_id).cloned().collect())
    }

    async fn saved_posts(&self, user_id: i64) -> Result<Vec<Post>, ApiError> {
        self.record("saved_posts", Call::SavedPosts(user_id))?;
        let posts = self.posts.lock().unwrap();
        Ok(posts.iter().filter(|p| p.is_saved).cloned().collect())
    }

    async fn create_post(&self, user_id: i64, post: NewPost) -> Result<(), ApiError> {
        self.record("create_post", Call::CreatePost { user_id, caption: post.caption.clone() })?;
        let mut posts = self.posts.lock().unwrap();
        let id = posts.iter().map(|p| p.post_id).max().unwrap_or(0) + 1;
        let mut new = fixtures::post(id, user_id, 0, false);
        new.caption = Some(post.caption);
        new.image_url = Some(post.image.file_name);
        posts.insert(0, new);
        Ok(())
    }

    async fn delete_post(&self, user_id: i64, post_id: i64) -> Result<(), ApiError> {
        self.record("delete_post", Call::DeletePost { user_id, post_id })?;
        self.posts
            .lock()
            .unwrap()
            .retain(|p| !(p.post_id == post_id && p.user_id == user_id));
        Ok(())
    }

    async fn interact(
        &self,
        kind: Interaction,
        actor_id: i64,
        target_id: i64,
        active: bool,
    ) -> Result<(), ApiError> {
        self.record("interact", Call::Interact { kind, actor_id, target_id, active })
    }

    async fn comments(&self, post_id: i64) -> Result<Vec<Comment>, ApiError> {
        self.record("comments", Call::Comments(post_id))?;
        let comments = self.comments.lock().unwrap();
        Ok(comments.iter().filter(|c| c.post_id == post_id).cloned().collect())
    }

    async fn add_comment(&self, user_id: i64, post_id: i64, text: &str) -> Result<(), ApiError> {
        self.record(
            "add_comment",
            Call::AddComment { user_id, post_id, text: text.into() },
        )?;
        let mut comments = self.comments.lock().unwrap();
        let id = comments.len() as i64 + 1;
        comments.push(fixtures::comment(id, post_id, user_id, text));
        Ok(())
    }

    async fn delete_comment(&self, user_id: i64, comment_id: i64) -> Result<(), ApiError> {
        self.record("delete_comment", Call::DeleteComment { user_id, comment_id })?;
        self.comments
            .lock()
            .unwrap()
            .retain(|c| !(c.comment_id == comment_id && c.user_id == user_id));
        Ok(())
    }

    async fn profile(&self, user_id: i64, viewer_id: i64) -> Result<Profile, ApiError> {
        self.record("profile", Call::Profile { user_id, viewer_id })?;
        self.profiles
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .ok_or_else(|| ApiError::Rejected("User not found".into()))
    }

    async fn update_profile(&self, user_id: i64, update: ProfileUpdate) -> Result<(), ApiError> {
        self.record(
            "update_profile",
            Call::UpdateProfile {
                user_id,
                bio: update.bio.clone(),
                has_pic: update.profile_pic.is_some(),
            },
        )?;
        if let Some(p) = self.profiles.lock().unwrap().get_mut(&user_id) {
            p.full_name = Some(update.full_name);
            p.bio = Some(update.bio);
        }
        Ok(())
    }

    async fn search_users(&self, query: &str) -> Result<Vec<User>, ApiError> {
        self.record("search_users", Call::SearchUsers(query.into()))?;
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts
            .iter()
            .map(|(_, _, u)| u)
            .filter(|u| u.username.contains(query))
            .cloned()
            .collect())
    }

    async fn story_tray(&self, user_id: i64) -> Result<Vec<StoryOwner>, ApiError> {
        self.record("story_tray", Call::StoryTray(user_id))?;
        Ok(self.tray.lock().unwrap().clone())
    }

    async fn user_stories(&self, user_id: i64) -> Result<Vec<Story>, ApiError> {
        self.record("user_stories", Call::UserStories(user_id))?;
        self.gate("user_stories").await;
        Ok(self
            .stories
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn upload_story(&self, user_id: i64, _story: NewStory) -> Result<(), ApiError> {
        self.record("upload_story", Call::UploadStory(user_id))
    }

    async fn conversations(&self, user_id: i64) -> Result<Vec<Conversation>, ApiError> {
        self.record("conversations", Call::Conversations(user_id))?;
        Ok(self.conversations.lock().unwrap().clone())
    }

    async fn messages(&self, user_id: i64, other_user_id: i64) -> Result<Vec<Message>, ApiError> {
        self.record("messages", Call::Messages { user_id, other_user_id })?;
        self.gate("messages").await;
        Ok(self.messages.lock().unwrap().clone())
    }

    async fn send_message(
        &self,
        sender_id: i64,
        receiver_id: i64,
        text: &str,
    ) -> Result<(), ApiError> {
        self.record(
            "send_message",
            Call::SendMessage { sender_id, receiver_id, text: text.into() },
        )?;
        let mut messages = self.messages.lock().unwrap();
        let id = messages.len() as i64 + 1;
        messages.push(fixtures::message(id, sender_id, receiver_id, text));
        Ok(())
    }

    async fn adoptions(&self) -> Result<Vec<Adoption>, ApiError> {
        self.record("adoptions", Call::Adoptions)?;
        Ok(self.adoptions.lock().unwrap().clone())
    }

    async fn create_adoption(&self, user_id: i64, adoption: NewAdoption) -> Result<(), ApiError> {
        self.record(
            "create_adoption",
            Call::CreateAdoption { user_id, cat_name: adoption.cat_name.clone() },
        )?;
        let mut adoptions = self.adoptions.lock().unwrap();
        let id = adoptions.len() as i64 + 1;
        adoptions.push(fixtures::adoption(id, user_id, &adoption.cat_name));
        Ok(())
    }

    async fn update_adoption_status(
        &self,
        adoption_id: i64,
        user_id: i64,
        status: &str,
    ) -> Result<(), ApiError> {
        self.record(
            "update_adoption_status",
            Call::AdoptionStatus { adoption_id, user_id, status: status.into() },
        )?;
        for a in self.adoptions.lock().unwrap().iter_mut() {
            if a.adoption_id == adoption_id && a.user_id == user_id {
                a.status = status.into();
            }
        }
        Ok(())
    }

    async fn events(&self, user_id: i64) -> Result<Vec<Event>, ApiError> {
        self.record("events", Call::Events(user_id))?;
        Ok(self.events.lock().unwrap().clone())
    }

    async fn create_event(&self, user_id: i64, event: NewEvent) -> Result<(), ApiError> {
        self.record("create_event", Call::CreateEvent { user_id, title: event.title.clone() })?;
        let mut events = self.events.lock().unwrap();
        let id = events.len() as i64 + 1;
        events.push(fixtures::event(id, user_id, &event.title, 0, false));
        Ok(())
    }

    async fn notifications(&self, user_id: i64) -> Result<Vec<Notification>, ApiError> {
        self.record("notifications", Call::Notifications(user_id))?;
        Ok(self.notifications.lock().unwrap().clone())
    }

    async fn mark_notifications_read(&self, user_id: i64) -> Result<(), ApiError> {
        self.record("mark_notifications_read", Call::MarkNotificationsRead(user_id))?;
        for n in self.notifications.lock().unwrap().iter_mut() {
            n.is_read = true;
        }
        Ok(())
    }

    async fn admin_users(&self, admin_id: i64) -> Result<Vec<User>, ApiError> {
        self.record("admin_users", Call::AdminUsers(admin_id))?;
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.iter().map(|(_, _, u)| u.clone()).collect())
    }

    async fn admin_stats(&self, admin_id: i64) -> Result<AdminStats, ApiError> {
        self.record("admin_stats", Call::AdminStats(admin_id))?;
        Ok(self.stats.lock().unwrap().clone())
    }

    async fn admin_delete_user(&self, admin_id: i64, user_id: i64) -> Result<(), ApiError> {
        self.record("admin_delete_user", Call::AdminDeleteUser { admin_id, user_id })?;
        self.accounts
            .lock()
            .unwrap()
            .retain(|(_, _, u)| u.user_id != user_id);
        Ok(())
    }

    async fn admin_delete_post(&self, admin_id: i64, post_id: i64) -> Result<(), ApiError> {
        self.record("admin_delete_post", Call::AdminDeletePost { admin_id, post_id })?;
        self.posts.lock().unwrap().retain(|p| p.post_id != post_id);
        Ok(())
    }
}

pub mod fixtures {
    use catpaw_client::*;

    pub fn user(id: i64, username: &str, role: &str) -> User {
        User {
            user_id: id,
            username: username.into(),
            email: format!("{username}@catpaw.app"),
            full_name: None,
            bio: None,
            profile_pic: None,
            role: role.into(),
            created_at: None,
        }
    }

    pub fn post(id: i64, owner: i64, likes: i64, liked: bool) -> Post {
        Post {
            post_id: id,
            user_id: owner,
            username: format!("user{owner}"),
            profile_pic: None,
            image_url: Some(format!("post_{id}.jpg")),
            caption: Some(format!("post {id}")),
            likes_count: likes,
            comments_count: 0,
            is_liked: liked,
            is_saved: false,
            created_at: Some("2024-03-02 10:15:00".into()),
        }
    }

    pub fn comment(id: i64, post_id: i64, user_id: i64, text: &str) -> Comment {
        Comment {
            comment_id: id,
            post_id,
            user_id,
            username: format!("user{user_id}"),
            profile_pic: None,
            comment_text: text.into(),
            created_at: None,
        }
    }

    pub fn profile(id: i64, followers: i64, following: bool) -> Profile {
        Profile {
            user_id: id,
            username: format!("user{id}"),
            full_name: None,
            bio: None,
            profile_pic: None,
            posts_count: 0,
            followers_count: followers,
            following_count: 0,
            is_following: following,
        }
    }

    pub fn story(id: i64, user_id: i64) -> Story {
        Story {
            story_id: id,
            user_id,
            image_url: format!("story_{id}.jpg"),
            created_at: None,
        }
    }

    pub fn message(id: i64, sender_id: i64, receiver_id: i64, text: &str) -> Message {
        Message {
            message_id: id,
            sender_id,
            receiver_id,
            message_text: text.into(),
            created_at: None,
            is_read: false,
        }
    }

    pub fn adoption(id: i64, owner: i64, cat_name: &str) -> Adoption {
        Adoption {
            adoption_id: id,
            user_id: owner,
            username: format!("user{owner}"),
            cat_name: cat_name.into(),
            cat_age: Some("2".into()),
            cat_breed: None,
            description: None,
            location: None,
            contact_info: None,
            image_url: None,
            status: Adoption::AVAILABLE.into(),
            created_at: None,
        }
    }

    pub fn event(id: i64, creator: i64, title: &str, participants: i64, joined: bool) -> Event {
        Event {
            event_id: id,
            created_by: creator,
            creator_username: None,
            title: title.into(),
            description: None,
            event_date: Some("2024-06-01".into()),
            location: None,
            image_url: None,
            participants_count: participants,
            is_joined: joined,
        }
    }

    pub fn notification(id: i64, user_id: i64, read: bool) -> Notification {
        Notification {
            notification_id: id,
            user_id,
            actor_id: Some(2),
            actor_username: Some("user2".into()),
            actor_profile_pic: None,
            kind: "like".into(),
            post_id: Some(1),
            message: Some("liked your post".into()),
            is_read: read,
            created_at: None,
        }
    }
}
