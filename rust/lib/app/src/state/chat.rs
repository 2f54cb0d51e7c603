//! Messaging: `inbox/state`, `chat/{peer_id}`.

#[derive(Debug, Clone, PartialEq)]
pub struct ConversationItem {
    pub peer_id: i64,
    pub username: String,
    pub avatar: Option<String>,
    pub last_message: String,
    pub time_label: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InboxState {
    pub conversations: Vec<ConversationItem>,
    pub loading: bool,
}

impl InboxState {
    pub const PATH: &'static str = "inbox/state";
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub message_id: i64,
    pub text: String,
    /// Sent by the viewer.
    pub mine: bool,
    pub time_label: String,
}

/// One open conversation, kept fresh by the chat poller.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatState {
    pub peer_id: i64,
    /// Ascending by creation time, as the server returns them.
    pub messages: Vec<ChatMessage>,
    /// Index the view should scroll to; set whenever new messages land.
    pub scroll_to: Option<usize>,
    pub loading: bool,
    pub sending: bool,
    pub error: Option<String>,
}

impl ChatState {
    pub fn path(peer_id: i64) -> String {
        format!("chat/{peer_id}")
    }

    pub fn opening(peer_id: i64) -> Self {
        Self {
            peer_id,
            messages: Vec::new(),
            scroll_to: None,
            loading: true,
            sending: false,
            error: None,
        }
    }
}
