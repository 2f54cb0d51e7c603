//! Messaging requests.

#[derive(Debug, Clone)]
pub struct InboxLoadReq;

impl InboxLoadReq {
    pub const PATH: &'static str = "inbox/load";
}

/// Open a conversation and start polling it.
#[derive(Debug, Clone)]
pub struct ChatOpenReq {
    pub peer_id: i64,
}

impl ChatOpenReq {
    pub const PATH: &'static str = "chat/open";
}

#[derive(Debug, Clone)]
pub struct ChatSendReq {
    pub peer_id: i64,
    pub text: String,
}

impl ChatSendReq {
    pub const PATH: &'static str = "chat/send";
}

/// Leave a conversation; its poller stops.
#[derive(Debug, Clone)]
pub struct ChatCloseReq {
    pub peer_id: i64,
}

impl ChatCloseReq {
    pub const PATH: &'static str = "chat/close";
}
