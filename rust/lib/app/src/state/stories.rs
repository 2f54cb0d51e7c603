//! Stories: `stories/tray`, `story/view`.

use crate::story::{StoryPhase, StoryPlayer};

#[derive(Debug, Clone, PartialEq)]
pub struct StoryOwnerItem {
    pub user_id: i64,
    pub username: String,
    pub avatar: Option<String>,
    pub story_count: i64,
}

/// Row of users with live stories.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoryTray {
    pub owners: Vec<StoryOwnerItem>,
    pub loading: bool,
    pub uploading: bool,
    pub error: Option<String>,
}

impl StoryTray {
    pub const PATH: &'static str = "stories/tray";
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoryItem {
    pub story_id: i64,
    pub image_url: Option<String>,
    pub time_label: String,
}

/// Full-screen story viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryView {
    pub user_id: i64,
    pub items: Vec<StoryItem>,
    pub phase: StoryPhase,
    /// One fill ratio per item for the segmented progress bar.
    pub segments: Vec<f32>,
}

impl StoryView {
    pub const PATH: &'static str = "story/view";

    pub fn loading(user_id: i64) -> Self {
        Self { user_id, items: Vec::new(), phase: StoryPhase::Loading, segments: Vec::new() }
    }

    pub fn render(user_id: i64, items: &[StoryItem], player: &StoryPlayer) -> Self {
        Self {
            user_id,
            items: items.to_vec(),
            phase: player.phase(),
            segments: player.segments(),
        }
    }

    pub fn current(&self) -> Option<&StoryItem> {
        match self.phase {
            StoryPhase::Playing { index, .. } | StoryPhase::Paused { index, .. } => {
                self.items.get(index)
            }
            _ => None,
        }
    }
}
