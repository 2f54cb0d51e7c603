//! Post composer: `compose/state`.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComposeState {
    pub busy: bool,
    /// Set once the last upload went through; the shell closes the composer.
    pub done: bool,
    pub error: Option<String>,
}

impl ComposeState {
    pub const PATH: &'static str = "compose/state";
}
