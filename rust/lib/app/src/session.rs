use std::sync::RwLock;

use catpaw_client::User;

/// Role carried by the logged-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

/// The authenticated actor.
///
/// `epoch` identifies the login this session came from. Work started under
/// one epoch must not write state once the user has logged out.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: i64,
    pub username: String,
    pub full_name: Option<String>,
    pub profile_pic: Option<String>,
    pub role: Role,
    pub epoch: u64,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

struct Slot {
    session: Option<Session>,
    epoch: u64,
}

/// Single slot holding the current session.
///
/// Owned by the app context and passed explicitly; there is no global.
/// Every login and logout moves the epoch forward.
pub struct SessionStore {
    slot: RwLock<Slot>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(Slot { session: None, epoch: 0 }),
        }
    }

    /// Install `user` as the current session, replacing any previous one.
    pub fn login(&self, user: &User) -> Session {
        let mut slot = self.slot.write().unwrap();
        slot.epoch += 1;
        let session = Session {
            user_id: user.user_id,
            username: user.username.clone(),
            full_name: user.full_name.clone().filter(|n| !n.is_empty()),
            profile_pic: user.profile_pic.clone().filter(|p| !p.is_empty()),
            role: if user.is_admin() { Role::Admin } else { Role::User },
            epoch: slot.epoch,
        };
        slot.session = Some(session.clone());
        session
    }

    /// Clear the session. Returns the one that was active, if any.
    pub fn logout(&self) -> Option<Session> {
        let mut slot = self.slot.write().unwrap();
        slot.epoch += 1;
        slot.session.take()
    }

    pub fn current(&self) -> Option<Session> {
        self.slot.read().unwrap().session.clone()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.slot.read().unwrap().session.as_ref().map(|s| s.user_id)
    }

    pub fn is_admin(&self) -> bool {
        self.slot
            .read()
            .unwrap()
            .session
            .as_ref()
            .is_some_and(Session::is_admin)
    }

    /// Whether the session that started at `epoch` is still logged in.
    pub fn is_current(&self, epoch: u64) -> bool {
        let slot = self.slot.read().unwrap();
        slot.session.is_some() && slot.epoch == epoch
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
