//! App shell state: `app/route`, `app/menu`.

/// Current top-level route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppRoute(pub String);

impl AppRoute {
    pub const PATH: &'static str = "app/route";

    pub const LOGIN: &'static str = "/login";
    pub const HOME: &'static str = "/home";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntry {
    Home,
    Search,
    Adoptions,
    Events,
    Inbox,
    Notifications,
    Saved,
    Profile,
    Admin,
}

/// Navigation entries available to the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppMenu {
    pub entries: Vec<MenuEntry>,
}

impl AppMenu {
    pub const PATH: &'static str = "app/menu";

    pub fn for_role(is_admin: bool) -> Self {
        let mut entries = vec![
            MenuEntry::Home,
            MenuEntry::Search,
            MenuEntry::Adoptions,
            MenuEntry::Events,
            MenuEntry::Inbox,
            MenuEntry::Notifications,
            MenuEntry::Saved,
            MenuEntry::Profile,
        ];
        if is_admin {
            entries.push(MenuEntry::Admin);
        }
        Self { entries }
    }

    pub fn contains(&self, entry: MenuEntry) -> bool {
        self.entries.contains(&entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_entry_only_for_admins() {
        assert!(AppMenu::for_role(true).contains(MenuEntry::Admin));
        assert!(!AppMenu::for_role(false).contains(MenuEntry::Admin));
        assert!(AppMenu::for_role(false).contains(MenuEntry::Home));
    }
}
