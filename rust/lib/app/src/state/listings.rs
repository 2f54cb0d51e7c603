//! Adoption listings: `adoptions/state`.

#[derive(Debug, Clone, PartialEq)]
pub struct AdoptionItem {
    pub adoption_id: i64,
    pub owner_id: i64,
    pub owner_username: String,
    pub cat_name: String,
    pub cat_age: String,
    pub cat_breed: String,
    pub description: String,
    pub location: String,
    pub contact_info: String,
    pub image_url: Option<String>,
    pub available: bool,
    /// Owner of a listing that is still open.
    pub can_mark_adopted: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdoptionsState {
    pub items: Vec<AdoptionItem>,
    pub loading: bool,
    pub busy: bool,
    pub error: Option<String>,
}

impl AdoptionsState {
    pub const PATH: &'static str = "adoptions/state";
}
