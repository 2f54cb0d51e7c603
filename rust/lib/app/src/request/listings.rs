//! Adoption listing requests.

use catpaw_client::NewAdoption;

#[derive(Debug, Clone)]
pub struct AdoptionsLoadReq;

impl AdoptionsLoadReq {
    pub const PATH: &'static str = "adoptions/load";
}

#[derive(Debug, Clone)]
pub struct CreateAdoptionReq {
    pub listing: NewAdoption,
}

impl CreateAdoptionReq {
    pub const PATH: &'static str = "adoption/create";
}

/// Close one of the viewer's listings as adopted.
#[derive(Debug, Clone)]
pub struct MarkAdoptedReq {
    pub adoption_id: i64,
}

impl MarkAdoptedReq {
    pub const PATH: &'static str = "adoption/mark-adopted";
}
