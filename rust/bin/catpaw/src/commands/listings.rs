//! Adoption listings.

use anyhow::Result;
use catpaw_app::CatPawApp;
use catpaw_app::request::{AdoptionsLoadReq, CreateAdoptionReq, MarkAdoptedReq};
use catpaw_app::state::{AdoptionItem, AdoptionsState};
use catpaw_client::NewAdoption;

use super::or_dash;

pub fn render_listing(item: &AdoptionItem) -> String {
    let status = if item.available { "available" } else { "adopted" };
    let mine = if item.can_mark_adopted { " *" } else { "" };
    format!(
        "#{:<5} {:<12} {:<10} {:<14} {:<12} @{} ({}){}",
        item.adoption_id,
        item.cat_name,
        or_dash(&item.cat_age),
        or_dash(&item.cat_breed),
        or_dash(&item.location),
        item.owner_username,
        status,
        mine,
    )
}

fn finish(app: &CatPawApp) -> Result<AdoptionsState> {
    let state = app.flux().get_as::<AdoptionsState>(AdoptionsState::PATH).unwrap_or_default();
    match &state.error {
        Some(error) => anyhow::bail!(error.clone()),
        None => Ok(state),
    }
}

pub async fn list(app: &CatPawApp) -> Result<()> {
    app.emit(AdoptionsLoadReq::PATH, AdoptionsLoadReq).await;
    let state = finish(app)?;
    if state.items.is_empty() {
        println!("No cats listed for adoption.");
    }
    for item in &state.items {
        println!("{}", render_listing(item));
    }
    Ok(())
}

pub async fn create(app: &CatPawApp, listing: NewAdoption) -> Result<()> {
    let name = listing.cat_name.clone();
    app.emit(CreateAdoptionReq::PATH, CreateAdoptionReq { listing }).await;
    finish(app)?;
    println!("Listed {name} for adoption.");
    Ok(())
}

pub async fn mark_adopted(app: &CatPawApp, adoption_id: i64) -> Result<()> {
    app.emit(AdoptionsLoadReq::PATH, AdoptionsLoadReq).await;
    app.emit(MarkAdoptedReq::PATH, MarkAdoptedReq { adoption_id }).await;
    let state = finish(app)?;
    match state.items.iter().find(|i| i.adoption_id == adoption_id) {
        Some(item) if item.available => anyhow::bail!("listing {adoption_id} is still available"),
        Some(item) => println!("{} has found a home.", item.cat_name),
        None => anyhow::bail!("listing {adoption_id} not found"),
    }
    Ok(())
}
