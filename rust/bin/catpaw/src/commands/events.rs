//! Community events.

use anyhow::Result;
use catpaw_app::CatPawApp;
use catpaw_app::optimistic::toggle_path;
use catpaw_app::request::{CreateEventReq, EventsLoadReq, JoinEventReq};
use catpaw_app::state::{EventItem, EventsState};
use catpaw_app::ToggleState;
use catpaw_client::{Interaction, NewEvent};

use super::or_dash;

pub fn render_event(item: &EventItem, join: Option<ToggleState>) -> String {
    let join = join.unwrap_or(ToggleState::new(item.joined, item.participants_count));
    format!(
        "#{:<5} {:<12} {:<24} {:<14} {:>3} going{}",
        item.event_id,
        or_dash(&item.event_date),
        item.title,
        or_dash(&item.location),
        join.count,
        if join.active { " (joined)" } else { "" },
    )
}

fn finish(app: &CatPawApp) -> Result<EventsState> {
    let state = app.flux().get_as::<EventsState>(EventsState::PATH).unwrap_or_default();
    match &state.error {
        Some(error) => anyhow::bail!(error.clone()),
        None => Ok(state),
    }
}

pub async fn list(app: &CatPawApp) -> Result<()> {
    app.emit(EventsLoadReq::PATH, EventsLoadReq).await;
    let state = finish(app)?;
    if state.items.is_empty() {
        println!("No upcoming events.");
    }
    for item in &state.items {
        let join = app
            .flux()
            .get_as::<ToggleState>(&toggle_path(Interaction::EventJoin, item.event_id));
        println!("{}", render_event(item, join));
    }
    Ok(())
}

pub async fn create(app: &CatPawApp, event: NewEvent) -> Result<()> {
    let title = event.title.clone();
    app.emit(CreateEventReq::PATH, CreateEventReq { event }).await;
    finish(app)?;
    println!("Created event \"{title}\".");
    Ok(())
}

pub async fn join(app: &CatPawApp, event_id: i64) -> Result<()> {
    app.emit(EventsLoadReq::PATH, EventsLoadReq).await;
    app.emit(JoinEventReq::PATH, JoinEventReq { event_id }).await;
    app.context().toggler.settle().await;
    match app
        .flux()
        .get_as::<ToggleState>(&toggle_path(Interaction::EventJoin, event_id))
    {
        Some(t) if t.active => println!("Joined event {event_id} ({} going)", t.count),
        Some(t) => println!("Left event {event_id} ({} going)", t.count),
        None => anyhow::bail!("event {event_id} not found"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> EventItem {
        EventItem {
            event_id: 2,
            creator_id: 7,
            creator_username: "tom".into(),
            title: "Cat cafe meetup".into(),
            description: String::new(),
            event_date: "2026-11-01".into(),
            location: String::new(),
            image_url: None,
            participants_count: 5,
            joined: false,
        }
    }

    #[test]
    fn event_line() {
        let line = render_event(&item(), None);
        assert!(line.starts_with("#2     2026-11-01"));
        assert!(line.ends_with("  5 going"));
    }

    #[test]
    fn joined_toggle_shows() {
        let line = render_event(&item(), Some(ToggleState::new(true, 6)));
        assert!(line.ends_with("  6 going (joined)"));
    }
}
