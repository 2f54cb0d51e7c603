//! catpaw CLI: drive the CatPaw engine from a terminal.
//!
//! Usage:
//!   catpaw profile create local --api http://localhost/catpaw/api
//!   catpaw feed
//!   catpaw post like 12
//!   catpaw chat 8 --send "is Mochi still available?" --watch 60
//!   catpaw story 8

mod commands;
mod config;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use catpaw_app::CatPawApp;
use catpaw_client::{NewAdoption, NewEvent};
use commands::feed::CommentAction;
use commands::session::Credentials;
use config::{ClientConfig, Profile};

#[derive(Parser)]
#[command(name = "catpaw", about = "CatPaw command-line client", version)]
struct Cli {
    /// Config file path (default: ~/.catpaw/config.toml).
    #[arg(long, global = true)]
    config: Option<String>,

    /// Engine settings file (TOML).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Login email (default: the profile's email, else prompt).
    #[arg(long, global = true, env = "CATPAW_EMAIL")]
    email: Option<String>,

    /// Login password (default: prompt).
    #[arg(long, global = true, env = "CATPAW_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage backend profiles.
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Switch to a different profile.
    Use {
        /// Profile name.
        name: String,
    },
    /// Create an account and sign in.
    Signup {
        #[arg(long)]
        username: String,
        /// Display name.
        #[arg(long)]
        name: String,
    },
    /// Show version info.
    Version,
    #[command(flatten)]
    Online(Online),
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Create or replace a profile.
    Create {
        name: String,
        /// API base URL.
        #[arg(long)]
        api: String,
        /// Media base URL (default: derived from the API URL).
        #[arg(long)]
        upload: Option<String>,
        /// Email to log in with.
        #[arg(long = "login-email")]
        login_email: Option<String>,
    },
    /// List all profiles.
    List,
    /// Delete a profile.
    Delete { name: String },
}

/// Commands that need a signed-in session.
#[derive(Subcommand)]
enum Online {
    /// Show the home feed.
    Feed,
    /// Show saved posts.
    Saved,
    /// Act on a post.
    Post {
        #[command(subcommand)]
        action: PostAction,
    },
    /// Show a profile (yours by default).
    User {
        id: Option<i64>,
        /// Follow or unfollow this user.
        #[arg(long)]
        follow: bool,
    },
    /// Update your profile.
    EditProfile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        /// New profile picture.
        #[arg(long)]
        picture: Option<PathBuf>,
    },
    /// Search users by name.
    Search { query: String },
    /// Show who has stories.
    Stories,
    /// Share a story image.
    ShareStory { image: PathBuf },
    /// Play a user's stories.
    Story { user_id: i64 },
    /// List conversations.
    Inbox,
    /// Open a conversation.
    Chat {
        peer_id: i64,
        /// Send a message first.
        #[arg(long)]
        send: Option<String>,
        /// Keep printing new messages for this many seconds.
        #[arg(long)]
        watch: Option<u64>,
    },
    /// Cats up for adoption.
    Adoption {
        #[command(subcommand)]
        action: AdoptionAction,
    },
    /// Community events.
    Event {
        #[command(subcommand)]
        action: EventAction,
    },
    /// Show notifications.
    Notifications {
        /// Mark everything as read afterwards.
        #[arg(long)]
        mark_read: bool,
    },
    /// Admin console.
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum PostAction {
    /// Toggle like.
    Like { id: i64 },
    /// Toggle saved.
    Save { id: i64 },
    /// Share a photo.
    Create {
        image: PathBuf,
        #[arg(long, default_value = "")]
        caption: String,
    },
    /// Delete one of your posts.
    Delete {
        id: i64,
        #[arg(long, short)]
        yes: bool,
    },
    /// Show, add or delete comments.
    Comments {
        id: i64,
        #[arg(long)]
        add: Option<String>,
        #[arg(long, conflicts_with = "add")]
        delete: Option<i64>,
    },
}

#[derive(Subcommand)]
enum AdoptionAction {
    /// List all cats.
    List,
    /// List a cat for adoption.
    Create {
        image: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        age: String,
        #[arg(long, default_value = "")]
        breed: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long, default_value = "")]
        contact: String,
    },
    /// Mark one of your cats as adopted.
    Adopted { id: i64 },
}

#[derive(Subcommand)]
enum EventAction {
    /// List events.
    List,
    /// Create an event.
    Create {
        image: PathBuf,
        #[arg(long)]
        title: String,
        /// Event date (YYYY-MM-DD).
        #[arg(long)]
        date: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Join or leave an event.
    Join { id: i64 },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Site totals.
    Stats,
    /// All users.
    Users,
    /// Delete a user.
    DeleteUser {
        id: i64,
        #[arg(long, short)]
        yes: bool,
    },
    /// Delete any post.
    DeletePost {
        id: i64,
        #[arg(long, short)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli
        .config
        .map(PathBuf::from)
        .unwrap_or_else(ClientConfig::default_path);

    match cli.command {
        Commands::Profile { action } => match action {
            ProfileAction::Create { name, api, upload, login_email } => {
                let profile = Profile {
                    name,
                    api_url: api,
                    upload_url: upload.unwrap_or_default(),
                    email: login_email.unwrap_or_default(),
                };
                commands::profile::create(&config_path, profile)?;
            }
            ProfileAction::List => commands::profile::list(&config_path)?,
            ProfileAction::Delete { name } => commands::profile::delete(&config_path, &name)?,
        },
        Commands::Use { name } => commands::profile::use_profile(&config_path, &name)?,
        Commands::Signup { username, name } => {
            let creds = Credentials { email: cli.email, password: cli.password };
            let app = commands::session::register(
                &config_path,
                cli.settings.as_deref(),
                creds,
                username.clone(),
                name,
            )
            .await?;
            println!("Welcome to CatPaw, @{username}!");
            commands::session::close(app).await;
        }
        Commands::Version => {
            println!("catpaw {}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Online(command) => {
            let creds = Credentials { email: cli.email, password: cli.password };
            let app = commands::session::open(&config_path, cli.settings.as_deref(), creds).await?;
            let result = run(&app, command).await;
            commands::session::close(app).await;
            result?;
        }
    }

    Ok(())
}

async fn run(app: &CatPawApp, command: Online) -> anyhow::Result<()> {
    use commands::*;

    match command {
        Online::Feed => feed::list(app).await,
        Online::Saved => feed::saved(app).await,
        Online::Post { action } => match action {
            PostAction::Like { id } => feed::like(app, id).await,
            PostAction::Save { id } => feed::save(app, id).await,
            PostAction::Create { image, caption } => feed::create(app, &image, caption).await,
            PostAction::Delete { id, yes } => {
                if !yes && !confirm(&format!("Delete post {id}?"))? {
                    return Ok(());
                }
                feed::delete(app, id).await
            }
            PostAction::Comments { id, add, delete } => {
                let action = match (add, delete) {
                    (Some(text), _) => CommentAction::Add(text),
                    (None, Some(comment_id)) => CommentAction::Delete(comment_id),
                    (None, None) => CommentAction::List,
                };
                feed::comments(app, id, action).await
            }
        },
        Online::User { id: Some(id), follow: true } => users::follow(app, id).await,
        Online::User { follow: true, .. } => anyhow::bail!("--follow needs a user id"),
        Online::User { id, .. } => users::show(app, id).await,
        Online::EditProfile { name, bio, picture } => {
            users::update(app, name, bio, picture.as_deref()).await
        }
        Online::Search { query } => users::search(app, query).await,
        Online::Stories => stories::tray(app).await,
        Online::ShareStory { image } => stories::upload(app, &image).await,
        Online::Story { user_id } => stories::play(app, user_id).await,
        Online::Inbox => chat::inbox(app).await,
        Online::Chat { peer_id, send, watch } => {
            chat::open(app, peer_id, send, watch.map(Duration::from_secs)).await
        }
        Online::Adoption { action } => match action {
            AdoptionAction::List => listings::list(app).await,
            AdoptionAction::Create { image, name, age, breed, description, location, contact } => {
                let listing = NewAdoption {
                    cat_name: name,
                    cat_age: age,
                    cat_breed: breed,
                    description,
                    location,
                    contact_info: contact,
                    image: read_image(&image).await?,
                };
                listings::create(app, listing).await
            }
            AdoptionAction::Adopted { id } => listings::mark_adopted(app, id).await,
        },
        Online::Event { action } => match action {
            EventAction::List => events::list(app).await,
            EventAction::Create { image, title, date, location, description } => {
                let event = NewEvent {
                    title,
                    description,
                    event_date: date,
                    location,
                    image: read_image(&image).await?,
                };
                events::create(app, event).await
            }
            EventAction::Join { id } => events::join(app, id).await,
        },
        Online::Notifications { mark_read } => notifications::list(app, mark_read).await,
        Online::Admin { action } => match action {
            AdminAction::Stats => admin::stats(app).await,
            AdminAction::Users => admin::users(app).await,
            AdminAction::DeleteUser { id, yes } => {
                if !yes && !confirm(&format!("Delete user {id} and everything they posted?"))? {
                    return Ok(());
                }
                admin::delete_user(app, id).await
            }
            AdminAction::DeletePost { id, yes } => {
                if !yes && !confirm(&format!("Delete post {id}?"))? {
                    return Ok(());
                }
                admin::delete_post(app, id).await
            }
        },
    }
}
