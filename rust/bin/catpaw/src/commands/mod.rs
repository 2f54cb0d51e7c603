//! Subcommand implementations.

pub mod admin;
pub mod chat;
pub mod events;
pub mod feed;
pub mod listings;
pub mod notifications;
pub mod profile;
pub mod session;
pub mod stories;
pub mod users;

use std::any::Any;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use catpaw_client::ImageUpload;
use catpaw_flux::Flux;

/// Poll the store until the value at `path` satisfies `ready`.
pub async fn wait_for<T, F>(flux: &Flux, path: &str, timeout: Duration, ready: F) -> Option<T>
where
    T: Any + Clone,
    F: Fn(&T) -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if let Some(value) = flux.get_as::<T>(path).filter(|v| ready(v)) {
            return Some(value);
        }
        if tokio::time::Instant::now() >= deadline {
            return None;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

/// Ask for a yes/no confirmation on stderr.
pub fn confirm(prompt: &str) -> anyhow::Result<bool> {
    eprint!("{prompt} [y/N]: ");
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

/// Read an image file for upload.
pub async fn read_image(path: &Path) -> anyhow::Result<ImageUpload> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image.jpg".into());
    Ok(ImageUpload::new(name, bytes))
}

/// `value` or `-` when blank.
pub fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() { "-" } else { value }
}
