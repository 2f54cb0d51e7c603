/// Resolves stored media names against the upload host.
///
/// The backend stores bare file names (`post_14.jpg`); some rows already
/// carry absolute URLs. Both forms resolve to something fetchable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaResolver {
    base: String,
}

impl MediaResolver {
    pub fn new(upload_base_url: impl Into<String>) -> Self {
        Self { base: upload_base_url.into().trim_end_matches('/').to_string() }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Absolute URL for a media reference. Empty references resolve to `None`.
    pub fn resolve(&self, name: Option<&str>) -> Option<String> {
        let name = name?.trim();
        if name.is_empty() {
            return None;
        }
        if name.starts_with("http://") || name.starts_with("https://") {
            return Some(name.to_string());
        }
        Some(format!("{}/{}", self.base, name.trim_start_matches('/')))
    }
}
