use std::path::Path;

use crate::error::ApiError;

/// An image attached to a multipart request.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = mime_for(&file_name).to_string();
        Self { file_name, mime, bytes }
    }

    /// Read an image from disk. MIME type is taken from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ApiError::Multipart(format!("{}: {e}", path.display())))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image.jpg")
            .to_string();
        Ok(Self::new(file_name, bytes))
    }

    pub(crate) fn into_part(self) -> Result<reqwest::multipart::Part, ApiError> {
        reqwest::multipart::Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.mime)
            .map_err(|e| ApiError::Multipart(e.to_string()))
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        _ => "image/jpeg",
    }
}

/// `create_post.php` form.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub caption: String,
    pub image: ImageUpload,
}

/// `upload_story.php` form.
#[derive(Debug, Clone)]
pub struct NewStory {
    pub image: ImageUpload,
}

/// `update_profile.php` form. The picture is only sent when replaced.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub full_name: String,
    pub bio: String,
    pub profile_pic: Option<ImageUpload>,
}

/// `create_adoption.php` form.
#[derive(Debug, Clone)]
pub struct NewAdoption {
    pub cat_name: String,
    pub cat_age: String,
    pub cat_breed: String,
    pub description: String,
    pub location: String,
    pub contact_info: String,
    pub image: ImageUpload,
}

/// `create_event.php` form.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub event_date: String,
    pub location: String,
    pub image: ImageUpload,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_from_extension() {
        assert_eq!(ImageUpload::new("a.PNG", vec![]).mime, "image/png");
        assert_eq!(ImageUpload::new("a.webp", vec![]).mime, "image/webp");
        assert_eq!(ImageUpload::new("noext", vec![]).mime, "image/jpeg");
    }

    #[tokio::test]
    async fn reads_image_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("whiskers.gif");
        tokio::fs::write(&path, b"GIF89a").await.unwrap();

        let img = ImageUpload::from_path(&path).await.unwrap();
        assert_eq!(img.file_name, "whiskers.gif");
        assert_eq!(img.mime, "image/gif");
        assert_eq!(img.bytes, b"GIF89a");
    }

    #[tokio::test]
    async fn missing_file_is_multipart_error() {
        let err = ImageUpload::from_path("/definitely/not/here.jpg").await.unwrap_err();
        assert!(matches!(err, ApiError::Multipart(_)));
    }
}
