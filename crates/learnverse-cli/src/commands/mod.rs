//! Subcommand implementations, one module per screen.

pub mod activities;
pub mod admin;
pub mod auth;
pub mod chat;
pub mod community;
pub mod enrollment;
pub mod interests;
pub mod reviews;
pub mod verification;

use std::path::Path;

use anyhow::{Context, Result, bail};

use learnverse_core::model::UploadFile;
use learnverse_http::{AuthViewModel, FormState};

/// Turn a failed form submission into a command error.
pub(crate) fn check_form(view_model: &AuthViewModel) -> Result<()> {
    if let FormState::Failed(message) = view_model.form_state() {
        bail!(message);
    }
    Ok(())
}

/// Read a local file for a multipart upload.
pub(crate) async fn read_upload(path: &Path) -> Result<UploadFile> {
    let content = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .context("Upload path has no file name")?;

    Ok(UploadFile::new(file_name, mime_type(path), content))
}

fn mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_type_from_extension() {
        assert_eq!(mime_type(Path::new("scan.PDF")), "application/pdf");
        assert_eq!(mime_type(Path::new("photo.jpeg")), "image/jpeg");
        assert_eq!(mime_type(Path::new("notes")), "application/octet-stream");
    }

    #[tokio::test]
    async fn upload_keeps_file_name_and_content() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("diploma.pdf");
        std::fs::write(&path, b"%PDF").unwrap();

        let upload = read_upload(&path).await.unwrap();
        assert_eq!(upload.file_name, "diploma.pdf");
        assert_eq!(upload.mime_type, "application/pdf");
        assert_eq!(&upload.content[..], b"%PDF");
    }
}
