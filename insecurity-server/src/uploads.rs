use anyhow::{Context, Result};
use std::path::Path;
use uuid::Uuid;

/// File types accepted for post images.
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// Extract the extension of a client-supplied filename, if it is allowed.
///
/// Only the final path component is considered, so traversal attempts like
/// `../../etc/passwd.png` contribute nothing but their extension.
pub fn allowed_extension(filename: &str) -> Option<String> {
    let name = Path::new(filename).file_name()?.to_str()?;
    let ext = name.rsplit_once('.')?.1.to_ascii_lowercase();
    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Some(ext)
    } else {
        None
    }
}

/// Store uploaded image bytes under the uploads directory.
///
/// The stored name is a fresh UUID plus the validated extension, never the
/// client-supplied filename, so uploads cannot collide or escape the
/// directory. Returns the stored filename.
pub async fn store_image(uploads_dir: &Path, extension: &str, data: &[u8]) -> Result<String> {
    let stored_name = format!("{}.{}", Uuid::new_v4(), extension);
    let path = uploads_dir.join(&stored_name);
    tokio::fs::write(&path, data)
        .await
        .with_context(|| format!("Failed to write upload to {}", path.display()))?;
    Ok(stored_name)
}
