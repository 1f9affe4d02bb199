//! Image attachments for send-media. Files are checked locally so a bad
//! upload fails before any bytes go over the wire.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

const IMAGE_TYPES: [(&str, &str); 5] = [
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
];

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("image not found: {0}")]
    NotFound(PathBuf),
    #[error("invalid file type '{ext}' for {file}; allowed: png, jpg, jpeg, gif, webp")]
    UnsupportedType { file: String, ext: String },
    #[error("file too large: {file} ({size} bytes, max 10MB)")]
    TooLarge { file: String, size: u64 },
    #[error("nothing to send: message is empty and no images were attached")]
    Empty,
    #[error("IO error reading {file}: {source}")]
    Io {
        file: String,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

pub fn mime_for(path: &Path) -> Result<&'static str, MediaError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    IMAGE_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
        .ok_or_else(|| MediaError::UnsupportedType {
            file: display_name(path),
            ext,
        })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn load(path: &Path) -> Result<Attachment, MediaError> {
    let mime = mime_for(path)?;
    let file = display_name(path);
    let meta = fs::metadata(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            MediaError::NotFound(path.to_path_buf())
        } else {
            MediaError::Io {
                file: file.clone(),
                source,
            }
        }
    })?;
    if meta.len() > MAX_IMAGE_BYTES {
        return Err(MediaError::TooLarge {
            file,
            size: meta.len(),
        });
    }
    let bytes = fs::read(path).map_err(|source| MediaError::Io {
        file: file.clone(),
        source,
    })?;
    Ok(Attachment {
        file_name: file,
        mime,
        bytes,
    })
}

pub fn load_all(paths: &[PathBuf]) -> Result<Vec<Attachment>, MediaError> {
    paths.iter().map(|p| load(p)).collect()
}

/// A media send needs text, images, or both.
pub fn ensure_payload(message: &str, attachments: &[Attachment]) -> Result<(), MediaError> {
    if message.trim().is_empty() && attachments.is_empty() {
        return Err(MediaError::Empty);
    }
    Ok(())
}
