use crate::error::ServiceError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A picture picked from the gallery (a file on disk) or captured by the
/// camera and handed over as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum ImageSource {
    File(PathBuf),
    Bytes(Vec<u8>),
}

impl ImageSource {
    pub async fn read(&self) -> Result<Vec<u8>, ServiceError> {
        match self {
            ImageSource::File(path) => {
                tokio::fs::read(path)
                    .await
                    .map_err(|source| ServiceError::ImageRead {
                        path: path.display().to_string(),
                        source,
                    })
            }
            ImageSource::Bytes(bytes) => Ok(bytes.clone()),
        }
    }

    pub fn extension(&self) -> &'static str {
        let ext = match self {
            ImageSource::File(path) => lowercase_extension(path),
            ImageSource::Bytes(_) => None,
        };
        match ext.as_deref() {
            Some("png") => "png",
            Some("webp") => "webp",
            _ => "jpg",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self.extension() {
            "png" => "image/png",
            "webp" => "image/webp",
            _ => "image/jpeg",
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ImageSource::File(path) => path.display().to_string(),
            ImageSource::Bytes(bytes) => format!("<{} captured bytes>", bytes.len()),
        }
    }
}

fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
}
