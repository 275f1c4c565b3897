//! Image intake: file picker and drag-and-drop both resolve to one [`ImageFile`].

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{ClientError, ClientResult};

const FALLBACK_MIME: &str = "application/octet-stream";

/// Opaque handle to the bytes of one candidate image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Arc<[u8]>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let name = name.into();
        let mime_type = mime_guess::from_path(&name)
            .first_raw()
            .unwrap_or(FALLBACK_MIME)
            .to_string();
        Self {
            name,
            mime_type,
            bytes: bytes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Where a candidate image came from. Only [`acquire`] looks at this.
#[derive(Debug, Clone)]
pub enum IntakeSource {
    Picker(PathBuf),
    /// Files dropped onto the upload area; the first one wins.
    Drop(Vec<PathBuf>),
    /// Bytes already in memory (clipboard, tests).
    Memory(ImageFile),
}

/// Resolves any intake source to a single image, or `None` for an empty drop.
pub async fn acquire(source: IntakeSource) -> ClientResult<Option<ImageFile>> {
    let path = match source {
        IntakeSource::Memory(file) => return Ok(Some(file)),
        IntakeSource::Picker(path) => path,
        IntakeSource::Drop(paths) => match paths.into_iter().next() {
            Some(path) => path,
            None => return Ok(None),
        },
    };
    read_image(&path).await.map(Some)
}

async fn read_image(path: &Path) -> ClientResult<ImageFile> {
    let bytes = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| ClientError::Selection(format!("{} is not a file", path.display())))?;
    tracing::debug!(file = %name, size_bytes = bytes.len(), "read image for intake");
    Ok(ImageFile::new(name, bytes))
}

/// `data:` URI used as the preview representation of a selected image.
pub fn preview_data_uri(file: &ImageFile) -> String {
    format!("data:{};base64,{}", file.mime_type, STANDARD.encode(&file.bytes))
}

#[cfg(test)]
#[path = "tests/intake_tests.rs"]
mod tests;
