use gridwalk_common::TextureId;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;

/// A decoded RGBA8 image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// File stem, for logs and debug output.
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8, `width * height * 4` bytes.
    pub rgba: Vec<u8>,
}

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to write {path}: {source}")]
    Encode {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("texture not found: {0:?}")]
    NotFound(TextureId),
}

/// Content-addressed image registry.
///
/// Images are indexed by a hash of their encoded bytes, so loading the same
/// file twice stores it once and returns the same [`TextureId`].
#[derive(Debug, Clone, Default)]
pub struct AssetStore {
    images: BTreeMap<TextureId, ImageData>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and decode an image file.
    pub fn load_image(&mut self, path: impl AsRef<Path>) -> Result<TextureId, AssetError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unnamed".into());
        let id = self
            .insert_encoded(name, &bytes)
            .map_err(|source| AssetError::Decode {
                path: path.display().to_string(),
                source,
            })?;
        tracing::debug!(path = %path.display(), ?id, "loaded image");
        Ok(id)
    }

    /// Decode an in-memory encoded image (PNG, JPEG) and register it.
    pub fn insert_encoded(
        &mut self,
        name: impl Into<String>,
        bytes: &[u8],
    ) -> Result<TextureId, image::ImageError> {
        let id = content_hash(bytes);
        if self.images.contains_key(&id) {
            return Ok(id);
        }
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        self.images.insert(
            id,
            ImageData {
                name: name.into(),
                width,
                height,
                rgba: rgba.into_raw(),
            },
        );
        Ok(id)
    }

    pub fn get(&self, id: TextureId) -> Option<&ImageData> {
        self.images.get(&id)
    }

    /// Like [`get`](Self::get) but an error for unknown handles.
    pub fn require(&self, id: TextureId) -> Result<&ImageData, AssetError> {
        self.get(id).ok_or(AssetError::NotFound(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (TextureId, &ImageData)> {
        self.images.iter().map(|(id, data)| (*id, data))
    }

    /// Number of registered images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

fn content_hash(bytes: &[u8]) -> TextureId {
    let digest = Sha256::digest(bytes);
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    TextureId(u64::from_le_bytes(head))
}
