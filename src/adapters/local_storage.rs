use crate::deck::Presentation;
use crate::domain::ports::{BlobStore, DeckStore, Storage};
use crate::utils::error::{DeckError, Result};
use std::io::{Read, Write};
use std::path::{Component, Path, PathBuf};
use uuid::Uuid;
use zip::write::{FileOptions, ZipWriter};
use zip::ZipArchive;

pub const DECK_EXTENSION: &str = "deck";
const MANIFEST: &str = "presentation.json";
const MEDIA_PREFIX: &str = "media/";

/// 本機資料夾：簡報存成 `<base>/<id>.deck`，圖片檔放在 `<base>/<blob_dir>/`
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    blob_dir: String,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            blob_dir: "blobs".to_string(),
        }
    }

    pub fn with_blob_dir(mut self, blob_dir: impl Into<String>) -> Self {
        self.blob_dir = blob_dir.into();
        self
    }

    fn deck_file(id: &str) -> String {
        format!("{}.{}", id, DECK_EXTENSION)
    }

    /// 只接受不會跳出 base_path 的相對路徑
    fn resolve(&self, relative: &str) -> Result<PathBuf> {
        let path = Path::new(relative);
        let safe = !relative.is_empty()
            && path
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !safe {
            return Err(DeckError::ProcessingError {
                message: format!("Refusing to access '{}' outside the storage folder", relative),
            });
        }
        Ok(self.base_path.join(path))
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.resolve(path)?;
        let data = tokio::fs::read(full_path).await?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path)?;

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }
}

impl DeckStore for LocalStorage {
    async fn open(&self, id: &str) -> Result<Presentation> {
        let file = Self::deck_file(id);
        if !self.resolve(&file)?.is_file() {
            return Err(DeckError::DeckNotFound { id: id.to_string() });
        }
        let bytes = self.read_file(&file).await?;
        let mut deck = decode_deck(&bytes)?;
        deck.id = id.to_string();
        tracing::debug!("📂 Opened deck {} ({} slides)", id, deck.slide_count());
        Ok(deck)
    }

    async fn copy_template(&self, template_id: &str, folder_id: &str, name: &str) -> Result<String> {
        let folder = self.resolve(folder_id)?;
        if !folder.is_dir() {
            return Err(DeckError::config(format!(
                "Output folder '{}' does not exist",
                folder_id
            )));
        }

        let mut deck = self.open(template_id).await?;
        let new_id = format!("{}/{}", folder_id.trim_end_matches('/'), Uuid::new_v4());
        deck.id = new_id.clone();
        deck.name = name.to_string();

        self.write_file(&Self::deck_file(&new_id), &encode_deck(&deck)?)
            .await?;
        tracing::debug!("📑 Copied template {} to {}", template_id, new_id);
        Ok(new_id)
    }

    async fn save(&self, deck: &Presentation) -> Result<()> {
        let data = encode_deck(deck)?;
        self.write_file(&Self::deck_file(&deck.id), &data).await?;
        tracing::debug!("💾 Saved deck {} ({} bytes)", deck.id, data.len());
        Ok(())
    }
}

impl BlobStore for LocalStorage {
    async fn fetch_blob(&self, id: &str) -> Result<Vec<u8>> {
        if id.contains('/') || id.contains('\\') {
            return Err(DeckError::ProcessingError {
                message: format!("Invalid blob id '{}'", id),
            });
        }
        let exact = format!("{}/{}", self.blob_dir, id);
        if self.resolve(&exact)?.is_file() {
            return self.read_file(&exact).await;
        }

        // 允許帶副檔名的檔案，例如 <id>.png
        let dir = self.resolve(&self.blob_dir)?;
        let mut entries = tokio::fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.is_file() && path.file_stem().and_then(|s| s.to_str()) == Some(id) {
                return Ok(tokio::fs::read(path).await?);
            }
        }

        Err(DeckError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Blob not found: {}", id),
        )))
    }
}

/// 簡報封存格式：`presentation.json` 加上每個媒體一個 `media/<id>` 項目
pub fn encode_deck(deck: &Presentation) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    zip.start_file::<_, ()>(MANIFEST, FileOptions::default())?;
    zip.write_all(serde_json::to_string_pretty(deck)?.as_bytes())?;

    for (media_id, blob) in &deck.media {
        zip.start_file::<_, ()>(format!("{}{}", MEDIA_PREFIX, media_id), FileOptions::default())?;
        zip.write_all(&blob.bytes)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

pub fn decode_deck(bytes: &[u8]) -> Result<Presentation> {
    let mut archive = ZipArchive::new(std::io::Cursor::new(bytes))?;

    let mut deck: Presentation = {
        let mut manifest = archive.by_name(MANIFEST)?;
        let mut json = String::new();
        manifest.read_to_string(&mut json)?;
        serde_json::from_str(&json)?
    };

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let Some(media_id) = entry.name().strip_prefix(MEDIA_PREFIX).map(str::to_string) else {
            continue;
        };
        let mut data = Vec::new();
        entry.read_to_end(&mut data)?;
        deck.media.entry(media_id).or_default().bytes = data;
    }

    Ok(deck)
}
