use crate::deck::Size;
use crate::domain::model::{ImageFieldConfig, ImageSource};
use crate::domain::ports::BlobStore;
use crate::utils::error::{DeckError, Result};
use crate::utils::validation::validate_url;
use regex::Regex;
use reqwest::Client;
use std::io::Cursor;
use std::sync::LazyLock;
use std::time::Duration;

static DRIVE_PATH_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/d/([A-Za-z0-9_-]+)").unwrap());
static QUERY_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]id=([A-Za-z0-9_-]+)").unwrap());

/// 下載後的圖片
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    /// 無法解析格式時為 `None`
    pub native_size: Option<Size>,
}

impl ImagePayload {
    pub fn new(bytes: Vec<u8>, content_type: Option<String>) -> Self {
        let native_size = probe_dimensions(&bytes);
        Self {
            bytes,
            content_type,
            native_size,
        }
    }
}

pub struct ImageResolver<B: BlobStore> {
    blobs: B,
    client: Client,
    timeout: Option<Duration>,
}

impl<B: BlobStore> ImageResolver<B> {
    pub fn new(blobs: B) -> Self {
        Self {
            blobs,
            client: Client::new(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub async fn resolve(&self, field: &ImageFieldConfig, raw_value: &str) -> Result<ImagePayload> {
        let raw_value = raw_value.trim();
        match field.source {
            ImageSource::Url => self.fetch_url(&field.field, raw_value).await,
            ImageSource::ReferenceId => {
                let id = extract_reference_id(raw_value);
                tracing::debug!("🔑 {}: resolved reference '{}' -> '{}'", field.field, raw_value, id);
                let bytes = self.blobs.fetch_blob(&id).await.map_err(|e| {
                    DeckError::fetch(&field.field, format!("reference '{}' is not accessible: {}", id, e))
                })?;
                Ok(ImagePayload::new(bytes, None))
            }
        }
    }

    async fn fetch_url(&self, field: &str, url: &str) -> Result<ImagePayload> {
        let url = validate_url(field, url).map_err(|e| DeckError::fetch(field, e.to_string()))?;

        tracing::debug!("🌐 {}: GET {}", field, url);
        let mut request = self.client.get(url);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DeckError::fetch(field, e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(DeckError::HttpStatusError {
                field: field.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?;
        Ok(ImagePayload::new(bytes.to_vec(), content_type))
    }
}

/// 從分享連結取出檔案 ID；純 ID 與其他值都原樣回傳
pub fn extract_reference_id(raw: &str) -> String {
    let raw = raw.trim();
    for pattern in [&DRIVE_PATH_ID, &QUERY_ID] {
        if let Some(caps) = pattern.captures(raw) {
            return caps[1].to_string();
        }
    }
    raw.to_string()
}

fn probe_dimensions(bytes: &[u8]) -> Option<Size> {
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?;
    match reader.into_dimensions() {
        Ok((w, h)) => Some(Size::new(f64::from(w), f64::from(h))),
        Err(e) => {
            tracing::debug!("Could not read image dimensions: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_from_drive_path() {
        assert_eq!(
            extract_reference_id("https://drive.example.com/file/d/ABCDEFGHIJ1234567890/view"),
            "ABCDEFGHIJ1234567890"
        );
    }

    #[test]
    fn test_extract_from_query() {
        assert_eq!(
            extract_reference_id("https://drive.example.com/open?id=abc_DEF-123"),
            "abc_DEF-123"
        );
        assert_eq!(
            extract_reference_id("https://drive.example.com/uc?export=view&id=XYZ"),
            "XYZ"
        );
    }

    #[test]
    fn test_bare_and_fallback() {
        assert_eq!(
            extract_reference_id("  1a2B3c4D5e6F7g8H9i0J_-xy "),
            "1a2B3c4D5e6F7g8H9i0J_-xy"
        );
        assert_eq!(extract_reference_id("short-id"), "short-id");
    }

    #[test]
    fn test_probe_dimensions() {
        let img = image::RgbImage::new(12, 7);
        let mut png = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut png, image::ImageFormat::Png)
            .unwrap();

        let payload = ImagePayload::new(png.into_inner(), Some("image/png".to_string()));
        assert_eq!(payload.native_size, Some(Size::new(12.0, 7.0)));
        assert_eq!(ImagePayload::new(b"not an image".to_vec(), None).native_size, None);
    }
}
