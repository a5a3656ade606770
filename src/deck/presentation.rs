use crate::deck::element::{new_object_id, Size};
use crate::deck::slide::Slide;
use crate::utils::error::{DeckError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 內嵌媒體。位元組另存於封存檔，JSON 只記錄類型。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaBlob {
    #[serde(skip)]
    pub bytes: Vec<u8>,
    #[serde(default)]
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Presentation {
    pub id: String,
    pub name: String,
    #[serde(default = "default_page_size")]
    pub page_size: Size,
    #[serde(default)]
    pub slides: Vec<Slide>,
    #[serde(default)]
    pub media: BTreeMap<String, MediaBlob>,
}

/// 16:9，單位 pt
fn default_page_size() -> Size {
    Size::new(720.0, 405.0)
}

impl Presentation {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            page_size: default_page_size(),
            slides: Vec::new(),
            media: BTreeMap::new(),
        }
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn slide_mut(&mut self, id: &str) -> Result<&mut Slide> {
        self.slides
            .iter_mut()
            .find(|s| s.object_id == id)
            .ok_or_else(|| DeckError::ProcessingError {
                message: format!("Slide '{}' not found in deck '{}'", id, self.id),
            })
    }

    /// 只保留第 `index` 張（0-based），回傳其 ID
    pub fn retain_only(&mut self, index: usize) -> Result<String> {
        if index >= self.slides.len() {
            return Err(DeckError::config(format!(
                "Slide index {} is out of range, deck '{}' has {} slides",
                index + 1,
                self.id,
                self.slides.len()
            )));
        }
        let kept = self.slides.swap_remove(index);
        let id = kept.object_id.clone();
        self.slides = vec![kept];
        Ok(id)
    }

    /// 複製投影片並附加到最後，回傳新投影片的 ID
    pub fn append_duplicate(&mut self, slide_id: &str) -> Result<String> {
        let copy = self.slide_mut(slide_id)?.duplicate();
        let id = copy.object_id.clone();
        self.slides.push(copy);
        Ok(id)
    }

    pub fn remove_slide(&mut self, slide_id: &str) -> bool {
        let before = self.slides.len();
        self.slides.retain(|s| s.object_id != slide_id);
        self.slides.len() != before
    }

    pub fn add_media(&mut self, bytes: Vec<u8>, content_type: Option<String>) -> String {
        let id = new_object_id();
        self.media
            .insert(id.clone(), MediaBlob { bytes, content_type });
        id
    }
}
