use serde::{Deserialize, Serialize};

/// 圖片來源類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    /// 儲存空間中的檔案 ID（或內含 ID 的分享連結）
    ReferenceId,
    /// 直接以 HTTP 下載
    Url,
}

/// 圖片在佔位框內的縮放策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitMode {
    #[default]
    Contain,
    Cover,
    Stretch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageFieldConfig {
    /// 宣告順序，從 1 開始
    pub index: usize,
    /// 必須與資料表標題完全一致
    pub field: String,
    pub source: ImageSource,
    pub fit: FitMode,
}

impl ImageFieldConfig {
    pub fn token(&self) -> String {
        placeholder_token(&self.field)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub template_id: String,
    pub output_folder_id: String,
    /// 支援 `{{date}}`
    pub file_name_pattern: String,
    /// 資料起始列（1-based，標題列為第 1 列）
    pub start_row: usize,
    /// 藍圖投影片位置（1-based）
    pub template_slide_index: usize,
    pub image_fields: Vec<ImageFieldConfig>,
}

impl GenerationConfig {
    pub fn is_image_field(&self, header: &str) -> bool {
        self.image_fields.iter().any(|f| f.field == header)
    }
}

/// 某張投影片上單一欄位的匹配結果，處理完該投影片即丟棄
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderMatch {
    /// 含有 token 的文字形狀
    pub element_id: String,
    /// 最外層的群組（或形狀本身）
    pub anchor_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub file_id: String,
    pub file_name: String,
    pub slides_generated: usize,
}

pub fn placeholder_token(field: &str) -> String {
    format!("{{{{{}}}}}", field)
}
