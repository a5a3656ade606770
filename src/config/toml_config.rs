use crate::core::image_resolver::ImageResolver;
use crate::core::z_order::DEFAULT_STEP_MARGIN;
use crate::core::ConfigProvider;
use crate::domain::dataset::DEFAULT_SELECTION_COLUMN;
use crate::domain::model::{FitMode, GenerationConfig, ImageFieldConfig, ImageSource};
use crate::utils::error::{DeckError, Result};
use crate::utils::validation::{self, Validate};
use crate::adapters::{CsvDataset, LocalStorage};
use serde::{Deserialize, Serialize};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

static ENV_VAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub generation: GenerationSection,
    #[serde(default)]
    pub images: Vec<ImageSection>,
    pub data: DataSection,
    pub storage: StorageSection,
    pub http: Option<HttpSection>,
    pub placement: Option<PlacementSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSection {
    pub template_id: Option<String>,
    pub output_folder: Option<String>,
    pub file_name_pattern: Option<String>,
    pub start_row: Option<usize>,
    pub template_slide_index: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSection {
    pub field: String,
    pub source: ImageSource,
    #[serde(default)]
    pub fit: FitMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSection {
    pub path: String,
    pub selection_column: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSection {
    pub base_path: String,
    pub blob_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSection {
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementSection {
    pub step_margin: Option<usize>,
}

const DEFAULT_FILE_NAME_PATTERN: &str = "Generated slides {{date}}";
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DeckError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| DeckError::ConfigParseError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${TEMPLATE_ID})
    fn substitute_env_vars(content: &str) -> String {
        let result = ENV_VAR.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        result.to_string()
    }

    pub fn start_row(&self) -> usize {
        self.generation.start_row.unwrap_or(2)
    }

    pub fn template_slide_index(&self) -> usize {
        self.generation.template_slide_index.unwrap_or(1)
    }

    pub fn file_name_pattern(&self) -> &str {
        self.generation
            .file_name_pattern
            .as_deref()
            .unwrap_or(DEFAULT_FILE_NAME_PATTERN)
    }

    pub fn selection_column(&self) -> &str {
        self.data
            .selection_column
            .as_deref()
            .unwrap_or(DEFAULT_SELECTION_COLUMN)
    }

    pub fn timeout(&self) -> Duration {
        let seconds = self
            .http
            .as_ref()
            .and_then(|h| h.timeout_seconds)
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS);
        Duration::from_secs(seconds)
    }

    pub fn step_margin(&self) -> usize {
        self.placement
            .as_ref()
            .and_then(|p| p.step_margin)
            .unwrap_or(DEFAULT_STEP_MARGIN)
    }

    /// 宣告順序即為 index（從 1 開始）
    pub fn image_fields(&self) -> Vec<ImageFieldConfig> {
        self.images
            .iter()
            .enumerate()
            .map(|(i, image)| ImageFieldConfig {
                index: i + 1,
                field: image.field.trim().to_string(),
                source: image.source,
                fit: image.fit,
            })
            .collect()
    }

    pub fn storage(&self) -> LocalStorage {
        let storage = LocalStorage::new(&self.storage.base_path);
        match &self.storage.blob_dir {
            Some(dir) => storage.with_blob_dir(dir.clone()),
            None => storage,
        }
    }

    pub fn image_resolver(&self) -> ImageResolver<LocalStorage> {
        ImageResolver::new(self.storage()).with_timeout(self.timeout())
    }

    /// 資料路徑相對於目前工作目錄
    pub fn dataset(&self) -> CsvDataset {
        CsvDataset::new(&self.data.path, self.start_row()).with_selection_column(self.selection_column())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        let template_id = validation::validate_required_field("generation.template_id", &self.generation.template_id)?;
        validation::validate_non_empty_string("generation.template_id", template_id)?;

        let folder = validation::validate_required_field("generation.output_folder", &self.generation.output_folder)?;
        validation::validate_non_empty_string("generation.output_folder", folder)?;

        validation::validate_non_empty_string("generation.file_name_pattern", self.file_name_pattern())?;
        validation::validate_positive_number("generation.start_row", self.start_row(), 2)?;
        validation::validate_positive_number(
            "generation.template_slide_index",
            self.template_slide_index(),
            1,
        )?;

        validation::validate_path("data.path", &self.data.path)?;
        validation::validate_file_extension("data.path", &self.data.path, &["csv"])?;
        validation::validate_non_empty_string("data.selection_column", self.selection_column())?;
        validation::validate_path("storage.base_path", &self.storage.base_path)?;

        for image in &self.images {
            validation::validate_non_empty_string("images.field", &image.field)?;
        }
        validation::validate_unique("images.field", self.images.iter().map(|i| i.field.trim()))?;

        validation::validate_range("http.timeout_seconds", self.timeout().as_secs(), 1, 300)?;
        validation::validate_range("placement.step_margin", self.step_margin(), 0, 100)?;

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn generation_config(&self) -> Result<GenerationConfig> {
        self.validate_config()?;
        Ok(GenerationConfig {
            template_id: self.generation.template_id.clone().unwrap_or_default(),
            output_folder_id: self.generation.output_folder.clone().unwrap_or_default(),
            file_name_pattern: self.file_name_pattern().to_string(),
            start_row: self.start_row(),
            template_slide_index: self.template_slide_index(),
            image_fields: self.image_fields(),
        })
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
