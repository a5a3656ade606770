use crate::domain::dataset::{Dataset, DEFAULT_SELECTION_COLUMN};
use crate::domain::ports::DatasetProvider;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;

/// 以 CSV 檔模擬工作表：第一列是標題，勾選欄以名稱指定
#[derive(Debug, Clone)]
pub struct CsvDataset {
    path: PathBuf,
    start_row: usize,
    selection_column: String,
}

impl CsvDataset {
    pub fn new(path: impl Into<PathBuf>, start_row: usize) -> Self {
        Self {
            path: path.into(),
            start_row,
            selection_column: DEFAULT_SELECTION_COLUMN.to_string(),
        }
    }

    pub fn with_selection_column(mut self, column: impl Into<String>) -> Self {
        self.selection_column = column.into();
        self
    }

    /// 讀取所有列，每列長度可以不同
    pub fn parse_values(data: &[u8]) -> Result<Vec<Vec<Value>>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(data);

        let mut values = Vec::new();
        for record in reader.records() {
            let record = record?;
            values.push(record.iter().map(|cell| Value::String(cell.to_string())).collect());
        }
        Ok(values)
    }
}

#[async_trait]
impl DatasetProvider for CsvDataset {
    async fn load_dataset(&self) -> Result<Dataset> {
        tracing::debug!("📥 Reading sheet data from {}", self.path.display());
        let data = tokio::fs::read(&self.path).await?;
        let values = Self::parse_values(&data)?;
        Dataset::from_sheet(values, self.start_row, &self.selection_column)
    }
}
