use crate::core::generator::SlideGenerator;
use crate::core::{BlobStore, ConfigProvider, DatasetProvider, DeckStore};
use crate::domain::model::GenerationResult;
use crate::utils::error::{DeckError, Result};

/// 串起設定、資料與產生器
pub struct DeckEngine<D: DeckStore, B: BlobStore> {
    generator: SlideGenerator<D, B>,
    config: Box<dyn ConfigProvider>,
    dataset: Box<dyn DatasetProvider>,
}

impl<D: DeckStore, B: BlobStore> DeckEngine<D, B> {
    pub fn new(
        generator: SlideGenerator<D, B>,
        config: Box<dyn ConfigProvider>,
        dataset: Box<dyn DatasetProvider>,
    ) -> Self {
        Self {
            generator,
            config,
            dataset,
        }
    }

    pub async fn run(&self) -> Result<GenerationResult> {
        tracing::info!("🚀 Starting slide generation");

        let config = self.config.generation_config()?;
        tracing::info!(
            "📋 Template '{}' slide {}, {} image fields",
            config.template_id,
            config.template_slide_index,
            config.image_fields.len()
        );

        let dataset = self.dataset.load_dataset().await?;
        tracing::info!(
            "📊 Loaded {} headers, {} of {} rows selected",
            dataset.headers.len(),
            dataset.selected_rows,
            dataset.total_rows
        );
        if dataset.rows.is_empty() {
            return Err(DeckError::data("No rows are selected for generation"));
        }

        let result = self.generator.generate(&dataset, &config).await?;
        tracing::info!(
            "📦 Deck '{}' saved as {} ({} slides)",
            result.file_name,
            result.file_id,
            result.slides_generated
        );
        Ok(result)
    }
}
