use crate::core::geometry::fit;
use crate::core::image_resolver::ImageResolver;
use crate::core::naming::render_file_name;
use crate::core::placeholder::find_placeholders;
use crate::core::text::{replace_tokens, strip_token};
use crate::core::z_order::{place_behind, DEFAULT_STEP_MARGIN};
use crate::deck::{Presentation, Size, Slide};
use crate::domain::dataset::{field_value, is_empty_row, Dataset};
use crate::domain::model::{
    FitMode, GenerationConfig, GenerationResult, ImageFieldConfig, PlaceholderMatch,
};
use crate::domain::ports::{BlobStore, DeckStore};
use crate::utils::error::{DeckError, Result};
use chrono::Local;

/// 依資料列產生投影片：每一列複製一次藍圖投影片，填入文字與圖片
pub struct SlideGenerator<D: DeckStore, B: BlobStore> {
    decks: D,
    images: ImageResolver<B>,
    step_margin: usize,
}

impl<D: DeckStore, B: BlobStore> SlideGenerator<D, B> {
    pub fn new(decks: D, images: ImageResolver<B>) -> Self {
        Self {
            decks,
            images,
            step_margin: DEFAULT_STEP_MARGIN,
        }
    }

    pub fn with_step_margin(mut self, step_margin: usize) -> Self {
        self.step_margin = step_margin;
        self
    }

    pub async fn generate(&self, dataset: &Dataset, config: &GenerationConfig) -> Result<GenerationResult> {
        // 先以唯讀方式檢查範本，避免建立無用的副本
        let template = self.decks.open(&config.template_id).await?;
        let slide_count = template.slide_count();
        if config.template_slide_index == 0 || config.template_slide_index > slide_count {
            return Err(DeckError::config(format!(
                "template_slide_index {} is out of range, template '{}' has {} slides",
                config.template_slide_index, config.template_id, slide_count
            )));
        }
        drop(template);

        let file_name = render_file_name(&config.file_name_pattern, Local::now());
        let file_id = self
            .decks
            .copy_template(&config.template_id, &config.output_folder_id, &file_name)
            .await?;
        tracing::info!("📄 Created working copy '{}' ({})", file_name, file_id);

        let mut deck = self.decks.open(&file_id).await?;
        let outcome = self.fill_deck(&mut deck, dataset, config).await;

        // 不論成功與否，副本只存一次
        let saved = self.decks.save(&deck).await;
        let slides_generated = outcome?;
        saved?;

        tracing::info!(
            "✅ Generated {} slides from {} rows into '{}'",
            slides_generated,
            dataset.rows.len(),
            file_name
        );
        Ok(GenerationResult {
            file_id,
            file_name,
            slides_generated,
        })
    }

    async fn fill_deck(&self, deck: &mut Presentation, dataset: &Dataset, config: &GenerationConfig) -> Result<usize> {
        let blueprint_id = deck.retain_only(config.template_slide_index - 1)?;
        let rendered = self.render_rows(deck, &blueprint_id, dataset, config).await;
        // 藍圖投影片不能出現在輸出中
        deck.remove_slide(&blueprint_id);
        rendered
    }

    async fn render_rows(
        &self,
        deck: &mut Presentation,
        blueprint_id: &str,
        dataset: &Dataset,
        config: &GenerationConfig,
    ) -> Result<usize> {
        let mut generated = 0;

        for (i, row) in dataset.rows.iter().enumerate() {
            if is_empty_row(row) {
                tracing::debug!("⏭️  Row {} is empty, skipped", i + 1);
                continue;
            }

            let slide_id = deck.append_duplicate(blueprint_id)?;
            let values = dataset.row_values(row);

            let mut replaced = 0;
            deck.slide_mut(&slide_id)?
                .for_each_text_mut(|text| {
                    replaced += replace_tokens(text, &values, |field| config.is_image_field(field))
                });
            tracing::debug!("📝 Row {}: replaced {} text placeholders", i + 1, replaced);

            if !config.image_fields.is_empty() {
                self.apply_images(deck, &slide_id, &values, &config.image_fields)
                    .await?;
            }
            generated += 1;
        }

        Ok(generated)
    }

    async fn apply_images(
        &self,
        deck: &mut Presentation,
        slide_id: &str,
        values: &[(String, String)],
        fields: &[ImageFieldConfig],
    ) -> Result<()> {
        for field in fields {
            let token = field.token();
            let raw = field_value(values, &field.field).trim();

            let matches = find_placeholders(deck.slide_mut(slide_id)?, &token);
            if matches.is_empty() {
                tracing::debug!("🖼️  {} not found on slide, skipped", token);
                continue;
            }

            if raw.is_empty() {
                let slide = deck.slide_mut(slide_id)?;
                for m in &matches {
                    strip_match(slide, m, &token);
                }
                tracing::debug!("🖼️  {} is empty, removed {} placeholders", field.field, matches.len());
                continue;
            }

            let payload = self.images.resolve(field, raw).await?;
            let native_size = payload.native_size;
            let media_id = deck.add_media(payload.bytes, payload.content_type);

            let slide = deck.slide_mut(slide_id)?;
            for m in &matches {
                self.place_image(slide, m, &media_id, native_size, field.fit);
                strip_match(slide, m, &token);
            }
            tracing::debug!("🖼️  {}: inserted {} images", field.field, matches.len());
        }
        Ok(())
    }

    fn place_image(
        &self,
        slide: &mut Slide,
        placeholder: &PlaceholderMatch,
        media_id: &str,
        native_size: Option<Size>,
        mode: FitMode,
    ) {
        let Some(placeholder_transform) = slide
            .find_shape(&placeholder.element_id)
            .map(|shape| shape.transform)
        else {
            tracing::warn!("⚠️  Placeholder shape {} disappeared", placeholder.element_id);
            return;
        };

        let image_id = slide.insert_image(media_id, native_size);
        let fitted = fit(native_size, placeholder_transform.bounds(), mode);

        if let Some(image) = slide.image_mut(&image_id) {
            image.transform.set_bounds(fitted.frame);
            match fitted.crop {
                Some(crop) => {
                    // 大小已經是整個框，裁切失敗就等同 STRETCH
                    if let Err(e) = image.set_crop(crop) {
                        tracing::warn!("⚠️  Cover crop not applied, image stretched instead: {}", e);
                    }
                }
                None if mode == FitMode::Cover => {
                    tracing::warn!("⚠️  Image size unknown, cover falls back to stretch");
                }
                None => {}
            }
            // 旋轉最後套用
            image.transform.rotation = placeholder_transform.rotation;
        }

        if let Err(warning) = place_behind(slide, &image_id, &placeholder.anchor_id, self.step_margin) {
            tracing::warn!("⚠️  Image left at default layer: {}", warning);
        }
    }
}

fn strip_match(slide: &mut Slide, placeholder: &PlaceholderMatch, token: &str) {
    match slide
        .find_shape_mut(&placeholder.element_id)
        .and_then(|shape| shape.text_mut())
    {
        Some(text) => strip_token(text, token),
        None => tracing::warn!("⚠️  Could not strip {} from {}", token, placeholder.element_id),
    }
}
