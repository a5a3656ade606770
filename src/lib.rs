pub mod adapters;
pub mod config;
pub mod core;
pub mod deck;
pub mod domain;
pub mod utils;

pub use adapters::{CsvDataset, LocalStorage};
pub use config::TomlConfig;
pub use crate::core::{engine::DeckEngine, generator::SlideGenerator, image_resolver::ImageResolver};
pub use domain::dataset::Dataset;
pub use domain::model::{FitMode, GenerationConfig, GenerationResult, ImageFieldConfig, ImageSource};
pub use utils::error::{DeckError, Result};
