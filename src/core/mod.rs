pub mod engine;
pub mod generator;
pub mod geometry;
pub mod image_resolver;
pub mod naming;
pub mod placeholder;
pub mod text;
pub mod z_order;

pub use crate::domain::dataset::Dataset;
pub use crate::domain::model::{GenerationConfig, GenerationResult};
pub use crate::domain::ports::{BlobStore, ConfigProvider, DatasetProvider, DeckStore, Storage};
pub use crate::utils::error::Result;
