// Adapters layer: concrete implementations for external systems (files, sheets).

pub mod csv_dataset;
pub mod local_storage;

pub use csv_dataset::CsvDataset;
pub use local_storage::LocalStorage;
