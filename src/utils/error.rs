use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("Deck archive error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Image decoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to parse configuration ({field}): {message}")]
    ConfigParseError { field: String, message: String },

    #[error("Data error: {message}")]
    DataError { message: String },

    #[error("Image fetch failed for field '{field}': {message}")]
    FetchError { field: String, message: String },

    #[error("Image fetch failed for field '{field}': HTTP status {status}")]
    HttpStatusError { field: String, status: u16 },

    #[error("Deck not found: {id}")]
    DeckNotFound { id: String },

    #[error("Deck processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Data,
    Network,
    Storage,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DeckError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn data(message: impl Into<String>) -> Self {
        Self::DataError {
            message: message.into(),
        }
    }

    pub fn fetch(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FetchError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigParseError { .. } => ErrorCategory::Configuration,
            Self::DataError { .. } | Self::CsvError(_) => ErrorCategory::Data,
            Self::HttpError(_) | Self::HttpStatusError { .. } | Self::FetchError { .. } => {
                ErrorCategory::Network
            }
            Self::IoError(_) | Self::ZipError(_) | Self::DeckNotFound { .. } => {
                ErrorCategory::Storage
            }
            Self::SerializationError(_) | Self::ImageError(_) | Self::ProcessingError { .. } => {
                ErrorCategory::Processing
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// 給使用者的修復建議
    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::MissingConfigError { field } => {
                format!("Add the '{}' entry to the configuration file", field)
            }
            Self::InvalidConfigValueError { field, .. } => {
                format!("Check the value of '{}' in the configuration file", field)
            }
            Self::ConfigParseError { .. } => {
                "Make sure the configuration file is valid TOML".to_string()
            }
            Self::ConfigError { .. } => {
                "Check template_id, output_folder and template_slide_index".to_string()
            }
            Self::DataError { .. } | Self::CsvError(_) => {
                "Check the sheet header row and the selection column".to_string()
            }
            Self::HttpStatusError { field, .. } | Self::FetchError { field, .. } => format!(
                "Check the image values in column '{}' and that they are reachable",
                field
            ),
            Self::HttpError(_) => "Check the network connection and retry".to_string(),
            Self::DeckNotFound { .. } => {
                "Check that the template deck exists under the storage base path".to_string()
            }
            Self::IoError(_) | Self::ZipError(_) => {
                "Check file permissions and available disk space".to_string()
            }
            Self::SerializationError(_) | Self::ImageError(_) | Self::ProcessingError { .. } => {
                "Re-run with --verbose and inspect the deck that failed".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Data => format!("Sheet data problem: {}", self),
            ErrorCategory::Network => format!("Could not fetch an image: {}", self),
            ErrorCategory::Storage => format!("Storage problem: {}", self),
            ErrorCategory::Processing => format!("Slide generation failed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, DeckError>;
