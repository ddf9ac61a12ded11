use thiserror::Error;

#[derive(Error, Debug)]
pub enum GuideError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Guide document is not valid UTF-8: {0}")]
    EncodingError(#[from] std::string::FromUtf8Error),

    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("Document structure error: {message}")]
    StructureError { message: String },

    #[error("Unknown step reference: {reference}")]
    UnknownStepError { reference: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Document,
    Progress,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Código de salida del proceso para errores de esta severidad.
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl GuideError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GuideError::ParseError { .. }
            | GuideError::StructureError { .. }
            | GuideError::EncodingError(_) => ErrorCategory::Document,
            GuideError::UnknownStepError { .. } => ErrorCategory::Progress,
            GuideError::ConfigError { .. }
            | GuideError::ConfigValidationError { .. }
            | GuideError::InvalidConfigValueError { .. }
            | GuideError::MissingConfigError { .. } => ErrorCategory::Configuration,
            GuideError::ZipError(_)
            | GuideError::CsvError(_)
            | GuideError::IoError(_)
            | GuideError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            GuideError::UnknownStepError { .. }
            | GuideError::ParseError { .. }
            | GuideError::StructureError { .. } => ErrorSeverity::Medium,
            GuideError::ConfigError { .. }
            | GuideError::ConfigValidationError { .. }
            | GuideError::InvalidConfigValueError { .. }
            | GuideError::MissingConfigError { .. }
            | GuideError::EncodingError(_) => ErrorSeverity::High,
            GuideError::ZipError(_)
            | GuideError::CsvError(_)
            | GuideError::IoError(_)
            | GuideError::SerializationError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            GuideError::ParseError { line, .. } => format!(
                "Revisa la línea {} del documento: los pasos van como 'N. texto' y los sub-pasos como 'N.M texto'",
                line
            ),
            GuideError::StructureError { .. } => {
                "Ejecuta 'guia-eda check' para ver el informe completo de estructura".to_string()
            }
            GuideError::EncodingError(_) => {
                "Guarda el documento de la guía en UTF-8".to_string()
            }
            GuideError::UnknownStepError { .. } => {
                "Usa una referencia que exista en la guía, por ejemplo '9' o '15.1'".to_string()
            }
            GuideError::ConfigError { .. }
            | GuideError::ConfigValidationError { .. }
            | GuideError::InvalidConfigValueError { .. }
            | GuideError::MissingConfigError { .. } => {
                "Revisa los argumentos de línea de comandos o el fichero TOML de configuración"
                    .to_string()
            }
            GuideError::IoError(_) => {
                "Comprueba que las rutas existen y que hay permisos de lectura y escritura"
                    .to_string()
            }
            GuideError::ZipError(_) | GuideError::CsvError(_) | GuideError::SerializationError(_) => {
                "Vuelve a lanzar el comando; si persiste, borra la carpeta de salida".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Document => format!("Problema con el documento de la guía: {}", self),
            ErrorCategory::Progress => format!("Problema con el registro de progreso: {}", self),
            ErrorCategory::Configuration => format!("Problema de configuración: {}", self),
            ErrorCategory::System => format!("Error del sistema: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, GuideError>;
