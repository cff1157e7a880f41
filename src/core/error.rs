use thiserror::Error;

/// Reasons an upload is turned away before any parsing happens.
#[derive(Debug, Error, PartialEq)]
pub enum UploadRejection {
    #[error("Nenhum arquivo encontrado")]
    MissingFile,
    #[error("Nome de arquivo vazio")]
    EmptyFilename,
    #[error("Tipo de arquivo não permitido")]
    DisallowedExtension(String),
    #[error("O tamanho do arquivo excede {limit_mb} MB")]
    TooLarge { size: u64, limit_mb: u64 },
}

#[derive(Debug, Error, PartialEq)]
pub enum TabchatError {
    #[error("Cannot parse config: {0}")]
    ConfigParsingError(String),
    #[error(transparent)]
    Validation(#[from] UploadRejection),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("DataFrame não encontrado. Por favor, faça o upload do arquivo primeiro.")]
    CacheMiss,
    #[error("Cache error: {0}")]
    CacheError(String),
    #[error("Delegate error: {0}")]
    DelegateError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Invalid request: {0}")]
    RequestError(String),
}

impl From<std::io::Error> for TabchatError {
    fn from(err: std::io::Error) -> Self {
        TabchatError::IoError(err.to_string())
    }
}

impl From<arrow::error::ArrowError> for TabchatError {
    fn from(err: arrow::error::ArrowError) -> Self {
        TabchatError::ParseError(err.to_string())
    }
}

impl From<calamine::XlsxError> for TabchatError {
    fn from(err: calamine::XlsxError) -> Self {
        TabchatError::ParseError(err.to_string())
    }
}

impl From<redis::RedisError> for TabchatError {
    fn from(err: redis::RedisError) -> Self {
        TabchatError::CacheError(err.to_string())
    }
}

impl From<reqwest::Error> for TabchatError {
    fn from(err: reqwest::Error) -> Self {
        TabchatError::DelegateError(err.to_string())
    }
}
