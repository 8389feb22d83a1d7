use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Dataset not found: {0}")]
    DatasetNotFound(String),

    #[error("Invalid data in {context}: {detail}")]
    InvalidData { context: String, detail: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Terminal error: {0}")]
    Terminal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const INVALID_ARGUMENTS: i32 = 2;
    pub const DATASET_NOT_FOUND: i32 = 3;
    pub const INVALID_DATA: i32 = 4;
    pub const CONFIG_ERROR: i32 = 5;
    pub const DATABASE_ERROR: i32 = 6;
}

impl Error {
    pub fn invalid_data(context: impl Into<String>, detail: impl ToString) -> Self {
        Error::InvalidData {
            context: context.into(),
            detail: detail.to_string(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Error::DatasetNotFound(_) => exit_code::DATASET_NOT_FOUND,
            Error::InvalidData { .. } | Error::Json(_) => exit_code::INVALID_DATA,
            Error::Config(_) | Error::Toml(_) => exit_code::CONFIG_ERROR,
            Error::Database(_) => exit_code::DATABASE_ERROR,
            Error::InvalidArgument(_) => exit_code::INVALID_ARGUMENTS,
            _ => exit_code::GENERAL_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(Error::DatasetNotFound("x".into()).exit_code(), 3);
        assert_eq!(Error::invalid_data("records", "bad status").exit_code(), 4);
        assert_eq!(Error::Config("x".into()).exit_code(), 5);
        assert_eq!(Error::InvalidArgument("x".into()).exit_code(), 2);
        assert_eq!(Error::Terminal("x".into()).exit_code(), 1);
        assert_eq!(
            Error::Database(rusqlite::Error::InvalidQuery).exit_code(),
            exit_code::DATABASE_ERROR
        );
    }
}
