use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("missing credential: {0}")]
    MissingCredential(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Scraping error: {0}")]
    Scraping(String),

    #[error("No content could be extracted from {0} selected URL(s)")]
    NoContent(usize),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Failed to parse model response: {0}")]
    Parse(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::MissingCredential("SERPER_API_KEY".to_string());
        assert_eq!(err.to_string(), "missing credential: SERPER_API_KEY");

        let err = Error::NoContent(4);
        assert_eq!(err.to_string(), "No content could be extracted from 4 selected URL(s)");

        let err: Error = serde_json::from_str::<Vec<String>>("not json").unwrap_err().into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
