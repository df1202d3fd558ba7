//! Error types for GEX level extraction

use thiserror::Error;

/// Which part of a snapshot a malformed entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSection {
    Strikes,
    MaxPriors,
}

impl InputSection {
    pub fn label(&self) -> &'static str {
        match self {
            InputSection::Strikes => "strikes",
            InputSection::MaxPriors => "max_priors",
        }
    }
}

impl std::fmt::Display for InputSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Error, Debug)]
pub enum GexError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Malformed {section} entry #{index}: {reason}")]
    MalformedInput {
        section: InputSection,
        index: usize,
        reason: String,
    },

    #[error("No levels extracted for {ticker}")]
    EmptyResult { ticker: String },

    #[error("Data error: {0}")]
    Data(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type GexResult<T> = Result<T, GexError>;

impl GexError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn malformed_input(section: InputSection, index: usize, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            section,
            index,
            reason: reason.into(),
        }
    }

    pub fn empty_result(ticker: impl Into<String>) -> Self {
        Self::EmptyResult {
            ticker: ticker.into(),
        }
    }

    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Soft failures are reported but do not abort other tickers
    pub fn is_soft(&self) -> bool {
        matches!(self, GexError::EmptyResult { .. } | GexError::MalformedInput { .. })
    }
}
