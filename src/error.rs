use thiserror::Error;

/// Failure categories surfaced by the price providers and the command layer.
///
/// The display form is the bare message so it can be shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    /// No valid price could be obtained: missing symbol or field, malformed
    /// payload, or a transport failure.
    #[error("{0}")]
    NotFound(String),
    /// Bad user input, rejected before any network call.
    #[error("{0}")]
    Validation(String),
    /// Missing or unusable configuration, fatal at startup.
    #[error("{0}")]
    Configuration(String),
}

impl PriceError {
    pub(crate) fn fetch_failed(symbol: &str, cause: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("Error fetching {symbol} price: {cause}"))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

pub type PriceResult<T> = Result<T, PriceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_failed_embeds_symbol_and_cause() {
        let err = PriceError::fetch_failed("eur/usd", "Network error");
        assert_eq!(err.to_string(), "Error fetching eur/usd price: Network error");
        assert!(err.is_not_found());
    }

    #[test]
    fn validation_is_not_a_lookup_failure() {
        let err = PriceError::Validation("Days must be between 1 and 30".into());
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "Days must be between 1 and 30");
    }
}
