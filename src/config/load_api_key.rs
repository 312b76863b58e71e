use crate::error::{PriceError, PriceResult};
use crate::providers::alphavantage::API_KEY_ENV_VAR;
use std::env;

/// Loads the Alpha Vantage API key from the environment.
///
/// A free key can be requested at <https://www.alphavantage.co/support/#api-key>.
pub(crate) fn load_api_key() -> PriceResult<String> {
    api_key_from(env::var(API_KEY_ENV_VAR).ok())
}

fn api_key_from(value: Option<String>) -> PriceResult<String> {
    match value {
        Some(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => Err(PriceError::Configuration(format!(
            "{API_KEY_ENV_VAR} is not configured"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_blank_key_is_a_configuration_error() {
        for value in [None, Some(String::new()), Some("   ".into())] {
            let err = api_key_from(value).unwrap_err();
            assert_eq!(
                err,
                PriceError::Configuration("ALPHA_VANTAGE_API_KEY is not configured".into())
            );
        }
    }

    #[test]
    fn key_is_trimmed() {
        assert_eq!(api_key_from(Some(" demo\n".into())).unwrap(), "demo");
    }
}
