use crate::models::indicators::Reading;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndicatorError {
    #[error("{indicator}: insufficient history ({available} candles, {required} required)")]
    InsufficientHistory {
        indicator: &'static str,
        required: usize,
        available: usize,
    },

    #[error("{indicator}: degenerate input ({reason})")]
    DegenerateInput {
        indicator: &'static str,
        reason: &'static str,
    },
}

impl IndicatorError {
    pub fn insufficient(indicator: &'static str, required: usize, available: usize) -> Self {
        IndicatorError::InsufficientHistory {
            indicator,
            required,
            available,
        }
    }
}

impl<T> From<Result<T, IndicatorError>> for Reading<T> {
    fn from(result: Result<T, IndicatorError>) -> Self {
        match result {
            Ok(value) => Reading::Available { value },
            Err(IndicatorError::InsufficientHistory {
                required,
                available,
                ..
            }) => Reading::NotEnoughData {
                required,
                available,
            },
            Err(IndicatorError::DegenerateInput { .. }) => Reading::Degenerate,
        }
    }
}

/// Ensure a series has at least `required` candles.
pub fn require(indicator: &'static str, required: usize, available: usize) -> Result<(), IndicatorError> {
    if available < required {
        Err(IndicatorError::insufficient(indicator, required, available))
    } else {
        Ok(())
    }
}
