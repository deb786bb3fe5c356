use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuessError {
    #[error("'{input}' is not a number")]
    InvalidGuessFormat { input: String },
}

/// Parses a PnL guess such as `3.07`, `-12`, or `+0.5`. Surrounding whitespace
/// is ignored; NaN and infinities are rejected.
pub fn parse_guess(input: &str) -> Result<f64, GuessError> {
    let trimmed = input.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(GuessError::InvalidGuessFormat {
            input: input.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{GuessError, parse_guess};

    #[test]
    fn accepts_signed_decimals() {
        assert_eq!(parse_guess("3.07"), Ok(3.07));
        assert_eq!(parse_guess(" -12 "), Ok(-12.0));
        assert_eq!(parse_guess("+0.5"), Ok(0.5));
        assert_eq!(parse_guess("1e2"), Ok(100.0));
    }

    #[test]
    fn rejects_non_numeric_input() {
        for input in ["", "abc", "3,07", "NaN", "inf", "12$"] {
            assert_eq!(
                parse_guess(input),
                Err(GuessError::InvalidGuessFormat {
                    input: input.to_string()
                }),
                "{input:?}"
            );
        }
    }
}
