//! Whole-paste validation, run on the filler-stripped clipboard text before
//! it reaches the engine.

use crate::core::error::{ConfigurationError, Result as ConfigResult};
use regex::Regex;

pub type ValidationError = String;
pub type Validator = Box<dyn Fn(&str) -> Result<(), ValidationError> + Send + Sync>;

/// Run a list of validators against `value`, returning the first error.
/// An empty list accepts everything.
pub fn run_validators(validators: &[Validator], value: &str) -> Result<(), ValidationError> {
    for validator in validators {
        validator(value)?;
    }
    Ok(())
}

/// Lift a boolean predicate into a validator.
pub fn predicate<F>(check: F, message: impl Into<String>) -> Validator
where
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    let message = message.into();
    Box::new(move |value: &str| {
        if check(value) {
            Ok(())
        } else {
            Err(message.clone())
        }
    })
}

pub fn digits_only(message: impl Into<String>) -> Validator {
    predicate(|value| value.chars().all(|ch| ch.is_ascii_digit()), message)
}

pub fn max_length(max_len: usize, message: impl Into<String>) -> Validator {
    predicate(move |value| value.chars().count() <= max_len, message)
}

/// Fails to build on an invalid regex.
pub fn matches_regex(pattern: &str, message: impl Into<String>) -> ConfigResult<Validator> {
    let regex = Regex::new(pattern).map_err(|source| ConfigurationError::InvalidRegex {
        pattern: pattern.to_string(),
        source,
    })?;
    Ok(predicate(move |value| regex.is_match(value), message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_accepts_everything() {
        assert!(run_validators(&[], "anything").is_ok());
    }

    #[test]
    fn first_failure_wins() {
        let validators = vec![
            digits_only("digits only"),
            max_length(3, "too long"),
        ];
        assert_eq!(run_validators(&validators, "123"), Ok(()));
        assert_eq!(
            run_validators(&validators, "abc123"),
            Err("digits only".to_string())
        );
        assert_eq!(
            run_validators(&validators, "12345"),
            Err("too long".to_string())
        );
    }

    #[test]
    fn regex_validator_and_invalid_regex() {
        let validator = matches_regex("^[0-9]{3}", "needs an area code").expect("regex");
        assert!(validator("555123").is_ok());
        assert!(validator("55").is_err());
        assert!(matches_regex("(", "broken").is_err());
    }
}
