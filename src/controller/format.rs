use crate::core::error::{ConfigurationError, Result};
use crate::mask::Pattern;
use regex::Regex;

/// Strips filler from values and lines raw data up with a pattern's slots.
#[derive(Debug, Clone)]
pub struct ValueFormatter {
    non_data: Regex,
    filler_char: Regex,
}

impl ValueFormatter {
    pub fn new(non_data_mask: &str) -> Result<Self> {
        let invalid = |source| ConfigurationError::InvalidRegex {
            pattern: non_data_mask.to_string(),
            source,
        };
        let non_data = Regex::new(non_data_mask).map_err(invalid)?;
        let filler_char = Regex::new(&format!("^(?:{non_data_mask})$")).map_err(invalid)?;
        Ok(Self {
            non_data,
            filler_char,
        })
    }

    pub fn strip_filler(&self, value: &str) -> String {
        self.non_data.replace_all(value, "").into_owned()
    }

    pub fn is_filler(&self, ch: char) -> bool {
        self.filler_char.is_match(ch.encode_utf8(&mut [0u8; 4]))
    }

    /// Lay `raw` over `pattern` from its start.
    pub fn interleave(&self, raw: &str, pattern: &Pattern) -> String {
        self.interleave_from(raw, pattern, 0)
    }

    /// Lay `raw` over `pattern` from position `start`: non-data positions
    /// emit their symbol, data positions take the next raw char. Stops at
    /// the first data position with no raw input left. A raw char equal to
    /// the literal being emitted is consumed with it.
    pub fn interleave_from(&self, raw: &str, pattern: &Pattern, start: usize) -> String {
        let raw: Vec<char> = raw.chars().collect();
        let mut raw_idx = 0usize;
        let mut out = String::with_capacity(pattern.len());

        for idx in start..pattern.len() {
            let Some(symbol) = pattern.symbol_at(idx) else {
                break;
            };
            let non_data = pattern.literal_at(idx).is_some() || self.is_filler(symbol);

            if non_data {
                out.push(symbol);
                if raw.get(raw_idx) == Some(&symbol) {
                    raw_idx += 1;
                }
                continue;
            }

            match raw.get(raw_idx) {
                Some(ch) => {
                    out.push(*ch);
                    raw_idx += 1;
                }
                None => break,
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_NON_DATA_MASK;
    use crate::mask::FormatCharacters;

    fn formatter() -> ValueFormatter {
        ValueFormatter::new(DEFAULT_NON_DATA_MASK).expect("formatter")
    }

    fn pattern(source: &str) -> Pattern {
        Pattern::compile(source, &FormatCharacters::defaults()).expect("pattern")
    }

    #[test]
    fn strip_removes_every_space_run() {
        assert_eq!(formatter().strip_filler("555  123 4567"), "5551234567");
        assert!(formatter().is_filler(' '));
        assert!(!formatter().is_filler('-'));
    }

    #[test]
    fn interleave_places_raw_chars_in_slots() {
        let phone = pattern("(111) 111-1111");
        assert_eq!(formatter().interleave("5551234567", &phone), "(555) 123-4567");
        assert_eq!(formatter().interleave("555", &phone), "(555) ");
        assert_eq!(formatter().interleave("", &phone), "(");
    }

    #[test]
    fn interleave_is_idempotent_on_formatted_values() {
        let phone = pattern("(111) 111-1111");
        let f = formatter();
        let once = f.interleave(&f.strip_filler("(555) 123-4567"), &phone);
        assert_eq!(once, "(555) 123-4567");
        assert_eq!(f.interleave(&f.strip_filler(&once), &phone), once);
    }

    #[test]
    fn strip_recovers_raw_for_filler_only_literals() {
        let spaced = pattern("1111 1111 1111");
        let f = formatter();
        let formatted = f.interleave("123456789012", &spaced);
        assert_eq!(formatted, "1234 5678 9012");
        assert_eq!(f.strip_filler(&formatted), "123456789012");
    }

    #[test]
    fn interleave_from_caret_skips_earlier_positions() {
        let phone = pattern("(111) 111-1111");
        assert_eq!(formatter().interleave_from("12345", &phone, 6), "123-45");
    }

    #[test]
    fn invalid_mask_is_a_configuration_error() {
        assert!(matches!(
            ValueFormatter::new("[ "),
            Err(ConfigurationError::InvalidRegex { .. })
        ));
    }
}
