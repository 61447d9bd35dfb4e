use super::model::{FormatCharacters, MaskToken, Pattern};
use crate::core::error::{ConfigurationError, Result};

pub const ESCAPE_CHAR: char = '\\';

pub(super) fn parse_pattern(source: &str, formats: &FormatCharacters) -> Result<Pattern> {
    if source.is_empty() {
        return Err(ConfigurationError::MissingPattern);
    }

    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::<MaskToken>::with_capacity(chars.len());
    let mut first_editable = None::<usize>;
    let mut last_editable = 0usize;
    let mut slot_count = 0usize;
    let mut idx = 0usize;

    while idx < chars.len() {
        let ch = chars[idx];

        if ch == ESCAPE_CHAR {
            let Some(escaped) = chars.get(idx + 1).copied() else {
                return Err(ConfigurationError::TrailingEscape {
                    pattern: source.to_string(),
                });
            };
            tokens.push(MaskToken::Literal(escaped));
            idx += 2;
            continue;
        }

        if let Some(format) = formats.get(ch) {
            let pos = tokens.len();
            first_editable.get_or_insert(pos);
            last_editable = pos;
            slot_count += 1;
            tokens.push(MaskToken::Slot {
                token: ch,
                format: format.clone(),
            });
        } else {
            tokens.push(MaskToken::Literal(ch));
        }
        idx += 1;
    }

    let Some(first_editable) = first_editable else {
        return Err(ConfigurationError::NoEditableCharacters {
            pattern: source.to_string(),
        });
    };

    Ok(Pattern {
        source: source.to_string(),
        tokens,
        first_editable,
        last_editable,
        slot_count,
    })
}
