use crate::core::error::{ConfigurationError, Result};
use crate::core::selection::Selection;
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Character class a data slot accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharClass {
    Digit,
    Alpha,
    #[default]
    Alnum,
    /// Any printable character.
    Any,
}

impl CharClass {
    pub fn accepts(self, ch: char) -> bool {
        match self {
            Self::Digit => ch.is_ascii_digit(),
            Self::Alpha => ch.is_ascii_alphabetic(),
            Self::Alnum => ch.is_ascii_alphanumeric(),
            Self::Any => !ch.is_control(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transform {
    #[default]
    None,
    Upper,
    Lower,
}

impl Transform {
    pub fn apply(self, ch: char) -> char {
        match self {
            Self::None => ch,
            Self::Upper => single_char(ch.to_uppercase(), ch),
            Self::Lower => single_char(ch.to_lowercase(), ch),
        }
    }
}

// Case mappings that expand to several chars (ß → SS) keep the original.
fn single_char(mut mapped: impl Iterator<Item = char>, fallback: char) -> char {
    match (mapped.next(), mapped.next()) {
        (Some(ch), None) => ch,
        _ => fallback,
    }
}

/// Validation and transform rule for one format token.
#[derive(Debug, Clone)]
pub struct FormatCharacter {
    class: CharClass,
    pattern: Option<Regex>,
    transform: Transform,
}

impl FormatCharacter {
    pub fn new(class: CharClass) -> Self {
        Self {
            class,
            pattern: None,
            transform: Transform::None,
        }
    }

    /// A slot accepting single characters that fully match `pattern`.
    pub fn matching(pattern: &str) -> Result<Self> {
        let anchored = format!("^(?:{pattern})$");
        let regex = Regex::new(&anchored).map_err(|source| ConfigurationError::InvalidRegex {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            class: CharClass::Any,
            pattern: Some(regex),
            transform: Transform::None,
        })
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn class(&self) -> CharClass {
        self.class
    }

    pub fn accepts(&self, ch: char) -> bool {
        match &self.pattern {
            Some(regex) => regex.is_match(ch.encode_utf8(&mut [0u8; 4])),
            None => self.class.accepts(ch),
        }
    }

    pub fn transform(&self, ch: char) -> char {
        self.transform.apply(ch)
    }
}

impl PartialEq for FormatCharacter {
    fn eq(&self, other: &Self) -> bool {
        self.class == other.class
            && self.transform == other.transform
            && self.pattern.as_ref().map(Regex::as_str) == other.pattern.as_ref().map(Regex::as_str)
    }
}

/// Ordered token → rule map deciding which pattern characters are data slots.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatCharacters(IndexMap<char, FormatCharacter>);

impl Default for FormatCharacters {
    fn default() -> Self {
        Self::defaults()
    }
}

impl FormatCharacters {
    pub fn empty() -> Self {
        Self(IndexMap::new())
    }

    /// `1` digit, `a` letter, `A` upper-cased letter, `*` alphanumeric,
    /// `#` upper-cased alphanumeric.
    pub fn defaults() -> Self {
        let mut formats = Self::empty();
        formats.insert('*', FormatCharacter::new(CharClass::Alnum));
        formats.insert('1', FormatCharacter::new(CharClass::Digit));
        formats.insert('a', FormatCharacter::new(CharClass::Alpha));
        formats.insert(
            'A',
            FormatCharacter::new(CharClass::Alpha).with_transform(Transform::Upper),
        );
        formats.insert(
            '#',
            FormatCharacter::new(CharClass::Alnum).with_transform(Transform::Upper),
        );
        formats
    }

    pub fn insert(&mut self, token: char, format: FormatCharacter) {
        self.0.insert(token, format);
    }

    pub fn remove(&mut self, token: char) -> Option<FormatCharacter> {
        self.0.shift_remove(&token)
    }

    pub fn get(&self, token: char) -> Option<&FormatCharacter> {
        self.0.get(&token)
    }

    pub fn contains(&self, token: char) -> bool {
        self.0.contains_key(&token)
    }

    pub fn tokens(&self) -> impl Iterator<Item = char> + '_ {
        self.0.keys().copied()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MaskToken {
    Literal(char),
    Slot { token: char, format: FormatCharacter },
}

/// A compiled mask pattern. Construct with [`Pattern::compile`].
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub(super) source: String,
    pub(super) tokens: Vec<MaskToken>,
    pub(super) first_editable: usize,
    pub(super) last_editable: usize,
    pub(super) slot_count: usize,
}

impl Pattern {
    pub fn compile(source: &str, formats: &FormatCharacters) -> Result<Self> {
        super::parser::parse_pattern(source, formats)
    }

    pub fn source(&self) -> &str {
        self.source.as_str()
    }

    pub fn tokens(&self) -> &[MaskToken] {
        self.tokens.as_slice()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    pub fn first_editable(&self) -> usize {
        self.first_editable
    }

    pub fn last_editable(&self) -> usize {
        self.last_editable
    }

    pub fn is_editable(&self, idx: usize) -> bool {
        matches!(self.tokens.get(idx), Some(MaskToken::Slot { .. }))
    }

    pub fn literal_at(&self, idx: usize) -> Option<char> {
        match self.tokens.get(idx) {
            Some(MaskToken::Literal(ch)) => Some(*ch),
            _ => None,
        }
    }

    /// The pattern character at `idx`: the literal, or the slot's format token.
    pub fn symbol_at(&self, idx: usize) -> Option<char> {
        self.tokens.get(idx).map(|token| match token {
            MaskToken::Literal(ch) => *ch,
            MaskToken::Slot { token, .. } => *token,
        })
    }

    pub fn accepts(&self, idx: usize, ch: char) -> bool {
        match self.tokens.get(idx) {
            Some(MaskToken::Slot { format, .. }) => format.accepts(ch),
            _ => false,
        }
    }

    pub fn transform(&self, idx: usize, ch: char) -> char {
        match self.tokens.get(idx) {
            Some(MaskToken::Slot { format, .. }) => format.transform(ch),
            _ => ch,
        }
    }

    /// First editable index at or after `from`.
    pub fn next_editable(&self, from: usize) -> Option<usize> {
        (from..self.len()).find(|idx| self.is_editable(*idx))
    }
}

/// Immutable engine snapshot: one char per pattern position plus selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaskState {
    pub value: Vec<char>,
    pub selection: Selection,
}

impl MaskState {
    pub fn new(value: Vec<char>, selection: Selection) -> Self {
        Self { value, selection }
    }

    pub fn display(&self) -> String {
        self.value.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tokens_cover_digit_letter_and_alnum() {
        let formats = FormatCharacters::defaults();
        assert!(formats.get('1').is_some_and(|f| f.accepts('7')));
        assert!(formats.get('1').is_some_and(|f| !f.accepts('x')));
        assert!(formats.get('a').is_some_and(|f| f.accepts('x')));
        assert_eq!(formats.get('A').map(|f| f.transform('q')), Some('Q'));
        assert_eq!(formats.get('#').map(|f| f.transform('b')), Some('B'));
        assert_eq!(formats.tokens().collect::<String>(), "*1aA#");
    }

    #[test]
    fn regex_format_character_matches_single_chars() {
        let hex = FormatCharacter::matching("[0-9a-fA-F]")
            .expect("regex")
            .with_transform(Transform::Lower);
        assert!(hex.accepts('C'));
        assert!(!hex.accepts('g'));
        assert_eq!(hex.transform('C'), 'c');
    }

    #[test]
    fn invalid_regex_is_a_configuration_error() {
        let err = FormatCharacter::matching("[0-9").expect_err("must fail");
        assert!(matches!(err, ConfigurationError::InvalidRegex { .. }));
    }

    #[test]
    fn multi_char_case_mapping_keeps_original() {
        assert_eq!(Transform::Upper.apply('ß'), 'ß');
        assert_eq!(Transform::Upper.apply('é'), 'É');
    }
}
