//! Controller options, loadable from YAML or JSON.

use crate::core::error::{ConfigurationError, Result};
use crate::mask::{
    CharClass, DEFAULT_HISTORY_LIMIT, DEFAULT_PLACEHOLDER, FormatCharacter, FormatCharacters,
    Transform,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_NON_DATA_MASK: &str = "[ ]+";

/// What to do with pasted characters no slot accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PastePolicy {
    #[default]
    DropInvalid,
    RejectAll,
}

/// What to do when a new pattern has fewer slots than the current data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternChangePolicy {
    #[default]
    Truncate,
    Reject,
}

/// File form of a [`FormatCharacter`]. `pattern` overrides `class`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatCharacterSpec {
    pub class: CharClass,
    pub pattern: Option<String>,
    pub transform: Transform,
}

impl FormatCharacterSpec {
    pub fn build(&self) -> Result<FormatCharacter> {
        let format = match &self.pattern {
            Some(pattern) => FormatCharacter::matching(pattern)?,
            None => FormatCharacter::new(self.class),
        };
        Ok(format.with_transform(self.transform))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MaskOptions {
    pub pattern: String,
    /// Merged over the default tokens; `~` removes a default.
    pub format_characters: IndexMap<String, Option<FormatCharacterSpec>>,
    pub placeholder_char: char,
    pub non_data_mask: String,
    pub value: String,
    pub size: Option<usize>,
    pub placeholder: Option<String>,
    pub paste_policy: PastePolicy,
    pub pattern_change: PatternChangePolicy,
    pub history_limit: usize,
}

impl Default for MaskOptions {
    fn default() -> Self {
        Self {
            pattern: String::new(),
            format_characters: IndexMap::new(),
            placeholder_char: DEFAULT_PLACEHOLDER,
            non_data_mask: DEFAULT_NON_DATA_MASK.to_string(),
            value: String::new(),
            size: None,
            placeholder: None,
            paste_policy: PastePolicy::default(),
            pattern_change: PatternChangePolicy::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl MaskOptions {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            ..Self::default()
        }
    }

    pub fn from_yaml(source: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn from_json(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// `.json` files are read as JSON, anything else as YAML.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigurationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&source)
        } else {
            Self::from_yaml(&source)
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_placeholder_char(mut self, placeholder: char) -> Self {
        self.placeholder_char = placeholder;
        self
    }

    pub fn with_non_data_mask(mut self, mask: impl Into<String>) -> Self {
        self.non_data_mask = mask.into();
        self
    }

    /// `None` removes the token.
    pub fn with_format_character(mut self, token: char, spec: Option<FormatCharacterSpec>) -> Self {
        self.format_characters.insert(token.to_string(), spec);
        self
    }

    pub fn with_paste_policy(mut self, policy: PastePolicy) -> Self {
        self.paste_policy = policy;
        self
    }

    pub fn with_pattern_change(mut self, policy: PatternChangePolicy) -> Self {
        self.pattern_change = policy;
        self
    }

    /// Default tokens with this file's overrides applied in order.
    pub fn format_characters(&self) -> Result<FormatCharacters> {
        let mut formats = FormatCharacters::defaults();
        for (token, spec) in &self.format_characters {
            let mut chars = token.chars();
            let (Some(ch), None) = (chars.next(), chars.next()) else {
                return Err(ConfigurationError::InvalidFormatToken {
                    token: token.clone(),
                });
            };
            match spec {
                Some(spec) => formats.insert(ch, spec.build()?),
                None => {
                    formats.remove(ch);
                }
            }
        }
        Ok(formats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn yaml_options_merge_format_characters() {
        let options = MaskOptions::from_yaml(
            r#"
pattern: "hh:hh"
placeholder_char: " "
paste_policy: reject_all
format_characters:
  h:
    pattern: "[0-9a-f]"
    transform: upper
  "1": ~
"#,
        )
        .expect("options");
        assert_eq!(options.placeholder_char, ' ');
        assert_eq!(options.paste_policy, PastePolicy::RejectAll);
        assert_eq!(options.non_data_mask, DEFAULT_NON_DATA_MASK);

        let formats = options.format_characters().expect("formats");
        assert!(!formats.contains('1'));
        let hex = formats.get('h').expect("h token");
        assert!(hex.accepts('c'));
        assert_eq!(hex.transform('c'), 'C');
    }

    #[test]
    fn json_options_and_unknown_fields() {
        let options =
            MaskOptions::from_json(r#"{"pattern": "1111", "history_limit": 5}"#).expect("options");
        assert_eq!(options.pattern, "1111");
        assert_eq!(options.history_limit, 5);
        assert_eq!(options.pattern_change, PatternChangePolicy::Truncate);

        let err = MaskOptions::from_json(r#"{"patern": "1111"}"#).expect_err("typo");
        assert!(matches!(err, ConfigurationError::Json(_)));
    }

    #[test]
    fn multi_char_token_is_rejected() {
        let options = MaskOptions::new("11")
            .with_format_character('9', Some(FormatCharacterSpec::default()));
        assert!(options.format_characters().is_ok());

        let mut options = options;
        options.format_characters.insert("99".to_string(), None);
        assert!(matches!(
            options.format_characters(),
            Err(ConfigurationError::InvalidFormatToken { .. })
        ));
    }

    #[test]
    fn from_path_picks_format_by_extension() {
        let mut json = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .expect("tempfile");
        write!(json, r#"{{"pattern": "(111) 111-1111", "value": "555"}}"#).expect("write");
        let options = MaskOptions::from_path(json.path()).expect("json options");
        assert_eq!(options.value, "555");

        let mut yaml = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .expect("tempfile");
        writeln!(yaml, "pattern: \"11/11\"").expect("write");
        let options = MaskOptions::from_path(yaml.path()).expect("yaml options");
        assert_eq!(options.pattern, "11/11");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = MaskOptions::from_path("/nonexistent/mask.yaml").expect_err("missing");
        assert!(matches!(err, ConfigurationError::Io { .. }));
    }
}
