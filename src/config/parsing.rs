// src/config/parsing.rs

use crate::errors::ConfigError;
use crate::scoring::Language;

/// Parses a language identifier into a [`Language`].
///
/// # Errors
/// Returns [`ConfigError::InvalidValue`] naming `--language` for unknown identifiers.
pub fn parse_language(id: &str) -> Result<Language, ConfigError> {
    id.parse::<Language>()
        .map_err(|reason| ConfigError::InvalidValue {
            option: "--language".to_string(),
            reason,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_languages() -> Result<(), ConfigError> {
        assert_eq!(parse_language("py")?, Language::Python);
        assert_eq!(parse_language("TS")?, Language::JavaScript);
        assert_eq!(parse_language("cs")?, Language::CSharp);
        assert_eq!(parse_language("c++")?, Language::Cpp);
        Ok(())
    }

    #[test]
    fn test_parse_unknown_language() {
        let err = parse_language("cobol").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("--language"));
        assert!(message.contains("cobol"));
        assert!(message.contains("py, js, java, cs, go, cpp"));
    }
}
