use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE.")]
    MissingSeparator(String),

    #[error("Empty key in --set value '{0}'.")]
    EmptyKey(String),
}

/// Splits a `KEY=VALUE` override at the first `=`. Both sides are trimmed;
/// the value may be empty or contain further `=` characters.
pub fn parse_key_value(pair: &str) -> Result<(&str, &str), ParseError> {
    let (key, value) = pair
        .split_once('=')
        .ok_or_else(|| ParseError::MissingSeparator(pair.to_string()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ParseError::EmptyKey(pair.to_string()));
    }
    Ok((key, value.trim()))
}

/// Parses the usual spellings of a boolean setting.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_at_first_equals_sign() {
        assert_eq!(
            parse_key_value("resolver.base-url=http://h/?a=b"),
            Ok(("resolver.base-url", "http://h/?a=b"))
        );
        assert_eq!(parse_key_value(" render.width = 400 "), Ok(("render.width", "400")));
        assert_eq!(parse_key_value("render.enabled="), Ok(("render.enabled", "")));
    }

    #[test]
    fn rejects_missing_separator_and_empty_key() {
        assert_eq!(
            parse_key_value("render.width"),
            Err(ParseError::MissingSeparator("render.width".to_string()))
        );
        assert_eq!(
            parse_key_value("=5"),
            Err(ParseError::EmptyKey("=5".to_string()))
        );
    }

    #[test]
    fn booleans_accept_common_spellings() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
