//! Error types for hark.

use std::io;

/// Errors produced while building or configuring a console.
///
/// Per-line dispatch failures are not errors in this sense: they are
/// reported to the user as text and summarized by the dispatch outcome.
#[derive(Debug, thiserror::Error)]
pub enum HarkError {
    #[error("registration error: {0}")]
    Registration(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, HarkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_error_display() {
        let e = HarkError::Registration("duplicate command \"add\"".into());
        assert_eq!(
            format!("{e}"),
            "registration error: duplicate command \"add\""
        );
    }

    #[test]
    fn config_error_display() {
        let e = HarkError::Config("unknown user".into());
        assert_eq!(format!("{e}"), "config error: unknown user");
    }

    #[test]
    fn io_error_from_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let e: HarkError = io_err.into();
        let msg = format!("{e}");
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn toml_error_from_conversion() {
        let toml_err = toml::from_str::<toml::Value>("this is [[[not valid toml").unwrap_err();
        let e: HarkError = toml_err.into();
        assert!(format!("{e}").contains("TOML parse error"));
    }

    #[test]
    fn result_alias_err() {
        let r: Result<i32> = Err(HarkError::Config("oops".into()));
        assert!(r.is_err());
    }
}
