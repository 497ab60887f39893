//! Runtime environment detection.
//!
//! Single source of truth for the runtime environment (test, development,
//! production), read from the `VAPID_PUSH_ENV` environment variable.
//!
//! # Environment Variable
//!
//! Set `VAPID_PUSH_ENV` to one of:
//! - `test` - Test mode (config and logs live under the crate's `tmp/`)
//! - `development` or `dev` - Development mode (debug logging by default)
//! - (anything else or unset) - Production mode

// Rust guideline compliant 2026-02

/// Runtime environment for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Production environment (default).
    Production,
    /// Development environment.
    Development,
    /// Test environment.
    Test,
}

impl Environment {
    /// Detect current environment from `VAPID_PUSH_ENV`.
    #[must_use]
    pub fn current() -> Self {
        match std::env::var("VAPID_PUSH_ENV").as_deref() {
            Ok("test") => Self::Test,
            Ok("development" | "dev") => Self::Development,
            _ => Self::Production,
        }
    }

    /// Returns `true` if this is the test environment.
    #[must_use]
    pub fn is_test(self) -> bool {
        self == Self::Test
    }

    /// Default `env_logger` filter for this environment.
    #[must_use]
    pub fn default_log_filter(self) -> &'static str {
        match self {
            Self::Development => "debug",
            Self::Production | Self::Test => "info",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Production => write!(f, "production"),
            Self::Development => write!(f, "development"),
            Self::Test => write!(f, "test"),
        }
    }
}

/// Convenience function to check if running in test mode.
///
/// Equivalent to `Environment::current().is_test()`.
#[must_use]
pub fn is_test_mode() -> bool {
    Environment::current().is_test()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_display() {
        assert_eq!(Environment::Production.to_string(), "production");
        assert_eq!(Environment::Development.to_string(), "development");
        assert_eq!(Environment::Test.to_string(), "test");
    }

    #[test]
    fn test_environment_is_methods() {
        assert!(Environment::Test.is_test());
        assert!(!Environment::Development.is_test());
        assert!(!Environment::Production.is_test());
    }

    #[test]
    fn test_default_log_filter() {
        assert_eq!(Environment::Development.default_log_filter(), "debug");
        assert_eq!(Environment::Production.default_log_filter(), "info");
        assert_eq!(Environment::Test.default_log_filter(), "info");
    }
}
