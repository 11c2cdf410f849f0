use crate::library::helpers::split_at_last;
use std::fmt;
use thiserror::Error;

const SEGMENT_SEPARATOR: &str = ".";

/// Reasons why an identity path is unusable
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// Path is empty
    #[error("subscriber identity is empty")]
    Empty,
    /// Path contains an empty segment, e.g. `a..b` or a trailing dot
    #[error("subscriber identity {0:?} contains an empty segment")]
    EmptySegment(String),
    /// Path contains whitespace
    #[error("subscriber identity {0:?} contains whitespace")]
    Whitespace(String),
}

/// Stable, dot-separated name of a subscriber
///
/// The identity is used to derive storage keys and routing class names, thus it has to stay the
/// same across restarts for the same logical subscriber. Using a module path like
/// `billing.handlers.invoice_paid` works well.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriberIdentity {
    path: String,
}

impl SubscriberIdentity {
    /// Validates and wraps an identity path
    pub fn new<S: Into<String>>(path: S) -> Result<Self, IdentityError> {
        let path = path.into();

        if path.is_empty() {
            return Err(IdentityError::Empty);
        }

        if path.chars().any(char::is_whitespace) {
            return Err(IdentityError::Whitespace(path));
        }

        if path.split(SEGMENT_SEPARATOR).any(str::is_empty) {
            return Err(IdentityError::EmptySegment(path));
        }

        Ok(Self { path })
    }

    /// Fully qualified path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Last segment of the path
    pub fn name(&self) -> &str {
        split_at_last(&self.path, SEGMENT_SEPARATOR)
            .map(|(_, name)| name)
            .unwrap_or(&self.path)
    }

    /// Every segment except the last, empty if the path only has one segment
    pub fn prefix(&self) -> &str {
        split_at_last(&self.path, SEGMENT_SEPARATOR)
            .map(|(prefix, _)| prefix)
            .unwrap_or_default()
    }
}

impl fmt::Display for SubscriberIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl TryFrom<&str> for SubscriberIdentity {
    type Error = IdentityError;

    fn try_from(path: &str) -> Result<Self, Self::Error> {
        Self::new(path)
    }
}

impl TryFrom<String> for SubscriberIdentity {
    type Error = IdentityError;

    fn try_from(path: String) -> Result<Self, Self::Error> {
        Self::new(path)
    }
}

#[cfg(test)]
mod does {
    use super::*;

    #[test]
    fn split_path_into_prefix_and_name() {
        let identity = SubscriberIdentity::new("main.handlers.testSubscriber").unwrap();

        assert_eq!(identity.path(), "main.handlers.testSubscriber");
        assert_eq!(identity.prefix(), "main.handlers");
        assert_eq!(identity.name(), "testSubscriber");
    }

    #[test]
    fn handle_single_segment() {
        let identity = SubscriberIdentity::new("testSubscriber").unwrap();

        assert_eq!(identity.prefix(), "");
        assert_eq!(identity.name(), "testSubscriber");
    }

    #[test]
    fn reject_malformed_paths() {
        assert_eq!(SubscriberIdentity::new(""), Err(IdentityError::Empty));
        assert!(matches!(
            SubscriberIdentity::new("main..cb"),
            Err(IdentityError::EmptySegment(_))
        ));
        assert!(matches!(
            SubscriberIdentity::new("main.cb."),
            Err(IdentityError::EmptySegment(_))
        ));
        assert!(matches!(
            SubscriberIdentity::new("main.my cb"),
            Err(IdentityError::Whitespace(_))
        ));
    }

    #[test]
    fn stay_deterministic() {
        let a = SubscriberIdentity::try_from("main.cb").unwrap();
        let b = SubscriberIdentity::try_from("main.cb".to_string()).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.to_string(), "main.cb");
    }
}
