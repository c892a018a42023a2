//! Email address type used by the sign-in and registration forms.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors produced when an email form field is rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// Nothing left after trimming whitespace.
    #[error("email is required")]
    Missing,
    /// Longer than the RFC 5321 path limit.
    #[error("email must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// Not of the form `local@domain.tld`.
    #[error("invalid email address: {0}")]
    Malformed(String),
}

/// A trimmed, lower-cased email address.
///
/// Only the shape is checked (one `@`, non-empty local part, dotted
/// domain); the backend decides whether the account exists.
///
/// ```
/// use comptoir_core::Email;
///
/// let email = Email::parse("  Awa.Diop@Example.COM ").unwrap();
/// assert_eq!(email.as_str(), "awa.diop@example.com");
///
/// assert!(Email::parse("").is_err());
/// assert!(Email::parse("awa@localhost").is_err());
/// assert!(Email::parse("a@b@c.sn").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Validate and normalize an email form field.
    ///
    /// # Errors
    ///
    /// Returns [`EmailError`] when the field is blank, too long or not
    /// shaped like `local@domain.tld`.
    pub fn parse(input: &str) -> Result<Self, EmailError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(EmailError::Missing);
        }
        if trimmed.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        let malformed = || EmailError::Malformed(trimmed.to_owned());
        let (local, domain) = trimmed.split_once('@').ok_or_else(malformed)?;
        let domain_ok = domain
            .split('.')
            .all(|label| !label.is_empty())
            && domain.contains('.');
        if local.is_empty() || domain.contains('@') || !domain_ok {
            return Err(malformed());
        }

        Ok(Self(trimmed.to_lowercase()))
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Email` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes() {
        let email = Email::parse(" Client@Boutique.SN ").unwrap();
        assert_eq!(email.as_str(), "client@boutique.sn");
    }

    #[test]
    fn test_parse_missing() {
        assert_eq!(Email::parse("   "), Err(EmailError::Missing));
    }

    #[test]
    fn test_parse_too_long() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(
            Email::parse(&long),
            Err(EmailError::TooLong { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        for input in ["no-at-symbol", "@boutique.sn", "client@", "client@sn", "client@.sn", "a@b@c.sn"] {
            assert!(
                matches!(Email::parse(input), Err(EmailError::Malformed(_))),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_serializes_transparently() {
        let email: Email = "client@boutique.sn".parse().unwrap();
        assert_eq!(
            serde_json::to_string(&email).unwrap(),
            "\"client@boutique.sn\""
        );
    }
}
