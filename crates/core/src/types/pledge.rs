//! Donation pledges.
//!
//! A pledge never leaves the client: validating it simply yields a local
//! confirmation message.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum email length per RFC 5321.
const MAX_EMAIL_LENGTH: usize = 254;

/// Reasons a pledge is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PledgeError {
    #[error("name is required")]
    EmptyName,
    #[error("email is required")]
    EmptyEmail,
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
    #[error("at least one tree must be pledged")]
    TooFewTrees,
}

/// A validated tree-planting pledge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pledge {
    name: String,
    email: String,
    trees: u32,
}

impl Pledge {
    /// Validate and build a pledge.
    ///
    /// Name and email are trimmed. A missing tree count means one tree.
    ///
    /// # Errors
    ///
    /// Returns `PledgeError` if the name or email is blank, the email is not
    /// shaped `local@domain`, or fewer than one tree is pledged.
    pub fn new(name: &str, email: &str, trees: Option<u32>) -> Result<Self, PledgeError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PledgeError::EmptyName);
        }

        let email = email.trim();
        if email.is_empty() {
            return Err(PledgeError::EmptyEmail);
        }
        if !is_plausible_email(email) {
            return Err(PledgeError::InvalidEmail(email.to_string()));
        }

        let trees = trees.unwrap_or(1);
        if trees < 1 {
            return Err(PledgeError::TooFewTrees);
        }

        Ok(Self {
            name: name.to_string(),
            email: email.to_string(),
            trees,
        })
    }

    #[must_use]
    pub const fn trees(&self) -> u32 {
        self.trees
    }

    /// Message shown once the pledge is accepted.
    #[must_use]
    pub fn confirmation(&self) -> String {
        format!(
            "Thanks, {}! You pledged {} tree(s). We'll email {}.",
            self.name, self.trees, self.email
        )
    }
}

fn is_plausible_email(email: &str) -> bool {
    if email.len() > MAX_EMAIL_LENGTH || email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.rsplit_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
        None => false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmation_message() {
        let pledge = Pledge::new("  Rina ", "rina@example.com", Some(3)).unwrap();
        assert_eq!(
            pledge.confirmation(),
            "Thanks, Rina! You pledged 3 tree(s). We'll email rina@example.com."
        );
    }

    #[test]
    fn test_default_tree_count() {
        let pledge = Pledge::new("Rina", "rina@example.com", None).unwrap();
        assert_eq!(pledge.trees(), 1);
    }

    #[test]
    fn test_blank_fields_rejected() {
        assert_eq!(
            Pledge::new("   ", "rina@example.com", None),
            Err(PledgeError::EmptyName)
        );
        assert_eq!(Pledge::new("Rina", " ", None), Err(PledgeError::EmptyEmail));
    }

    #[test]
    fn test_invalid_email_rejected() {
        for email in ["no-at-symbol", "@domain.com", "user@", "a b@c.d"] {
            assert!(matches!(
                Pledge::new("Rina", email, None),
                Err(PledgeError::InvalidEmail(_))
            ));
        }
    }

    #[test]
    fn test_zero_trees_rejected() {
        assert_eq!(
            Pledge::new("Rina", "rina@example.com", Some(0)),
            Err(PledgeError::TooFewTrees)
        );
    }
}
