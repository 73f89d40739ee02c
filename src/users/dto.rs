use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::AppError;
use crate::users::repo::{Role, User};

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub role: Role,
    pub bio: Option<String>,
    pub created_at: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            bio: user.bio,
            created_at: user.created_at,
        }
    }
}

/// Request body for profile edits. The whole profile is submitted at once;
/// an absent email or bio clears the stored value.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

/// Validated profile fields ready to be written.
#[derive(Debug, PartialEq, Eq)]
pub struct ProfileChanges {
    pub username: String,
    pub email: Option<String>,
    pub bio: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validated(self) -> Result<ProfileChanges, AppError> {
        let username = normalize_username(&self.username)?;
        let email = normalize_email(self.email)?;
        let bio = self.bio.map(|b| b.trim().to_string()).filter(|b| !b.is_empty());
        Ok(ProfileChanges {
            username,
            email,
            bio,
        })
    }
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_username(raw: &str) -> Result<String, AppError> {
    let username = raw.trim();
    let len = username.chars().count();
    if !(3..=120).contains(&len) {
        return Err(AppError::Validation(
            "username must be between 3 and 120 characters".into(),
        ));
    }
    Ok(username.to_string())
}

/// Trims, lowercases and validates an optional email; empty input counts as
/// no email at all.
pub(crate) fn normalize_email(raw: Option<String>) -> Result<Option<String>, AppError> {
    let email = match raw {
        Some(e) => e.trim().to_lowercase(),
        None => return Ok(None),
    };
    if email.is_empty() {
        return Ok(None);
    }
    if !is_valid_email(&email) {
        return Err(AppError::Validation("invalid email".into()));
    }
    Ok(Some(email))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_serialization() {
        let user = PublicUser {
            id: Uuid::new_v4(),
            username: "alice".into(),
            email: Some("alice@example.com".into()),
            role: Role::User,
            bio: None,
            created_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("alice@example.com"));
        assert!(json.contains("\"role\":\"user\""));
    }

    #[test]
    fn email_regex_accepts_plausible_addresses() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last+tag@sub.example.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email("spaces in@example.com"));
    }

    #[test]
    fn username_bounds() {
        assert!(normalize_username("ab").is_err());
        assert!(normalize_username("  ab  ").is_err());
        assert_eq!(normalize_username(" bob ").unwrap(), "bob");
        assert!(normalize_username(&"x".repeat(121)).is_err());
        assert!(normalize_username(&"x".repeat(120)).is_ok());
    }

    #[test]
    fn email_normalization() {
        assert_eq!(normalize_email(None).unwrap(), None);
        assert_eq!(normalize_email(Some("  ".into())).unwrap(), None);
        assert_eq!(
            normalize_email(Some(" Alice@Example.COM ".into())).unwrap(),
            Some("alice@example.com".into())
        );
        assert!(normalize_email(Some("nope".into())).is_err());
    }

    #[test]
    fn profile_changes_validate_and_trim() {
        let req = UpdateProfileRequest {
            username: " carol ".into(),
            email: Some("Carol@Example.com".into()),
            bio: Some("   ".into()),
        };
        let changes = req.validated().unwrap();
        assert_eq!(changes.username, "carol");
        assert_eq!(changes.email.as_deref(), Some("carol@example.com"));
        assert_eq!(changes.bio, None);
    }
}
