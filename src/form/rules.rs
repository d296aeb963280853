use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use super::field::{Feedback, FieldId};

pub const DEFAULT_MIN_USERNAME_LEN: usize = 5;

static USERNAME_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._]+$").expect("username pattern compiles"));
static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));
static INDIAN_MOBILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[6-9][0-9]{9}$").expect("mobile pattern compiles"));

/// A user-correctable input problem. `Display` is the message shown to the user.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum RuleViolation {
    #[error("{} is required", .field.label())]
    Empty { field: FieldId },
    #[error("{} must be at least {} characters", .field.label(), .min)]
    TooShort { field: FieldId, min: usize },
    #[error("{} can only contain letters, numbers, dots and underscores", .field.label())]
    BadCharacters { field: FieldId },
    #[error("{}", .field.format_hint())]
    BadFormat { field: FieldId },
    #[error("{} already {}", .field.label(), .field.used_suffix())]
    AlreadyUsed { field: FieldId },
}

impl RuleViolation {
    pub fn field(&self) -> FieldId {
        match self {
            RuleViolation::Empty { field }
            | RuleViolation::TooShort { field, .. }
            | RuleViolation::BadCharacters { field }
            | RuleViolation::BadFormat { field }
            | RuleViolation::AlreadyUsed { field } => *field,
        }
    }
}

impl FieldId {
    fn format_hint(self) -> &'static str {
        match self {
            FieldId::Email => "Please enter a valid email address",
            FieldId::Mobile => "Please enter a valid 10-digit Indian mobile number",
            FieldId::Username | FieldId::Password => "Please check the format of this field",
        }
    }

    fn used_suffix(self) -> &'static str {
        match self {
            FieldId::Email => "registered",
            _ => "taken",
        }
    }
}

/// Synchronous, deterministic format checks.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RuleSet {
    min_username_len: usize,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_USERNAME_LEN)
    }
}

impl RuleSet {
    pub const fn new(min_username_len: usize) -> Self {
        Self { min_username_len }
    }

    /// Runs the emptiness test and every format rule for `field`, first failure wins.
    ///
    /// `value` is expected to be trimmed already for fields that trim their
    /// input. Passwords only fail when empty; their grading goes through
    /// [`password_strength`].
    pub fn check(&self, field: FieldId, value: &str) -> Result<(), RuleViolation> {
        if value.trim().is_empty() {
            return Err(RuleViolation::Empty { field });
        }
        match field {
            FieldId::Username => self.check_username(value),
            FieldId::Email => check_email(value),
            FieldId::Mobile => check_mobile(value),
            FieldId::Password => Ok(()),
        }
    }

    fn check_username(&self, value: &str) -> Result<(), RuleViolation> {
        let field = FieldId::Username;
        if value.chars().count() < self.min_username_len {
            return Err(RuleViolation::TooShort {
                field,
                min: self.min_username_len,
            });
        }
        if !USERNAME_CHARSET.is_match(value) {
            return Err(RuleViolation::BadCharacters { field });
        }
        Ok(())
    }
}

fn check_email(value: &str) -> Result<(), RuleViolation> {
    if EMAIL_SHAPE.is_match(value) {
        Ok(())
    } else {
        Err(RuleViolation::BadFormat {
            field: FieldId::Email,
        })
    }
}

fn check_mobile(value: &str) -> Result<(), RuleViolation> {
    if INDIAN_MOBILE.is_match(value) {
        Ok(())
    } else {
        Err(RuleViolation::BadFormat {
            field: FieldId::Mobile,
        })
    }
}

pub const MAX_STRENGTH: u8 = 5;
const MIN_STRONG_LEN: usize = 8;

/// Count of satisfied password criteria, in `0..=5`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct PasswordStrength(u8);

impl PasswordStrength {
    pub const fn score(self) -> u8 {
        self.0
    }

    pub const fn label(self) -> &'static str {
        match self.0 {
            0 | 1 => "Very weak",
            2 => "Weak",
            3 => "Medium",
            4 => "Strong",
            _ => "Very strong",
        }
    }

    /// Below medium strength. Weak passwords warn on submit but never block it.
    pub const fn is_weak(self) -> bool {
        self.0 < 3
    }

    pub fn live_feedback(self) -> Feedback {
        match self.0 {
            0 | 1 => Feedback::invalid("Very weak password"),
            2 => Feedback::warning("Weak password"),
            3 => Feedback::valid("Medium strength password"),
            4 => Feedback::valid("Strong password"),
            _ => Feedback::valid("Very strong password"),
        }
    }
}

pub fn password_strength(password: &str) -> PasswordStrength {
    let criteria = [
        password.chars().count() >= MIN_STRONG_LEN,
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_ascii_alphanumeric()),
    ];
    let score = criteria.into_iter().filter(|met| *met).count() as u8;
    PasswordStrength(score.min(MAX_STRENGTH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rules_apply_in_order() {
        let rules = RuleSet::default();
        assert_eq!(
            rules.check(FieldId::Username, "ab1"),
            Err(RuleViolation::TooShort {
                field: FieldId::Username,
                min: 5
            })
        );
        assert_eq!(
            rules.check(FieldId::Username, "abc##"),
            Err(RuleViolation::BadCharacters {
                field: FieldId::Username
            })
        );
        assert_eq!(rules.check(FieldId::Username, "new.user_1"), Ok(()));
    }

    #[test]
    fn short_username_with_bad_characters_reports_length_first() {
        let rules = RuleSet::default();
        let violation = rules
            .check(FieldId::Username, "a#")
            .expect_err("too short");
        assert_eq!(violation.to_string(), "Username must be at least 5 characters");
    }

    #[test]
    fn email_shape_requires_single_at_and_dotted_domain() {
        let rules = RuleSet::default();
        assert!(rules.check(FieldId::Email, "not-an-email").is_err());
        assert!(rules.check(FieldId::Email, "a@b").is_err());
        assert!(rules.check(FieldId::Email, "a@@b.com").is_err());
        assert!(rules.check(FieldId::Email, "a b@c.com").is_err());
        assert_eq!(rules.check(FieldId::Email, "x@x.com"), Ok(()));
    }

    #[test]
    fn mobile_needs_ten_digits_with_leading_six_to_nine() {
        let rules = RuleSet::default();
        assert!(rules.check(FieldId::Mobile, "12345").is_err());
        assert!(rules.check(FieldId::Mobile, "5123456789").is_err());
        assert!(rules.check(FieldId::Mobile, "91234567890").is_err());
        assert!(rules.check(FieldId::Mobile, "912345678a").is_err());
        assert_eq!(rules.check(FieldId::Mobile, "9123456789"), Ok(()));
        assert_eq!(rules.check(FieldId::Mobile, "6000000000"), Ok(()));
    }

    #[test]
    fn blank_values_are_empty_for_every_field() {
        let rules = RuleSet::default();
        for field in FieldId::ALL {
            let violation = rules.check(field, "   ").expect_err("blank must fail");
            assert_eq!(violation, RuleViolation::Empty { field });
            assert_eq!(violation.to_string(), format!("{} is required", field.label()));
        }
    }

    #[test]
    fn violation_messages_match_user_copy() {
        assert_eq!(
            RuleViolation::AlreadyUsed {
                field: FieldId::Username
            }
            .to_string(),
            "Username already taken"
        );
        assert_eq!(
            RuleViolation::AlreadyUsed {
                field: FieldId::Email
            }
            .to_string(),
            "Email already registered"
        );
        assert_eq!(
            RuleViolation::BadFormat {
                field: FieldId::Mobile
            }
            .to_string(),
            "Please enter a valid 10-digit Indian mobile number"
        );
    }

    #[test]
    fn strength_counts_satisfied_criteria() {
        let cases = [
            ("", 0, "Very weak"),
            ("abc", 1, "Very weak"),
            ("weak", 1, "Very weak"),
            ("abcdefgh", 2, "Weak"),
            ("Abcdefgh", 3, "Medium"),
            ("Abcdef12", 4, "Strong"),
            ("Abcdef1!", 5, "Very strong"),
        ];
        for (password, score, label) in cases {
            let strength = password_strength(password);
            assert_eq!(strength.score(), score, "score for {password:?}");
            assert_eq!(strength.label(), label, "label for {password:?}");
        }
    }

    #[test]
    fn strength_grades_live_feedback() {
        assert_eq!(
            password_strength("abc").live_feedback(),
            Feedback::invalid("Very weak password")
        );
        assert_eq!(
            password_strength("abcdefgh").live_feedback(),
            Feedback::warning("Weak password")
        );
        assert_eq!(
            password_strength("Abcdef12").live_feedback(),
            Feedback::valid("Strong password")
        );
        assert!(password_strength("abcdefgh").is_weak());
        assert!(!password_strength("Abcdefgh").is_weak());
    }
}
