use std::fmt::{Display, Formatter};

use super::controller::FormError;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FieldKey(&'static str);

impl FieldKey {
    pub const fn new(value: &'static str) -> Self {
        Self(value)
    }

    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl Display for FieldKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// The event that starts a live validation run for a field.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Trigger {
    FocusLost,
    ValueChange,
}

/// A registration form input, in declaration order.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum FieldId {
    Username,
    Email,
    Password,
    Mobile,
}

impl FieldId {
    pub const ALL: [FieldId; 4] = [
        FieldId::Username,
        FieldId::Email,
        FieldId::Password,
        FieldId::Mobile,
    ];

    pub const fn key(self) -> FieldKey {
        match self {
            FieldId::Username => FieldKey::new("username"),
            FieldId::Email => FieldKey::new("email"),
            FieldId::Password => FieldKey::new("password"),
            FieldId::Mobile => FieldKey::new("mobile"),
        }
    }

    /// Subject used in user-facing messages ("Mobile number is required").
    pub const fn label(self) -> &'static str {
        match self {
            FieldId::Username => "Username",
            FieldId::Email => "Email",
            FieldId::Password => "Password",
            FieldId::Mobile => "Mobile number",
        }
    }

    /// Capitalized field name used as the prefix of report lines.
    pub const fn title(self) -> &'static str {
        match self {
            FieldId::Username => "Username",
            FieldId::Email => "Email",
            FieldId::Password => "Password",
            FieldId::Mobile => "Mobile",
        }
    }

    pub const fn trigger(self) -> Trigger {
        match self {
            FieldId::Password => Trigger::ValueChange,
            FieldId::Username | FieldId::Email | FieldId::Mobile => Trigger::FocusLost,
        }
    }

    pub const fn has_remote_check(self) -> bool {
        matches!(self, FieldId::Username | FieldId::Email)
    }

    /// Whether surrounding whitespace is stripped before the rules run.
    pub const fn trims_input(self) -> bool {
        !matches!(self, FieldId::Password)
    }
}

impl Display for FieldId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key().as_str())
    }
}

impl TryFrom<FieldKey> for FieldId {
    type Error = FormError;

    fn try_from(key: FieldKey) -> Result<Self, Self::Error> {
        FieldId::ALL
            .into_iter()
            .find(|field| field.key() == key)
            .ok_or(FormError::UnknownField(key))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FeedbackStatus {
    Pending,
    Valid,
    Invalid,
    Warning,
}

impl FeedbackStatus {
    pub const fn style_class(self) -> &'static str {
        match self {
            FeedbackStatus::Pending => "processing",
            FeedbackStatus::Valid => "valid-feedback",
            FeedbackStatus::Invalid => "invalid-feedback",
            FeedbackStatus::Warning => "warning-feedback",
        }
    }

    pub const fn is_settled(self) -> bool {
        !matches!(self, FeedbackStatus::Pending)
    }
}

pub const PENDING_MESSAGE: &str = "Validating...";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Feedback {
    pub status: FeedbackStatus,
    pub message: String,
}

impl Feedback {
    pub fn new(status: FeedbackStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn pending() -> Self {
        Self::new(FeedbackStatus::Pending, PENDING_MESSAGE)
    }

    pub fn valid(message: impl Into<String>) -> Self {
        Self::new(FeedbackStatus::Valid, message)
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(FeedbackStatus::Invalid, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(FeedbackStatus::Warning, message)
    }
}

impl Display for Feedback {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip_through_field_id() {
        for field in FieldId::ALL {
            assert_eq!(FieldId::try_from(field.key()).expect("known key"), field);
        }
        assert_eq!(
            FieldId::try_from(FieldKey::new("nickname")),
            Err(FormError::UnknownField(FieldKey::new("nickname")))
        );
    }

    #[test]
    fn only_password_triggers_on_value_change() {
        let on_change = FieldId::ALL
            .into_iter()
            .filter(|field| field.trigger() == Trigger::ValueChange)
            .collect::<Vec<_>>();
        assert_eq!(on_change, vec![FieldId::Password]);
    }
}
