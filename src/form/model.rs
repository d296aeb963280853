use super::field::{FieldId, FieldKey};

pub trait FieldLens<T>: Copy + Send + Sync + 'static {
    type Value: Clone + PartialEq + Send + Sync + 'static;

    fn key(self) -> FieldKey;
    fn get<'a>(self, model: &'a T) -> &'a Self::Value;
    fn set(self, model: &mut T, value: Self::Value);
}

/// A form whose fields are all text, addressable by [`FieldKey`].
pub trait FormModel: Clone + Send + Sync + 'static {
    type Fields;

    fn fields() -> Self::Fields;

    /// Keys in declaration order.
    fn field_keys() -> &'static [FieldKey];

    fn value(&self, key: FieldKey) -> Option<&str>;

    /// Returns `false` when `key` is not a field of this model.
    fn set_value(&mut self, key: FieldKey, value: String) -> bool;
}

/// Raw values of the registration form, exactly as typed.
#[derive(Clone, Debug, Default, Eq, PartialEq, regform_derive::FormModel)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub mobile: String,
}

impl RegistrationForm {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        mobile: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            mobile: mobile.into(),
        }
    }

    pub fn get(&self, field: FieldId) -> &str {
        match field {
            FieldId::Username => &self.username,
            FieldId::Email => &self.email,
            FieldId::Password => &self.password,
            FieldId::Mobile => &self.mobile,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_keys_follow_field_catalogue() {
        let keys = RegistrationForm::field_keys();
        let catalogue = FieldId::ALL.map(FieldId::key);
        assert_eq!(keys, catalogue.as_slice());
    }

    #[test]
    fn derived_accessors_agree_with_get() {
        let mut form = RegistrationForm::new("newuser1", "fresh@new.com", "Abcdef1!", "9123456789");
        for field in FieldId::ALL {
            assert_eq!(form.value(field.key()), Some(form.get(field)));
        }
        assert!(form.set_value(FieldKey::new("mobile"), "6000000000".to_string()));
        assert_eq!(form.mobile, "6000000000");
        assert!(!form.set_value(FieldKey::new("nickname"), "x".to_string()));
        assert_eq!(form.value(FieldKey::new("nickname")), None);
    }

    #[test]
    fn lenses_read_and_write_single_fields() {
        let fields = RegistrationForm::fields();
        let mut form = RegistrationForm::default();
        fields.email().set(&mut form, "a@b.co".to_string());
        assert_eq!(fields.email().get(&form), "a@b.co");
        assert_eq!(fields.email().key().as_str(), "email");
        assert!(form.username.is_empty());
    }
}
