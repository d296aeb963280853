use regform::form::{FieldKey, FieldLens, FormModel};

#[derive(Clone, regform::form::FormModel)]
struct ContactForm {
    email: String,
    display_name: String,
}

fn main() {
    let fields = ContactForm::fields();
    let lens = fields.display_name();
    let mut model = ContactForm {
        email: "a@example.com".to_string(),
        display_name: String::new(),
    };
    lens.set(&mut model, "Priya Patel".to_string());
    assert_eq!(lens.key().as_str(), "display_name");
    assert_eq!(lens.get(&model), "Priya Patel");
    assert_eq!(
        ContactForm::field_keys(),
        &[FieldKey::new("email"), FieldKey::new("display_name")]
    );
    assert!(model.set_value(FieldKey::new("email"), "b@example.com".to_string()));
    assert_eq!(model.value(FieldKey::new("email")), Some("b@example.com"));
}
