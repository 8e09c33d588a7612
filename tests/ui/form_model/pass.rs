use formgate::form::{FieldLens, FormModel};

#[derive(Clone, formgate::form::FormModel)]
struct SignupForm {
    email: String,
    full_name: String,
}

fn main() {
    let fields = SignupForm::fields();
    let lens = fields.email();
    let mut model = SignupForm {
        email: "a@example.com".to_string(),
        full_name: "Ada Lovelace".to_string(),
    };
    lens.set(&mut model, "b@example.com".to_string());
    assert_eq!(lens.key().as_str(), "email");
    assert_eq!(lens.get(&model), "b@example.com");
    assert_eq!(fields.full_name().key().as_str(), "full_name");
}
