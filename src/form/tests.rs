use super::*;
use std::borrow::Cow;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct TestError(&'static str);

impl ValidationError for TestError {
    fn message(&self) -> Cow<'static, str> {
        Cow::Borrowed(self.0)
    }
}

#[allow(dead_code)]
#[derive(Clone, Debug, Default, PartialEq, Eq, formgate_derive::FormModel)]
struct CredentialsForm {
    login: String,
    secret: String,
    confirm_secret: String,
}

fn on_change_form() -> FormController<CredentialsForm, TestError> {
    FormController::new(CredentialsForm::default(), FormOptions::default())
}

fn on_submit_form() -> FormController<CredentialsForm, TestError> {
    FormController::new(
        CredentialsForm::default(),
        FormOptions {
            validate_mode: ValidationMode::OnSubmit,
            validate_first_error_only: false,
        },
    )
}

#[test]
fn set_updates_model_through_lens() {
    let form = on_change_form();
    let fields = CredentialsForm::fields();

    form.set(fields.login(), "ada".to_string())
        .expect("set must succeed");

    let snapshot = form.snapshot().expect("snapshot must succeed");
    assert_eq!(snapshot.model.login, "ada");
    assert_eq!(
        form.value(fields.login()).expect("value must succeed"),
        "ada"
    );
}

#[test]
fn presence_check_reports_empty_and_skips_validators() {
    let form = on_change_form();
    let fields = CredentialsForm::fields();
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = calls.clone();

    form.register_presence_check(fields.login(), |value: &String| !value.is_empty())
        .expect("presence registration must succeed");
    form.register_field_validator(
        fields.login(),
        move |_model: &CredentialsForm, value: &String| {
            seen.fetch_add(1, Ordering::SeqCst);
            if value.len() >= 3 {
                Ok(())
            } else {
                Err(TestError("login too short"))
            }
        },
    )
    .expect("validator registration must succeed");

    form.set(fields.login(), String::new())
        .expect("set must succeed");
    let state = form
        .field_state(fields.login())
        .expect("field state must be readable");
    assert_eq!(state.validity, Validity::Empty);
    assert!(state.errors.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    form.set(fields.login(), "ada".to_string())
        .expect("set must succeed");
    let state = form
        .field_state(fields.login())
        .expect("field state must be readable");
    assert_eq!(state.validity, Validity::Valid);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn empty_field_clears_previous_errors() {
    let form = on_change_form();
    let fields = CredentialsForm::fields();

    form.register_presence_check(fields.login(), |value: &String| !value.is_empty())
        .expect("presence registration must succeed");
    form.register_field_validator(
        fields.login(),
        |_model: &CredentialsForm, value: &String| {
            if value.len() >= 3 {
                Ok(())
            } else {
                Err(TestError("login too short"))
            }
        },
    )
    .expect("validator registration must succeed");

    form.set(fields.login(), "ab".to_string())
        .expect("set must succeed");
    assert_eq!(
        form.field_state(fields.login())
            .expect("field state must be readable")
            .validity,
        Validity::Invalid
    );

    form.set(fields.login(), String::new())
        .expect("set must succeed");
    let state = form
        .field_state(fields.login())
        .expect("field state must be readable");
    assert_eq!(state.validity, Validity::Empty);
    assert!(state.errors.is_empty());
    assert_eq!(state.message(), None);
}

#[test]
fn validators_run_in_registration_order() {
    let form = on_change_form();
    let fields = CredentialsForm::fields();

    form.register_field_validator(
        fields.secret(),
        |_model: &CredentialsForm, _value: &String| Err(TestError("first rule")),
    )
    .expect("validator registration must succeed");
    form.register_field_validator(
        fields.secret(),
        |_model: &CredentialsForm, _value: &String| Err(TestError("second rule")),
    )
    .expect("validator registration must succeed");

    form.set(fields.secret(), "anything".to_string())
        .expect("set must succeed");
    let state = form
        .field_state(fields.secret())
        .expect("field state must be readable");
    assert_eq!(state.validity, Validity::Invalid);
    assert_eq!(
        state.errors,
        vec![TestError("first rule"), TestError("second rule")]
    );
    assert_eq!(state.message(), Some(Cow::Borrowed("first rule")));
}

#[test]
fn first_error_only_stops_at_first_failure() {
    let form = FormController::new(
        CredentialsForm::default(),
        FormOptions {
            validate_mode: ValidationMode::OnChange,
            validate_first_error_only: true,
        },
    );
    let fields = CredentialsForm::fields();

    form.register_field_validator(
        fields.secret(),
        |_model: &CredentialsForm, _value: &String| Err(TestError("first rule")),
    )
    .expect("validator registration must succeed");
    form.register_field_validator(
        fields.secret(),
        |_model: &CredentialsForm, _value: &String| Err(TestError("second rule")),
    )
    .expect("validator registration must succeed");

    form.set(fields.secret(), "anything".to_string())
        .expect("set must succeed");
    let state = form
        .field_state(fields.secret())
        .expect("field state must be readable");
    assert_eq!(state.errors, vec![TestError("first rule")]);
}

#[test]
fn on_submit_mode_defers_validation_until_validate_all() {
    let form = on_submit_form();
    let fields = CredentialsForm::fields();

    form.register_field_validator(
        fields.login(),
        |_model: &CredentialsForm, value: &String| {
            if value.len() >= 3 {
                Ok(())
            } else {
                Err(TestError("login too short"))
            }
        },
    )
    .expect("validator registration must succeed");

    form.set(fields.login(), "ab".to_string())
        .expect("set must succeed");
    let state = form
        .field_state(fields.login())
        .expect("field state must be readable");
    assert_eq!(state.validity, Validity::Empty);
    assert!(state.errors.is_empty());

    form.validate_all().expect("validate_all must succeed");
    let state = form
        .field_state(fields.login())
        .expect("field state must be readable");
    assert_eq!(state.validity, Validity::Invalid);
}

#[test]
fn dependency_revalidates_linked_field() {
    let form = on_change_form();
    let fields = CredentialsForm::fields();

    form.register_field_validator(
        fields.confirm_secret(),
        |model: &CredentialsForm, value: &String| {
            if value == &model.secret {
                Ok(())
            } else {
                Err(TestError("secrets do not match"))
            }
        },
    )
    .expect("validator registration must succeed");
    form.register_dependency(fields.secret(), fields.confirm_secret())
        .expect("dependency registration must succeed");

    form.set(fields.secret(), "hunter2".to_string())
        .expect("set must succeed");
    form.set(fields.confirm_secret(), "hunter2".to_string())
        .expect("set must succeed");
    assert_eq!(
        form.field_state(fields.confirm_secret())
            .expect("field state must be readable")
            .validity,
        Validity::Valid
    );

    form.set(fields.secret(), "hunter3".to_string())
        .expect("set must succeed");
    let state = form
        .field_state(fields.confirm_secret())
        .expect("field state must be readable");
    assert_eq!(state.validity, Validity::Invalid);
    assert_eq!(state.message(), Some(Cow::Borrowed("secrets do not match")));
}

#[test]
fn submit_gate_requires_every_required_field_valid() {
    let form = on_change_form();
    let fields = CredentialsForm::fields();

    form.register_presence_check(fields.login(), |value: &String| !value.is_empty())
        .expect("presence registration must succeed");
    form.register_presence_check(fields.secret(), |value: &String| !value.is_empty())
        .expect("presence registration must succeed");
    form.register_required_field(fields.login())
        .expect("required registration must succeed");
    form.register_required_field(fields.secret())
        .expect("required registration must succeed");

    assert!(!form.submit_gate().expect("gate must be readable"));

    form.set(fields.login(), "ada".to_string())
        .expect("set must succeed");
    assert!(!form.submit_gate().expect("gate must be readable"));

    form.set(fields.secret(), "hunter2".to_string())
        .expect("set must succeed");
    assert!(form.submit_gate().expect("gate must be readable"));
}

#[test]
fn invalid_required_field_closes_gate() {
    let form = on_change_form();
    let fields = CredentialsForm::fields();

    form.register_presence_check(fields.login(), |value: &String| !value.is_empty())
        .expect("presence registration must succeed");
    form.register_field_validator(
        fields.login(),
        |_model: &CredentialsForm, value: &String| {
            if value.len() >= 3 {
                Ok(())
            } else {
                Err(TestError("login too short"))
            }
        },
    )
    .expect("validator registration must succeed");
    form.register_required_field(fields.login())
        .expect("required registration must succeed");

    form.set(fields.login(), "ada".to_string())
        .expect("set must succeed");
    assert!(form.submit_gate().expect("gate must be readable"));

    form.set(fields.login(), "ab".to_string())
        .expect("set must succeed");
    assert!(!form.submit_gate().expect("gate must be readable"));
}

#[test]
fn reset_to_initial_restores_model_and_empty_states() {
    let form = on_change_form();
    let fields = CredentialsForm::fields();

    form.register_presence_check(fields.login(), |value: &String| !value.is_empty())
        .expect("presence registration must succeed");
    form.register_required_field(fields.login())
        .expect("required registration must succeed");

    form.set(fields.login(), "ada".to_string())
        .expect("set must succeed");
    assert!(form.submit_gate().expect("gate must be readable"));

    form.reset_to_initial().expect("reset must succeed");

    let snapshot = form.snapshot().expect("snapshot must succeed");
    assert_eq!(snapshot.model, CredentialsForm::default());
    assert!(!snapshot.submit_gate);
    assert_eq!(
        form.field_state(fields.login())
            .expect("field state must be readable")
            .validity,
        Validity::Empty
    );
}

#[test]
fn field_state_defaults_to_empty_for_untouched_field() {
    let form = on_change_form();
    let fields = CredentialsForm::fields();

    let state = form
        .field_state(fields.confirm_secret())
        .expect("field state must be readable");
    assert_eq!(state.validity, Validity::Empty);
    assert!(state.errors.is_empty());
}

#[test]
fn snapshot_reports_model_gate_and_states() {
    let form = on_change_form();
    let fields = CredentialsForm::fields();

    form.register_presence_check(fields.login(), |value: &String| !value.is_empty())
        .expect("presence registration must succeed");
    form.register_required_field(fields.login())
        .expect("required registration must succeed");
    form.set(fields.login(), "ada".to_string())
        .expect("set must succeed");

    let snapshot = form.snapshot().expect("snapshot must succeed");
    assert_eq!(snapshot.model.login, "ada");
    assert!(snapshot.submit_gate);
    let state = snapshot
        .field_states
        .get(&fields.login().key())
        .expect("login state must be recorded");
    assert_eq!(state.validity, Validity::Valid);
}

#[test]
fn validate_field_returns_current_validity() {
    let form = on_submit_form();
    let fields = CredentialsForm::fields();

    form.register_presence_check(fields.login(), |value: &String| !value.is_empty())
        .expect("presence registration must succeed");
    form.register_field_validator(
        fields.login(),
        |_model: &CredentialsForm, value: &String| {
            if value.len() >= 3 {
                Ok(())
            } else {
                Err(TestError("login too short"))
            }
        },
    )
    .expect("validator registration must succeed");

    assert_eq!(
        form.validate_field(fields.login())
            .expect("validation must succeed"),
        Validity::Empty
    );

    form.set(fields.login(), "ab".to_string())
        .expect("set must succeed");
    assert_eq!(
        form.validate_field(fields.login())
            .expect("validation must succeed"),
        Validity::Invalid
    );

    form.set(fields.login(), "ada".to_string())
        .expect("set must succeed");
    assert_eq!(
        form.validate_field(fields.login())
            .expect("validation must succeed"),
        Validity::Valid
    );
}
