use std::borrow::Cow;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::contracts::{Field, FieldIndication, PasswordDisplay, PasswordRule, RegistrationView};
use crate::form::{
    FieldState, FormController, FormModel, FormOptions, FormResult, Validity, read_lock,
    write_lock,
};

use super::notice::{NOTICE_CLEAR_DELAY, NoticeClear, REDACTION_MARKER, SUCCESS_NOTICE};
use super::rules::{self, PasswordRuleStatus, RuleViolation};

#[derive(Clone, Debug, Default, PartialEq, Eq, FormModel)]
pub struct RegistrationForm {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// What a registration submission hands onward. The password never leaves
/// the form; the record carries the fixed marker instead.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RegistrationRecord {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub password: &'static str,
}

impl RegistrationRecord {
    fn redacted(model: &RegistrationForm) -> Self {
        Self {
            username: model.username.trim().to_owned(),
            full_name: model.full_name.trim().to_owned(),
            email: model.email.trim().to_owned(),
            password: REDACTION_MARKER,
        }
    }
}

pub enum SubmitOutcome {
    /// At least one field was empty or invalid; nothing was emitted.
    Rejected,
    /// All fields valid. The form has been reset and the success notice
    /// shown; `notice_clear` is the deferred task that blanks it again.
    Accepted {
        record: RegistrationRecord,
        notice_clear: NoticeClear,
    },
}

/// Point-in-time view of one field, for embedders that poll.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldSnapshot {
    pub raw: String,
    pub trimmed: String,
    pub validity: Validity,
    pub message: Option<Cow<'static, str>>,
}

/// Drives the registration form: owns the field values, revalidates on every
/// change notification and pushes the derived state into the injected view.
#[derive(Clone)]
pub struct RegistrationController {
    form: FormController<RegistrationForm, RuleViolation>,
    view: Arc<dyn RegistrationView>,
    password_display: Arc<RwLock<PasswordDisplay>>,
    notice_serial: Arc<RwLock<u64>>,
    notice_delay: Duration,
}

impl RegistrationController {
    pub fn new(view: Arc<dyn RegistrationView>) -> FormResult<Self> {
        let form = FormController::new(RegistrationForm::default(), FormOptions::default());
        let fields = RegistrationForm::fields();

        form.register_presence_check(fields.username(), |value: &String| {
            !value.trim().is_empty()
        })?;
        form.register_presence_check(fields.full_name(), |value: &String| {
            !value.trim().is_empty()
        })?;
        form.register_presence_check(fields.email(), |value: &String| !value.trim().is_empty())?;
        form.register_presence_check(fields.password(), |value: &String| !value.is_empty())?;

        // Registration order is message priority.
        form.register_field_validator(fields.username(), |_: &RegistrationForm, value: &String| {
            rules::check_username_length(value.trim())
        })?;
        form.register_field_validator(fields.username(), |_: &RegistrationForm, value: &String| {
            rules::check_username_charset(value.trim())
        })?;
        form.register_field_validator(
            fields.full_name(),
            |_: &RegistrationForm, value: &String| rules::check_full_name_charset(value.trim()),
        )?;
        form.register_field_validator(
            fields.full_name(),
            |_: &RegistrationForm, value: &String| rules::check_full_name_parts(value.trim()),
        )?;
        form.register_field_validator(fields.email(), |_: &RegistrationForm, value: &String| {
            rules::check_email_shape(value.trim())
        })?;
        form.register_field_validator(fields.password(), |_: &RegistrationForm, value: &String| {
            rules::check_password_length(value)
        })?;
        form.register_field_validator(fields.password(), |_: &RegistrationForm, value: &String| {
            rules::check_password_number_or_symbol(value)
        })?;
        form.register_field_validator(
            fields.password(),
            |model: &RegistrationForm, value: &String| {
                rules::check_password_excludes_name(value, &model.full_name)
            },
        )?;
        form.register_field_validator(
            fields.password(),
            |model: &RegistrationForm, value: &String| {
                rules::check_password_excludes_email(value, &model.email)
            },
        )?;

        // The no-name and no-email rules read these fields.
        form.register_dependency(fields.full_name(), fields.password())?;
        form.register_dependency(fields.email(), fields.password())?;

        form.register_required_field(fields.username())?;
        form.register_required_field(fields.full_name())?;
        form.register_required_field(fields.email())?;
        form.register_required_field(fields.password())?;

        let controller = Self {
            form,
            view,
            password_display: Arc::new(RwLock::new(PasswordDisplay::Hidden)),
            notice_serial: Arc::new(RwLock::new(0)),
            notice_delay: NOTICE_CLEAR_DELAY,
        };
        controller.form.validate_all()?;
        controller.present_initial()?;
        Ok(controller)
    }

    /// Overrides the self-clear delay; the default is [`NOTICE_CLEAR_DELAY`].
    pub fn notice_clear_delay(mut self, delay: Duration) -> Self {
        self.notice_delay = delay;
        self
    }

    pub fn username_changed(&self, value: impl Into<String>) -> FormResult<()> {
        let fields = RegistrationForm::fields();
        self.form.set(fields.username(), value.into())?;
        self.present_field(Field::Username)?;
        self.present_gate()
    }

    pub fn full_name_changed(&self, value: impl Into<String>) -> FormResult<()> {
        let fields = RegistrationForm::fields();
        self.form.set(fields.full_name(), value.into())?;
        self.present_field(Field::FullName)?;
        self.present_field(Field::Password)?;
        self.present_checklist()?;
        self.present_gate()
    }

    pub fn email_changed(&self, value: impl Into<String>) -> FormResult<()> {
        let fields = RegistrationForm::fields();
        self.form.set(fields.email(), value.into())?;
        self.present_field(Field::Email)?;
        self.present_field(Field::Password)?;
        self.present_checklist()?;
        self.present_gate()
    }

    pub fn password_changed(&self, value: impl Into<String>) -> FormResult<()> {
        let fields = RegistrationForm::fields();
        self.form.set(fields.password(), value.into())?;
        self.present_field(Field::Password)?;
        self.present_checklist()?;
        self.present_gate()
    }

    /// Flips the password display and pushes it with its toggle label;
    /// validation state is untouched.
    pub fn toggle_password_visibility(&self) -> FormResult<PasswordDisplay> {
        let current = {
            let mut display = write_lock(&self.password_display, "toggling password display")?;
            *display = display.toggled();
            *display
        };
        self.view
            .set_password_display(current, current.toggle_label());
        Ok(current)
    }

    /// Revalidates everything, then either rejects with the error display
    /// refreshed, or emits a redacted record, resets and shows the notice.
    pub fn submit(&self) -> FormResult<SubmitOutcome> {
        let gate = self.form.validate_all()?;
        if !gate {
            self.present_form()?;
            log::debug!("registration submit rejected: not all fields valid");
            return Ok(SubmitOutcome::Rejected);
        }

        let record = {
            let snapshot = self.form.snapshot()?;
            RegistrationRecord::redacted(&snapshot.model)
        };
        log::info!("registration accepted: {record:?}");

        let serial = {
            let mut latest = write_lock(&self.notice_serial, "arming notice clear")?;
            *latest += 1;
            *latest
        };
        self.view.set_success_notice(SUCCESS_NOTICE);
        let notice_clear = NoticeClear::new(
            self.view.clone(),
            self.notice_serial.clone(),
            serial,
            self.notice_delay,
        );

        self.form.reset_to_initial()?;
        self.present_cleared()?;

        Ok(SubmitOutcome::Accepted {
            record,
            notice_clear,
        })
    }

    pub fn submit_gate(&self) -> FormResult<bool> {
        self.form.submit_gate()
    }

    pub fn password_display(&self) -> FormResult<PasswordDisplay> {
        Ok(*read_lock(&self.password_display, "reading password display")?)
    }

    pub fn password_checklist(&self) -> FormResult<PasswordRuleStatus> {
        let model = self.form.snapshot()?.model;
        Ok(PasswordRuleStatus::evaluate(
            &model.password,
            &model.full_name,
            &model.email,
        ))
    }

    pub fn field_snapshot(&self, field: Field) -> FormResult<FieldSnapshot> {
        let model = self.form.snapshot()?.model;
        let raw = match field {
            Field::Username => model.username,
            Field::FullName => model.full_name,
            Field::Email => model.email,
            Field::Password => model.password,
        };
        let state = self.field_state_of(field)?;
        Ok(FieldSnapshot {
            trimmed: raw.trim().to_owned(),
            raw,
            validity: state.validity,
            message: state.message(),
        })
    }

    fn field_state_of(&self, field: Field) -> FormResult<FieldState<RuleViolation>> {
        let fields = RegistrationForm::fields();
        match field {
            Field::Username => self.form.field_state(fields.username()),
            Field::FullName => self.form.field_state(fields.full_name()),
            Field::Email => self.form.field_state(fields.email()),
            Field::Password => self.form.field_state(fields.password()),
        }
    }

    fn present_field(&self, field: Field) -> FormResult<()> {
        let state = self.field_state_of(field)?;
        let indication = match state.validity {
            Validity::Empty => FieldIndication::Neutral,
            Validity::Invalid => FieldIndication::Invalid,
            Validity::Valid => FieldIndication::Valid,
        };
        self.view.set_field_indication(field, indication);
        let message = state.message().unwrap_or_default();
        self.view.set_field_message(field, &message);
        Ok(())
    }

    fn present_checklist(&self) -> FormResult<()> {
        let status = self.password_checklist()?;
        self.push_checklist(status);
        Ok(())
    }

    fn push_checklist(&self, status: PasswordRuleStatus) {
        self.view
            .set_rule_satisfied(PasswordRule::Length, status.length_ok);
        self.view
            .set_rule_satisfied(PasswordRule::NumberOrSymbol, status.number_or_symbol_ok);
        self.view
            .set_rule_satisfied(PasswordRule::NoName, status.no_name_ok);
        self.view
            .set_rule_satisfied(PasswordRule::NoEmail, status.no_email_ok);
    }

    fn present_gate(&self) -> FormResult<()> {
        let gate = self.form.submit_gate()?;
        self.view.set_submit_enabled(gate);
        Ok(())
    }

    /// Pushes every field, the recomputed checklist and the gate.
    fn present_form(&self) -> FormResult<()> {
        for field in Field::ALL {
            self.present_field(field)?;
        }
        self.present_checklist()?;
        self.present_gate()
    }

    /// Blank-form presentation. The checklist is pushed fully unsatisfied
    /// rather than recomputed, since on a blank form the vacuous no-name and
    /// no-email rules would already read as satisfied.
    fn present_cleared(&self) -> FormResult<()> {
        for field in Field::ALL {
            self.present_field(field)?;
        }
        self.push_checklist(PasswordRuleStatus::default());
        self.present_gate()
    }

    fn present_initial(&self) -> FormResult<()> {
        self.present_cleared()?;
        self.view.set_success_notice("");
        let display = self.password_display()?;
        self.view
            .set_password_display(display, display.toggle_label());
        Ok(())
    }
}
