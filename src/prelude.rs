pub use crate::contracts::{
    Field, FieldIndication, PasswordDisplay, PasswordRule, RegistrationView,
};
pub use crate::form::{
    FieldKey, FieldLens, FieldState, FieldValidator, FormController, FormError, FormModel,
    FormOptions, FormResult, FormSnapshot, ValidationError, ValidationMode, Validity,
};
pub use crate::registration::{
    FieldSnapshot, NOTICE_CLEAR_DELAY, NoticeClear, PasswordRuleStatus, REDACTION_MARKER,
    RegistrationController, RegistrationForm, RegistrationRecord, RuleViolation, SUCCESS_NOTICE,
    SubmitOutcome,
};
