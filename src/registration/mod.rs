mod controller;
mod notice;
mod rules;


pub use controller::{
    FieldSnapshot, RegistrationController, RegistrationForm, RegistrationFormEmailLens,
    RegistrationFormFields, RegistrationFormFullNameLens, RegistrationFormPasswordLens,
    RegistrationFormUsernameLens, RegistrationRecord, SubmitOutcome,
};
pub use notice::{NOTICE_CLEAR_DELAY, NoticeClear, REDACTION_MARKER, SUCCESS_NOTICE};
pub use rules::{
    PASSWORD_MIN_CHARS, PASSWORD_SYMBOLS, PasswordRuleStatus, RuleViolation, USERNAME_MAX_CHARS,
    USERNAME_MIN_CHARS,
};
