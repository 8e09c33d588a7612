//! Contracts between the registration controller and whatever renders it.
//!
//! The controller never draws anything. It pushes derived state through
//! [`RegistrationView`], so the same validation core drives any surface that
//! can show four fields, a rule checklist, a submit control and a notice.

use crate::form::FieldKey;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum Field {
    Username,
    FullName,
    Email,
    Password,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::Username,
        Field::FullName,
        Field::Email,
        Field::Password,
    ];

    pub const fn key(self) -> FieldKey {
        match self {
            Field::Username => FieldKey::new("username"),
            Field::FullName => FieldKey::new("full_name"),
            Field::Email => FieldKey::new("email"),
            Field::Password => FieldKey::new("password"),
        }
    }
}

/// Visual treatment of a field. `Neutral` is the untouched or cleared look,
/// never an error look.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldIndication {
    Neutral,
    Valid,
    Invalid,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum PasswordRule {
    Length,
    NumberOrSymbol,
    NoName,
    NoEmail,
}

impl PasswordRule {
    pub const ALL: [PasswordRule; 4] = [
        PasswordRule::Length,
        PasswordRule::NumberOrSymbol,
        PasswordRule::NoName,
        PasswordRule::NoEmail,
    ];
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PasswordDisplay {
    Hidden,
    Shown,
}

impl PasswordDisplay {
    pub const fn toggled(self) -> Self {
        match self {
            PasswordDisplay::Hidden => PasswordDisplay::Shown,
            PasswordDisplay::Shown => PasswordDisplay::Hidden,
        }
    }

    /// Label for the toggle control, describing the action it would perform.
    pub const fn toggle_label(self) -> &'static str {
        match self {
            PasswordDisplay::Hidden => "Show",
            PasswordDisplay::Shown => "Hide",
        }
    }
}

/// Render surface the controller pushes into. Implementations should treat
/// every call as idempotent; the controller may repeat a value it already
/// pushed.
pub trait RegistrationView: Send + Sync {
    fn set_field_indication(&self, field: Field, indication: FieldIndication);
    fn set_field_message(&self, field: Field, message: &str);
    fn set_rule_satisfied(&self, rule: PasswordRule, satisfied: bool);
    fn set_submit_enabled(&self, enabled: bool);
    fn set_success_notice(&self, text: &str);
    fn set_password_display(&self, display: PasswordDisplay, toggle_label: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_display_toggles_between_states() {
        assert_eq!(PasswordDisplay::Hidden.toggled(), PasswordDisplay::Shown);
        assert_eq!(PasswordDisplay::Shown.toggled(), PasswordDisplay::Hidden);
    }

    #[test]
    fn toggle_label_names_the_action() {
        assert_eq!(PasswordDisplay::Hidden.toggle_label(), "Show");
        assert_eq!(PasswordDisplay::Shown.toggle_label(), "Hide");
    }

    #[test]
    fn field_keys_match_model_field_names() {
        assert_eq!(Field::Username.key().as_str(), "username");
        assert_eq!(Field::FullName.key().as_str(), "full_name");
        assert_eq!(Field::Email.key().as_str(), "email");
        assert_eq!(Field::Password.key().as_str(), "password");
    }
}
