use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::form::ValidationError;

pub const USERNAME_MIN_CHARS: usize = 3;
pub const USERNAME_MAX_CHARS: usize = 15;
pub const PASSWORD_MIN_CHARS: usize = 8;

/// Symbols that satisfy the number-or-symbol password rule.
pub const PASSWORD_SYMBOLS: &[char] = &[
    '!', '@', '#', '$', '%', '^', '&', '*', '(', ')', ',', '.', '?', '"', ':', '{', '}', '|', '<',
    '>',
];

/// Name or email fragments shorter than this never count as contained in the
/// password, so single-letter initials cannot fail the rule.
const MIN_FRAGMENT_CHARS: usize = 2;

static USERNAME_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("username pattern compiles"));

static FULL_NAME_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z\s]+$").expect("full name pattern compiles"));

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// One broken registration rule, ordered by message priority within each field.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RuleViolation {
    UsernameLength,
    UsernameCharset,
    FullNameCharset,
    FullNameIncomplete,
    EmailShape,
    PasswordTooShort,
    PasswordMissingNumberOrSymbol,
    PasswordContainsName,
    PasswordContainsEmail,
}

impl ValidationError for RuleViolation {
    fn message(&self) -> Cow<'static, str> {
        Cow::Borrowed(match self {
            RuleViolation::UsernameLength => "Username must be between 3 and 15 characters",
            RuleViolation::UsernameCharset => "Username can only contain letters and numbers",
            RuleViolation::FullNameCharset => "Full name must contain only letters and spaces",
            RuleViolation::FullNameIncomplete => "Please enter your full name",
            RuleViolation::EmailShape => "Please enter a valid email address",
            RuleViolation::PasswordTooShort => "Password must be at least 8 characters long",
            RuleViolation::PasswordMissingNumberOrSymbol => {
                "Password must include at least one number or one symbol"
            }
            RuleViolation::PasswordContainsName => "Password cannot contain your name",
            RuleViolation::PasswordContainsEmail => "Password cannot contain your email",
        })
    }
}

pub fn check_username_length(trimmed: &str) -> Result<(), RuleViolation> {
    let count = trimmed.chars().count();
    if (USERNAME_MIN_CHARS..=USERNAME_MAX_CHARS).contains(&count) {
        Ok(())
    } else {
        Err(RuleViolation::UsernameLength)
    }
}

pub fn check_username_charset(trimmed: &str) -> Result<(), RuleViolation> {
    if USERNAME_CHARSET.is_match(trimmed) {
        Ok(())
    } else {
        Err(RuleViolation::UsernameCharset)
    }
}

pub fn check_full_name_charset(trimmed: &str) -> Result<(), RuleViolation> {
    if FULL_NAME_CHARSET.is_match(trimmed) {
        Ok(())
    } else {
        Err(RuleViolation::FullNameCharset)
    }
}

/// A full name needs at least a first and a last part.
pub fn check_full_name_parts(trimmed: &str) -> Result<(), RuleViolation> {
    let parts = trimmed.split(' ').filter(|part| !part.is_empty()).count();
    if parts >= 2 {
        Ok(())
    } else {
        Err(RuleViolation::FullNameIncomplete)
    }
}

/// Syntactic shape check, not a full email grammar.
pub fn check_email_shape(trimmed: &str) -> Result<(), RuleViolation> {
    if EMAIL_SHAPE.is_match(trimmed) {
        Ok(())
    } else {
        Err(RuleViolation::EmailShape)
    }
}

pub fn check_password_length(password: &str) -> Result<(), RuleViolation> {
    if password.chars().count() >= PASSWORD_MIN_CHARS {
        Ok(())
    } else {
        Err(RuleViolation::PasswordTooShort)
    }
}

pub fn check_password_number_or_symbol(password: &str) -> Result<(), RuleViolation> {
    if has_number_or_symbol(password) {
        Ok(())
    } else {
        Err(RuleViolation::PasswordMissingNumberOrSymbol)
    }
}

/// Holds vacuously while the full name field is blank.
pub fn check_password_excludes_name(password: &str, full_name: &str) -> Result<(), RuleViolation> {
    if password_contains_fragment(password, &name_fragments(full_name)) {
        Err(RuleViolation::PasswordContainsName)
    } else {
        Ok(())
    }
}

/// Holds vacuously while the email field is blank.
pub fn check_password_excludes_email(password: &str, email: &str) -> Result<(), RuleViolation> {
    if password_contains_fragment(password, &email_fragments(email)) {
        Err(RuleViolation::PasswordContainsEmail)
    } else {
        Ok(())
    }
}

pub fn has_number_or_symbol(value: &str) -> bool {
    value
        .chars()
        .any(|c| c.is_ascii_digit() || PASSWORD_SYMBOLS.contains(&c))
}

/// Checklist beside the password field, recomputed from the raw field values
/// on every password-affecting keystroke. The `Default` value is the fully
/// unsatisfied checklist shown before any input.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PasswordRuleStatus {
    pub length_ok: bool,
    pub number_or_symbol_ok: bool,
    pub no_name_ok: bool,
    pub no_email_ok: bool,
}

impl PasswordRuleStatus {
    pub fn evaluate(password: &str, full_name: &str, email: &str) -> Self {
        Self {
            length_ok: check_password_length(password).is_ok(),
            number_or_symbol_ok: check_password_number_or_symbol(password).is_ok(),
            no_name_ok: check_password_excludes_name(password, full_name).is_ok(),
            no_email_ok: check_password_excludes_email(password, email).is_ok(),
        }
    }

    pub fn all_ok(self) -> bool {
        self.length_ok && self.number_or_symbol_ok && self.no_name_ok && self.no_email_ok
    }
}

fn name_fragments(full_name: &str) -> Vec<String> {
    full_name
        .trim()
        .to_lowercase()
        .split_whitespace()
        .filter(|part| part.chars().count() >= MIN_FRAGMENT_CHARS)
        .map(str::to_owned)
        .collect()
}

fn email_fragments(email: &str) -> Vec<String> {
    email
        .trim()
        .to_lowercase()
        .split(['@', '.'])
        .filter(|part| part.chars().count() >= MIN_FRAGMENT_CHARS)
        .map(str::to_owned)
        .collect()
}

fn password_contains_fragment(password: &str, fragments: &[String]) -> bool {
    if fragments.is_empty() {
        return false;
    }
    let haystack = password.to_lowercase();
    fragments
        .iter()
        .any(|fragment| haystack.contains(fragment.as_str()))
}
