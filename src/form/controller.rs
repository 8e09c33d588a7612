use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::validation::ValidationError;

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

/// Outcome of validating one field; `Empty` means the presence check failed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Validity {
    Empty,
    Invalid,
    Valid,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValidationMode {
    OnChange,
    OnSubmit,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FormOptions {
    pub validate_mode: ValidationMode,
    pub validate_first_error_only: bool,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            validate_mode: ValidationMode::OnChange,
            validate_first_error_only: false,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldState<E> {
    pub validity: Validity,
    pub errors: Vec<E>,
}

impl<E> Default for FieldState<E> {
    fn default() -> Self {
        Self {
            validity: Validity::Empty,
            errors: Vec::new(),
        }
    }
}

impl<E: ValidationError> FieldState<E> {
    pub fn message(&self) -> Option<Cow<'static, str>> {
        self.errors.first().map(ValidationError::message)
    }

    pub fn is_valid(&self) -> bool {
        self.validity == Validity::Valid
    }
}

#[derive(Clone, Debug)]
pub struct FormSnapshot<T, E> {
    pub model: T,
    pub submit_gate: bool,
    pub field_states: BTreeMap<FieldKey, FieldState<E>>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum FormError {
    StatePoisoned(&'static str),
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormError::StatePoisoned(context) => {
                write!(f, "form state lock poisoned while {context}")
            }
        }
    }
}

impl std::error::Error for FormError {}

pub type FormResult<T> = Result<T, FormError>;

pub(super) type FieldValidatorFn<T, E> = Arc<dyn Fn(&T) -> Result<(), E> + Send + Sync>;
pub(super) type PresenceCheckFn<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

pub(super) struct FormState<T, E> {
    pub(super) initial_model: T,
    pub(super) model: T,
    pub(super) field_states: BTreeMap<FieldKey, FieldState<E>>,
}

impl<T, E> FormState<T, E> {
    pub(super) fn ensure_state(&mut self, key: FieldKey) -> &mut FieldState<E> {
        self.field_states.entry(key).or_default()
    }
}

#[derive(Clone)]
pub struct FormController<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    pub(super) options: FormOptions,
    pub(super) state: Arc<RwLock<FormState<T, E>>>,
    pub(super) field_validators: Arc<RwLock<BTreeMap<FieldKey, Vec<FieldValidatorFn<T, E>>>>>,
    pub(super) presence_checks: Arc<RwLock<BTreeMap<FieldKey, PresenceCheckFn<T>>>>,
    pub(super) dependencies: Arc<RwLock<BTreeMap<FieldKey, BTreeSet<FieldKey>>>>,
    pub(super) required_fields: Arc<RwLock<BTreeSet<FieldKey>>>,
}

impl<T, E> FormController<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    pub fn new(initial: T, options: FormOptions) -> Self {
        Self {
            options,
            state: Arc::new(RwLock::new(FormState {
                initial_model: initial.clone(),
                model: initial,
                field_states: BTreeMap::new(),
            })),
            field_validators: Arc::new(RwLock::new(BTreeMap::new())),
            presence_checks: Arc::new(RwLock::new(BTreeMap::new())),
            dependencies: Arc::new(RwLock::new(BTreeMap::new())),
            required_fields: Arc::new(RwLock::new(BTreeSet::new())),
        }
    }

    pub fn options(&self) -> FormOptions {
        self.options
    }

    pub fn register_required_field<L>(&self, lens: L) -> FormResult<()>
    where
        L: super::validation::FieldLens<T>,
    {
        let key = lens.key();
        {
            let mut required = write_lock(&self.required_fields, "registering required field")?;
            required.insert(key);
        }
        let mut state = write_lock(&self.state, "seeding required field state")?;
        state.ensure_state(key);
        Ok(())
    }

    pub fn is_required<L>(&self, lens: L) -> FormResult<bool>
    where
        L: super::validation::FieldLens<T>,
    {
        Ok(read_lock(&self.required_fields, "reading required fields")?.contains(&lens.key()))
    }

    /// Open only when every required field currently sits at `Valid`.
    pub fn submit_gate(&self) -> FormResult<bool> {
        let required = read_lock(&self.required_fields, "reading required fields for gate")?;
        let state = read_lock(&self.state, "reading field states for gate")?;
        Ok(required.iter().all(|key| {
            state
                .field_states
                .get(key)
                .is_some_and(|field| field.validity == Validity::Valid)
        }))
    }

    pub fn reset_to_initial(&self) -> FormResult<()> {
        {
            let mut state = write_lock(&self.state, "resetting form")?;
            state.model = state.initial_model.clone();
        }
        self.validate_all()?;
        Ok(())
    }

    pub fn snapshot(&self) -> FormResult<FormSnapshot<T, E>> {
        let submit_gate = self.submit_gate()?;
        let state = read_lock(&self.state, "creating form snapshot")?;
        Ok(FormSnapshot {
            model: state.model.clone(),
            submit_gate,
            field_states: state.field_states.clone(),
        })
    }

    pub fn field_state<L>(&self, lens: L) -> FormResult<FieldState<E>>
    where
        L: super::validation::FieldLens<T>,
    {
        Ok(read_lock(&self.state, "reading field state")?
            .field_states
            .get(&lens.key())
            .cloned()
            .unwrap_or_default())
    }

    pub fn value<L>(&self, lens: L) -> FormResult<L::Value>
    where
        L: super::validation::FieldLens<T>,
    {
        let state = read_lock(&self.state, "reading field value")?;
        Ok(lens.get(&state.model).clone())
    }
}

pub(crate) fn read_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| FormError::StatePoisoned(context))
}

pub(crate) fn write_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| FormError::StatePoisoned(context))
}
