use std::borrow::Cow;
use std::collections::BTreeSet;
use std::sync::Arc;

use super::controller::{
    FieldKey, FieldValidatorFn, FormController, FormResult, PresenceCheckFn, ValidationMode,
    Validity, read_lock, write_lock,
};

pub trait ValidationError: Clone + Send + Sync + 'static {
    fn message(&self) -> Cow<'static, str>;
}

pub trait FieldLens<T>: Copy + Send + Sync + 'static {
    type Value: Clone + PartialEq + Send + Sync + 'static;

    fn key(self) -> FieldKey;
    fn get<'a>(self, model: &'a T) -> &'a Self::Value;
    fn set(self, model: &mut T, value: Self::Value);
}

pub trait FormModel: Clone + Send + Sync + 'static {
    type Fields;

    fn fields() -> Self::Fields;
}

pub trait FieldValidator<T, L, E>: Send + Sync
where
    L: FieldLens<T>,
    E: ValidationError,
{
    fn validate(&self, model: &T, value: &L::Value) -> Result<(), E>;
}

impl<T, L, E, F> FieldValidator<T, L, E> for F
where
    L: FieldLens<T>,
    E: ValidationError,
    F: for<'a> Fn(&'a T, &'a L::Value) -> Result<(), E> + Send + Sync,
{
    fn validate(&self, model: &T, value: &L::Value) -> Result<(), E> {
        (self)(model, value)
    }
}

impl<T, E> FormController<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    /// Validators run in registration order; register the highest-priority rule first.
    pub fn register_field_validator<L, V>(&self, lens: L, validator: V) -> FormResult<()>
    where
        L: FieldLens<T>,
        V: FieldValidator<T, L, E> + 'static,
    {
        let key = lens.key();
        let validator = Arc::new(validator);
        let wrapped: FieldValidatorFn<T, E> =
            Arc::new(move |model: &T| validator.validate(model, lens.get(model)));
        let mut validators = write_lock(&self.field_validators, "registering field validator")?;
        validators.entry(key).or_default().push(wrapped);
        Ok(())
    }

    /// A field whose presence check returns false is reported as `Empty` and its
    /// validators are skipped. One check per field; registering again replaces it.
    pub fn register_presence_check<L>(
        &self,
        lens: L,
        check: impl Fn(&L::Value) -> bool + Send + Sync + 'static,
    ) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        let key = lens.key();
        let wrapped: PresenceCheckFn<T> = Arc::new(move |model: &T| check(lens.get(model)));
        let mut checks = write_lock(&self.presence_checks, "registering presence check")?;
        checks.insert(key, wrapped);
        Ok(())
    }

    pub fn register_dependency<S, D>(&self, source: S, dependent: D) -> FormResult<()>
    where
        S: FieldLens<T>,
        D: FieldLens<T>,
    {
        let mut dependencies = write_lock(&self.dependencies, "registering dependency")?;
        dependencies
            .entry(source.key())
            .or_default()
            .insert(dependent.key());
        Ok(())
    }

    pub fn set<L>(&self, lens: L, value: L::Value) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        let key = lens.key();
        {
            let mut state = write_lock(&self.state, "writing form model")?;
            lens.set(&mut state.model, value);
        }

        if self.options.validate_mode == ValidationMode::OnChange {
            let _ = self.validate_field_by_key(key)?;
            self.revalidate_dependents(key)?;
        }
        Ok(())
    }

    pub fn validate_field<L>(&self, lens: L) -> FormResult<Validity>
    where
        L: FieldLens<T>,
    {
        self.validate_field_by_key(lens.key())
    }

    /// Revalidates every known field, then reports whether the submit gate is open.
    pub fn validate_all(&self) -> FormResult<bool> {
        for key in self.known_field_keys()? {
            let _ = self.validate_field_by_key(key)?;
        }
        self.submit_gate()
    }

    pub(super) fn validate_field_by_key(&self, key: FieldKey) -> FormResult<Validity> {
        let model = {
            read_lock(&self.state, "reading model for field validation")?
                .model
                .clone()
        };

        let presence = read_lock(&self.presence_checks, "reading presence check")?
            .get(&key)
            .cloned();
        if let Some(check) = presence
            && !check(&model)
        {
            let mut state = write_lock(&self.state, "recording empty field")?;
            let field = state.ensure_state(key);
            field.validity = Validity::Empty;
            field.errors.clear();
            return Ok(Validity::Empty);
        }

        let validators = {
            read_lock(&self.field_validators, "reading field validators")?
                .get(&key)
                .cloned()
                .unwrap_or_default()
        };

        let mut errors = Vec::new();
        for validator in validators {
            if let Err(error) = validator(&model) {
                errors.push(error);
                if self.options.validate_first_error_only {
                    break;
                }
            }
        }

        let validity = if errors.is_empty() {
            Validity::Valid
        } else {
            Validity::Invalid
        };
        let mut state = write_lock(&self.state, "writing field validation result")?;
        let field = state.ensure_state(key);
        field.validity = validity;
        field.errors = errors;
        Ok(validity)
    }

    pub(super) fn revalidate_dependents(&self, source: FieldKey) -> FormResult<()> {
        let dependents = read_lock(&self.dependencies, "reading field dependencies")?
            .get(&source)
            .cloned()
            .unwrap_or_default();
        for dependent in dependents {
            let _ = self.validate_field_by_key(dependent)?;
        }
        Ok(())
    }

    pub(super) fn known_field_keys(&self) -> FormResult<BTreeSet<FieldKey>> {
        let mut keys = BTreeSet::new();
        keys.extend(
            read_lock(&self.field_validators, "reading validator keys")?
                .keys()
                .copied(),
        );
        keys.extend(
            read_lock(&self.presence_checks, "reading presence check keys")?
                .keys()
                .copied(),
        );
        keys.extend(
            read_lock(&self.dependencies, "reading dependency keys")?
                .iter()
                .flat_map(|(key, values)| std::iter::once(*key).chain(values.iter().copied())),
        );
        keys.extend(
            read_lock(&self.required_fields, "reading required field keys")?
                .iter()
                .copied(),
        );
        keys.extend(
            read_lock(&self.state, "reading known keys from field states")?
                .field_states
                .keys()
                .copied(),
        );
        Ok(keys)
    }
}
