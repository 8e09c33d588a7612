mod controller;
mod validation;

#[cfg(test)]
mod tests;

pub use formgate_derive::FormModel;

pub use controller::{
    FieldKey, FieldState, FormController, FormError, FormOptions, FormResult, FormSnapshot,
    ValidationMode, Validity,
};
pub(crate) use controller::{read_lock, write_lock};
pub use validation::{FieldLens, FieldValidator, FormModel, ValidationError};
