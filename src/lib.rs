pub mod contracts;
pub mod form;
pub mod prelude;
pub mod registration;

pub use registration::{
    RegistrationController, RegistrationForm, RegistrationRecord, SubmitOutcome,
};
