// Form pipeline: control catalogue, career entries, duration, mapping, validation, markup.

pub mod career;
pub mod controls;
pub mod duration;
pub mod mapper;
pub mod markup;
pub mod state;
pub mod validation;

pub use career::{Confirmation, RemoveOutcome};
pub use controls::{BasicField, CareerField, CharCount, ControlKey, EntryId, FormControl};
pub use mapper::{collect, populate};
pub use state::FormState;
pub use validation::{validate, ValidationReport};
