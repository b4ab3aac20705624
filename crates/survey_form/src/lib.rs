//! Form-state controller for student survey records.
//!
//! [`FormController`] owns one record and a [`Mode`]; every change goes
//! through a named transition. Zip code edits re-derive city and state from a
//! [`ZipTable`], the liked-most checkboxes are stored through [`codec`], and
//! [`validation`] gates submission before the transport is called.

pub mod codec;
pub mod controller;
pub mod derivation;
pub mod error;
pub mod field;
pub mod results;
pub mod validation;
pub mod zip;

pub use controller::{
    ConfirmDelete, Control, DeleteOutcome, FormController, FormEvent, FormSnapshot, Mode,
};
pub use error::FormError;
pub use field::Field;
pub use results::ResultsView;
pub use zip::ZipTable;
