//! Transient form state: the add/edit form and the inline quick-edit.

mod patient_form;
mod quick_edit;

pub use patient_form::*;
pub use quick_edit::*;
