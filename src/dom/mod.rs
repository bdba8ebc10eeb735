//! DOM collaborators for form submission
//!
//! A slim document model: the owning document with its control registry,
//! and the form-associated control variants.

mod control;
mod document;

pub use control::{
    CheckboxInput, ControlId, FileInput, FormControl, ImageButton, SelectControl, SelectOption,
    SubmitButton, TextArea, TextInput,
};
pub use document::{AssociatedControl, ControlRef, Document, DocumentKind};
