//! # Formix - HTML Form Submission Engine
//!
//! An implementation of the HTML form-submission algorithm: constraint
//! validation, action URL resolution, dataset construction, dispatch by
//! protocol and method, and cancellable planned navigations.
//!
//! ## Architecture
//!
//! The engine is organized into the following core modules:
//!
//! - **submission**: the submission controller (validity gate, URL resolver,
//!   dataset builder, dispatcher, navigation scheduler)
//! - **dom**: the owning document and form-associated controls
//! - **network**: the transport collaborator used by planned navigations
//! - **utils**: shared utilities and error types

pub mod dom;
pub mod network;
pub mod submission;
pub mod utils;

// Re-export main types for convenience
pub use dom::{Document, DocumentKind, FormControl};
pub use submission::{FormElement, SubmitOutcome, Submitter};
pub use utils::error::{FormixError, Result};

/// Engine version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = "Formix";
