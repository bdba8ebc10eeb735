//! Form submission engine
//!
//! The submission controller: a trigger passes the validity gate, the action
//! attribute resolves to an absolute location, a dataset is collected from
//! the form's associated controls, and a transmission strategy selected by
//! (protocol, method) either schedules a cancellable navigation or folds the
//! dataset into the target URL.

pub mod config;
pub mod dataset;
pub mod dispatch;
pub mod resolver;
pub mod scheduler;
pub mod validity;

pub use config::{Autocomplete, Enctype, FormConfig, Method};
pub use dataset::{FilePayload, FormDataset};
pub use dispatch::DispatchPlan;
pub use resolver::{Location, Protocol};
pub use scheduler::{CancelScope, NavigationScheduler};
pub use validity::FormEvents;

use std::sync::Arc;

use crate::dom::{ControlId, Document};
use crate::network::Transport;
use crate::utils::Result;

/// Per-submitter overrides of form-level submission attributes
/// (formaction, formmethod, formenctype, formnovalidate)
#[derive(Debug, Clone, Default)]
pub struct SubmitterOverrides {
    pub action: Option<String>,
    pub method: Option<Method>,
    pub enctype: Option<Enctype>,
    pub no_validate: bool,
}

/// The control that triggered a submission
#[derive(Debug, Clone)]
pub struct Submitter {
    pub control: ControlId,
    /// Activation coordinates, for image buttons
    pub coords: Option<(u32, u32)>,
    pub overrides: SubmitterOverrides,
}

/// Outcome of a submission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A navigation was scheduled
    Scheduled,
    /// The validity gate rejected the attempt
    Invalid,
    /// An observer vetoed the attempt, or it re-entered dataset construction
    Suppressed,
    /// The (protocol, method) pair has no transmission strategy
    Unsupported,
}

/// How a submission was triggered
#[derive(Clone, Copy, PartialEq, Eq)]
enum Trigger {
    /// Programmatic submit(); bypasses the validity gate
    Programmatic,
    /// Submit-control activation; runs the gate
    ControlActivation,
}

/// A form element's submission state and behavior
///
/// The form owns its typed configuration and zero-or-one pending navigation.
/// Submission is fire-and-forget: the navigation runs asynchronously and its
/// completion is only observable through the owning document and the logs.
/// The form itself is single-owner; concurrent submissions from independent
/// threads require caller-side synchronization.
pub struct FormElement {
    config: FormConfig,
    /// Registry association key; controls registered under it belong to us
    association: String,
    document: Arc<Document>,
    transport: Arc<dyn Transport>,
    scheduler: NavigationScheduler,
    observers: Vec<Arc<dyn FormEvents>>,
    constructing_dataset: bool,
    resetting: bool,
}

impl FormElement {
    /// Create a form owned by `document`. Controls associate with it by
    /// registering under the configured form name.
    pub fn new(document: Arc<Document>, config: FormConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            association: config.name.clone(),
            config,
            document,
            transport,
            scheduler: NavigationScheduler::new(),
            observers: Vec::new(),
            constructing_dataset: false,
            resetting: false,
        }
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut FormConfig {
        &mut self.config
    }

    /// Subscribe to form-level notifications
    pub fn add_observer(&mut self, observer: Arc<dyn FormEvents>) {
        self.observers.push(observer);
    }

    /// Programmatic submission; proceeds unconditionally past the gate
    pub fn submit(&mut self) -> Result<SubmitOutcome> {
        self.run_submit(Trigger::Programmatic, None)
    }

    /// Implicit-trigger submission, e.g. from a submit-control activation.
    /// Runs the validity gate unless the form or the submitter opts out.
    pub fn request_submit(&mut self, submitter: Option<&Submitter>) -> Result<SubmitOutcome> {
        self.run_submit(Trigger::ControlActivation, submitter)
    }

    /// Aggregate constraint validation over the associated controls
    pub fn check_validity(&self) -> bool {
        validity::check_validity(&self.document.associated_controls(&self.association))
    }

    /// Reset every associated control to its initial state
    pub fn reset(&mut self) {
        if self.resetting {
            return;
        }
        self.resetting = true;
        for associated in self.document.associated_controls(&self.association) {
            associated.control.lock().unwrap().reset();
        }
        self.resetting = false;
    }

    /// Whether a scheduled navigation is still in flight
    pub fn is_navigation_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Wait for the in-flight navigation, if any, to settle
    pub async fn settle(&mut self) {
        self.scheduler.flush().await;
    }

    fn run_submit(
        &mut self,
        trigger: Trigger,
        submitter: Option<&Submitter>,
    ) -> Result<SubmitOutcome> {
        if self.constructing_dataset {
            return Ok(SubmitOutcome::Suppressed);
        }

        if trigger == Trigger::ControlActivation {
            let no_validate =
                self.config.no_validate || submitter.is_some_and(|s| s.overrides.no_validate);
            if !no_validate && !self.check_validity() {
                log::debug!("submission rejected by the validity gate");
                for observer in &self.observers {
                    observer.invalid();
                }
                return Ok(SubmitOutcome::Invalid);
            }
            if !self.observers.iter().all(|o| o.submit_requested()) {
                log::debug!("submission vetoed by an observer");
                return Ok(SubmitOutcome::Suppressed);
            }
        }

        // Submitter overrides take precedence over the form configuration
        let action = submitter
            .and_then(|s| s.overrides.action.clone())
            .unwrap_or_else(|| self.config.action.clone());
        let method = submitter
            .and_then(|s| s.overrides.method)
            .unwrap_or(self.config.method);
        let enctype = submitter
            .and_then(|s| s.overrides.enctype)
            .unwrap_or(self.config.enctype);

        let location =
            resolver::resolve_action(&action, self.document.url(), &self.document.base_url())?;

        let dataset = self.build_dataset(submitter);

        match dispatch::plan(location, method, enctype, &dataset)? {
            DispatchPlan::Navigate(request) => {
                log::debug!(
                    "scheduling {} navigation to {}",
                    method.as_str(),
                    request.url
                );
                self.scheduler
                    .schedule(self.transport.clone(), self.document.clone(), request);
                Ok(SubmitOutcome::Scheduled)
            }
            DispatchPlan::Unsupported => {
                log::debug!("no transmission strategy for this protocol and method");
                Ok(SubmitOutcome::Unsupported)
            }
        }
    }

    /// Collect the dataset from the associated controls in document order,
    /// skipping disabled and datalist-nested controls
    fn build_dataset(&mut self, submitter: Option<&Submitter>) -> FormDataset {
        self.constructing_dataset = true;
        let mut dataset = FormDataset::new(self.pick_character_set());
        for associated in self.document.associated_controls(&self.association) {
            if associated.inside_datalist {
                continue;
            }
            let control = associated.control.lock().unwrap();
            if control.disabled() {
                continue;
            }
            control.append_entries(&mut dataset, submitter);
        }
        self.constructing_dataset = false;
        dataset
    }

    /// First recognized candidate from accept-charset, else the document's
    /// character set
    fn pick_character_set(&self) -> String {
        for label in self.config.accept_charset.split_ascii_whitespace() {
            if let Some(charset) = dataset::recognize_charset(label) {
                return charset.to_string();
            }
        }
        self.document.character_set().to_string()
    }
}
