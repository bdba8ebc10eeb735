//! Form-associated controls
//!
//! Controls are polymorphic over a small capability set: a disabled flag,
//! constraint validation, reset, and dataset contribution. Value-producing
//! logic lives in each control; the submission engine only drives iteration
//! and filtering.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::submission::dataset::{FilePayload, FormDataset};
use crate::submission::{Submitter, SubmitterOverrides};

/// Stable identity for a control, used to recognize the submitter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlId(u64);

impl ControlId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Capability set shared by every form-associated control
pub trait FormControl: Send {
    fn id(&self) -> ControlId;

    /// Disabled controls never contribute to submission
    fn disabled(&self) -> bool {
        false
    }

    /// Constraint validation for this control
    fn check_validity(&self) -> bool {
        true
    }

    /// Restore the control to its initial state
    fn reset(&mut self) {}

    /// Contribute this control's entries to a submission dataset.
    /// `submitter` is the control that triggered the submission, if any.
    fn append_entries(&self, dataset: &mut FormDataset, submitter: Option<&Submitter>);
}

/// Text-like input (text, password, hidden, number, ...)
pub struct TextInput {
    id: ControlId,
    kind: String,
    name: String,
    value: String,
    initial_value: String,
    disabled: bool,
    required: bool,
}

impl TextInput {
    pub fn new(name: &str, value: &str) -> Self {
        Self::with_kind("text", name, value)
    }

    pub fn hidden(name: &str, value: &str) -> Self {
        Self::with_kind("hidden", name, value)
    }

    pub fn with_kind(kind: &str, name: &str, value: &str) -> Self {
        Self {
            id: ControlId::next(),
            kind: kind.to_string(),
            name: name.to_string(),
            value: value.to_string(),
            initial_value: value.to_string(),
            disabled: false,
            required: false,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn set_required(&mut self, required: bool) {
        self.required = required;
    }
}

impl FormControl for TextInput {
    fn id(&self) -> ControlId {
        self.id
    }

    fn disabled(&self) -> bool {
        self.disabled
    }

    fn check_validity(&self) -> bool {
        !self.required || !self.value.is_empty()
    }

    fn reset(&mut self) {
        self.value = self.initial_value.clone();
    }

    fn append_entries(&self, dataset: &mut FormDataset, _submitter: Option<&Submitter>) {
        if !self.name.is_empty() {
            dataset.push_text(&self.kind, &self.name, &self.value);
        }
    }
}

/// Checkbox or radio input; contributes only while checked
pub struct CheckboxInput {
    id: ControlId,
    kind: String,
    name: String,
    value: String,
    checked: bool,
    initial_checked: bool,
    disabled: bool,
    required: bool,
}

impl CheckboxInput {
    pub fn new(name: &str) -> Self {
        Self::with_kind("checkbox", name, "on")
    }

    pub fn radio(name: &str, value: &str) -> Self {
        Self::with_kind("radio", name, value)
    }

    fn with_kind(kind: &str, name: &str, value: &str) -> Self {
        Self {
            id: ControlId::next(),
            kind: kind.to_string(),
            name: name.to_string(),
            value: value.to_string(),
            checked: false,
            initial_checked: false,
            disabled: false,
            required: false,
        }
    }

    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn set_required(&mut self, required: bool) {
        self.required = required;
    }
}

impl FormControl for CheckboxInput {
    fn id(&self) -> ControlId {
        self.id
    }

    fn disabled(&self) -> bool {
        self.disabled
    }

    fn check_validity(&self) -> bool {
        !self.required || self.checked
    }

    fn reset(&mut self) {
        self.checked = self.initial_checked;
    }

    fn append_entries(&self, dataset: &mut FormDataset, _submitter: Option<&Submitter>) {
        if self.checked && !self.name.is_empty() {
            dataset.push_text(&self.kind, &self.name, &self.value);
        }
    }
}

/// File upload input
pub struct FileInput {
    id: ControlId,
    name: String,
    files: Vec<FilePayload>,
    disabled: bool,
    required: bool,
}

impl FileInput {
    pub fn new(name: &str) -> Self {
        Self {
            id: ControlId::next(),
            name: name.to_string(),
            files: Vec::new(),
            disabled: false,
            required: false,
        }
    }

    /// Add a file to the selection
    pub fn select_file(&mut self, file: FilePayload) {
        self.files.push(file);
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn set_required(&mut self, required: bool) {
        self.required = required;
    }
}

impl FormControl for FileInput {
    fn id(&self) -> ControlId {
        self.id
    }

    fn disabled(&self) -> bool {
        self.disabled
    }

    fn check_validity(&self) -> bool {
        !self.required || !self.files.is_empty()
    }

    fn reset(&mut self) {
        self.files.clear();
    }

    fn append_entries(&self, dataset: &mut FormDataset, _submitter: Option<&Submitter>) {
        if self.name.is_empty() {
            return;
        }
        if self.files.is_empty() {
            // An empty selection still contributes a placeholder entry
            dataset.push_file(&self.name, FilePayload::empty());
            return;
        }
        for file in &self.files {
            dataset.push_file(&self.name, file.clone());
        }
    }
}

/// One option inside a select control
pub struct SelectOption {
    pub value: String,
    pub selected: bool,
    initial_selected: bool,
}

impl SelectOption {
    pub fn new(value: &str, selected: bool) -> Self {
        Self {
            value: value.to_string(),
            selected,
            initial_selected: selected,
        }
    }
}

/// Select control; contributes one entry per selected option
pub struct SelectControl {
    id: ControlId,
    name: String,
    options: Vec<SelectOption>,
    disabled: bool,
}

impl SelectControl {
    pub fn new(name: &str) -> Self {
        Self {
            id: ControlId::next(),
            name: name.to_string(),
            options: Vec::new(),
            disabled: false,
        }
    }

    pub fn add_option(&mut self, value: &str, selected: bool) {
        self.options.push(SelectOption::new(value, selected));
    }

    pub fn set_selected(&mut self, index: usize, selected: bool) {
        if let Some(option) = self.options.get_mut(index) {
            option.selected = selected;
        }
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }
}

impl FormControl for SelectControl {
    fn id(&self) -> ControlId {
        self.id
    }

    fn disabled(&self) -> bool {
        self.disabled
    }

    fn reset(&mut self) {
        for option in &mut self.options {
            option.selected = option.initial_selected;
        }
    }

    fn append_entries(&self, dataset: &mut FormDataset, _submitter: Option<&Submitter>) {
        if self.name.is_empty() {
            return;
        }
        for option in self.options.iter().filter(|o| o.selected) {
            dataset.push_text("select", &self.name, &option.value);
        }
    }
}

/// Multi-line text control
pub struct TextArea {
    id: ControlId,
    name: String,
    value: String,
    initial_value: String,
    disabled: bool,
    required: bool,
}

impl TextArea {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            id: ControlId::next(),
            name: name.to_string(),
            value: value.to_string(),
            initial_value: value.to_string(),
            disabled: false,
            required: false,
        }
    }

    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn set_required(&mut self, required: bool) {
        self.required = required;
    }
}

impl FormControl for TextArea {
    fn id(&self) -> ControlId {
        self.id
    }

    fn disabled(&self) -> bool {
        self.disabled
    }

    fn check_validity(&self) -> bool {
        !self.required || !self.value.is_empty()
    }

    fn reset(&mut self) {
        self.value = self.initial_value.clone();
    }

    fn append_entries(&self, dataset: &mut FormDataset, _submitter: Option<&Submitter>) {
        if !self.name.is_empty() {
            dataset.push_text("textarea", &self.name, &self.value);
        }
    }
}

/// Submit button; contributes its name/value only when it triggered the
/// submission, and can override form-level submission attributes
pub struct SubmitButton {
    id: ControlId,
    name: String,
    value: String,
    disabled: bool,
    overrides: SubmitterOverrides,
}

impl SubmitButton {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            id: ControlId::next(),
            name: name.to_string(),
            value: value.to_string(),
            disabled: false,
            overrides: SubmitterOverrides::default(),
        }
    }

    /// Per-button overrides (formaction, formmethod, formenctype,
    /// formnovalidate)
    pub fn set_overrides(&mut self, overrides: SubmitterOverrides) {
        self.overrides = overrides;
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Describe an activation of this button
    pub fn as_submitter(&self) -> Submitter {
        Submitter {
            control: self.id,
            coords: None,
            overrides: self.overrides.clone(),
        }
    }
}

impl FormControl for SubmitButton {
    fn id(&self) -> ControlId {
        self.id
    }

    fn disabled(&self) -> bool {
        self.disabled
    }

    fn append_entries(&self, dataset: &mut FormDataset, submitter: Option<&Submitter>) {
        let is_submitter = submitter.is_some_and(|s| s.control == self.id);
        if is_submitter && !self.name.is_empty() {
            dataset.push_text("submit", &self.name, &self.value);
        }
    }
}

/// Image submit button; contributes the activation coordinates
pub struct ImageButton {
    id: ControlId,
    name: String,
    disabled: bool,
}

impl ImageButton {
    pub fn new(name: &str) -> Self {
        Self {
            id: ControlId::next(),
            name: name.to_string(),
            disabled: false,
        }
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Describe a click on this button at the given coordinates
    pub fn as_submitter(&self, x: u32, y: u32) -> Submitter {
        Submitter {
            control: self.id,
            coords: Some((x, y)),
            overrides: SubmitterOverrides::default(),
        }
    }
}

impl FormControl for ImageButton {
    fn id(&self) -> ControlId {
        self.id
    }

    fn disabled(&self) -> bool {
        self.disabled
    }

    fn append_entries(&self, dataset: &mut FormDataset, submitter: Option<&Submitter>) {
        let Some(submitter) = submitter.filter(|s| s.control == self.id) else {
            return;
        };
        let (x, y) = submitter.coords.unwrap_or((0, 0));
        let (x_name, y_name) = if self.name.is_empty() {
            ("x".to_string(), "y".to_string())
        } else {
            (format!("{}.x", self.name), format!("{}.y", self.name))
        };
        dataset.push_text("image", &x_name, &x.to_string());
        dataset.push_text("image", &y_name, &y.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::dataset::EntryValue;

    fn dataset() -> FormDataset {
        FormDataset::new("UTF-8".to_string())
    }

    fn pairs(data: &FormDataset) -> Vec<(String, String)> {
        data.entries()
            .iter()
            .map(|e| {
                let value = match &e.value {
                    EntryValue::Text(s) => s.clone(),
                    EntryValue::File(f) => f.filename.clone(),
                };
                (e.name.clone(), value)
            })
            .collect()
    }

    #[test]
    fn test_text_input_contribution() {
        let mut data = dataset();
        TextInput::new("user", "alice").append_entries(&mut data, None);
        TextInput::new("", "ignored").append_entries(&mut data, None);
        assert_eq!(pairs(&data), vec![("user".to_string(), "alice".to_string())]);
    }

    #[test]
    fn test_text_input_reset_and_validity() {
        let mut input = TextInput::new("user", "initial");
        input.set_required(true);
        input.set_value("changed");
        assert!(input.check_validity());

        input.set_value("");
        assert!(!input.check_validity());

        input.reset();
        assert_eq!(input.value(), "initial");
        assert!(input.check_validity());
    }

    #[test]
    fn test_checkbox_contributes_only_when_checked() {
        let mut data = dataset();
        let mut unchecked = CheckboxInput::new("news");
        unchecked.append_entries(&mut data, None);
        assert!(data.is_empty());

        unchecked.set_checked(true);
        unchecked.append_entries(&mut data, None);
        assert_eq!(pairs(&data), vec![("news".to_string(), "on".to_string())]);
    }

    #[test]
    fn test_select_contributes_selected_options() {
        let mut select = SelectControl::new("color");
        select.add_option("red", false);
        select.add_option("green", true);
        select.add_option("blue", true);

        let mut data = dataset();
        select.append_entries(&mut data, None);
        assert_eq!(
            pairs(&data),
            vec![
                ("color".to_string(), "green".to_string()),
                ("color".to_string(), "blue".to_string()),
            ]
        );

        select.set_selected(1, false);
        select.reset();
        let mut data = dataset();
        select.append_entries(&mut data, None);
        assert_eq!(pairs(&data).len(), 2);
    }

    #[test]
    fn test_file_input_placeholder_and_selection() {
        let mut input = FileInput::new("upload");
        let mut data = dataset();
        input.append_entries(&mut data, None);
        assert_eq!(pairs(&data), vec![("upload".to_string(), String::new())]);

        input.select_file(FilePayload::new("a.txt", "text/plain", b"a".to_vec()));
        input.select_file(FilePayload::new("b.txt", "text/plain", b"b".to_vec()));
        let mut data = dataset();
        input.append_entries(&mut data, None);
        assert_eq!(
            pairs(&data),
            vec![
                ("upload".to_string(), "a.txt".to_string()),
                ("upload".to_string(), "b.txt".to_string()),
            ]
        );

        input.reset();
        let mut data = dataset();
        input.append_entries(&mut data, None);
        assert_eq!(pairs(&data), vec![("upload".to_string(), String::new())]);
    }

    #[test]
    fn test_submit_button_contributes_only_as_submitter() {
        let button = SubmitButton::new("go", "Send");
        let other = SubmitButton::new("other", "Other");

        let mut data = dataset();
        button.append_entries(&mut data, None);
        assert!(data.is_empty());

        let mut data = dataset();
        let submitter = other.as_submitter();
        button.append_entries(&mut data, Some(&submitter));
        assert!(data.is_empty());

        let mut data = dataset();
        let submitter = button.as_submitter();
        button.append_entries(&mut data, Some(&submitter));
        assert_eq!(pairs(&data), vec![("go".to_string(), "Send".to_string())]);
    }

    #[test]
    fn test_image_button_coordinates() {
        let named = ImageButton::new("map");
        let mut data = dataset();
        let submitter = named.as_submitter(10, 20);
        named.append_entries(&mut data, Some(&submitter));
        assert_eq!(
            pairs(&data),
            vec![
                ("map.x".to_string(), "10".to_string()),
                ("map.y".to_string(), "20".to_string()),
            ]
        );

        let unnamed = ImageButton::new("");
        let mut data = dataset();
        let submitter = unnamed.as_submitter(3, 4);
        unnamed.append_entries(&mut data, Some(&submitter));
        assert_eq!(
            pairs(&data),
            vec![
                ("x".to_string(), "3".to_string()),
                ("y".to_string(), "4".to_string()),
            ]
        );
    }
}
