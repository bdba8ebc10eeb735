//! The owning document
//!
//! The submission engine needs very little from its document: the document
//! and base URLs, the character set, whether completed navigations may load
//! into it, and a registry of form-associated controls. The registry is
//! queried by form association on every operation instead of maintaining a
//! live collection per form.

use std::sync::{Arc, Mutex};

use url::Url;

use crate::network::Response;

use super::control::FormControl;

/// Whether a document can be the target of a navigation load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Completed navigations replace this document's content
    Navigable,
    /// Detached or auxiliary document; responses are discarded
    Detached,
}

/// Shared handle to a registered control
pub type ControlRef = Arc<Mutex<dyn FormControl>>;

/// A registry entry as returned by an association query
pub struct AssociatedControl {
    pub control: ControlRef,
    /// The control sits under a datalist-like suggestion element and is
    /// excluded from datasets
    pub inside_datalist: bool,
}

struct RegisteredControl {
    control: ControlRef,
    /// Form association key (the owning form's name)
    form: String,
    inside_datalist: bool,
}

/// The owning document
pub struct Document {
    url: Url,
    base: Option<Url>,
    character_set: String,
    kind: DocumentKind,
    controls: Mutex<Vec<RegisteredControl>>,
    loaded: Mutex<Option<Response>>,
}

impl Document {
    /// A navigable UTF-8 document at the given URL
    pub fn new(url: Url) -> Arc<Self> {
        Self::build(url, None, "UTF-8", DocumentKind::Navigable)
    }

    /// A document that navigations may never load into
    pub fn detached(url: Url) -> Arc<Self> {
        Self::build(url, None, "UTF-8", DocumentKind::Detached)
    }

    pub fn build(
        url: Url,
        base: Option<Url>,
        character_set: &str,
        kind: DocumentKind,
    ) -> Arc<Self> {
        Arc::new(Self {
            url,
            base,
            character_set: character_set.to_string(),
            kind,
            controls: Mutex::new(Vec::new()),
            loaded: Mutex::new(None),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The base URI used for relative action resolution
    pub fn base_url(&self) -> Url {
        self.base.clone().unwrap_or_else(|| self.url.clone())
    }

    pub fn character_set(&self) -> &str {
        &self.character_set
    }

    pub fn is_navigable(&self) -> bool {
        self.kind == DocumentKind::Navigable
    }

    /// Register a control under a form association, in document order
    pub fn register_control(&self, form: &str, control: ControlRef) {
        self.push_control(form, control, false);
    }

    /// Register a control that sits under a datalist-like element
    pub fn register_datalist_control(&self, form: &str, control: ControlRef) {
        self.push_control(form, control, true);
    }

    fn push_control(&self, form: &str, control: ControlRef, inside_datalist: bool) {
        self.controls.lock().unwrap().push(RegisteredControl {
            control,
            form: form.to_string(),
            inside_datalist,
        });
    }

    /// Controls associated with a form, in document order. Recomputed per
    /// call so membership reflects the registry at this instant.
    pub fn associated_controls(&self, form: &str) -> Vec<AssociatedControl> {
        self.controls
            .lock()
            .unwrap()
            .iter()
            .filter(|entry| entry.form == form)
            .map(|entry| AssociatedControl {
                control: entry.control.clone(),
                inside_datalist: entry.inside_datalist,
            })
            .collect()
    }

    /// Replace the document's content with a navigation response
    pub fn load(&self, response: Response) {
        log::debug!("loading {} into document", response.url);
        *self.loaded.lock().unwrap() = Some(response);
    }

    /// The most recently loaded content, if any
    pub fn loaded(&self) -> Option<Response> {
        self.loaded.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::TextInput;

    #[test]
    fn test_association_query_preserves_order_and_filters() {
        let doc = Document::new(Url::parse("http://example.org/").unwrap());
        doc.register_control("login", Arc::new(Mutex::new(TextInput::new("a", "1"))));
        doc.register_control("other", Arc::new(Mutex::new(TextInput::new("x", "9"))));
        doc.register_datalist_control("login", Arc::new(Mutex::new(TextInput::new("b", "2"))));
        doc.register_control("login", Arc::new(Mutex::new(TextInput::new("c", "3"))));

        let controls = doc.associated_controls("login");
        assert_eq!(controls.len(), 3);
        assert!(!controls[0].inside_datalist);
        assert!(controls[1].inside_datalist);
        assert!(!controls[2].inside_datalist);
    }

    #[test]
    fn test_base_url_fallback() {
        let url = Url::parse("http://example.org/app/page").unwrap();
        let doc = Document::new(url.clone());
        assert_eq!(doc.base_url(), url);

        let base = Url::parse("http://example.org/base/").unwrap();
        let doc = Document::build(url, Some(base.clone()), "UTF-8", DocumentKind::Navigable);
        assert_eq!(doc.base_url(), base);
    }

    #[test]
    fn test_load_replaces_content() {
        let doc = Document::new(Url::parse("http://example.org/").unwrap());
        assert!(doc.loaded().is_none());

        doc.load(Response::new("http://example.org/a", 200, "text/html", b"first".to_vec()));
        doc.load(Response::new("http://example.org/b", 200, "text/html", b"second".to_vec()));
        let loaded = doc.loaded().unwrap();
        assert_eq!(loaded.url, "http://example.org/b");
        assert_eq!(loaded.body, b"second");
    }
}
