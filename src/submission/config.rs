//! Typed form configuration
//!
//! Submission attributes are parsed once into enums instead of being
//! re-interpreted from an attribute bag on every use. An attribute-style
//! string view is kept for interop with markup-level callers.

/// Normalized submission method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
}

impl Method {
    /// Parse from an attribute value; anything unrecognized is GET
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "post" => Self::Post,
            _ => Self::Get,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
        }
    }
}

/// Normalized payload encoding scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Enctype {
    #[default]
    UrlEncoded,
    Multipart,
    PlainText,
}

impl Enctype {
    /// Parse from an attribute value; anything unrecognized is urlencoded
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "multipart/form-data" => Self::Multipart,
            "text/plain" => Self::PlainText,
            _ => Self::UrlEncoded,
        }
    }

    /// The MIME type reported for this encoding, without parameters
    pub fn as_mime(&self) -> &'static str {
        match self {
            Self::UrlEncoded => "application/x-www-form-urlencoded",
            Self::Multipart => "multipart/form-data",
            Self::PlainText => "text/plain",
        }
    }
}

/// Autofill expectation advertised by the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Autocomplete {
    #[default]
    On,
    Off,
}

impl Autocomplete {
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "off" => Self::Off,
            _ => Self::On,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }
}

/// Typed form configuration
///
/// Owns every submission-relevant attribute of the form element.
#[derive(Debug, Clone, Default)]
pub struct FormConfig {
    /// Action attribute, possibly empty or relative
    pub action: String,
    pub method: Method,
    pub enctype: Enctype,
    pub autocomplete: Autocomplete,
    /// Browsing-context target name
    pub target: String,
    pub name: String,
    /// Space-separated candidate character set labels
    pub accept_charset: String,
    /// Skip the validity gate on implicit submissions
    pub no_validate: bool,
}

impl FormConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute-style getter returning the normalized string value
    pub fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "action" => Some(self.action.clone()),
            "method" => Some(self.method.as_str().to_string()),
            "enctype" | "encoding" => Some(self.enctype.as_mime().to_string()),
            "autocomplete" => Some(self.autocomplete.as_str().to_string()),
            "target" => Some(self.target.clone()),
            "name" => Some(self.name.clone()),
            "accept-charset" => Some(self.accept_charset.clone()),
            "novalidate" => self.no_validate.then(|| String::new()),
            _ => None,
        }
    }

    /// Attribute-style setter; enumerated values are parsed immediately
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        match name {
            "action" => self.action = value.to_string(),
            "method" => self.method = Method::parse(value),
            "enctype" | "encoding" => self.enctype = Enctype::parse(value),
            "autocomplete" => self.autocomplete = Autocomplete::parse(value),
            "target" => self.target = value.to_string(),
            "name" => self.name = value.to_string(),
            "accept-charset" => self.accept_charset = value.to_string(),
            "novalidate" => self.no_validate = true,
            _ => {}
        }
    }
}
