//! Action URL resolution
//!
//! Turns the form's action attribute into an absolute location with a
//! protocol classification used by the dispatcher.

use url::Url;

use crate::utils::Result;

/// Closed protocol classification for submission dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Http,
    Https,
    Ftp,
    Javascript,
    Data,
    Mailto,
    Other,
}

impl Protocol {
    pub fn classify(scheme: &str) -> Self {
        match scheme {
            "http" => Self::Http,
            "https" => Self::Https,
            "ftp" => Self::Ftp,
            "javascript" => Self::Javascript,
            "data" => Self::Data,
            "mailto" => Self::Mailto,
            _ => Self::Other,
        }
    }
}

/// A resolved submission target
#[derive(Debug, Clone)]
pub struct Location {
    pub url: Url,
    pub protocol: Protocol,
}

/// Resolve the action attribute against the document.
///
/// An empty action falls back to the document's own URL; a relative action
/// resolves against the base URI. A malformed result is a reportable error,
/// never a panic.
pub fn resolve_action(action: &str, document_url: &Url, base: &Url) -> Result<Location> {
    let url = if action.is_empty() {
        document_url.clone()
    } else {
        base.join(action)?
    };
    Ok(Location {
        protocol: Protocol::classify(url.scheme()),
        url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Url {
        Url::parse("http://example.org/app/index.html").unwrap()
    }

    #[test]
    fn test_empty_action_falls_back_to_document_url() {
        let location = resolve_action("", &doc(), &doc()).unwrap();
        assert_eq!(location.url.as_str(), "http://example.org/app/index.html");
        assert_eq!(location.protocol, Protocol::Http);
    }

    #[test]
    fn test_relative_action_resolves_against_base() {
        let base = Url::parse("http://example.org/app/").unwrap();
        let location = resolve_action("submit", &doc(), &base).unwrap();
        assert_eq!(location.url.as_str(), "http://example.org/app/submit");

        let location = resolve_action("/login", &doc(), &base).unwrap();
        assert_eq!(location.url.as_str(), "http://example.org/login");
    }

    #[test]
    fn test_absolute_action_replaces_base() {
        let location = resolve_action("https://other.example/x", &doc(), &doc()).unwrap();
        assert_eq!(location.protocol, Protocol::Https);
        assert_eq!(location.url.host_str(), Some("other.example"));
    }

    #[test]
    fn test_protocol_classification() {
        for (scheme, expected) in [
            ("http", Protocol::Http),
            ("https", Protocol::Https),
            ("ftp", Protocol::Ftp),
            ("javascript", Protocol::Javascript),
            ("data", Protocol::Data),
            ("mailto", Protocol::Mailto),
            ("gopher", Protocol::Other),
            ("file", Protocol::Other),
        ] {
            assert_eq!(Protocol::classify(scheme), expected, "scheme {}", scheme);
        }
    }

    #[test]
    fn test_malformed_action_is_an_error() {
        assert!(resolve_action("http://[", &doc(), &doc()).is_err());
    }
}
