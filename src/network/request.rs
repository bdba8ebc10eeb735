//! Navigation request types

use url::Url;

use crate::submission::Method;

/// The wire-level description of a planned navigation
#[derive(Debug, Clone)]
pub struct NavigationRequest {
    pub url: Url,
    pub method: Method,
    /// Entity body for POST-like submissions
    pub body: Option<Vec<u8>>,
    /// MIME type advertised for the body
    pub mime: Option<String>,
}

impl NavigationRequest {
    /// A bodyless GET navigation
    pub fn get(url: Url) -> Self {
        Self {
            url,
            method: Method::Get,
            body: None,
            mime: None,
        }
    }

    /// A POST navigation carrying an encoded dataset
    pub fn post(url: Url, body: Vec<u8>, mime: String) -> Self {
        Self {
            url,
            method: Method::Post,
            body: Some(body),
            mime: Some(mime),
        }
    }
}
