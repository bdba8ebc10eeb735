//! Submission dispatch
//!
//! A total decision table over (protocol, method). Every cell selects a
//! named transmission strategy; unsupported cells are an explicit no-op,
//! never an error. Dispatch only chooses where the encoded dataset goes
//! (query, entity body, or URI payload); it never alters the entries.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use url::{Url, form_urlencoded};

use crate::network::NavigationRequest;
use crate::utils::Result;

use super::config::{Enctype, Method};
use super::dataset::FormDataset;
use super::resolver::{Location, Protocol};

/// What the dispatcher decided to do with a submission
#[derive(Debug)]
pub enum DispatchPlan {
    /// Hand this request to the navigation scheduler
    Navigate(NavigationRequest),
    /// The (protocol, method) cell has no transmission strategy
    Unsupported,
}

/// Select the transmission strategy for a resolved submission
pub fn plan(
    location: Location,
    method: Method,
    enctype: Enctype,
    dataset: &FormDataset,
) -> Result<DispatchPlan> {
    match (location.protocol, method) {
        (Protocol::Http | Protocol::Https, Method::Get) => {
            Ok(mutate_action_url(location, dataset))
        }
        (Protocol::Http | Protocol::Https, Method::Post) => {
            Ok(submit_entity_body(location, enctype, dataset))
        }
        (Protocol::Ftp | Protocol::Javascript, _) => Ok(navigate_plain(location)),
        (Protocol::Data, Method::Get) => Ok(navigate_plain(location)),
        (Protocol::Data, Method::Post) => post_to_data(location, enctype, dataset),
        (Protocol::Mailto, Method::Get) => Ok(mail_with_headers(location, dataset)),
        (Protocol::Mailto, Method::Post) => Ok(mail_as_body(location, enctype, dataset)),
        (Protocol::Other, _) => Ok(DispatchPlan::Unsupported),
    }
}

/// GET to http/https: the urlencoded dataset becomes the URL query
fn mutate_action_url(location: Location, dataset: &FormDataset) -> DispatchPlan {
    let mut url = location.url;
    url.set_query(Some(&dataset.to_urlencoded()));
    DispatchPlan::Navigate(NavigationRequest::get(url))
}

/// POST to http/https: the dataset becomes the entity body per enctype
fn submit_entity_body(location: Location, enctype: Enctype, dataset: &FormDataset) -> DispatchPlan {
    let (mime, body) = match enctype {
        Enctype::UrlEncoded => (
            enctype.as_mime().to_string(),
            dataset.to_urlencoded().into_bytes(),
        ),
        Enctype::Multipart => dataset.to_multipart(),
        Enctype::PlainText => (
            enctype.as_mime().to_string(),
            dataset.to_plaintext().into_bytes(),
        ),
    };
    DispatchPlan::Navigate(NavigationRequest::post(location.url, body, mime))
}

/// Navigate to the action URL as-is, dataset unused
fn navigate_plain(location: Location) -> DispatchPlan {
    DispatchPlan::Navigate(NavigationRequest::get(location.url))
}

/// POST to a data URL: fold the encoded dataset into the URL payload
fn post_to_data(location: Location, enctype: Enctype, dataset: &FormDataset) -> Result<DispatchPlan> {
    let payload = encode_payload(enctype, dataset);
    let raw = location.url.as_str();

    let combined = if raw.contains("%%%%") {
        raw.replacen("%%%%", &urlencode(&payload), 1)
    } else if let Some(decoded) = decode_base64_data_url(raw) {
        let (head, _) = raw.split_once(',').unwrap_or((raw, ""));
        let mut bytes = decoded;
        bytes.extend_from_slice(payload.as_bytes());
        format!("{},{}", head, BASE64.encode(bytes))
    } else {
        format!("{}{}", raw, urlencode(&payload))
    };

    let url = Url::parse(&combined)?;
    Ok(DispatchPlan::Navigate(NavigationRequest::get(url)))
}

/// GET to mailto: the urlencoded dataset becomes the mailto query
fn mail_with_headers(location: Location, dataset: &FormDataset) -> DispatchPlan {
    let mut url = location.url;
    url.set_query(Some(&dataset.to_urlencoded()));
    DispatchPlan::Navigate(NavigationRequest::get(url))
}

/// POST to mailto: the encoded dataset becomes the mail body
fn mail_as_body(location: Location, enctype: Enctype, dataset: &FormDataset) -> DispatchPlan {
    let payload = encode_payload(enctype, dataset);
    let mut url = location.url;
    url.set_query(Some(&format!("body={}", urlencode(&payload))));
    DispatchPlan::Navigate(NavigationRequest::get(url))
}

/// Serialize the dataset per enctype into a text payload
fn encode_payload(enctype: Enctype, dataset: &FormDataset) -> String {
    match enctype {
        Enctype::UrlEncoded => dataset.to_urlencoded(),
        Enctype::Multipart => {
            let (_, body) = dataset.to_multipart();
            String::from_utf8_lossy(&body).into_owned()
        }
        Enctype::PlainText => dataset.to_plaintext(),
    }
}

fn urlencode(s: &str) -> String {
    form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

/// The decoded payload of a `data:...;base64,<data>` URL, if it is one
fn decode_base64_data_url(raw: &str) -> Option<Vec<u8>> {
    let (head, data) = raw.split_once(',')?;
    if !head.ends_with(";base64") {
        return None;
    }
    match BASE64.decode(data) {
        Ok(bytes) => Some(bytes),
        Err(err) => {
            log::debug!("data URL payload is not valid base64: {}", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(url: &str) -> Location {
        let url = Url::parse(url).unwrap();
        Location {
            protocol: Protocol::classify(url.scheme()),
            url,
        }
    }

    fn dataset() -> FormDataset {
        let mut data = FormDataset::new("UTF-8".to_string());
        data.push_text("text", "user", "alice");
        data.push_text("text", "pass", "s3cret");
        data
    }

    fn navigate(plan: Result<DispatchPlan>) -> NavigationRequest {
        match plan.unwrap() {
            DispatchPlan::Navigate(request) => request,
            DispatchPlan::Unsupported => panic!("expected a navigation"),
        }
    }

    #[test]
    fn test_http_get_mutates_query_without_body() {
        let request = navigate(plan(
            location("http://example.org/search"),
            Method::Get,
            Enctype::UrlEncoded,
            &dataset(),
        ));
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.url.query(), Some("user=alice&pass=s3cret"));
        assert!(request.body.is_none());
        assert!(request.mime.is_none());
    }

    #[test]
    fn test_http_post_urlencoded_body() {
        let request = navigate(plan(
            location("https://example.org/login"),
            Method::Post,
            Enctype::UrlEncoded,
            &dataset(),
        ));
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.url.query(), None);
        assert_eq!(
            request.mime.as_deref(),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(request.body.as_deref(), Some(b"user=alice&pass=s3cret".as_ref()));
    }

    #[test]
    fn test_http_post_plaintext_body() {
        let request = navigate(plan(
            location("https://example.org/login"),
            Method::Post,
            Enctype::PlainText,
            &dataset(),
        ));
        assert_eq!(request.mime.as_deref(), Some("text/plain"));
        assert_eq!(
            request.body.as_deref(),
            Some(b"user=alice\r\npass=s3cret\r\n".as_ref())
        );
    }

    #[test]
    fn test_http_post_multipart_mime_carries_body_boundary() {
        let request = navigate(plan(
            location("https://example.org/upload"),
            Method::Post,
            Enctype::Multipart,
            &dataset(),
        ));
        let mime = request.mime.unwrap();
        let boundary = mime.split("boundary=").nth(1).unwrap();
        let body = String::from_utf8(request.body.unwrap()).unwrap();
        assert!(body.starts_with(&format!("--{}\r\n", boundary)));
        assert!(body.ends_with(&format!("--{}--\r\n", boundary)));
    }

    #[test]
    fn test_ftp_and_javascript_navigate_plain() {
        for url in ["ftp://files.example.org/pub", "javascript:void(0)"] {
            for method in [Method::Get, Method::Post] {
                let request = navigate(plan(
                    location(url),
                    method,
                    Enctype::UrlEncoded,
                    &dataset(),
                ));
                assert_eq!(request.method, Method::Get);
                assert_eq!(request.url.as_str(), Url::parse(url).unwrap().as_str());
                assert!(request.body.is_none());
            }
        }
    }

    #[test]
    fn test_data_get_navigates_plain() {
        let request = navigate(plan(
            location("data:text/plain,hello"),
            Method::Get,
            Enctype::UrlEncoded,
            &dataset(),
        ));
        assert_eq!(request.url.as_str(), "data:text/plain,hello");
    }

    #[test]
    fn test_data_post_appends_payload() {
        let request = navigate(plan(
            location("data:text/plain,seed"),
            Method::Post,
            Enctype::UrlEncoded,
            &dataset(),
        ));
        assert_eq!(
            request.url.as_str(),
            "data:text/plain,seeduser%3Dalice%26pass%3Ds3cret"
        );
    }

    #[test]
    fn test_data_post_fills_placeholder() {
        let request = navigate(plan(
            location("data:text/plain,before-%%%%-after"),
            Method::Post,
            Enctype::UrlEncoded,
            &dataset(),
        ));
        assert_eq!(
            request.url.as_str(),
            "data:text/plain,before-user%3Dalice%26pass%3Ds3cret-after"
        );
    }

    #[test]
    fn test_data_post_extends_base64_payload() {
        let mut data = FormDataset::new("UTF-8".to_string());
        data.push_text("text", "a", "1");
        // "hello" plus "a=1" re-encoded as one base64 payload
        let request = navigate(plan(
            location("data:text/plain;base64,aGVsbG8="),
            Method::Post,
            Enctype::UrlEncoded,
            &data,
        ));
        assert_eq!(
            request.url.as_str(),
            "data:text/plain;base64,aGVsbG9hPTE="
        );
    }

    #[test]
    fn test_mailto_get_packs_dataset_into_query() {
        let request = navigate(plan(
            location("mailto:admin@example.org"),
            Method::Get,
            Enctype::UrlEncoded,
            &dataset(),
        ));
        assert_eq!(request.url.scheme(), "mailto");
        assert_eq!(request.url.query(), Some("user=alice&pass=s3cret"));
        assert!(request.body.is_none());
    }

    #[test]
    fn test_mailto_post_embeds_body() {
        let request = navigate(plan(
            location("mailto:admin@example.org"),
            Method::Post,
            Enctype::PlainText,
            &dataset(),
        ));
        assert_eq!(
            request.url.query(),
            Some("body=user%3Dalice%0D%0Apass%3Ds3cret%0D%0A")
        );
    }

    #[test]
    fn test_unrecognized_protocol_is_noop_for_both_methods() {
        for method in [Method::Get, Method::Post] {
            let plan = plan(
                location("gopher://example.org/"),
                method,
                Enctype::UrlEncoded,
                &dataset(),
            )
            .unwrap();
            assert!(matches!(plan, DispatchPlan::Unsupported));
        }
    }
}
