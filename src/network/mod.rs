//! Network collaborator for planned navigations
//!
//! The submission engine never talks to the wire directly; it hands a
//! navigation request and a cancellation scope to a transport.

mod client;
mod request;
mod response;

pub use client::HttpTransport;
pub use request::NavigationRequest;
pub use response::Response;

use async_trait::async_trait;

use crate::submission::CancelScope;
use crate::utils::Result;

/// Network collaborator interface
///
/// Implementations must observe the cancellation scope and abort promptly
/// once it triggers; a cancelled response is discarded without inspection.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: NavigationRequest, scope: CancelScope) -> Result<Response>;
}
