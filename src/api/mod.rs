//! Wire models and transport for the gateway's admin API.

pub mod directory;
pub mod models;
pub mod transport;

pub use directory::{preferred_token, DirectoryClient};
pub use models::{EndpointDescriptor, EndpointKind, TestRequest, TestToken};
pub use transport::{HttpTransport, Transport, TransportBody, TransportResponse};
