//! Validating API client core for the Meow Facts service.
//!
//! # Overview
//! Turns three optional parameters (`count`, `lang`, `id`) into one GET
//! against the remote fact service and returns the `data` list from its JSON
//! answer, or a typed `FactsError`.
//!
//! # Design
//! - `FactsClient` is stateless; it holds the base URL and a shared
//!   `Transport`.
//! - Each lookup is split into `build_get_facts` (validation + request) and
//!   `parse_get_facts` (status + shape checks), so the I/O boundary is
//!   explicit and testable without a network.
//! - `UreqTransport` is the production transport and always runs with an
//!   explicit timeout.

pub mod client;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::{FactsClient, DEFAULT_BASE_URL};
pub use error::{FactsError, ParameterError, TransportError};
pub use http::{HttpRequest, HttpResponse, Transport};
pub use transport::{UreqTransport, DEFAULT_TIMEOUT};
pub use types::{FactsEnvelope, FactsRequest, MAX_COUNT, MIN_COUNT, SUPPORTED_LANGUAGES};
