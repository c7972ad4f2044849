//! Mock implementations for testing.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client with configurable responses
//! - [`MockConnection`] - Connection provider with configurable details

pub mod connection;
pub mod http;

pub use connection::MockConnection;
pub use http::{MockHttpClient, MockResponse, RecordedRequest};
