//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`StaticConnection`] - fixed connection details, optionally from the environment
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockHttpClient`] - Configurable HTTP responses and SSE bodies
//! - [`mock::MockConnection`] - Configurable connection details

pub mod mock;
pub mod reqwest_http;
pub mod static_connection;

pub use mock::{MockConnection, MockHttpClient};
pub use reqwest_http::ReqwestHttpClient;
pub use static_connection::StaticConnection;
