//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP POST, buffered or streamed
//! - [`ConnectionProvider`] - details of the Weaviate cluster being queried

pub mod connection;
pub mod http;

pub use connection::{ConnectionDetails, ConnectionError, ConnectionProvider};
pub use http::{ByteStream, Headers, HttpClient, HttpError, Response};
