//! Movie service integration: wire types, HTTP transport, typed client.

pub mod client;
pub mod transport;
pub mod types;

pub use client::MoviesClient;
pub use transport::{Transport, TransportError};
pub use types::{Movie, QuizCriteria, SearchResponse};
