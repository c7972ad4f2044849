//! Rust client for the Weaviate query agent.
//!
//! Ask natural-language questions over Weaviate collections and get back
//! answers, token streams, or paginated search results.
//!
//! # Example
//!
//! ```ignore
//! use query_agent::{AgentConfig, AskOptions, QueryAgent};
//! use query_agent::adapters::StaticConnection;
//!
//! let agent = QueryAgent::new(
//!     StaticConnection::from_env()?,
//!     AgentConfig::from_env().with_collections(["Products"]),
//! );
//! let answer = agent.ask("Which shoes are waterproof?", AskOptions::default()).await?;
//! println!("{}", answer.final_answer);
//! ```

pub mod adapters;
pub mod agent;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod models;
pub mod search;
pub mod sse;
pub mod traits;

pub use agent::{
    AskOptions, AskStreamOptions, QueryAgent, RunOptions, SearchOptions, StreamOptions,
};
pub use config::AgentConfig;
pub use dispatch::{QueryAgentStream, StreamOutput};
pub use error::{ErrorCategory, QueryAgentError, QueryAgentResult};
pub use search::{PaginationRequest, QueryAgentSearcher, SearchModeResponse, SearchPlan};
