//! Request inputs, response types and their wire forms.

pub mod api;
mod collection;
mod filter;
mod mapping;
mod query;
mod response;

pub use collection::{QueryAgentCollection, QueryAgentCollectionConfig, TargetVector};
pub use filter::{FilterOperator, FilterValue};
pub use mapping::map_searches;
pub use query::{ChatMessage, ChatRole, QueryAgentQuery};
pub use response::{
    AggregationMetric, AggregationResult, AskModeResponse, ComparisonOperator, DateFilterValue,
    FilterCombination, ProgressMessage, PropertyAggregation, PropertyFilter, QueryAgentResponse,
    SearchObject, SearchResult, SearchResults, Source, StreamedTokens, Usage,
};
