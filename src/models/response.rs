//! Domain-side result types handed to callers.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Comparison used by agent-generated property filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOperator {
    #[serde(rename = "=")]
    Equals,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<=")]
    LessEqual,
    #[serde(rename = ">=")]
    GreaterEqual,
    #[serde(rename = "!=")]
    NotEquals,
    #[serde(rename = "LIKE")]
    Like,
}

/// How the filter groups of a search are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FilterCombination {
    #[default]
    And,
    Or,
}

/// Date constraint of a `date_range` filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DateFilterValue {
    Exact {
        exact_timestamp: String,
        operator: ComparisonOperator,
    },
    Between {
        date_from: String,
        date_to: String,
        inclusive_from: bool,
        inclusive_to: bool,
    },
    After {
        date_from: String,
        inclusive_from: bool,
    },
    Before {
        date_to: String,
        inclusive_to: bool,
    },
}

/// A filter the agent applied to one property.
///
/// `Unknown` stands in for filter kinds this client does not recognise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "filter_type", rename_all = "snake_case")]
pub enum PropertyFilter {
    Integer {
        property_name: String,
        operator: ComparisonOperator,
        value: f64,
    },
    IntegerArray {
        property_name: String,
        operator: ComparisonOperator,
        value: Vec<f64>,
    },
    Text {
        property_name: String,
        operator: ComparisonOperator,
        value: String,
    },
    TextArray {
        property_name: String,
        operator: ComparisonOperator,
        value: Vec<String>,
    },
    Boolean {
        property_name: String,
        operator: ComparisonOperator,
        value: bool,
    },
    BooleanArray {
        property_name: String,
        operator: ComparisonOperator,
        value: Vec<bool>,
    },
    DateRange {
        property_name: String,
        value: DateFilterValue,
    },
    DateArray {
        property_name: String,
        operator: ComparisonOperator,
        value: Vec<String>,
    },
    Geo {
        property_name: String,
        latitude: f64,
        longitude: f64,
        max_distance_meters: f64,
    },
    IsNull {
        property_name: String,
        is_null: bool,
    },
    Unknown {
        property_name: Option<String>,
    },
}

impl PropertyFilter {
    pub fn property_name(&self) -> Option<&str> {
        match self {
            PropertyFilter::Integer { property_name, .. }
            | PropertyFilter::IntegerArray { property_name, .. }
            | PropertyFilter::Text { property_name, .. }
            | PropertyFilter::TextArray { property_name, .. }
            | PropertyFilter::Boolean { property_name, .. }
            | PropertyFilter::BooleanArray { property_name, .. }
            | PropertyFilter::DateRange { property_name, .. }
            | PropertyFilter::DateArray { property_name, .. }
            | PropertyFilter::Geo { property_name, .. }
            | PropertyFilter::IsNull { property_name, .. } => Some(property_name),
            PropertyFilter::Unknown { property_name } => property_name.as_deref(),
        }
    }
}

/// One search the agent ran against a collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub collection: String,
    pub queries: Vec<String>,
    pub filters: Vec<Vec<PropertyFilter>>,
    pub filter_operators: FilterCombination,
}

/// Aggregation metric requested for a property.
///
/// Names the client does not know yet are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregationMetric {
    Count,
    Type,
    Maximum,
    Mean,
    Median,
    Minimum,
    Mode,
    Sum,
    TopOccurrences,
    TotalTrue,
    TotalFalse,
    PercentageTrue,
    PercentageFalse,
    #[serde(untagged)]
    Other(String),
}

/// Aggregation over one property. Wire and domain shapes are identical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyAggregation {
    pub property_name: String,
    pub metrics: AggregationMetric,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_occurrences_limit: Option<u32>,
}

/// One aggregation the agent ran against a collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationResult {
    pub collection: String,
    pub search_query: Option<String>,
    pub groupby_property: Option<String>,
    pub aggregations: Vec<PropertyAggregation>,
    pub filters: Vec<PropertyFilter>,
}

/// Model usage reported by the service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub requests: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Map<String, Value>>,
}

/// An object the final answer was drawn from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub object_id: String,
    pub collection: String,
}

/// Full result of a `run` call, and the final state of a `stream` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryAgentResponse {
    pub original_query: String,
    pub collection_names: Vec<String>,
    pub searches: Vec<Vec<SearchResult>>,
    pub aggregations: Vec<Vec<AggregationResult>>,
    pub usage: Usage,
    pub total_time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregation_answer: Option<String>,
    pub has_aggregation_answer: bool,
    pub has_search_answer: bool,
    pub is_partial_answer: bool,
    pub missing_information: Vec<String>,
    pub final_answer: String,
    pub sources: Vec<Source>,
}

/// Result of an `ask` call, and the final state of an `ask_stream` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AskModeResponse {
    pub searches: Vec<SearchResult>,
    pub aggregations: Vec<AggregationResult>,
    pub usage: Usage,
    pub total_time: f64,
    pub is_partial_answer: bool,
    pub missing_information: Vec<String>,
    pub final_answer: String,
    pub sources: Vec<Source>,
}

/// Intermediate progress reported while streaming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressMessage {
    pub stage: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// A chunk of the final answer as it is generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamedTokens {
    pub delta: String,
}

/// One object returned by a search-only request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchObject {
    pub uuid: String,
    #[serde(default)]
    pub collection: Option<String>,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default)]
    pub metadata: Value,
    #[serde(default)]
    pub references: Value,
    #[serde(default)]
    pub vectors: Value,
}

/// Objects found by a search-only request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub objects: Vec<SearchObject>,
}

fn write_pretty<T: Serialize>(value: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let text = serde_json::to_string_pretty(value).map_err(|_| fmt::Error)?;
    f.write_str(&text)
}

impl fmt::Display for QueryAgentResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_pretty(self, f)
    }
}

impl fmt::Display for AskModeResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_pretty(self, f)
    }
}
