//! Wire shapes of the query agent service, as sent and received.

use serde::{Deserialize, Serialize};

use super::response::{
    ComparisonOperator, FilterCombination, PropertyAggregation, SearchResults, Source, Usage,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiDateFilterValue {
    Exact {
        exact_timestamp: String,
        operator: ComparisonOperator,
    },
    Range {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        date_from: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        date_to: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        inclusive_from: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        inclusive_to: Option<bool>,
    },
}

/// Filter kinds this client understands, keyed by `filter_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "filter_type", rename_all = "snake_case")]
pub enum ApiKnownFilter {
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
        value: ApiDateFilterValue,
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
}

/// Anything carrying a `filter_type` this client does not know.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiUnknownFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiPropertyFilter {
    Known(ApiKnownFilter),
    Unknown(ApiUnknownFilter),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSearchResult {
    pub collection: String,
    #[serde(default)]
    pub queries: Vec<String>,
    #[serde(default)]
    pub filters: Vec<Vec<ApiPropertyFilter>>,
    #[serde(default)]
    pub filter_operators: FilterCombination,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiAggregationResult {
    pub collection: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groupby_property: Option<String>,
    #[serde(default)]
    pub aggregations: Vec<PropertyAggregation>,
    #[serde(default)]
    pub filters: Vec<ApiPropertyFilter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiQueryAgentResponse {
    pub original_query: String,
    #[serde(default)]
    pub collection_names: Vec<String>,
    #[serde(default)]
    pub searches: Vec<Vec<ApiSearchResult>>,
    #[serde(default)]
    pub aggregations: Vec<Vec<ApiAggregationResult>>,
    #[serde(default)]
    pub usage: Usage,
    #[serde(default)]
    pub total_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation_answer: Option<String>,
    #[serde(default)]
    pub has_aggregation_answer: bool,
    #[serde(default)]
    pub has_search_answer: bool,
    #[serde(default)]
    pub is_partial_answer: bool,
    #[serde(default)]
    pub missing_information: Vec<String>,
    pub final_answer: String,
    #[serde(default)]
    pub sources: Vec<Source>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiAskModeResponse {
    #[serde(default)]
    pub searches: Vec<ApiSearchResult>,
    #[serde(default)]
    pub aggregations: Vec<ApiAggregationResult>,
    #[serde(default)]
    pub usage: Usage,
    #[serde(default)]
    pub total_time: f64,
    #[serde(default)]
    pub is_partial_answer: bool,
    #[serde(default)]
    pub missing_information: Vec<String>,
    pub final_answer: String,
    #[serde(default)]
    pub sources: Vec<Source>,
}

/// Body of a search-only response. The raw `searches` plan is read
/// separately so it can be echoed back verbatim.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiSearchModeResponse {
    #[serde(default)]
    pub original_query: String,
    #[serde(default)]
    pub searches: Option<Vec<ApiSearchResult>>,
    #[serde(default)]
    pub usage: Usage,
    #[serde(default)]
    pub total_time: f64,
    #[serde(default)]
    pub search_results: SearchResults,
}
