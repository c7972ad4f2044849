//! Conversions between wire shapes and domain types.
//!
//! Wire to domain is total: unrecognised filters become
//! `PropertyFilter::Unknown`. Domain to wire drops what the service cannot
//! take back, namely unknown filters.

use super::api::{
    ApiAggregationResult, ApiAskModeResponse, ApiDateFilterValue, ApiKnownFilter,
    ApiPropertyFilter, ApiQueryAgentResponse, ApiSearchResult,
};
use super::response::{
    AggregationResult, AskModeResponse, DateFilterValue, PropertyFilter, QueryAgentResponse,
    SearchResult,
};

fn map_date_value(value: ApiDateFilterValue) -> Option<DateFilterValue> {
    match value {
        ApiDateFilterValue::Exact {
            exact_timestamp,
            operator,
        } => Some(DateFilterValue::Exact {
            exact_timestamp,
            operator,
        }),
        ApiDateFilterValue::Range {
            date_from,
            date_to,
            inclusive_from,
            inclusive_to,
        } => match (date_from, date_to) {
            (Some(date_from), Some(date_to)) => Some(DateFilterValue::Between {
                date_from,
                date_to,
                inclusive_from: inclusive_from.unwrap_or(false),
                inclusive_to: inclusive_to.unwrap_or(false),
            }),
            (Some(date_from), None) => Some(DateFilterValue::After {
                date_from,
                inclusive_from: inclusive_from.unwrap_or(false),
            }),
            (None, Some(date_to)) => Some(DateFilterValue::Before {
                date_to,
                inclusive_to: inclusive_to.unwrap_or(false),
            }),
            (None, None) => None,
        },
    }
}

impl From<&DateFilterValue> for ApiDateFilterValue {
    fn from(value: &DateFilterValue) -> Self {
        match value.clone() {
            DateFilterValue::Exact {
                exact_timestamp,
                operator,
            } => ApiDateFilterValue::Exact {
                exact_timestamp,
                operator,
            },
            DateFilterValue::Between {
                date_from,
                date_to,
                inclusive_from,
                inclusive_to,
            } => ApiDateFilterValue::Range {
                date_from: Some(date_from),
                date_to: Some(date_to),
                inclusive_from: Some(inclusive_from),
                inclusive_to: Some(inclusive_to),
            },
            DateFilterValue::After {
                date_from,
                inclusive_from,
            } => ApiDateFilterValue::Range {
                date_from: Some(date_from),
                date_to: None,
                inclusive_from: Some(inclusive_from),
                inclusive_to: None,
            },
            DateFilterValue::Before {
                date_to,
                inclusive_to,
            } => ApiDateFilterValue::Range {
                date_from: None,
                date_to: Some(date_to),
                inclusive_from: None,
                inclusive_to: Some(inclusive_to),
            },
        }
    }
}

impl From<ApiPropertyFilter> for PropertyFilter {
    fn from(filter: ApiPropertyFilter) -> Self {
        let known = match filter {
            ApiPropertyFilter::Known(known) => known,
            ApiPropertyFilter::Unknown(unknown) => {
                return PropertyFilter::Unknown {
                    property_name: unknown.property_name,
                }
            }
        };

        match known {
            ApiKnownFilter::Integer {
                property_name,
                operator,
                value,
            } => PropertyFilter::Integer {
                property_name,
                operator,
                value,
            },
            ApiKnownFilter::IntegerArray {
                property_name,
                operator,
                value,
            } => PropertyFilter::IntegerArray {
                property_name,
                operator,
                value,
            },
            ApiKnownFilter::Text {
                property_name,
                operator,
                value,
            } => PropertyFilter::Text {
                property_name,
                operator,
                value,
            },
            ApiKnownFilter::TextArray {
                property_name,
                operator,
                value,
            } => PropertyFilter::TextArray {
                property_name,
                operator,
                value,
            },
            ApiKnownFilter::Boolean {
                property_name,
                operator,
                value,
            } => PropertyFilter::Boolean {
                property_name,
                operator,
                value,
            },
            ApiKnownFilter::BooleanArray {
                property_name,
                operator,
                value,
            } => PropertyFilter::BooleanArray {
                property_name,
                operator,
                value,
            },
            ApiKnownFilter::DateRange {
                property_name,
                value,
            } => match map_date_value(value) {
                Some(value) => PropertyFilter::DateRange {
                    property_name,
                    value,
                },
                None => PropertyFilter::Unknown {
                    property_name: Some(property_name),
                },
            },
            ApiKnownFilter::DateArray {
                property_name,
                operator,
                value,
            } => PropertyFilter::DateArray {
                property_name,
                operator,
                value,
            },
            ApiKnownFilter::Geo {
                property_name,
                latitude,
                longitude,
                max_distance_meters,
            } => PropertyFilter::Geo {
                property_name,
                latitude,
                longitude,
                max_distance_meters,
            },
            ApiKnownFilter::IsNull {
                property_name,
                is_null,
            } => PropertyFilter::IsNull {
                property_name,
                is_null,
            },
        }
    }
}

/// Domain filter back to wire form; `None` for unknown filters.
fn filter_to_api(filter: &PropertyFilter) -> Option<ApiPropertyFilter> {
    let known = match filter.clone() {
        PropertyFilter::Integer {
            property_name,
            operator,
            value,
        } => ApiKnownFilter::Integer {
            property_name,
            operator,
            value,
        },
        PropertyFilter::IntegerArray {
            property_name,
            operator,
            value,
        } => ApiKnownFilter::IntegerArray {
            property_name,
            operator,
            value,
        },
        PropertyFilter::Text {
            property_name,
            operator,
            value,
        } => ApiKnownFilter::Text {
            property_name,
            operator,
            value,
        },
        PropertyFilter::TextArray {
            property_name,
            operator,
            value,
        } => ApiKnownFilter::TextArray {
            property_name,
            operator,
            value,
        },
        PropertyFilter::Boolean {
            property_name,
            operator,
            value,
        } => ApiKnownFilter::Boolean {
            property_name,
            operator,
            value,
        },
        PropertyFilter::BooleanArray {
            property_name,
            operator,
            value,
        } => ApiKnownFilter::BooleanArray {
            property_name,
            operator,
            value,
        },
        PropertyFilter::DateRange {
            property_name,
            value,
        } => ApiKnownFilter::DateRange {
            property_name,
            value: ApiDateFilterValue::from(&value),
        },
        PropertyFilter::DateArray {
            property_name,
            operator,
            value,
        } => ApiKnownFilter::DateArray {
            property_name,
            operator,
            value,
        },
        PropertyFilter::Geo {
            property_name,
            latitude,
            longitude,
            max_distance_meters,
        } => ApiKnownFilter::Geo {
            property_name,
            latitude,
            longitude,
            max_distance_meters,
        },
        PropertyFilter::IsNull {
            property_name,
            is_null,
        } => ApiKnownFilter::IsNull {
            property_name,
            is_null,
        },
        PropertyFilter::Unknown { .. } => return None,
    };
    Some(ApiPropertyFilter::Known(known))
}

fn filters_to_api(filters: &[PropertyFilter]) -> Vec<ApiPropertyFilter> {
    filters.iter().filter_map(filter_to_api).collect()
}

impl From<ApiSearchResult> for SearchResult {
    fn from(result: ApiSearchResult) -> Self {
        Self {
            collection: result.collection,
            queries: result.queries,
            filters: result
                .filters
                .into_iter()
                .map(|group| group.into_iter().map(PropertyFilter::from).collect())
                .collect(),
            filter_operators: result.filter_operators,
        }
    }
}

impl From<&SearchResult> for ApiSearchResult {
    fn from(result: &SearchResult) -> Self {
        Self {
            collection: result.collection.clone(),
            queries: result.queries.clone(),
            filters: result
                .filters
                .iter()
                .map(|group| filters_to_api(group))
                .collect(),
            filter_operators: result.filter_operators,
        }
    }
}

impl From<ApiAggregationResult> for AggregationResult {
    fn from(result: ApiAggregationResult) -> Self {
        Self {
            collection: result.collection,
            search_query: result.search_query,
            groupby_property: result.groupby_property,
            aggregations: result.aggregations,
            filters: result.filters.into_iter().map(PropertyFilter::from).collect(),
        }
    }
}

impl From<&AggregationResult> for ApiAggregationResult {
    fn from(result: &AggregationResult) -> Self {
        Self {
            collection: result.collection.clone(),
            search_query: result.search_query.clone(),
            groupby_property: result.groupby_property.clone(),
            aggregations: result.aggregations.clone(),
            filters: filters_to_api(&result.filters),
        }
    }
}

/// Wire searches to domain searches.
pub fn map_searches(searches: Vec<ApiSearchResult>) -> Vec<SearchResult> {
    searches.into_iter().map(SearchResult::from).collect()
}

fn map_aggregations(aggregations: Vec<ApiAggregationResult>) -> Vec<AggregationResult> {
    aggregations.into_iter().map(AggregationResult::from).collect()
}

impl From<ApiQueryAgentResponse> for QueryAgentResponse {
    fn from(response: ApiQueryAgentResponse) -> Self {
        Self {
            original_query: response.original_query,
            collection_names: response.collection_names,
            searches: response.searches.into_iter().map(map_searches).collect(),
            aggregations: response
                .aggregations
                .into_iter()
                .map(map_aggregations)
                .collect(),
            usage: response.usage,
            total_time: response.total_time,
            aggregation_answer: response.aggregation_answer,
            has_aggregation_answer: response.has_aggregation_answer,
            has_search_answer: response.has_search_answer,
            is_partial_answer: response.is_partial_answer,
            missing_information: response.missing_information,
            final_answer: response.final_answer,
            sources: response.sources,
        }
    }
}

impl From<&QueryAgentResponse> for ApiQueryAgentResponse {
    fn from(response: &QueryAgentResponse) -> Self {
        Self {
            original_query: response.original_query.clone(),
            collection_names: response.collection_names.clone(),
            searches: response
                .searches
                .iter()
                .map(|group| group.iter().map(ApiSearchResult::from).collect())
                .collect(),
            aggregations: response
                .aggregations
                .iter()
                .map(|group| group.iter().map(ApiAggregationResult::from).collect())
                .collect(),
            usage: response.usage.clone(),
            total_time: response.total_time,
            aggregation_answer: response.aggregation_answer.clone(),
            has_aggregation_answer: response.has_aggregation_answer,
            has_search_answer: response.has_search_answer,
            is_partial_answer: response.is_partial_answer,
            missing_information: response.missing_information.clone(),
            final_answer: response.final_answer.clone(),
            sources: response.sources.clone(),
        }
    }
}

impl From<ApiAskModeResponse> for AskModeResponse {
    fn from(response: ApiAskModeResponse) -> Self {
        Self {
            searches: map_searches(response.searches),
            aggregations: map_aggregations(response.aggregations),
            usage: response.usage,
            total_time: response.total_time,
            is_partial_answer: response.is_partial_answer,
            missing_information: response.missing_information,
            final_answer: response.final_answer,
            sources: response.sources,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::response::{
        AggregationMetric, ComparisonOperator, FilterCombination, PropertyAggregation, Source,
        Usage,
    };
    use serde_json::{json, Value};

    fn wire_response() -> Value {
        json!({
            "original_query": "Shoes under 100 since January",
            "collection_names": ["Products"],
            "searches": [[{
                "collection": "Products",
                "queries": ["shoes"],
                "filters": [[
                    {"filter_type": "integer", "property_name": "price", "operator": "<", "value": 100},
                    {"filter_type": "date_range", "property_name": "added",
                     "value": {"date_from": "2024-01-01T00:00:00Z", "inclusive_from": true}},
                    {"filter_type": "sparkle", "property_name": "glitter"}
                ]],
                "filter_operators": "AND"
            }]],
            "aggregations": [[{
                "collection": "Products",
                "search_query": null,
                "groupby_property": "brand",
                "aggregations": [{"property_name": "brand", "metrics": "TOP_OCCURRENCES", "top_occurrences_limit": 3}],
                "filters": []
            }]],
            "usage": {"requests": 2, "request_tokens": 120, "response_tokens": 40, "total_tokens": 160},
            "total_time": 2.25,
            "is_partial_answer": false,
            "missing_information": [],
            "final_answer": "Three pairs match.",
            "sources": [{"object_id": "123", "collection": "Products"}]
        })
    }

    #[test]
    fn test_wire_response_maps_to_domain() {
        let api: ApiQueryAgentResponse = serde_json::from_value(wire_response()).unwrap();
        let response = QueryAgentResponse::from(api);

        let search = &response.searches[0][0];
        assert_eq!(search.filter_operators, FilterCombination::And);
        assert_eq!(
            search.filters[0],
            vec![
                PropertyFilter::Integer {
                    property_name: "price".to_string(),
                    operator: ComparisonOperator::LessThan,
                    value: 100.0,
                },
                PropertyFilter::DateRange {
                    property_name: "added".to_string(),
                    value: DateFilterValue::After {
                        date_from: "2024-01-01T00:00:00Z".to_string(),
                        inclusive_from: true,
                    },
                },
                PropertyFilter::Unknown {
                    property_name: Some("glitter".to_string()),
                },
            ]
        );
        assert_eq!(
            response.aggregations[0][0].aggregations,
            vec![PropertyAggregation {
                property_name: "brand".to_string(),
                metrics: AggregationMetric::TopOccurrences,
                top_occurrences_limit: Some(3),
            }]
        );
        assert_eq!(response.usage.total_tokens, Some(160));
        assert_eq!(
            response.sources,
            vec![Source {
                object_id: "123".to_string(),
                collection: "Products".to_string(),
            }]
        );
    }

    #[test]
    fn test_unbounded_date_range_becomes_unknown() {
        let filter: ApiPropertyFilter = serde_json::from_value(json!({
            "filter_type": "date_range",
            "property_name": "added",
            "value": {}
        }))
        .unwrap();

        assert_eq!(
            PropertyFilter::from(filter),
            PropertyFilter::Unknown {
                property_name: Some("added".to_string())
            }
        );
    }

    #[test]
    fn test_domain_to_wire_drops_unknown_filters() {
        let api: ApiQueryAgentResponse = serde_json::from_value(wire_response()).unwrap();
        let response = QueryAgentResponse::from(api);

        let back = ApiQueryAgentResponse::from(&response);
        let wire = serde_json::to_value(&back).unwrap();

        let filters = &wire["searches"][0][0]["filters"][0];
        assert_eq!(filters.as_array().unwrap().len(), 2);
        assert_eq!(
            filters[1],
            json!({
                "filter_type": "date_range",
                "property_name": "added",
                "value": {"date_from": "2024-01-01T00:00:00Z", "inclusive_from": true}
            })
        );
        assert_eq!(wire["final_answer"], json!("Three pairs match."));
        assert!(wire["aggregations"][0][0].get("search_query").is_none());
    }

    #[test]
    fn test_ask_mode_response_maps_flat_searches() {
        let api: ApiAskModeResponse = serde_json::from_value(json!({
            "searches": [{"collection": "Products", "queries": ["shoes"], "filters": [], "filter_operators": "OR"}],
            "aggregations": [],
            "usage": {"requests": 1},
            "total_time": 1.0,
            "is_partial_answer": true,
            "missing_information": ["stock levels"],
            "final_answer": "Probably.",
            "sources": []
        }))
        .unwrap();

        let response = AskModeResponse::from(api);
        assert_eq!(response.searches.len(), 1);
        assert_eq!(response.searches[0].filter_operators, FilterCombination::Or);
        assert!(response.is_partial_answer);
        assert_eq!(response.usage, Usage { requests: 1, ..Default::default() });
    }
}
