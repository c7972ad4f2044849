//! Caller-side filter trees attached to collection configs.

use serde::{Serialize, Serializer};
use serde_json::Value;

/// Comparison applied by a single filter condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FilterOperator {
    Equal,
    NotEqual,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    Like,
    IsNull,
    ContainsAny,
    ContainsAll,
    WithinGeoRange,
}

/// A filter tree: leaf conditions combined with `and` / `or`.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Condition {
        target: String,
        operator: FilterOperator,
        value: Value,
    },
    And(Vec<FilterValue>),
    Or(Vec<FilterValue>),
}

impl FilterValue {
    pub fn condition(
        target: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<Value>,
    ) -> Self {
        FilterValue::Condition {
            target: target.into(),
            operator,
            value: value.into(),
        }
    }

    pub fn all_of(filters: impl IntoIterator<Item = FilterValue>) -> Self {
        FilterValue::And(filters.into_iter().collect())
    }

    pub fn any_of(filters: impl IntoIterator<Item = FilterValue>) -> Self {
        FilterValue::Or(filters.into_iter().collect())
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum WireFilter<'a> {
    Combined {
        combine: &'static str,
        filters: Vec<WireFilter<'a>>,
    },
    Condition {
        operator: FilterOperator,
        target: &'a str,
        value: &'a Value,
    },
}

impl<'a> From<&'a FilterValue> for WireFilter<'a> {
    fn from(filter: &'a FilterValue) -> Self {
        match filter {
            FilterValue::Condition {
                target,
                operator,
                value,
            } => WireFilter::Condition {
                operator: *operator,
                target,
                value,
            },
            FilterValue::And(filters) => WireFilter::Combined {
                combine: "and",
                filters: filters.iter().map(WireFilter::from).collect(),
            },
            FilterValue::Or(filters) => WireFilter::Combined {
                combine: "or",
                filters: filters.iter().map(WireFilter::from).collect(),
            },
        }
    }
}

impl Serialize for FilterValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireFilter::from(self).serialize(serializer)
    }
}
