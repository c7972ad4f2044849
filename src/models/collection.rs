use serde::Serialize;

use super::filter::FilterValue;

/// A collection the agent may query: just its name, or a name plus options.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryAgentCollection {
    Name(String),
    Config(QueryAgentCollectionConfig),
}

/// Named vector(s) to search when a collection has several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TargetVector {
    Single(String),
    Multiple(Vec<String>),
}

/// Per-collection options. Unset options are left out of the request.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct QueryAgentCollectionConfig {
    /// The name of the collection to query.
    pub name: String,
    /// Tenant, for multi-tenant collections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
    /// Properties the agent is allowed to see.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_properties: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_vector: Option<TargetVector>,
    /// Filters applied to every search the agent runs on this collection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_filters: Option<FilterValue>,
}

impl QueryAgentCollectionConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }

    pub fn with_view_properties<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.view_properties = Some(properties.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_target_vector(mut self, target: TargetVector) -> Self {
        self.target_vector = Some(target);
        self
    }

    pub fn with_additional_filters(mut self, filters: FilterValue) -> Self {
        self.additional_filters = Some(filters);
        self
    }
}

impl From<&str> for QueryAgentCollection {
    fn from(name: &str) -> Self {
        QueryAgentCollection::Name(name.to_string())
    }
}

impl From<String> for QueryAgentCollection {
    fn from(name: String) -> Self {
        QueryAgentCollection::Name(name)
    }
}

impl From<QueryAgentCollectionConfig> for QueryAgentCollection {
    fn from(config: QueryAgentCollectionConfig) -> Self {
        QueryAgentCollection::Config(config)
    }
}
