use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Stable identity of a resource: its type tag plus guid.
///
/// Related entities are re-materialized on every request, so identity is by
/// value rather than by object address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ResourceKey {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub guid: String,
}

impl ResourceKey {
    pub fn new(resource_type: impl Into<String>, guid: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            guid: guid.into(),
        }
    }

    /// Key under which the resource is stored in the orphans map.
    pub fn orphan_key(&self) -> String {
        format!("{}:{}", self.resource_type, self.guid)
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource_type, self.guid)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl OrderDirection {
    /// Parses the wire form. Only lowercase `asc` and `desc` are accepted.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamps {
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Timestamps {
    pub fn created(created_at: DateTime<Utc>) -> Self {
        Self {
            created_at,
            updated_at: None,
        }
    }

    pub fn updated(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_direction_is_lowercase_only() {
        assert_eq!(OrderDirection::parse("asc"), Some(OrderDirection::Asc));
        assert_eq!(OrderDirection::parse("desc"), Some(OrderDirection::Desc));
        assert_eq!(OrderDirection::parse("DESC"), None);
        assert_eq!(OrderDirection::parse(""), None);
        assert_eq!(OrderDirection::default().as_str(), "asc");
    }

    #[test]
    fn test_orphan_key_format() {
        let key = ResourceKey::new("service_plans", "abc-123");
        assert_eq!(key.orphan_key(), "service_plans:abc-123");
        assert_eq!(key.to_string(), key.orphan_key());
    }
}
