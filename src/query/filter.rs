//! `q` filters: `q=field:value`, several joined with `;` or given as
//! repeated `q` parameters. All of them must match.
//!
//! Besides `:` (equality) the comparisons `>`, `>=`, `<` and `<=` are
//! accepted. Only fields the collection marks queryable may be used.

use crate::core::{RenderError, Result, Value};
use crate::query::QueryParams;
use crate::render::{CollectionDescriptor, Resource};
use std::cmp::Ordering;

pub const PARAM_QUERY: &str = "q";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFilter {
    pub field: String,
    pub op: FilterOp,
    pub value: String,
}

impl QueryFilter {
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = || RenderError::invalid("q", format!("cannot parse filter '{raw}'"));

        let idx = raw.find([':', '>', '<']).ok_or_else(invalid)?;
        let (field, rest) = raw.split_at(idx);
        let (op, value) = match rest.as_bytes() {
            [b'>', b'=', ..] => (FilterOp::Gte, &rest[2..]),
            [b'<', b'=', ..] => (FilterOp::Lte, &rest[2..]),
            [b'>', ..] => (FilterOp::Gt, &rest[1..]),
            [b'<', ..] => (FilterOp::Lt, &rest[1..]),
            _ => (FilterOp::Eq, &rest[1..]),
        };

        let field = field.trim();
        if field.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            field: field.to_string(),
            op,
            value: value.to_string(),
        })
    }

    /// Parses every filter of every `q`, rejecting fields the collection
    /// does not allow.
    pub fn from_params(params: &QueryParams, descriptor: &CollectionDescriptor) -> Result<Vec<Self>> {
        params
            .get_all(PARAM_QUERY)
            .flat_map(|raw| raw.split(';'))
            .filter(|segment| !segment.trim().is_empty())
            .map(|segment| {
                let filter = Self::parse(segment)?;
                if !descriptor.is_queryable(&filter.field) {
                    return Err(RenderError::invalid(
                        "q",
                        format!("cannot filter on '{}'", filter.field),
                    ));
                }
                Ok(filter)
            })
            .collect()
    }

    pub fn matches(&self, resource: &dyn Resource) -> bool {
        let Some(actual) = resource.field(&self.field) else {
            return false;
        };
        let expected = coerce_like(&self.value, &actual);
        let ordering = actual.compare(&expected);

        match self.op {
            FilterOp::Eq => ordering == Ordering::Equal,
            FilterOp::Gt => ordering == Ordering::Greater,
            FilterOp::Gte => ordering != Ordering::Less,
            FilterOp::Lt => ordering == Ordering::Less,
            FilterOp::Lte => ordering != Ordering::Greater,
        }
    }
}

// Filter values arrive as text; read them as the stored value's type.
fn coerce_like(raw: &str, like: &Value) -> Value {
    match like {
        Value::Integer(_) => raw.parse::<i64>().map_or_else(|_| Value::from(raw), Value::Integer),
        Value::Float(_) => raw.parse::<f64>().map_or_else(|_| Value::from(raw), Value::Float),
        Value::Boolean(_) => raw.parse::<bool>().map_or_else(|_| Value::from(raw), Value::Boolean),
        Value::Null if raw == "null" => Value::Null,
        _ => Value::from(raw),
    }
}
