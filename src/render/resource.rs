//! Capabilities the renderer consumes: the resource view of an entity, the
//! per-entity exporter, and the optional collection transformer.

use crate::core::{ResourceKey, Timestamps, Value};
use serde_json::{Map as JsonMap, Value as JsonValue};

/// Target of a named association.
pub enum Related<'a> {
    ToOne(Option<&'a dyn Resource>),
    ToMany(Vec<&'a dyn Resource>),
}

/// One named association of a resource, already loaded.
pub struct Relation<'a> {
    pub name: &'a str,
    pub target: Related<'a>,
}

impl<'a> Relation<'a> {
    pub fn to_one(name: &'a str, target: Option<&'a dyn Resource>) -> Self {
        Self {
            name,
            target: Related::ToOne(target),
        }
    }

    pub fn to_many(name: &'a str, targets: Vec<&'a dyn Resource>) -> Self {
        Self {
            name,
            target: Related::ToMany(targets),
        }
    }
}

/// Read-only view of a domain entity, as seen by the renderer.
pub trait Resource: Send + Sync {
    fn key(&self) -> ResourceKey;

    fn timestamps(&self) -> Timestamps;

    /// Own attributes, without relations.
    fn attributes(&self) -> JsonMap<String, JsonValue>;

    /// Value used to order and filter by `name`.
    ///
    /// `id` and `guid` resolve to the guid, `created_at` and `updated_at` to
    /// their RFC 3339 text; anything else is looked up in the attributes.
    fn field(&self, name: &str) -> Option<Value> {
        metadata_field(self, name).or_else(|| self.attributes().get(name).map(Value::from))
    }

    fn relations(&self) -> Vec<Relation<'_>> {
        Vec::new()
    }
}

/// Resolves the fields every resource carries outside its attributes:
/// `id`/`guid`, `created_at` and `updated_at`.
pub fn metadata_field<R: Resource + ?Sized>(resource: &R, name: &str) -> Option<Value> {
    match name {
        "id" | "guid" => Some(Value::Text(resource.key().guid)),
        "created_at" => Some(Value::Text(resource.timestamps().created_at.to_rfc3339())),
        "updated_at" => Some(
            resource
                .timestamps()
                .updated_at
                .map_or(Value::Null, |at| Value::Text(at.to_rfc3339())),
        ),
        _ => None,
    }
}

/// Outcome of exporting one entity.
///
/// `Skipped` is the expected result for rows deleted between the count and
/// the export; it drops the entity without failing the render.
#[derive(Debug, Clone, PartialEq)]
pub enum Export {
    Serialized(JsonMap<String, JsonValue>),
    Skipped,
}

/// Turns one entity into its attribute mapping.
pub trait Exporter: Send + Sync {
    fn export(&self, resource: &dyn Resource, depth_budget: u32) -> Export;
}

/// Exports the resource's own attributes unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeExporter;

impl Exporter for AttributeExporter {
    fn export(&self, resource: &dyn Resource, _depth_budget: u32) -> Export {
        Export::Serialized(resource.attributes())
    }
}

/// Post-load hook run once on the materialized page before serialization.
///
/// The page is handed over mutably: the hook may reorder, drop, or edit
/// entries in place.
pub trait CollectionTransformer<R>: Send + Sync {
    fn transform(&self, resources: &mut Vec<R>);
}

impl<R, F> CollectionTransformer<R> for F
where
    F: Fn(&mut Vec<R>) + Send + Sync,
{
    fn transform(&self, resources: &mut Vec<R>) {
        self(resources)
    }
}
