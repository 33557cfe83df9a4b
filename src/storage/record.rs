use crate::core::{ResourceKey, Timestamps, Value};
use crate::render::{Relation, Resource, metadata_field};
use chrono::{DateTime, Utc};
use serde_json::{Map as JsonMap, Value as JsonValue};

/// Associations held by a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordRelation {
    ToOne(Option<Box<Record>>),
    ToMany(Vec<Record>),
}

/// Generic owned entity: a type tag, guid, timestamps, attributes, and its
/// eagerly loaded associations.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub resource_type: String,
    pub guid: String,
    pub timestamps: Timestamps,
    pub attributes: JsonMap<String, JsonValue>,
    pub relations: Vec<(String, RecordRelation)>,
}

impl Record {
    pub fn new(resource_type: impl Into<String>, guid: impl Into<String>) -> Self {
        Self::created_at(resource_type, guid, Utc::now())
    }

    pub fn created_at(
        resource_type: impl Into<String>,
        guid: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            resource_type: resource_type.into(),
            guid: guid.into(),
            timestamps: Timestamps::created(created_at),
            attributes: JsonMap::new(),
            relations: Vec::new(),
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn to_one(mut self, name: impl Into<String>, target: Option<Record>) -> Self {
        self.set_relation(name.into(), RecordRelation::ToOne(target.map(Box::new)));
        self
    }

    pub fn to_many(mut self, name: impl Into<String>, targets: Vec<Record>) -> Self {
        self.set_relation(name.into(), RecordRelation::ToMany(targets));
        self
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<JsonValue>) {
        self.attributes.insert(name.into(), value.into());
    }

    fn set_relation(&mut self, name: String, relation: RecordRelation) {
        match self.relations.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = relation,
            None => self.relations.push((name, relation)),
        }
    }
}

impl Resource for Record {
    fn key(&self) -> ResourceKey {
        ResourceKey::new(&self.resource_type, &self.guid)
    }

    fn timestamps(&self) -> Timestamps {
        self.timestamps
    }

    fn attributes(&self) -> JsonMap<String, JsonValue> {
        self.attributes.clone()
    }

    // Sorting and filtering call this per row; read the map in place.
    fn field(&self, name: &str) -> Option<Value> {
        metadata_field(self, name).or_else(|| self.attributes.get(name).map(Value::from))
    }

    fn relations(&self) -> Vec<Relation<'_>> {
        self.relations
            .iter()
            .map(|(name, relation)| match relation {
                RecordRelation::ToOne(target) => Relation::to_one(
                    name,
                    target.as_deref().map(|record| record as &dyn Resource),
                ),
                RecordRelation::ToMany(targets) => Relation::to_many(
                    name,
                    targets.iter().map(|record| record as &dyn Resource).collect(),
                ),
            })
            .collect()
    }
}
