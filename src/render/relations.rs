//! Relation inlining and orphan extraction.
//!
//! Each resource is rendered as a `{ metadata, entity }` envelope. Relations
//! always contribute their `_url` (and, for to-one, `_guid`) keys; within the
//! depth budget they are also expanded in place. With orphan extraction on,
//! every expanded relation is written once to the orphans map and replaced
//! inline by a `{ guid, type }` reference.

use crate::core::ResourceKey;
use crate::query::RenderOptions;
use crate::render::{Export, Exporter, Related, Resource};
use serde_json::{Map as JsonMap, Value as JsonValue, json};
use std::collections::BTreeMap;
use tracing::debug;

pub type OrphanMap = BTreeMap<String, JsonValue>;

pub fn resource_url(api_prefix: &str, key: &ResourceKey) -> String {
    format!("{api_prefix}/{}/{}", key.resource_type, key.guid)
}

/// Serializes the resources of one render call.
///
/// Holds the orphan map for the duration of the call so that a related
/// entity referenced from several rows is exported once.
pub struct RelationSerializer<'a> {
    exporter: &'a dyn Exporter,
    options: &'a RenderOptions,
    api_prefix: &'a str,
    /// Deepest level a force-included relation may reach.
    include_ceiling: u32,
    orphans: Option<OrphanMap>,
}

impl<'a> RelationSerializer<'a> {
    pub fn new(
        exporter: &'a dyn Exporter,
        options: &'a RenderOptions,
        api_prefix: &'a str,
        max_inline_relations_depth: u32,
    ) -> Self {
        Self {
            exporter,
            options,
            api_prefix,
            include_ceiling: max_inline_relations_depth.max(1),
            orphans: options.orphans_enabled().then(OrphanMap::new),
        }
    }

    /// Renders one top-level resource, or `None` if the exporter skipped it.
    pub fn serialize(&mut self, resource: &dyn Resource) -> Option<JsonValue> {
        self.envelope(resource, self.options.depth(), 0)
    }

    /// Orphans collected so far; `None` when extraction is disabled.
    pub fn into_orphans(self) -> Option<OrphanMap> {
        self.orphans
    }

    fn envelope(&mut self, resource: &dyn Resource, budget: u32, level: u32) -> Option<JsonValue> {
        let key = resource.key();
        let mut entity = match self.exporter.export(resource, budget) {
            Export::Serialized(entity) => entity,
            Export::Skipped => {
                debug!(resource = %key, "exporter skipped resource");
                return None;
            }
        };

        let url = resource_url(self.api_prefix, &key);
        for relation in resource.relations() {
            let name = relation.name;
            if self.options.is_excluded(name) {
                continue;
            }

            let expand =
                budget > 0 || (self.options.is_included(name) && level < self.include_ceiling);
            let child_budget = budget.saturating_sub(1);

            match relation.target {
                Related::ToOne(target) => {
                    let target_key = target.map(|t| t.key());
                    entity.insert(
                        format!("{name}_guid"),
                        target_key
                            .as_ref()
                            .map_or(JsonValue::Null, |k| JsonValue::from(k.guid.clone())),
                    );
                    entity.insert(
                        format!("{name}_url"),
                        target_key.as_ref().map_or(JsonValue::Null, |k| {
                            JsonValue::from(resource_url(self.api_prefix, k))
                        }),
                    );

                    if expand
                        && let Some(target) = target
                        && let Some(rendered) = self.nested(target, child_budget, level + 1)
                    {
                        entity.insert(name.to_string(), rendered);
                    }
                }
                Related::ToMany(targets) => {
                    entity.insert(format!("{name}_url"), JsonValue::from(format!("{url}/{name}")));

                    if expand {
                        let rendered: Vec<JsonValue> = targets
                            .into_iter()
                            .filter_map(|target| self.nested(target, child_budget, level + 1))
                            .collect();
                        entity.insert(name.to_string(), JsonValue::Array(rendered));
                    }
                }
            }
        }

        Some(json!({
            "metadata": metadata(resource, url),
            "entity": JsonValue::Object(entity),
        }))
    }

    fn nested(&mut self, target: &dyn Resource, budget: u32, level: u32) -> Option<JsonValue> {
        if self.orphans.is_none() {
            return self.envelope(target, budget, level);
        }

        let key = target.key();
        let orphan_key = key.orphan_key();
        let already_hoisted = self
            .orphans
            .as_ref()
            .is_some_and(|orphans| orphans.contains_key(&orphan_key));

        if !already_hoisted {
            let rendered = self.envelope(target, budget, level)?;
            if let Some(orphans) = self.orphans.as_mut() {
                orphans.entry(orphan_key).or_insert(rendered);
            }
        }

        Some(json!({ "guid": key.guid, "type": key.resource_type }))
    }
}

fn metadata(resource: &dyn Resource, url: String) -> JsonValue {
    let timestamps = resource.timestamps();
    let mut metadata = JsonMap::new();
    metadata.insert("guid".into(), JsonValue::from(resource.key().guid));
    metadata.insert("url".into(), JsonValue::from(url));
    metadata.insert(
        "created_at".into(),
        JsonValue::from(timestamps.created_at.to_rfc3339()),
    );
    metadata.insert(
        "updated_at".into(),
        timestamps
            .updated_at
            .map_or(JsonValue::Null, |at| JsonValue::from(at.to_rfc3339())),
    );
    JsonValue::Object(metadata)
}
