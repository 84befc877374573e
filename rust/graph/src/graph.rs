// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Model Graph - Spatial structure over parsed lines
//!
//! Builds the aggregation/containment graph and the property set table
//! from their relationship lines. A malformed relationship line is logged
//! and skipped; the rest of the model stays available.

use crate::error::{Error, Result};
use crate::store::LineStore;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use std::sync::Arc;
use stepline_core::LineRecord;

const REL_AGGREGATES: &str = "IFCRELAGGREGATES";
const REL_CONTAINED: &str = "IFCRELCONTAINEDINSPATIALSTRUCTURE";
const PROPERTY_SET: &str = "IFCPROPERTYSET";

/// One directed edge bundle from a relationship line
#[derive(Debug, Clone)]
pub struct Relation {
    /// Id of the relationship line itself
    pub rel_id: u32,
    /// Relating side
    pub source: u32,
    /// Related side, in file order
    pub targets: SmallVec<[u32; 4]>,
}

/// One property set line, properties kept as references
#[derive(Debug, Clone)]
pub struct PropSet {
    pub id: u32,
    pub guid: String,
    pub name: String,
    pub properties: SmallVec<[u32; 4]>,
}

/// Aggregation/containment view of one model
pub struct ModelGraph {
    nodes: FxHashMap<u32, Arc<LineRecord>>,
    relations: Vec<Relation>,
    prop_sets: FxHashMap<u32, PropSet>,
    /// source id → every target it relates, across all relations
    related: FxHashMap<u32, SmallVec<[u32; 4]>>,
}

impl ModelGraph {
    /// Walk the relationship lines of `store` and assemble the graph.
    pub fn build(store: &mut LineStore<'_>) -> Self {
        let mut graph = Self {
            nodes: FxHashMap::default(),
            relations: Vec::new(),
            prop_sets: FxHashMap::default(),
            related: FxHashMap::default(),
        };
        for rel_id in store.ids_of_type(REL_AGGREGATES).unwrap_or_default() {
            if let Err(error) = graph.add_aggregate(store, rel_id) {
                tracing::warn!(rel_id, %error, "Skipped malformed aggregate relation");
            }
        }
        for rel_id in store.ids_of_type(REL_CONTAINED).unwrap_or_default() {
            if let Err(error) = graph.add_containment(store, rel_id) {
                tracing::warn!(rel_id, %error, "Skipped malformed containment relation");
            }
        }
        for set_id in store.ids_of_type(PROPERTY_SET).unwrap_or_default() {
            if let Err(error) = graph.add_prop_set(store, set_id) {
                tracing::warn!(set_id, %error, "Skipped malformed property set");
            }
        }
        graph
    }

    /// `IFCRELAGGREGATES(guid, owner, name, desc, relating, (related...))`
    fn add_aggregate(&mut self, store: &mut LineStore<'_>, rel_id: u32) -> Result<()> {
        let record = store.record(rel_id)?;
        if record.arguments.len() != 6 {
            return Err(Error::ArgumentCount {
                id: rel_id,
                expected: 6,
                found: record.arguments.len(),
            });
        }
        let source = store.resolve_ref(rel_id, 4)?.ok_or(Error::ExpectedRef {
            id: rel_id,
            index: 4,
        })?;
        let targets = store.resolve_ref_list(rel_id, 5)?;
        self.insert_relation(rel_id, source, targets);
        Ok(())
    }

    /// `IFCRELCONTAINEDINSPATIALSTRUCTURE(guid, owner, name, desc,
    /// (related...), structure)` - the structure is the relating side.
    fn add_containment(&mut self, store: &mut LineStore<'_>, rel_id: u32) -> Result<()> {
        let record = store.record(rel_id)?;
        if record.arguments.len() != 6 {
            return Err(Error::ArgumentCount {
                id: rel_id,
                expected: 6,
                found: record.arguments.len(),
            });
        }
        let targets = store.resolve_ref_list(rel_id, 4)?;
        let source = store.resolve_ref(rel_id, 5)?.ok_or(Error::ExpectedRef {
            id: rel_id,
            index: 5,
        })?;
        self.insert_relation(rel_id, source, targets);
        Ok(())
    }

    /// `IFCPROPERTYSET(guid, owner, name, desc, (properties...))`
    fn add_prop_set(&mut self, store: &mut LineStore<'_>, set_id: u32) -> Result<()> {
        let record = store.record(set_id)?;
        if record.arguments.len() != 5 {
            return Err(Error::ArgumentCount {
                id: set_id,
                expected: 5,
                found: record.arguments.len(),
            });
        }
        let guid = record.get_text(0).unwrap_or_default().to_string();
        let name = record.get_text(2).unwrap_or_default().to_string();
        let list = record.get_list(4).ok_or(Error::ExpectedList {
            id: set_id,
            index: 4,
        })?;
        let mut properties = SmallVec::with_capacity(list.len());
        for member in list {
            match member.as_entity_ref() {
                Some(ref_id) => properties.push(ref_id),
                None => {
                    return Err(Error::ExpectedRef {
                        id: set_id,
                        index: 4,
                    })
                }
            }
        }
        self.prop_sets.insert(
            set_id,
            PropSet {
                id: set_id,
                guid,
                name,
                properties,
            },
        );
        Ok(())
    }

    fn insert_relation(
        &mut self,
        rel_id: u32,
        source: Arc<LineRecord>,
        targets: Vec<Arc<LineRecord>>,
    ) {
        let source_id = source.id;
        self.nodes.entry(source_id).or_insert(source);
        let mut target_ids: SmallVec<[u32; 4]> = SmallVec::with_capacity(targets.len());
        for target in targets {
            target_ids.push(target.id);
            self.nodes.entry(target.id).or_insert(target);
        }
        self.related
            .entry(source_id)
            .or_default()
            .extend(target_ids.iter().copied());
        self.relations.push(Relation {
            rel_id,
            source: source_id,
            targets: target_ids,
        });
    }

    /// Record behind a node, if the id participates in any relation
    pub fn node(&self, id: u32) -> Option<Arc<LineRecord>> {
        self.nodes.get(&id).map(Arc::clone)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Every edge bundle, in build order
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn prop_set(&self, id: u32) -> Option<&PropSet> {
        self.prop_sets.get(&id)
    }

    pub fn prop_sets(&self) -> impl Iterator<Item = &PropSet> {
        self.prop_sets.values()
    }

    /// Everything `id` relates, across all its relations
    pub fn related_ids(&self, id: u32) -> &[u32] {
        self.related.get(&id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Relating ids that never appear on a related side, ascending
    pub fn source_ids(&self) -> Vec<u32> {
        let targets: FxHashSet<u32> = self
            .relations
            .iter()
            .flat_map(|r| r.targets.iter().copied())
            .collect();
        let mut ids: Vec<u32> = self
            .relations
            .iter()
            .map(|r| r.source)
            .filter(|id| !targets.contains(id))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Related ids that never relate anything themselves, ascending
    pub fn sink_ids(&self) -> Vec<u32> {
        let sources: FxHashSet<u32> = self.relations.iter().map(|r| r.source).collect();
        let mut ids: Vec<u32> = self
            .relations
            .iter()
            .flat_map(|r| r.targets.iter().copied())
            .filter(|id| !sources.contains(id))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}
